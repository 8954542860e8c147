//! Horizontal bar chart: thin bars over grey tracks, one row per category, with the category name
//! above the bar on the left and the formatted value on the right.

use super::{
    accessor_option, checked_format, prepare_surface, settings_from_json, size_root,
};
use crate::model::{BarLayout, BarMark};
use crate::surface::Canvas;
use crate::{RenderContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sirenia_core::Scalar;
use sirenia_core::accessor::{self, Accessor, Record};
use sirenia_core::data::{categorical_domain, indices_in_domain, max_number, project};
use sirenia_core::scale::{BandScale, ContinuousKind, LinearScale};

const BAR_HEIGHT: f64 = 6.0;
const LABEL_DY: f64 = -22.0;
/// Horizontal position of the value column, as a fraction of the width.
const VALUE_COLUMN: f64 = 0.83;

pub struct HorizontalBarOptions<T> {
    /// Quantitative value, defaults to the record itself.
    pub x: Option<Accessor<T>>,
    /// Category, defaults to the record index.
    pub y: Option<Accessor<T>>,
    /// Value shown in the right column; numbers are formatted as prices.
    pub title: Option<Accessor<T>>,
    pub settings: HorizontalBarSettings,
}

impl<T> Default for HorizontalBarOptions<T> {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            title: None,
            settings: HorizontalBarSettings::default(),
        }
    }
}

impl<T> Clone for HorizontalBarOptions<T> {
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
            title: self.title.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl HorizontalBarOptions<Value> {
    pub fn from_json(options: &Value) -> Result<Self> {
        Ok(Self {
            x: accessor_option(options, "x"),
            y: accessor_option(options, "y"),
            title: accessor_option(options, "title"),
            settings: settings_from_json(options)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HorizontalBarSettings {
    pub margin_top: Option<f64>,
    pub margin_right: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub margin_left: Option<f64>,
    pub width: Option<f64>,
    /// Defaults to 35px per record plus 20.
    pub height: Option<f64>,
    pub x_type: Option<ContinuousKind>,
    pub x_domain: Option<[f64; 2]>,
    pub x_range: Option<[f64; 2]>,
    pub x_format: Option<String>,
    pub y_padding: Option<f64>,
    pub y_domain: Option<Vec<Scalar>>,
    pub y_range: Option<[f64; 2]>,
    /// Bar fill; defaults to the theme's primary color.
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
struct Resolved {
    width: f64,
    height: f64,
    x_type: ContinuousKind,
    x_range: (f64, f64),
    x_format: Option<String>,
    y_padding: f64,
    y_range: (f64, f64),
    color: String,
}

impl HorizontalBarSettings {
    fn resolve(&self, records: usize, ctx: &RenderContext) -> Result<Resolved> {
        let margin_top = self.margin_top.unwrap_or(20.0);
        let margin_right = self.margin_right.unwrap_or(0.0);
        let margin_bottom = self.margin_bottom.unwrap_or(0.0);
        let margin_left = self.margin_left.unwrap_or(0.0);
        let width = self.width.unwrap_or(400.0);
        let height = self.height.unwrap_or(35.0 * records as f64 + 20.0);
        Ok(Resolved {
            width,
            height,
            x_type: self.x_type.unwrap_or_default(),
            x_range: self
                .x_range
                .map_or((margin_left, width - margin_right), |[a, b]| (a, b)),
            x_format: checked_format(self.x_format.as_deref())?,
            y_padding: self.y_padding.unwrap_or(0.1),
            y_range: self
                .y_range
                .map_or((margin_top, height - margin_bottom), |[a, b]| (a, b)),
            color: self
                .color
                .clone()
                .unwrap_or_else(|| ctx.theme.primary.clone()),
        })
    }
}

pub fn render<T: Record + 'static>(
    canvas: &mut Canvas,
    mount_id: &str,
    data: &[T],
    options: &HorizontalBarOptions<T>,
    ctx: &RenderContext,
) -> Result<BarLayout> {
    let cfg = options.settings.resolve(data.len(), ctx)?;
    let x = options.x.clone().unwrap_or_else(accessor::identity::<T>);
    let y = options.y.clone().unwrap_or_else(accessor::index::<T>);

    let xs = project(data, &x);
    let ys = project(data, &y);

    let x_domain = options
        .settings
        .x_domain
        .map_or_else(|| (0.0, max_number(&xs).unwrap_or(1.0)), |[a, b]| (a, b));
    let y_domain = categorical_domain(options.settings.y_domain.as_deref(), &ys);
    let valid: Vec<usize> = indices_in_domain(&ys, &y_domain)
        .into_iter()
        .filter(|&i| xs[i].is_numeric())
        .collect();

    let x_scale = LinearScale::with_kind(cfg.x_type, x_domain, cfg.x_range);
    let y_scale = BandScale::with_padding(y_domain, cfg.y_range, cfg.y_padding);
    let tick_format = x_scale.tick_format(100.0, cfg.x_format.as_deref());

    let x0 = x_scale.scale(0.0);
    let bars: Vec<BarMark> = valid
        .iter()
        .filter_map(|&i| {
            let value = xs[i].as_number()?;
            let top = y_scale.scale(&ys[i])?;
            let title = match &options.title {
                Some(t) => {
                    let shown = t(&data[i], i);
                    match shown.as_number() {
                        Some(n) => ctx.formatter.format_price(n),
                        None => shown.to_string(),
                    }
                }
                None => ctx.formatter.format_with(&tick_format, value),
            };
            Some(BarMark {
                index: i,
                category: ys[i].clone(),
                value,
                x: x0,
                y: top,
                width: x_scale.scale(value) - x0,
                height: BAR_HEIGHT,
                color: cfg.color.clone(),
                title,
            })
        })
        .collect();

    let surface = prepare_surface(canvas, mount_id)?;
    let root = surface.root();
    size_root(surface, cfg.width, cfg.height, [0.0, 0.0, cfg.width, cfg.height]);
    surface.set_attr(root, "shape-rendering", "geometricPrecision");

    let tracks = surface.append(root, "g").id();
    for bar in &bars {
        surface
            .append(tracks, "rect")
            .attr("fill", ctx.theme.muted.clone())
            .num("x", bar.x)
            .num("y", bar.y)
            .num("width", cfg.width)
            .num("height", bar.height)
            .attr("class", "bar-track");
    }

    let mains = surface.append(root, "g").id();
    for bar in &bars {
        surface
            .append(mains, "rect")
            .attr("fill", bar.color.clone())
            .num("x", bar.x)
            .num("y", bar.y)
            .num("width", bar.width)
            .num("height", bar.height)
            .attr("class", "main-bars")
            .attr("x-value", crate::svg::fmt(bar.value))
            .attr("y-value", bar.category.to_string());
    }

    let half_band = y_scale.bandwidth() / 2.0;
    let names = surface.append(root, "g").id();
    for bar in &bars {
        surface
            .append(names, "text")
            .attr("text-anchor", "start")
            .attr("class", "text-body-2")
            .num("x", 0.0)
            .num("y", bar.y + half_band)
            .num("dy", LABEL_DY)
            .num("dx", 0.0)
            .text(bar.category.to_string());
    }

    let values = surface.append(root, "g").id();
    for bar in &bars {
        surface
            .append(values, "text")
            .attr("text-anchor", "start")
            .attr("class", "text-body-2")
            .num("x", cfg.width * VALUE_COLUMN)
            .num("y", bar.y + half_band)
            .num("dy", LABEL_DY)
            .num("dx", 0.0)
            .text(bar.title.clone());
    }

    tracing::debug!(
        chart = "hbar",
        mount_id,
        marks = bars.len(),
        excluded = data.len() - bars.len(),
        "rendered chart"
    );

    Ok(BarLayout {
        width: cfg.width,
        height: cfg.height,
        step: y_scale.step(),
        bandwidth: y_scale.bandwidth(),
        bars,
    })
}
