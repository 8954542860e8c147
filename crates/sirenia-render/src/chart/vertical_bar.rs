//! Vertical bar chart with a left value axis, a bottom category axis and a hover overlay: hatched
//! highlight over the hovered band, a dashed guide line and a caret-underlined tooltip.

use super::{
    ChartSession, Overlay, accessor_option, checked_format, prepare_surface, settings_from_json,
    size_root, text_accessor_option,
};
use crate::axis::{Axis, band_ticks, linear_ticks};
use crate::model::{BarLayout, BarMark};
use crate::surface::{Canvas, NodeId, Surface};
use crate::svg::{fmt, fmt_em};
use crate::text::{TOOLTIP_FONT_SIZE, TextMeasurer};
use crate::{RenderContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sirenia_core::Scalar;
use sirenia_core::accessor::{self, Accessor, Record};
use sirenia_core::data::{
    categorical_domain, extend_domain, indices_in_domain, max_number, project,
};
use sirenia_core::palette::category10;
use sirenia_core::scale::{BandScale, ContinuousKind, LinearScale, OrdinalScale};
use sirenia_core::tooltip::BandLocator;
use std::sync::Arc;

const Y_TICKS: f64 = 5.0;
const HATCH_ID: &str = "diagonalHatch";
/// Tooltip baseline below the plot area.
const TOOLTIP_GAP: f64 = 50.0;

pub type VerticalBarChart<T> = ChartSession<T, BandLocator, VerticalBarOverlay>;

pub struct VerticalBarOptions<T> {
    /// Band value, defaults to the record index.
    pub x: Option<Accessor<T>>,
    /// Bar height value, defaults to the record itself.
    pub y: Option<Accessor<T>>,
    /// Color category, defaults to a constant.
    pub z: Option<Accessor<T>>,
    pub title: Option<Accessor<T, String>>,
    /// Tooltip text (lines separated by `\n`); defaults to the title.
    pub tooltip: Option<Accessor<T, String>>,
    pub settings: VerticalBarSettings,
}

impl<T> Default for VerticalBarOptions<T> {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            z: None,
            title: None,
            tooltip: None,
            settings: VerticalBarSettings::default(),
        }
    }
}

impl<T> Clone for VerticalBarOptions<T> {
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
            title: self.title.clone(),
            tooltip: self.tooltip.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl VerticalBarOptions<Value> {
    pub fn from_json(options: &Value) -> Result<Self> {
        Ok(Self {
            x: accessor_option(options, "x"),
            y: accessor_option(options, "y"),
            z: accessor_option(options, "z"),
            title: text_accessor_option(options, "title"),
            tooltip: text_accessor_option(options, "tooltip"),
            settings: settings_from_json(options)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerticalBarSettings {
    pub margin_top: Option<f64>,
    pub margin_right: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub margin_left: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub x_domain: Option<Vec<Scalar>>,
    pub x_range: Option<[f64; 2]>,
    pub y_type: Option<ContinuousKind>,
    pub y_domain: Option<[f64; 2]>,
    pub y_range: Option<[f64; 2]>,
    pub x_padding: Option<f64>,
    pub y_format: Option<String>,
    pub y_label: Option<String>,
    pub colors: Option<Vec<String>>,
    pub z_domain: Option<Vec<Scalar>>,
}

#[derive(Debug, Clone)]
struct Resolved {
    margin_top: f64,
    margin_right: f64,
    margin_bottom: f64,
    margin_left: f64,
    width: f64,
    height: f64,
    x_range: (f64, f64),
    y_type: ContinuousKind,
    y_range: (f64, f64),
    x_padding: f64,
    y_format: Option<String>,
    colors: Vec<String>,
}

impl VerticalBarSettings {
    fn resolve(&self) -> Result<Resolved> {
        let margin_top = self.margin_top.unwrap_or(25.0);
        let margin_right = self.margin_right.unwrap_or(5.0);
        let margin_bottom = self.margin_bottom.unwrap_or(100.0);
        let margin_left = self.margin_left.unwrap_or(25.0);
        let width = self.width.unwrap_or(400.0);
        let height = self.height.unwrap_or(310.0);
        Ok(Resolved {
            margin_top,
            margin_right,
            margin_bottom,
            margin_left,
            width,
            height,
            x_range: self
                .x_range
                .map_or((margin_left, width - margin_right), |[a, b]| (a, b)),
            y_type: self.y_type.unwrap_or_default(),
            y_range: self
                .y_range
                .map_or((height - margin_bottom, margin_top), |[a, b]| (a, b)),
            x_padding: self.x_padding.unwrap_or(0.1),
            y_format: checked_format(self.y_format.as_deref())?,
            colors: self.colors.clone().unwrap_or_else(category10),
        })
    }
}

/// Hover decorations of a vertical bar chart.
pub struct VerticalBarOverlay {
    layout: BarLayout,
    /// Position in `layout.bars` per record index.
    bar_of: Vec<Option<usize>>,
    tooltips: Vec<String>,
    legend_id: String,
    line_id: String,
    rect_id: String,
    plot_top: f64,
    plot_bottom: f64,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl VerticalBarOverlay {
    fn node(surface: &Surface, id: &str) -> Option<NodeId> {
        surface.find_by_id(id)
    }
}

impl Overlay for VerticalBarOverlay {
    type Layout = BarLayout;

    fn layout(&self) -> &BarLayout {
        &self.layout
    }

    fn draw(&self, surface: &mut Surface, hovered: usize) {
        let Some(k) = self.bar_of.get(hovered).copied().flatten() else {
            self.clear(surface);
            return;
        };
        let bar = &self.layout.bars[k];
        let (Some(legend), Some(line), Some(rects)) = (
            Self::node(surface, &self.legend_id),
            Self::node(surface, &self.line_id),
            Self::node(surface, &self.rect_id),
        ) else {
            return;
        };

        // Tooltip: caret underline plus stacked text, centered on the band.
        surface.clear_children(legend);
        let text = &self.tooltips[k];
        let half = self.measurer.line_width(text, TOOLTIP_FONT_SIZE) / 2.0;
        surface.set_attr(
            legend,
            "transform",
            format!(
                "translate({},{})",
                fmt(bar.x + self.layout.bandwidth / 2.0),
                fmt(self.plot_bottom + TOOLTIP_GAP)
            ),
        );
        surface
            .append(legend, "path")
            .attr("shape-rendering", "geometricPrecision")
            .attr("stroke", bar.color.clone())
            .attr("fill", bar.color.clone())
            .attr("stroke-width", "1")
            .attr("transform", "translate(0,-18)")
            .attr(
                "d",
                format!(
                    "M {} 0 H {} M 0 0 L 5 -5 L 10 0 L 0 0",
                    fmt(-half),
                    fmt(half)
                ),
            );
        let text_node = surface
            .append(legend, "text")
            .attr("class", "text-body-2")
            .attr("transform", format!("translate({},0)", fmt(-half)))
            .id();
        for (i, line_text) in text.split('\n').enumerate() {
            let (em, class) = if i == 1 {
                (1.3, "text-body-1")
            } else {
                (1.45, "text-body-2")
            };
            surface
                .append(text_node, "tspan")
                .attr("x", "0")
                .attr("y", fmt_em(i as f64 * em))
                .attr("class", class)
                .text(line_text);
        }

        let guide_x = bar.x + self.layout.step * 0.4;
        surface
            .node_mut(line)
            .num("x1", guide_x)
            .num("y1", self.plot_top)
            .num("x2", guide_x)
            .num("y2", self.plot_bottom)
            .attr("stroke-width", "1")
            .attr("stroke", bar.color.clone())
            .attr("stroke-dasharray", "4")
            .attr("style", "fill: none;");

        surface.clear_children(rects);
        for other in self.layout.bars.iter().filter(|b| b.category == bar.category) {
            surface
                .append(rects, "rect")
                .num("x", bar.x)
                .num("y", other.y)
                .num("height", other.height)
                .num("width", self.layout.bandwidth)
                .attr("stroke", other.color.clone())
                .attr("stroke-width", "0.5")
                .attr("fill", format!("url(#{HATCH_ID})"));
        }
    }

    fn clear(&self, surface: &mut Surface) {
        if let Some(legend) = Self::node(surface, &self.legend_id) {
            surface.clear_children(legend);
            surface.retain_attrs(legend, &["style", "id"]);
        }
        if let Some(line) = Self::node(surface, &self.line_id) {
            surface.retain_attrs(line, &["id"]);
        }
        if let Some(rects) = Self::node(surface, &self.rect_id) {
            surface.clear_children(rects);
        }
    }
}

/// Draws the chart and returns the interactive session for it.
pub fn render<T: Record + Clone + 'static>(
    canvas: &mut Canvas,
    mount_id: &str,
    data: &[T],
    options: &VerticalBarOptions<T>,
    ctx: &RenderContext,
) -> Result<VerticalBarChart<T>> {
    let cfg = options.settings.resolve()?;
    let x = options.x.clone().unwrap_or_else(accessor::index::<T>);
    let y = options.y.clone().unwrap_or_else(accessor::identity::<T>);
    let z = options.z.clone().unwrap_or_else(|| accessor::constant::<T>(1.0));

    let xs = project(data, &x);
    let ys = project(data, &y);
    let zs = project(data, &z);

    let x_domain = categorical_domain(options.settings.x_domain.as_deref(), &xs);
    let y_domain = options
        .settings
        .y_domain
        .map_or_else(|| (0.0, max_number(&ys).unwrap_or(1.0)), |[a, b]| (a, b));
    let valid: Vec<usize> = indices_in_domain(&xs, &x_domain)
        .into_iter()
        .filter(|&i| ys[i].is_numeric())
        .collect();
    let z_domain = categorical_domain(options.settings.z_domain.as_deref(), &zs);
    let drawn_z: Vec<Scalar> = valid.iter().map(|&i| zs[i].clone()).collect();
    let color = OrdinalScale::new(extend_domain(&z_domain, &drawn_z), cfg.colors.clone());

    let x_scale = BandScale::with_padding(x_domain, cfg.x_range, cfg.x_padding);
    let y_scale = LinearScale::with_kind(cfg.y_type, y_domain, cfg.y_range);
    let value_format = y_scale.tick_format(100.0, cfg.y_format.as_deref());

    let y0 = y_scale.scale(0.0);
    let mut bar_of = vec![None; data.len()];
    let mut bars = Vec::with_capacity(valid.len());
    let mut tooltips = Vec::with_capacity(valid.len());
    for &i in &valid {
        let (Some(value), Some(left)) = (ys[i].as_number(), x_scale.scale(&xs[i])) else {
            continue;
        };
        let top = y_scale.scale(value);
        let title = match &options.title {
            Some(t) => t(&data[i], i),
            None => format!(
                "{}\n{}",
                xs[i],
                ctx.formatter.format_with(&value_format, value)
            ),
        };
        tooltips.push(match &options.tooltip {
            Some(t) => t(&data[i], i),
            None => title.clone(),
        });
        bar_of[i] = Some(bars.len());
        bars.push(BarMark {
            index: i,
            category: xs[i].clone(),
            value,
            x: left,
            y: top,
            width: x_scale.bandwidth(),
            height: y0 - top,
            color: color.color(&zs[i]).to_string(),
            title,
        });
    }

    let surface = prepare_surface(canvas, mount_id)?;
    let root = surface.root();
    size_root(surface, cfg.width, cfg.height, [0.0, 0.0, cfg.width, cfg.height]);

    // Value axis with grid lines across the plot.
    let y_axis = surface
        .append(root, "g")
        .attr("transform", format!("translate({},0)", fmt(cfg.margin_left)))
        .id();
    let nodes = Axis::left(linear_ticks(
        &y_scale,
        Y_TICKS,
        cfg.y_format.as_deref(),
        &ctx.formatter,
    ))
    .draw(surface, y_axis);
    surface.set_attr(y_axis, "class", "text-body-2");
    for line in nodes.tick_lines {
        surface
            .node_mut(line)
            .attr("stroke", ctx.theme.muted.clone())
            .num("x1", cfg.width - cfg.margin_left - cfg.margin_right);
    }
    if let Some(label) = &options.settings.y_label {
        surface
            .append(y_axis, "text")
            .num("x", -cfg.margin_left)
            .num("y", 12.0)
            .attr("fill", "currentColor")
            .attr("text-anchor", "start")
            .text(label.clone());
    }

    // Category axis labelling every second record.
    let x_axis = surface
        .append(root, "g")
        .attr(
            "transform",
            format!("translate(0,{})", fmt(cfg.height - cfg.margin_bottom)),
        )
        .id();
    let tick_values: Vec<Scalar> = xs.iter().step_by(2).cloned().collect();
    let nodes = Axis::bottom(band_ticks(&x_scale, &tick_values)).draw(surface, x_axis);
    surface.set_attr(x_axis, "class", "text-body-2");
    for line in nodes.tick_lines {
        surface.set_attr(line, "stroke", ctx.theme.muted.clone());
    }

    let marks = surface.append(root, "g").id();
    for bar in &bars {
        surface
            .append(marks, "rect")
            .num("x", bar.x)
            .num("y", bar.y)
            .attr("fill", bar.color.clone())
            .num("height", bar.height)
            .num("width", bar.width);
    }

    let legend_id = format!("{mount_id}Legend");
    let line_id = format!("{mount_id}PointerLine");
    let rect_id = format!("{mount_id}PointerRect");
    surface
        .append(root, "g")
        .attr("style", "pointer-events: none;")
        .attr("id", legend_id.clone());
    surface.append(root, "line").attr("id", line_id.clone());
    surface.append(root, "g").attr("id", rect_id.clone());

    let defs = surface.append(root, "defs").id();
    let pattern = surface
        .append(defs, "pattern")
        .attr("id", HATCH_ID)
        .attr("patternUnits", "userSpaceOnUse")
        .attr("width", "4")
        .attr("height", "4")
        .id();
    surface
        .append(pattern, "path")
        .attr("d", "M-1,1 l2,-2 M0,4 l4,-4 M3,5 l2,-2")
        .attr("stroke", "#FFFFFF")
        .attr("stroke-width", "0.5");

    tracing::debug!(
        chart = "vbar",
        mount_id,
        marks = bars.len(),
        excluded = data.len() - bars.len(),
        "rendered chart"
    );

    let locator = BandLocator::new(x_scale.clone(), &xs, &valid);
    let overlay = VerticalBarOverlay {
        layout: BarLayout {
            width: cfg.width,
            height: cfg.height,
            step: x_scale.step(),
            bandwidth: x_scale.bandwidth(),
            bars,
        },
        bar_of,
        tooltips,
        legend_id,
        line_id,
        rect_id,
        plot_top: cfg.margin_top,
        plot_bottom: cfg.height - cfg.margin_bottom,
        measurer: ctx.text_measurer.clone(),
    };
    Ok(ChartSession::new(mount_id, data.to_vec(), locator, overlay))
}
