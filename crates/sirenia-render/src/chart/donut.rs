//! Donut chart: one padded annular sector per numeric value, colored by name, with the total in
//! the middle.

use super::{accessor_option, prepare_surface, settings_from_json, size_root, text_accessor_option};
use crate::model::{ArcLayout, DonutLayout};
use crate::path::{arc_path, pie};
use crate::surface::Canvas;
use crate::{RenderContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sirenia_core::accessor::{self, Accessor, Record};
use sirenia_core::data::{
    categorical_domain, extend_domain, numeric_indices, project, sum_numbers,
};
use sirenia_core::palette::spectral_for_cardinality;
use sirenia_core::scale::OrdinalScale;
use sirenia_core::{NumberFormat, Scalar};

/// Accessors and settings for [`render`]; every field is optional.
pub struct DonutOptions<T> {
    /// Ordinal label, defaults to the first element of a pair.
    pub name: Option<Accessor<T>>,
    /// Quantitative value, defaults to the second element of a pair.
    pub value: Option<Accessor<T>>,
    /// Sector title; defaults to the name and the formatted value on two lines.
    pub title: Option<Accessor<T, String>>,
    pub settings: DonutSettings,
}

impl<T> Default for DonutOptions<T> {
    fn default() -> Self {
        Self {
            name: None,
            value: None,
            title: None,
            settings: DonutSettings::default(),
        }
    }
}

impl<T> Clone for DonutOptions<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            value: self.value.clone(),
            title: self.title.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl DonutOptions<Value> {
    pub fn from_json(options: &Value) -> Result<Self> {
        Ok(Self {
            name: accessor_option(options, "name"),
            value: accessor_option(options, "value"),
            title: text_accessor_option(options, "title"),
            settings: settings_from_json(options)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DonutSettings {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub inner_radius: Option<f64>,
    pub outer_radius: Option<f64>,
    pub label_radius: Option<f64>,
    /// Number format for titles and the total.
    pub format: Option<String>,
    /// Color domain.
    pub names: Option<Vec<Scalar>>,
    pub colors: Option<Vec<String>>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub stroke_linejoin: Option<String>,
    pub pad_angle: Option<f64>,
}

#[derive(Debug, Clone)]
struct Resolved {
    width: f64,
    height: f64,
    inner_radius: f64,
    outer_radius: f64,
    label_radius: f64,
    format: NumberFormat,
    stroke: String,
    stroke_width: f64,
    stroke_linejoin: String,
    pad_angle: f64,
}

impl DonutSettings {
    fn resolve(&self) -> Result<Resolved> {
        let width = self.width.unwrap_or(100.0);
        let height = self.height.unwrap_or(100.0);
        let side = width.min(height);
        let inner_radius = self.inner_radius.unwrap_or(side / 2.6);
        let outer_radius = self.outer_radius.unwrap_or(side / 2.0);
        let stroke = self.stroke.clone().unwrap_or_else(|| "none".to_string());
        let pad_angle = self.pad_angle.unwrap_or(if stroke == "none" {
            1.0 / outer_radius
        } else {
            0.0
        });
        Ok(Resolved {
            width,
            height,
            inner_radius,
            outer_radius,
            label_radius: self
                .label_radius
                .unwrap_or((inner_radius + outer_radius) / 2.0),
            format: NumberFormat::parse(self.format.as_deref().unwrap_or(","))?,
            stroke,
            stroke_width: self.stroke_width.unwrap_or(0.0),
            stroke_linejoin: self
                .stroke_linejoin
                .clone()
                .unwrap_or_else(|| "round".to_string()),
            pad_angle,
        })
    }
}

/// Draws the donut into the surface mounted at `mount_id`, replacing its previous content.
pub fn render<T: Record + 'static>(
    canvas: &mut Canvas,
    mount_id: &str,
    data: &[T],
    options: &DonutOptions<T>,
    ctx: &RenderContext,
) -> Result<DonutLayout> {
    let cfg = options.settings.resolve()?;
    let name = options.name.clone().unwrap_or_else(accessor::first::<T>);
    let value = options.value.clone().unwrap_or_else(accessor::second::<T>);

    let names = project(data, &name);
    let values = project(data, &value);
    let valid = numeric_indices(&values);
    let numbers: Vec<f64> = valid
        .iter()
        .map(|&i| values[i].as_number().unwrap_or(0.0))
        .collect();

    let domain = categorical_domain(options.settings.names.as_deref(), &names);
    let colors = options
        .settings
        .colors
        .clone()
        .unwrap_or_else(|| spectral_for_cardinality(domain.len()));
    let drawn_names: Vec<Scalar> = valid.iter().map(|&i| names[i].clone()).collect();
    let color = OrdinalScale::new(extend_domain(&domain, &drawn_names), colors);

    let title = |i: usize| -> String {
        match &options.title {
            Some(t) => t(&data[i], i),
            None => format!(
                "{}\n{}",
                names[i],
                ctx.formatter.format_with(&cfg.format, values[i].as_number().unwrap_or(f64::NAN))
            ),
        }
    };

    let total = sum_numbers(&values);
    let total_label = ctx.formatter.format_with(&cfg.format, total);

    let arcs: Vec<ArcLayout> = pie(&numbers, cfg.pad_angle)
        .iter()
        .map(|arc| {
            let i = valid[arc.index];
            let (label_x, label_y) = arc.centroid(cfg.label_radius);
            ArcLayout {
                index: i,
                name: names[i].clone(),
                value: arc.value,
                start_angle: arc.start_angle,
                end_angle: arc.end_angle,
                pad_angle: arc.pad_angle,
                path: arc_path(cfg.inner_radius, cfg.outer_radius, arc),
                color: color.color(&names[i]).to_string(),
                label_x,
                label_y,
                title: title(i),
            }
        })
        .collect();

    let surface = prepare_surface(canvas, mount_id)?;
    let root = surface.root();
    size_root(
        surface,
        cfg.width,
        cfg.height,
        [-cfg.width / 2.0, -cfg.height / 2.0, cfg.width, cfg.height],
    );

    let sectors = surface
        .append(root, "g")
        .attr("stroke", cfg.stroke.clone())
        .num("stroke-width", cfg.stroke_width)
        .attr("stroke-linejoin", cfg.stroke_linejoin.clone())
        .id();
    for arc in &arcs {
        let path = surface
            .append(sectors, "path")
            .attr("fill", arc.color.clone())
            .attr("d", arc.path.clone())
            .id();
        surface.append(path, "title").text(arc.title.clone());
    }

    let total_group = surface.append(root, "g").id();
    surface
        .append(total_group, "text")
        .attr("fill", ctx.theme.text_color())
        .attr("text-anchor", "middle")
        .attr("class", "text-body-2")
        .text(total_label.clone());

    let caption_group = surface.append(root, "g").id();
    surface
        .append(caption_group, "text")
        .attr("fill", ctx.theme.text_color())
        .attr("text-anchor", "middle")
        .attr("dy", "1.25em")
        .attr("class", "text-caption")
        .text("Total");

    tracing::debug!(
        chart = "donut",
        mount_id,
        marks = arcs.len(),
        excluded = data.len() - valid.len(),
        "rendered chart"
    );

    Ok(DonutLayout {
        width: cfg.width,
        height: cfg.height,
        inner_radius: cfg.inner_radius,
        outer_radius: cfg.outer_radius,
        label_radius: cfg.label_radius,
        total,
        total_label,
        arcs,
    })
}
