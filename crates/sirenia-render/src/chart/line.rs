//! Multi-series line chart over a UTC time axis. Hovering picks the record with the nearest date
//! and shows every series' value for that day.

use super::{
    ChartSession, Overlay, accessor_option, checked_format, prepare_surface, settings_from_json,
    size_root, text_accessor_option,
};
use crate::axis::{Axis, linear_ticks, time_ticks};
use crate::model::{LineLayout, PointMark, SeriesLayout};
use crate::path::{Curve, line_path};
use crate::surface::{Canvas, NodeId, Surface};
use crate::svg::{fmt, fmt_em};
use crate::{RenderContext, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sirenia_core::Scalar;
use sirenia_core::accessor::{self, Accessor, Record};
use sirenia_core::data::{
    categorical_domain, extend_domain, group_by, indices_in_domain, max_number, project,
    time_extent,
};
use sirenia_core::palette::category10;
use sirenia_core::scale::{ContinuousKind, LinearScale, OrdinalScale, TimeScale};
use sirenia_core::tooltip::NearestTimeLocator;

/// Tooltip baseline below the plot area.
const TOOLTIP_GAP: f64 = 50.0;
/// Past this fraction of the width the tooltip opens to the left.
const FLIP_AT: f64 = 0.75;
const FLIP_SHIFT: f64 = 110.0;

pub type LineChart<T> = ChartSession<T, NearestTimeLocator, LineOverlay>;

pub struct LineOptions<T> {
    /// Date, defaults to the first element of a pair.
    pub x: Option<Accessor<T>>,
    /// Value, defaults to the second element of a pair.
    pub y: Option<Accessor<T>>,
    /// Series key, defaults to a constant (one series).
    pub z: Option<Accessor<T>>,
    /// Gap predicate; defaults to "x is a date and y is a number".
    pub defined: Option<Accessor<T, bool>>,
    /// Per-record tooltip line; defaults to the series key and the formatted value.
    pub tooltip: Option<Accessor<T, String>>,
    pub settings: LineSettings,
}

impl<T> Default for LineOptions<T> {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            z: None,
            defined: None,
            tooltip: None,
            settings: LineSettings::default(),
        }
    }
}

impl<T> Clone for LineOptions<T> {
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
            defined: self.defined.clone(),
            tooltip: self.tooltip.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl LineOptions<Value> {
    pub fn from_json(options: &Value) -> Result<Self> {
        Ok(Self {
            x: accessor_option(options, "x"),
            y: accessor_option(options, "y"),
            z: accessor_option(options, "z"),
            defined: None,
            tooltip: text_accessor_option(options, "tooltip"),
            settings: settings_from_json(options)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineSettings {
    pub curve: Option<Curve>,
    pub margin_top: Option<f64>,
    pub margin_right: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub margin_left: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// `[start, end]` dates; defaults to the extent of the x values.
    pub x_domain: Option<[Scalar; 2]>,
    pub x_range: Option<[f64; 2]>,
    pub y_type: Option<ContinuousKind>,
    pub y_domain: Option<[f64; 2]>,
    pub y_range: Option<[f64; 2]>,
    pub y_format: Option<String>,
    pub y_label: Option<String>,
    pub z_domain: Option<Vec<Scalar>>,
    pub colors: Option<Vec<String>>,
    pub stroke_linecap: Option<String>,
    pub stroke_linejoin: Option<String>,
    pub stroke_width: Option<f64>,
    pub stroke_opacity: Option<f64>,
    pub mix_blend_mode: Option<String>,
}

#[derive(Debug, Clone)]
struct Resolved {
    curve: Curve,
    margin_top: f64,
    margin_right: f64,
    margin_bottom: f64,
    margin_left: f64,
    width: f64,
    height: f64,
    x_range: (f64, f64),
    y_type: ContinuousKind,
    y_range: (f64, f64),
    y_format: Option<String>,
    colors: Vec<String>,
    stroke_linecap: String,
    stroke_linejoin: String,
    stroke_width: f64,
    mix_blend_mode: String,
}

impl LineSettings {
    fn resolve(&self) -> Result<Resolved> {
        let margin_top = self.margin_top.unwrap_or(30.0);
        let margin_right = self.margin_right.unwrap_or(20.0);
        let margin_bottom = self.margin_bottom.unwrap_or(70.0);
        let margin_left = self.margin_left.unwrap_or(20.0);
        let width = self.width.unwrap_or(400.0);
        let height = self.height.unwrap_or(280.0);
        let or = |v: &Option<String>, default: &str| v.clone().unwrap_or_else(|| default.to_string());
        Ok(Resolved {
            curve: self.curve.unwrap_or_default(),
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
            y_format: checked_format(self.y_format.as_deref())?,
            colors: self.colors.clone().unwrap_or_else(category10),
            stroke_linecap: or(&self.stroke_linecap, "round"),
            stroke_linejoin: or(&self.stroke_linejoin, "round"),
            stroke_width: self.stroke_width.unwrap_or(2.0),
            mix_blend_mode: or(&self.mix_blend_mode, "multiply"),
        })
    }
}

/// Hover decorations of a line chart.
pub struct LineOverlay {
    layout: LineLayout,
    /// Pixel position of every drawable record.
    positions: Vec<Option<(f64, f64)>>,
    days: Vec<Option<NaiveDate>>,
    years: Vec<String>,
    colors: Vec<String>,
    tooltips: Vec<String>,
    legend_id: String,
    circles_id: String,
    line_id: String,
    points_id: String,
    plot_top: f64,
    plot_bottom: f64,
    guide_color: String,
}

impl LineOverlay {
    fn reset_legend(&self, surface: &mut Surface, legend: NodeId) -> NodeId {
        surface.clear_children(legend);
        surface
            .append(legend, "g")
            .attr("id", self.circles_id.clone())
            .id()
    }
}

impl Overlay for LineOverlay {
    type Layout = LineLayout;

    fn layout(&self) -> &LineLayout {
        &self.layout
    }

    fn draw(&self, surface: &mut Surface, hovered: usize) {
        let (Some((px, _)), Some(day)) = (
            self.positions.get(hovered).copied().flatten(),
            self.days.get(hovered).copied().flatten(),
        ) else {
            self.clear(surface);
            return;
        };
        let (Some(legend), Some(line), Some(points)) = (
            surface.find_by_id(&self.legend_id),
            surface.find_by_id(&self.line_id),
            surface.find_by_id(&self.points_id),
        ) else {
            return;
        };

        let same_day: Vec<usize> = (0..self.positions.len())
            .filter(|&j| self.positions[j].is_some() && self.days[j] == Some(day))
            .collect();

        let circles = self.reset_legend(surface, legend);
        let text = surface
            .append(legend, "text")
            .attr("class", "text-body-2")
            .attr("transform", "translate(12,0)")
            .id();
        let title = std::iter::once(format!("Jahr {}", self.years[hovered]))
            .chain(same_day.iter().map(|&j| self.tooltips[j].clone()));
        for (k, line_text) in title.enumerate() {
            let tspan = surface
                .append(text, "tspan")
                .attr("x", "0")
                .attr("y", fmt_em(k as f64 * 1.45));
            let tspan = if k == 0 {
                tspan.attr("font-weight", "500")
            } else {
                tspan
            };
            tspan.text(line_text);
        }
        for (k, &j) in same_day.iter().enumerate() {
            surface
                .append(circles, "circle")
                .attr("cx", "0")
                .attr("cy", fmt_em(k as f64 * 1.25))
                .attr("r", "6")
                .attr("fill", self.colors[j].clone())
                .attr("shape-rendering", "geometricPrecision")
                .attr("transform", "translate(0,16)");
        }

        surface
            .node_mut(line)
            .num("x1", px)
            .num("y1", self.plot_top)
            .num("x2", px)
            .num("y2", self.plot_bottom)
            .attr("stroke-width", "1")
            .attr("stroke", self.guide_color.clone())
            .attr("stroke-dasharray", "4")
            .attr("style", "fill: none;");

        surface.clear_children(points);
        for &j in &same_day {
            let Some((_, py)) = self.positions[j] else {
                continue;
            };
            surface
                .append(points, "circle")
                .num("cx", px)
                .num("cy", py)
                .attr("r", "4")
                .attr("fill", self.colors[j].clone());
        }

        let x = if px > self.layout.width * FLIP_AT {
            px - FLIP_SHIFT
        } else {
            px
        };
        surface.set_attr(
            legend,
            "transform",
            format!(
                "translate({},{})",
                fmt(x),
                fmt(self.plot_bottom + TOOLTIP_GAP)
            ),
        );
    }

    fn clear(&self, surface: &mut Surface) {
        if let Some(legend) = surface.find_by_id(&self.legend_id) {
            self.reset_legend(surface, legend);
            surface.retain_attrs(legend, &["style", "id"]);
        }
        if let Some(line) = surface.find_by_id(&self.line_id) {
            surface.retain_attrs(line, &["id"]);
        }
        if let Some(points) = surface.find_by_id(&self.points_id) {
            surface.clear_children(points);
        }
    }
}

pub fn render<T: Record + Clone + 'static>(
    canvas: &mut Canvas,
    mount_id: &str,
    data: &[T],
    options: &LineOptions<T>,
    ctx: &RenderContext,
) -> Result<LineChart<T>> {
    let cfg = options.settings.resolve()?;
    let x = options.x.clone().unwrap_or_else(accessor::first::<T>);
    let y = options.y.clone().unwrap_or_else(accessor::second::<T>);
    let z = options.z.clone().unwrap_or_else(|| accessor::constant::<T>(1.0));

    let xs: Vec<Option<DateTime<Utc>>> = project(data, &x).iter().map(Scalar::as_time).collect();
    let ys = project(data, &y);
    let zs = project(data, &z);
    let defined: Vec<bool> = match &options.defined {
        Some(d) => project(data, d),
        None => (0..data.len())
            .map(|i| xs[i].is_some() && ys[i].is_numeric())
            .collect(),
    };

    let x_domain = options
        .settings
        .x_domain
        .as_ref()
        .and_then(|[a, b]| Some((a.as_time()?, b.as_time()?)))
        .or_else(|| time_extent(&xs))
        .unwrap_or((DateTime::<Utc>::UNIX_EPOCH, DateTime::<Utc>::UNIX_EPOCH));
    let y_domain = options
        .settings
        .y_domain
        .map_or_else(|| (0.0, max_number(&ys).unwrap_or(1.0)), |[a, b]| (a, b));
    let z_domain = categorical_domain(options.settings.z_domain.as_deref(), &zs);
    let valid = indices_in_domain(&zs, &z_domain);
    let seen_z: Vec<Scalar> = valid.iter().map(|&i| zs[i].clone()).collect();
    let color = OrdinalScale::new(extend_domain(&z_domain, &seen_z), cfg.colors.clone());

    let x_scale = TimeScale::new(x_domain, cfg.x_range);
    let y_scale = LinearScale::with_kind(cfg.y_type, y_domain, cfg.y_range);
    let value_format = y_scale.tick_format(100.0, cfg.y_format.as_deref());

    let mut positions = vec![None; data.len()];
    for &i in &valid {
        if !defined[i] {
            continue;
        }
        let (Some(t), Some(v)) = (xs[i], ys[i].as_number()) else {
            continue;
        };
        let (px, py) = (x_scale.scale(t), y_scale.scale(v));
        if px.is_finite() && py.is_finite() {
            positions[i] = Some((px, py));
        }
    }
    let drawable: Vec<usize> = valid
        .iter()
        .copied()
        .filter(|&i| positions[i].is_some())
        .collect();

    let series: Vec<SeriesLayout> = group_by(&valid, &zs)
        .into_iter()
        .map(|(key, indices)| {
            let points: Vec<Option<(f64, f64)>> = indices.iter().map(|&i| positions[i]).collect();
            SeriesLayout {
                color: color.color(&key).to_string(),
                path: line_path(&points, cfg.curve),
                points: indices
                    .iter()
                    .filter_map(|&i| positions[i].map(|(x, y)| PointMark { index: i, x, y }))
                    .collect(),
                key,
            }
        })
        .collect();

    let surface = prepare_surface(canvas, mount_id)?;
    let root = surface.root();
    size_root(surface, cfg.width, cfg.height, [0.0, 0.0, cfg.width, cfg.height]);
    surface.set_attr(
        root,
        "style",
        "max-width: 100%; height: auto; height: intrinsic; -webkit-tap-highlight-color: transparent; overflow: visible;",
    );

    let x_axis = surface.append(root, "g").id();
    let x_ticks = cfg.width / 80.0;
    let nodes = Axis::bottom(time_ticks(&x_scale, x_ticks)).draw(surface, x_axis);
    surface
        .node_mut(x_axis)
        .attr(
            "transform",
            format!("translate(0,{})", fmt(cfg.height - cfg.margin_bottom)),
        )
        .attr("class", "text-body-2");
    for line in nodes.tick_lines {
        surface.set_attr(line, "stroke", ctx.theme.muted.clone());
    }

    let y_axis = surface
        .append(root, "g")
        .attr("transform", format!("translate({},0)", fmt(cfg.margin_left)))
        .id();
    let y_ticks = cfg.height / 60.0;
    let nodes = Axis::left(linear_ticks(
        &y_scale,
        y_ticks,
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
            .num("x", -17.0)
            .num("y", 12.0)
            .attr("fill", "currentColor")
            .attr("text-anchor", "start")
            .text(label.clone());
    }

    let lines = surface
        .append(root, "g")
        .attr("fill", "none")
        .attr("stroke-linecap", cfg.stroke_linecap.clone())
        .attr("stroke-linejoin", cfg.stroke_linejoin.clone())
        .num("stroke-width", cfg.stroke_width)
        .id();
    if let Some(opacity) = options.settings.stroke_opacity {
        surface.set_attr(lines, "stroke-opacity", fmt(opacity));
    }
    for s in &series {
        let path = surface
            .append(lines, "path")
            .attr("style", format!("mix-blend-mode: {};", cfg.mix_blend_mode))
            .attr("stroke", s.color.clone())
            .id();
        if let Some(d) = &s.path {
            surface.set_attr(path, "d", d.clone());
        }
    }

    let legend_id = format!("{mount_id}Legend");
    let circles_id = format!("{mount_id}LegendCircles");
    let line_id = format!("{mount_id}PointerLine");
    let points_id = format!("{mount_id}PointerPoints");
    let legend = surface
        .append(root, "g")
        .attr("style", "pointer-events: none;")
        .attr("id", legend_id.clone())
        .id();
    surface.append(legend, "g").attr("id", circles_id.clone());
    surface.append(root, "line").attr("id", line_id.clone());
    surface.append(root, "g").attr("id", points_id.clone());

    tracing::debug!(
        chart = "line",
        mount_id,
        series = series.len(),
        marks = drawable.len(),
        excluded = data.len() - drawable.len(),
        "rendered chart"
    );

    let times_ms: Vec<Option<f64>> = xs
        .iter()
        .map(|t| t.map(|t| t.timestamp_millis() as f64))
        .collect();
    let locator = NearestTimeLocator::new(x_scale, &times_ms, &drawable);
    let overlay = LineOverlay {
        layout: LineLayout {
            width: cfg.width,
            height: cfg.height,
            series,
        },
        days: xs.iter().map(|t| t.map(|t| t.date_naive())).collect(),
        years: xs
            .iter()
            .map(|t| t.map(|t| t.format("%Y").to_string()).unwrap_or_default())
            .collect(),
        colors: zs.iter().map(|k| color.color(k).to_string()).collect(),
        tooltips: (0..data.len())
            .map(|i| match &options.tooltip {
                Some(t) => t(&data[i], i),
                None => format!(
                    "{}, {}",
                    zs[i],
                    ys[i]
                        .as_number()
                        .map(|v| ctx.formatter.format_with(&value_format, v))
                        .unwrap_or_default()
                ),
            })
            .collect(),
        positions,
        legend_id,
        circles_id,
        line_id,
        points_id,
        plot_top: cfg.margin_top,
        plot_bottom: cfg.height - cfg.margin_bottom,
        guide_color: ctx.theme.muted.clone(),
    };
    Ok(ChartSession::new(mount_id, data.to_vec(), locator, overlay))
}
