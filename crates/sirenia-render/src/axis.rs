//! Axis markup compatible with `d3.axisBottom` / `d3.axisLeft`, minus the domain path.

use crate::surface::{NodeId, Surface};
use crate::svg::fmt;
use sirenia_core::Formatter;
use sirenia_core::scale::{BandScale, LinearScale, TimeScale};
use sirenia_core::value::Scalar;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
/// Crisp-edge offset applied to every tick position.
const OFFSET: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Position along the axis before the crisp-edge offset.
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Axis {
    orient: Orient,
    ticks: Vec<AxisTick>,
}

/// Element ids of a drawn axis, for chart-specific restyling (grid lines, tick colors).
#[derive(Debug, Clone)]
pub struct AxisNodes {
    pub group: NodeId,
    pub tick_lines: Vec<NodeId>,
    pub labels: Vec<NodeId>,
}

impl Axis {
    pub fn new(orient: Orient, ticks: Vec<AxisTick>) -> Self {
        Self { orient, ticks }
    }

    pub fn bottom(ticks: Vec<AxisTick>) -> Self {
        Self::new(Orient::Bottom, ticks)
    }

    pub fn left(ticks: Vec<AxisTick>) -> Self {
        Self::new(Orient::Left, ticks)
    }

    pub fn ticks(&self) -> &[AxisTick] {
        &self.ticks
    }

    /// Renders the axis into the existing `group`, which receives the axis text attributes and
    /// one `g.tick` child per tick.
    pub fn draw(&self, surface: &mut Surface, group: NodeId) -> AxisNodes {
        let anchor = match self.orient {
            Orient::Bottom => "middle",
            Orient::Left => "end",
        };
        surface
            .node_mut(group)
            .attr("fill", "none")
            .attr("font-size", "10")
            .attr("font-family", "sans-serif")
            .attr("text-anchor", anchor);

        let mut nodes = AxisNodes {
            group,
            tick_lines: Vec::with_capacity(self.ticks.len()),
            labels: Vec::with_capacity(self.ticks.len()),
        };
        let spacing = TICK_SIZE + TICK_PADDING;
        for tick in &self.ticks {
            let at = fmt(tick.position + OFFSET);
            let transform = match self.orient {
                Orient::Bottom => format!("translate({at},0)"),
                Orient::Left => format!("translate(0,{at})"),
            };
            let g = surface
                .append(group, "g")
                .attr("class", "tick")
                .attr("opacity", "1")
                .attr("transform", transform)
                .id();

            let line = surface.append(g, "line").attr("stroke", "currentColor");
            let line = match self.orient {
                Orient::Bottom => line.num("y2", TICK_SIZE),
                Orient::Left => line.num("x2", -TICK_SIZE),
            };
            nodes.tick_lines.push(line.id());

            let text = surface.append(g, "text").attr("fill", "currentColor");
            let text = match self.orient {
                Orient::Bottom => text.num("y", spacing).attr("dy", "0.71em"),
                Orient::Left => text.num("x", -spacing).attr("dy", "0.32em"),
            };
            nodes.labels.push(text.text(tick.label.clone()).id());
        }
        nodes
    }
}

/// One tick per value, centered on its band; values outside the band domain are skipped.
pub fn band_ticks(scale: &BandScale, values: &[Scalar]) -> Vec<AxisTick> {
    // Together with the crisp-edge offset this lands on the band center.
    let half = (scale.bandwidth() - 2.0 * OFFSET).max(0.0) / 2.0;
    values
        .iter()
        .filter_map(|v| {
            scale.scale(v).map(|start| AxisTick {
                position: start + half,
                label: v.to_string(),
            })
        })
        .collect()
}

/// About `count` round-valued ticks labelled with the scale's tick format.
pub fn linear_ticks(
    scale: &LinearScale,
    count: f64,
    specifier: Option<&str>,
    formatter: &Formatter,
) -> Vec<AxisTick> {
    let format = scale.tick_format(count, specifier);
    scale
        .ticks(count)
        .into_iter()
        .map(|v| AxisTick {
            position: scale.scale(v),
            label: formatter.format_with(&format, v),
        })
        .collect()
}

/// Calendar-aligned ticks labelled with the multi-scale time format.
pub fn time_ticks(scale: &TimeScale, count: f64) -> Vec<AxisTick> {
    scale
        .ticks(count)
        .into_iter()
        .map(|t| AxisTick {
            position: scale.scale(t),
            label: scale.tick_format(t),
        })
        .collect()
}
