//! The four chart renderers and the interactive session shared by the pointer-aware ones.

pub mod donut;
pub mod horizontal_bar;
pub mod line;
pub mod vertical_bar;

use crate::surface::{Canvas, Surface};
use crate::{Error, RenderContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sirenia_core::accessor::{Accessor, accessor};
use sirenia_core::tooltip::{IndexLocator, transition};
use sirenia_core::{NumberFormat, PointerEvent, Scalar, SelectionChanged, TooltipState, Transition};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Donut,
    Hbar,
    Vbar,
    Line,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Donut => "donut",
            ChartKind::Hbar => "hbar",
            ChartKind::Vbar => "vbar",
            ChartKind::Line => "line",
        }
    }

    /// Whether the chart reacts to pointer input.
    pub fn is_interactive(self) -> bool {
        matches!(self, ChartKind::Vbar | ChartKind::Line)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "donut" | "pie" => Ok(ChartKind::Donut),
            "hbar" | "horizontal-bar" => Ok(ChartKind::Hbar),
            "vbar" | "bar" | "vertical-bar" => Ok(ChartKind::Vbar),
            "line" => Ok(ChartKind::Line),
            _ => Err(Error::UnknownChartKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// Accessor over JSON records named by an options value: a string reads an object key, a
/// non-negative integer reads an array element.
pub fn json_accessor(spec: &Value) -> Option<Accessor<Value>> {
    match spec {
        Value::String(key) => {
            let key = key.clone();
            Some(accessor(move |d: &Value, _| {
                d.get(key.as_str()).map(Scalar::from_json).unwrap_or_default()
            }))
        }
        Value::Number(n) => {
            let at = usize::try_from(n.as_u64()?).ok()?;
            Some(accessor(move |d: &Value, _| {
                d.get(at).map(Scalar::from_json).unwrap_or_default()
            }))
        }
        _ => None,
    }
}

/// Like [`json_accessor`], rendering the looked-up value as display text.
pub fn json_text_accessor(spec: &Value) -> Option<Accessor<Value, String>> {
    let inner = json_accessor(spec)?;
    Some(accessor(move |d: &Value, i| inner(d, i).to_string()))
}

pub(crate) fn accessor_option(options: &Value, key: &str) -> Option<Accessor<Value>> {
    options.get(key).and_then(json_accessor)
}

pub(crate) fn text_accessor_option(options: &Value, key: &str) -> Option<Accessor<Value, String>> {
    options.get(key).and_then(json_text_accessor)
}

/// Chart settings from an options object; `null` means all defaults.
pub(crate) fn settings_from_json<S>(options: &Value) -> Result<S>
where
    S: serde::de::DeserializeOwned + Default,
{
    if options.is_null() {
        return Ok(S::default());
    }
    Ok(serde_json::from_value(options.clone())?)
}

/// Rejects malformed format specifiers before anything is drawn.
pub(crate) fn checked_format(specifier: Option<&str>) -> Result<Option<String>> {
    match specifier {
        None => Ok(None),
        Some(s) => {
            NumberFormat::parse(s)?;
            Ok(Some(s.to_string()))
        }
    }
}

/// Looks up the mount and wipes it for a full redraw.
pub(crate) fn prepare_surface<'a>(canvas: &'a mut Canvas, mount_id: &str) -> Result<&'a mut Surface> {
    let surface = canvas.surface_mut(mount_id)?;
    surface.clear();
    Ok(surface)
}

/// Root attributes shared by every chart.
pub(crate) fn size_root(surface: &mut Surface, width: f64, height: f64, view_box: [f64; 4]) {
    let root = surface.root();
    surface
        .node_mut(root)
        .num("width", width)
        .num("height", height)
        .attr(
            "viewBox",
            view_box.map(crate::svg::fmt).join(","),
        )
        .attr("style", "max-width: 100%; height: auto; height: intrinsic;");
}

/// Hover decorations drawn on top of a chart's static marks.
pub trait Overlay {
    type Layout;

    fn layout(&self) -> &Self::Layout;

    /// Replaces the decorations with the ones for record `hovered`.
    fn draw(&self, surface: &mut Surface, hovered: usize);

    /// Removes every decoration.
    fn clear(&self, surface: &mut Surface);
}

type Listener<T> = Box<dyn FnMut(&SelectionChanged<T>)>;

/// A drawn interactive chart: routes pointer events through the tooltip state machine, redraws
/// the overlay and notifies selection listeners.
pub struct ChartSession<T, L, O> {
    mount_id: String,
    data: Vec<T>,
    locator: L,
    overlay: O,
    state: TooltipState,
    selection: Option<T>,
    listeners: Vec<Listener<T>>,
}

impl<T, L, O> fmt::Debug for ChartSession<T, L, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartSession")
            .field("mount_id", &self.mount_id)
            .field("records", &self.data.len())
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<T, L, O> ChartSession<T, L, O>
where
    T: Clone,
    L: IndexLocator,
    O: Overlay,
{
    pub(crate) fn new(mount_id: &str, data: Vec<T>, locator: L, overlay: O) -> Self {
        Self {
            mount_id: mount_id.to_string(),
            data,
            locator,
            overlay,
            state: TooltipState::Idle,
            selection: None,
            listeners: Vec::new(),
        }
    }

    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    pub fn state(&self) -> TooltipState {
        self.state
    }

    /// The record currently under the pointer.
    pub fn selection(&self) -> Option<&T> {
        self.selection.as_ref()
    }

    pub fn layout(&self) -> &O::Layout {
        self.overlay.layout()
    }

    pub fn on_selection_changed(&mut self, listener: impl FnMut(&SelectionChanged<T>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Feeds one pointer event. The overlay is redrawn for hover transitions and cleared whenever
    /// the machine ends up idle; touch-start only asks the host to suppress its default gesture.
    pub fn pointer(&mut self, canvas: &mut Canvas, event: PointerEvent) -> Result<Transition<T>> {
        let next = transition(self.state, event, &self.locator, &self.data);
        if event != PointerEvent::TouchStart {
            let surface = canvas.surface_mut(&self.mount_id)?;
            match next.state {
                TooltipState::Hovering(i) => self.overlay.draw(surface, i),
                TooltipState::Idle => self.overlay.clear(surface),
            }
        }
        self.state = next.state;
        if let Some(changed) = &next.selection {
            self.selection = changed.0.clone();
            for listener in &mut self.listeners {
                listener(changed);
            }
        }
        Ok(next)
    }
}

/// A chart drawn from JSON records, as produced by [`render_json`].
#[derive(Debug)]
pub enum RenderedChart {
    Donut(crate::model::DonutLayout),
    HorizontalBar(crate::model::BarLayout),
    VerticalBar(vertical_bar::VerticalBarChart<Value>),
    Line(line::LineChart<Value>),
}

impl RenderedChart {
    pub fn kind(&self) -> ChartKind {
        match self {
            RenderedChart::Donut(_) => ChartKind::Donut,
            RenderedChart::HorizontalBar(_) => ChartKind::Hbar,
            RenderedChart::VerticalBar(_) => ChartKind::Vbar,
            RenderedChart::Line(_) => ChartKind::Line,
        }
    }

    pub fn layout_json(&self) -> Result<Value> {
        let value = match self {
            RenderedChart::Donut(layout) => serde_json::to_value(layout)?,
            RenderedChart::HorizontalBar(layout) => serde_json::to_value(layout)?,
            RenderedChart::VerticalBar(chart) => serde_json::to_value(chart.layout())?,
            RenderedChart::Line(chart) => serde_json::to_value(chart.layout())?,
        };
        Ok(value)
    }

    /// Feeds a pointer event to interactive charts; `None` for static ones.
    pub fn pointer(
        &mut self,
        canvas: &mut Canvas,
        event: PointerEvent,
    ) -> Result<Option<Transition<Value>>> {
        match self {
            RenderedChart::VerticalBar(chart) => chart.pointer(canvas, event).map(Some),
            RenderedChart::Line(chart) => chart.pointer(canvas, event).map(Some),
            RenderedChart::Donut(_) | RenderedChart::HorizontalBar(_) => Ok(None),
        }
    }
}

/// Renders JSON records with JSON options; accessor options name record keys or array slots.
pub fn render_json(
    kind: ChartKind,
    canvas: &mut Canvas,
    mount_id: &str,
    data: &[Value],
    options: &Value,
    ctx: &RenderContext,
) -> Result<RenderedChart> {
    let chart = match kind {
        ChartKind::Donut => {
            let options = donut::DonutOptions::from_json(options)?;
            RenderedChart::Donut(donut::render(canvas, mount_id, data, &options, ctx)?)
        }
        ChartKind::Hbar => {
            let options = horizontal_bar::HorizontalBarOptions::from_json(options)?;
            RenderedChart::HorizontalBar(horizontal_bar::render(
                canvas, mount_id, data, &options, ctx,
            )?)
        }
        ChartKind::Vbar => {
            let options = vertical_bar::VerticalBarOptions::from_json(options)?;
            RenderedChart::VerticalBar(vertical_bar::render(canvas, mount_id, data, &options, ctx)?)
        }
        ChartKind::Line => {
            let options = line::LineOptions::from_json(options)?;
            RenderedChart::Line(line::render(canvas, mount_id, data, &options, ctx)?)
        }
    };
    Ok(chart)
}
