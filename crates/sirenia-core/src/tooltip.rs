//! Pointer-tracking tooltip state machine.
//!
//! [`transition`] is a pure function of the current state, the incoming event and a locator, so
//! chart sessions and tests drive the same logic. Applying the result to a drawing surface is the
//! caller's job.

use crate::data::bisect_center;
use crate::scale::{BandScale, TimeScale};
use crate::value::Scalar;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "camelCase")]
pub enum TooltipState {
    #[default]
    Idle,
    Hovering(usize),
}

impl TooltipState {
    pub fn hovered(self) -> Option<usize> {
        match self {
            TooltipState::Idle => None,
            TooltipState::Hovering(i) => Some(i),
        }
    }
}

/// Pointer input in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Enter { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Leave,
    TouchStart,
}

/// Outward notification: the full record under the pointer, or `None` once it leaves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SelectionChanged<T>(pub Option<T>);

#[derive(Debug, Clone, PartialEq)]
pub struct Transition<T> {
    pub state: TooltipState,
    /// Set when listeners must be notified.
    pub selection: Option<SelectionChanged<T>>,
    /// The host should suppress its default gesture handling (scroll, zoom).
    pub prevent_default: bool,
}

/// Maps a pointer position to the index of the record it designates.
pub trait IndexLocator {
    fn locate(&self, x: f64, y: f64) -> Option<usize>;
}

/// Discrete lookup for band charts: the band under the pointer, counted in whole steps from the
/// start of the range and clamped to the domain.
#[derive(Debug, Clone)]
pub struct BandLocator {
    scale: BandScale,
    /// Record index for each band; `None` for bands without a valid record.
    records: Vec<Option<usize>>,
}

impl BandLocator {
    /// Each band resolves to the first valid record whose `x` equals the band's value.
    pub fn new(scale: BandScale, xs: &[Scalar], valid: &[usize]) -> Self {
        let records = scale
            .domain()
            .iter()
            .map(|value| valid.iter().copied().find(|&i| xs[i] == *value))
            .collect();
        Self { scale, records }
    }
}

impl IndexLocator for BandLocator {
    fn locate(&self, x: f64, _y: f64) -> Option<usize> {
        let band = self.scale.index_at(x)?;
        self.records.get(band).copied().flatten()
    }
}

/// Continuous lookup for time series: inverts the pointer through the time scale and picks the
/// record with the closest date.
#[derive(Debug, Clone)]
pub struct NearestTimeLocator {
    scale: TimeScale,
    times: Vec<f64>,
    records: Vec<usize>,
}

impl NearestTimeLocator {
    /// `times[i]` is the epoch-millisecond x value of record `i`; only `valid` records are
    /// candidates.
    pub fn new(scale: TimeScale, times: &[Option<f64>], valid: &[usize]) -> Self {
        let mut pairs: Vec<(f64, usize)> = valid
            .iter()
            .filter_map(|&i| times.get(i).copied().flatten().map(|t| (t, i)))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let (times, records) = pairs.into_iter().unzip();
        Self {
            scale,
            times,
            records,
        }
    }
}

impl IndexLocator for NearestTimeLocator {
    fn locate(&self, x: f64, _y: f64) -> Option<usize> {
        let at = self.scale.invert_ms(x);
        if !at.is_finite() {
            return self.records.first().copied();
        }
        let k = bisect_center(&self.times, at)?;
        self.records.get(k).copied()
    }
}

/// Advances the tooltip for one pointer event.
///
/// Enter/move events that resolve to a record move to `Hovering` and always notify (the record
/// may be unchanged). Events that resolve to nothing, and leave events, fall back to `Idle`;
/// leaving notifies with `None` only when something was hovered.
pub fn transition<T, L>(
    state: TooltipState,
    event: PointerEvent,
    locator: &L,
    data: &[T],
) -> Transition<T>
where
    T: Clone,
    L: IndexLocator + ?Sized,
{
    let idle = |notify: bool| Transition {
        state: TooltipState::Idle,
        selection: notify.then_some(SelectionChanged(None)),
        prevent_default: false,
    };

    let next = match event {
        PointerEvent::TouchStart => Transition {
            state,
            selection: None,
            prevent_default: true,
        },
        PointerEvent::Leave => idle(state != TooltipState::Idle),
        PointerEvent::Enter { x, y } | PointerEvent::Move { x, y } => {
            match locator.locate(x, y).and_then(|i| data.get(i).map(|d| (i, d))) {
                Some((i, datum)) => Transition {
                    state: TooltipState::Hovering(i),
                    selection: Some(SelectionChanged(Some(datum.clone()))),
                    prevent_default: false,
                },
                None => idle(state != TooltipState::Idle),
            }
        }
    };
    tracing::trace!(from = ?state, to = ?next.state, ?event, "tooltip transition");
    next
}
