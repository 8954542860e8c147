use crate::data::intern;
use crate::scale::{BandScale, TimeScale};
use crate::tooltip::*;
use crate::*;
use chrono::{TimeZone, Utc};

fn five_bars() -> (BandLocator, Vec<&'static str>) {
    let data = vec!["a", "b", "c", "d", "e"];
    let xs: Vec<Scalar> = data.iter().copied().map(Scalar::from).collect();
    let scale = BandScale::with_padding(intern(xs.iter().cloned()), (25.0, 375.0), 0.1);
    let locator = BandLocator::new(scale, &xs, &[0, 1, 2, 3, 4]);
    (locator, data)
}

#[test]
fn pointer_on_index_two_selects_it_and_leave_clears() {
    let (locator, data) = five_bars();
    // 350px over 5.1 steps: x = 200 falls in the third band.
    let t = transition(
        TooltipState::Idle,
        PointerEvent::Enter { x: 200.0, y: 50.0 },
        &locator,
        &data,
    );
    assert_eq!(t.state, TooltipState::Hovering(2));
    assert_eq!(t.selection, Some(SelectionChanged(Some("c"))));
    assert!(!t.prevent_default);

    let t = transition(t.state, PointerEvent::Leave, &locator, &data);
    assert_eq!(t.state, TooltipState::Idle);
    assert_eq!(t.selection, Some(SelectionChanged(None)));
}

#[test]
fn moves_between_bands_and_clamps_outside_the_plot() {
    let (locator, data) = five_bars();
    let t = transition(
        TooltipState::Hovering(2),
        PointerEvent::Move { x: 100.0, y: 0.0 },
        &locator,
        &data,
    );
    assert_eq!(t.state, TooltipState::Hovering(1));

    let left = transition(t.state, PointerEvent::Move { x: -40.0, y: 0.0 }, &locator, &data);
    assert_eq!(left.state, TooltipState::Hovering(0));
    let right = transition(t.state, PointerEvent::Move { x: 9_999.0, y: 0.0 }, &locator, &data);
    assert_eq!(right.state, TooltipState::Hovering(4));
    assert_eq!(right.selection, Some(SelectionChanged(Some("e"))));
}

#[test]
fn touch_start_only_prevents_default() {
    let (locator, data) = five_bars();
    let t = transition(TooltipState::Hovering(3), PointerEvent::TouchStart, &locator, &data);
    assert_eq!(t.state, TooltipState::Hovering(3));
    assert_eq!(t.selection, None);
    assert!(t.prevent_default);
}

#[test]
fn leave_while_idle_does_not_notify() {
    let (locator, data) = five_bars();
    let t = transition(TooltipState::Idle, PointerEvent::Leave, &locator, &data);
    assert_eq!(t.state, TooltipState::Idle);
    assert_eq!(t.selection, None);
}

#[test]
fn empty_data_stays_idle() {
    let scale = BandScale::new(Default::default(), (0.0, 100.0));
    let locator = BandLocator::new(scale, &[], &[]);
    let data: Vec<&str> = Vec::new();
    let t = transition(
        TooltipState::Idle,
        PointerEvent::Move { x: 50.0, y: 0.0 },
        &locator,
        &data,
    );
    assert_eq!(t.state, TooltipState::Idle);
    assert_eq!(t.selection, None);
}

#[test]
fn bands_without_valid_records_go_idle() {
    let xs: Vec<Scalar> = ["a", "b", "c"].map(Scalar::from).to_vec();
    let scale = BandScale::new(intern(xs.iter().cloned()), (0.0, 90.0));
    let locator = BandLocator::new(scale, &xs, &[0, 2]);
    let data = vec![1, 2, 3];
    let t = transition(
        TooltipState::Hovering(0),
        PointerEvent::Move { x: 45.0, y: 0.0 },
        &locator,
        &data,
    );
    assert_eq!(t.state, TooltipState::Idle);
    assert_eq!(t.selection, Some(SelectionChanged(None)));
}

#[test]
fn nearest_time_locator_bisects_sorted_dates() {
    let year = |y: i32| Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).unwrap();
    // Input order is deliberately unsorted.
    let dates = [year(2022), year(2020), year(2021), year(2023)];
    let times: Vec<Option<f64>> = dates.iter().map(|d| Some(d.timestamp_millis() as f64)).collect();
    let scale = TimeScale::new((year(2020), year(2023)), (0.0, 300.0));
    let locator = NearestTimeLocator::new(scale, &times, &[0, 1, 2, 3]);

    assert_eq!(locator.locate(0.0, 0.0), Some(1));
    assert_eq!(locator.locate(90.0, 0.0), Some(2));
    assert_eq!(locator.locate(210.0, 0.0), Some(0));
    assert_eq!(locator.locate(1_000.0, 0.0), Some(3));
}

#[test]
fn nearest_time_locator_skips_invalid_records() {
    let year = |y: i32| Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).unwrap();
    let times = vec![
        Some(year(2020).timestamp_millis() as f64),
        None,
        Some(year(2022).timestamp_millis() as f64),
    ];
    let scale = TimeScale::new((year(2020), year(2022)), (0.0, 200.0));
    let locator = NearestTimeLocator::new(scale, &times, &[0, 2]);
    assert_eq!(locator.locate(90.0, 0.0), Some(0));
    assert_eq!(locator.locate(110.0, 0.0), Some(2));

    let empty = NearestTimeLocator::new(scale, &[], &[]);
    assert_eq!(empty.locate(10.0, 0.0), None);
}
