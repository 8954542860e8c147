use serde_json::{Value, json};
use sirenia_core::{PointerEvent, SelectionChanged, TooltipState};
use sirenia_render::chart::horizontal_bar::{self, HorizontalBarOptions};
use sirenia_render::chart::vertical_bar::{self, VerticalBarOptions};
use sirenia_render::{Canvas, ChartKind, RenderContext, render_json};
use std::cell::RefCell;
use std::rc::Rc;

fn records(value: Value) -> Vec<Value> {
    value.as_array().cloned().unwrap_or_default()
}

fn element_by_id<'a>(doc: &'a roxmltree::Document<'a>, id: &str) -> roxmltree::Node<'a, 'a> {
    doc.descendants()
        .find(|n| n.attribute("id") == Some(id))
        .unwrap_or_else(|| panic!("no element #{id}"))
}

#[test]
fn hbar_draws_one_bar_per_numeric_record() {
    let data = records(json!([
        { "name": "Zürich", "value": 5000 },
        { "name": "Bern", "value": 2500 },
        { "name": "Basel", "value": "n/a" },
        { "name": "Genf", "value": null },
    ]));
    let mut canvas = Canvas::new();
    canvas.mount("hbar");
    let options = HorizontalBarOptions::from_json(&json!({ "x": "value", "y": "name" }))
        .expect("options");
    let layout = horizontal_bar::render(&mut canvas, "hbar", &data, &options, &RenderContext::default())
        .expect("render");
    assert_eq!(layout.bars.len(), 2);

    let svg = canvas.to_svg("hbar").expect("svg");
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");
    let mains: Vec<_> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("main-bars"))
        .collect();
    let tracks = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("bar-track"))
        .count();
    assert_eq!(mains.len(), 2);
    assert_eq!(tracks, 2);
    assert_eq!(mains[0].attribute("y-value"), Some("Zürich"));
    assert_eq!(mains[0].attribute("x-value"), Some("5000"));
    assert_eq!(mains[0].attribute("width"), Some("400"));
    assert_eq!(mains[1].attribute("width"), Some("200"));

    // height = 35 * 4 + 20
    assert_eq!(doc.root_element().attribute("height"), Some("160"));
}

#[test]
fn hbar_titles_are_prices() {
    let data = records(json!([
        { "name": "Haus", "value": 950000 },
        { "name": "Villa", "value": 2500000 },
    ]));
    let mut canvas = Canvas::new();
    canvas.mount("prices");
    let options = HorizontalBarOptions::from_json(
        &json!({ "x": "value", "y": "name", "title": "value" }),
    )
    .expect("options");
    let layout = horizontal_bar::render(
        &mut canvas,
        "prices",
        &data,
        &options,
        &RenderContext::default(),
    )
    .expect("render");
    let titles: Vec<&str> = layout.bars.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["CHF 950'000", "2.50 Mio."]);
}

#[test]
fn vbar_skips_non_numeric_heights() {
    let data = records(json!([
        { "k": "a", "v": 1 },
        { "k": "b", "v": "x" },
        { "k": "c", "v": null },
        { "k": "d", "v": "4" },
    ]));
    let mut canvas = Canvas::new();
    canvas.mount("v");
    let chart = render_json(
        ChartKind::Vbar,
        &mut canvas,
        "v",
        &data,
        &json!({ "x": "k", "y": "v" }),
        &RenderContext::default(),
    )
    .expect("render");
    let layout = chart.layout_json().expect("layout");
    assert_eq!(layout["bars"].as_array().map(Vec::len), Some(2));

    let svg = canvas.to_svg("v").expect("svg");
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");
    assert_eq!(doc.descendants().filter(|n| n.has_tag_name("rect")).count(), 2);
}

#[test]
fn vbar_colors_follow_the_z_category() {
    let data = records(json!([
        { "k": "2020", "v": 1, "z": "Miete" },
        { "k": "2021", "v": 2, "z": "Kauf" },
        { "k": "2022", "v": 3, "z": "Miete" },
    ]));
    let mut canvas = Canvas::new();
    canvas.mount("v");
    let options =
        VerticalBarOptions::from_json(&json!({ "x": "k", "y": "v", "z": "z" })).expect("options");
    let chart = vertical_bar::render(&mut canvas, "v", &data, &options, &RenderContext::default())
        .expect("render");
    let colors: Vec<&str> = chart.layout().bars.iter().map(|b| b.color.as_str()).collect();
    assert_eq!(colors, ["#1f77b4", "#ff7f0e", "#1f77b4"]);
}

#[test]
fn vbar_hover_then_leave() {
    let data = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let mut canvas = Canvas::new();
    canvas.mount("v");
    let mut chart = vertical_bar::render(
        &mut canvas,
        "v",
        &data,
        &VerticalBarOptions::default(),
        &RenderContext::default(),
    )
    .expect("render");
    let before = canvas.to_svg("v").expect("svg");

    let seen: Rc<RefCell<Vec<Option<f64>>>> = Rc::default();
    let sink = seen.clone();
    chart.on_selection_changed(move |SelectionChanged(d)| sink.borrow_mut().push(*d));

    let t = chart
        .pointer(&mut canvas, PointerEvent::Enter { x: 200.0, y: 100.0 })
        .expect("pointer");
    assert_eq!(t.state, TooltipState::Hovering(2));
    assert_eq!(chart.selection(), Some(&30.0));

    let svg = canvas.to_svg("v").expect("svg");
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");
    let hatch = element_by_id(&doc, "vPointerRect");
    assert_eq!(hatch.children().filter(|n| n.is_element()).count(), 1);
    let legend = element_by_id(&doc, "vLegend");
    let lines: Vec<&str> = legend
        .descendants()
        .filter(|n| n.has_tag_name("tspan"))
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(lines, ["2", "30.0"]);
    let guide = element_by_id(&doc, "vPointerLine");
    assert_eq!(guide.attribute("stroke-dasharray"), Some("4"));

    let t = chart.pointer(&mut canvas, PointerEvent::Leave).expect("pointer");
    assert_eq!(t.state, TooltipState::Idle);
    assert_eq!(chart.selection(), None);
    assert_eq!(canvas.to_svg("v").expect("svg"), before);
    assert_eq!(*seen.borrow(), [Some(30.0), None]);
}

#[test]
fn vbar_touch_start_only_prevents_default() {
    let data = vec![1.0, 2.0];
    let mut canvas = Canvas::new();
    canvas.mount("v");
    let mut chart = vertical_bar::render(
        &mut canvas,
        "v",
        &data,
        &VerticalBarOptions::default(),
        &RenderContext::default(),
    )
    .expect("render");
    let before = canvas.to_svg("v").expect("svg");
    let t = chart
        .pointer(&mut canvas, PointerEvent::TouchStart)
        .expect("pointer");
    assert!(t.prevent_default);
    assert_eq!(t.selection, None);
    assert_eq!(canvas.to_svg("v").expect("svg"), before);
}

#[test]
fn vbar_pointer_after_unmount_fails() {
    let data = vec![1.0, 2.0, 3.0];
    let mut canvas = Canvas::new();
    canvas.mount("v");
    let mut chart = vertical_bar::render(
        &mut canvas,
        "v",
        &data,
        &VerticalBarOptions::default(),
        &RenderContext::default(),
    )
    .expect("render");
    canvas.unmount("v");
    let err = chart
        .pointer(&mut canvas, PointerEvent::Move { x: 100.0, y: 10.0 })
        .expect_err("surface is gone");
    assert!(matches!(err, sirenia_render::Error::MountNotFound { .. }));
}

#[test]
fn hbar_drops_categories_outside_an_explicit_domain() {
    let data = records(json!([
        { "name": "Zürich", "value": 1450000 },
        { "name": "Bern", "value": 820000 },
        { "name": "Luzern", "value": 990000 },
    ]));
    let mut canvas = Canvas::new();
    canvas.mount("h");
    let options = HorizontalBarOptions::from_json(
        &json!({ "x": "value", "y": "name", "yDomain": ["Bern"] }),
    )
    .expect("options");
    let layout = horizontal_bar::render(&mut canvas, "h", &data, &options, &RenderContext::default())
        .expect("render");
    assert_eq!(layout.bars.len(), 1);
    assert_eq!(layout.bars[0].index, 1);

    let svg = canvas.to_svg("h").expect("svg");
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");
    let shown: Vec<&str> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("main-bars"))
        .filter_map(|n| n.attribute("y-value"))
        .collect();
    assert_eq!(shown, ["Bern"]);
}

#[test]
fn vbar_drops_categories_outside_an_explicit_domain() {
    let data = records(json!([
        { "k": "a", "v": 1 },
        { "k": "b", "v": 2 },
        { "k": "c", "v": 3 },
    ]));
    let mut canvas = Canvas::new();
    canvas.mount("v");
    let options = VerticalBarOptions::from_json(
        &json!({ "x": "k", "y": "v", "xDomain": ["a", "c"] }),
    )
    .expect("options");
    let mut chart = vertical_bar::render(&mut canvas, "v", &data, &options, &RenderContext::default())
        .expect("render");
    let drawn: Vec<usize> = chart.layout().bars.iter().map(|b| b.index).collect();
    assert_eq!(drawn, [0, 2]);

    let svg = canvas.to_svg("v").expect("svg");
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");
    assert_eq!(doc.descendants().filter(|n| n.has_tag_name("rect")).count(), 2);

    // Sweep the whole width, including where "b" sits without the domain override.
    for step in 0..=40 {
        let x = f64::from(step) * 10.0;
        let t = chart
            .pointer(&mut canvas, PointerEvent::Move { x, y: 100.0 })
            .expect("pointer");
        assert_ne!(t.state, TooltipState::Hovering(1), "x = {x}");
        assert_ne!(
            chart.selection().and_then(|d| d.get("k")),
            Some(&json!("b")),
            "x = {x}"
        );
    }
}
