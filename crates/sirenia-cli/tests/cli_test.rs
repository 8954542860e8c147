use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("sirenia-cli"));
    cmd.env_remove("SIRENIA_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out).expect("utf-8 stdout")
}

#[test]
fn renders_svg_to_stdout() {
    let svg = stdout_of(cli().args([
        "render",
        "--kind",
        "donut",
        fixture("donut_rooms.json").to_string_lossy().as_ref(),
    ]));
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");
    let root = doc.root_element();
    assert_eq!(root.attribute("id"), Some("donut"));
    let sectors = doc
        .descendants()
        .filter(|n| n.has_tag_name("path") && n.attribute("fill").is_some())
        .count();
    assert_eq!(sectors, 4);
}

#[test]
fn reads_records_from_stdin_with_inline_options() {
    let svg = stdout_of(
        cli()
            .args([
                "--kind",
                "hbar",
                "--options",
                r##"{"x":"v","y":"k","color":"#123456"}"##,
                "--id",
                "my chart",
            ])
            .write_stdin(r#"[{"k":"a","v":1},{"k":"b","v":2}]"#),
    );
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");
    assert_eq!(doc.root_element().attribute("id"), Some("my-chart"));
    let fills: Vec<&str> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("main-bars"))
        .filter_map(|n| n.attribute("fill"))
        .collect();
    assert_eq!(fills, ["#123456", "#123456"]);
}

#[test]
fn config_and_set_provide_chart_defaults() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("site.json");
    fs::write(&config, r#"{ "charts": { "vbar": { "width": 320 } } }"#).expect("write config");

    let svg = stdout_of(cli().args([
        "render",
        "--kind",
        "vbar",
        "--options",
        r#"{"x":"rooms","y":"count"}"#,
        "--config",
        config.to_string_lossy().as_ref(),
        "--set",
        "charts.vbar.height=250",
        fixture("vbar_rooms.json").to_string_lossy().as_ref(),
    ]));
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");
    let root = doc.root_element();
    assert_eq!(root.attribute("width"), Some("320"));
    assert_eq!(root.attribute("height"), Some("250"));
}

#[test]
fn renders_png_at_scale() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("rooms.png");

    cli()
        .args([
            "render",
            "--kind",
            "vbar",
            "--options",
            r#"{"x":"rooms","y":"count"}"#,
            "--format",
            "png",
            "--scale",
            "2",
            "--background",
            "white",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture("vbar_rooms.json").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let decoder = png::Decoder::new(fs::File::open(&out).expect("open png"));
    let reader = decoder.read_info().expect("png header");
    let info = reader.info();
    assert_eq!((info.width, info.height), (800, 620));
}

#[test]
fn png_defaults_next_to_the_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let data = tmp.path().join("split.json");
    fs::copy(fixture("donut_rooms.json"), &data).expect("copy fixture");

    cli()
        .args([
            "render",
            "--kind",
            "donut",
            "--format",
            "png",
            data.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let bytes = fs::read(data.with_extension("png")).expect("read png");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "output is not a PNG");
}

#[test]
fn hover_prints_the_selected_record() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let hovered = tmp.path().join("hovered.svg");
    let out = stdout_of(cli().args([
        "hover",
        "--kind",
        "vbar",
        "--options",
        r#"{"x":"rooms","y":"count"}"#,
        "--x",
        "200",
        "--out",
        hovered.to_string_lossy().as_ref(),
        fixture("vbar_rooms.json").to_string_lossy().as_ref(),
    ]));
    let json: serde_json::Value = serde_json::from_str(&out).expect("json");
    assert_eq!(json["index"], 2);
    assert_eq!(json["selection"]["rooms"], "3");
    assert_eq!(json["selection"]["count"], 95);

    let svg = fs::read_to_string(&hovered).expect("hovered svg");
    let doc = roxmltree::Document::parse(&svg).expect("valid svg");
    let hatch = doc
        .descendants()
        .find(|n| n.attribute("id") == Some("vbarPointerRect"))
        .expect("pointer rect group");
    assert_eq!(hatch.children().filter(|n| n.is_element()).count(), 1);
}

#[test]
fn hover_rejects_static_charts() {
    cli()
        .args(["hover", "--kind", "donut", "--x", "10", "-"])
        .write_stdin("[]")
        .assert()
        .code(2);
}

#[test]
fn format_prints_price_labels() {
    assert_eq!(stdout_of(cli().args(["format", "999"])), "CHF 999\n");
    assert_eq!(stdout_of(cli().args(["format", "12345"])), "CHF 12'345\n");
    assert_eq!(stdout_of(cli().args(["format", "2500000"])), "2.50 Mio.\n");
    assert_eq!(
        stdout_of(cli().args(["format", "0.256", "--spec", ".1%"])),
        "25.6%\n"
    );
}

#[test]
fn usage_errors_exit_with_two() {
    cli().args(["render", "--kind", "radar"]).assert().code(2);
    cli().args(["render"]).assert().code(2);
    cli().args(["format"]).assert().code(2);
    cli().args(["hover", "--kind", "vbar"]).assert().code(2);
}

#[test]
fn bad_data_exits_with_one() {
    cli()
        .args(["render", "--kind", "donut"])
        .write_stdin(r#"{"not":"an array"}"#)
        .assert()
        .code(1);
    cli()
        .args(["render", "--kind", "vbar", "--options", r#"{"yFormat":"nope"}"#, "-"])
        .write_stdin("[1,2,3]")
        .assert()
        .code(1);
}
