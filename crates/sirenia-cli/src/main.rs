use serde::Serialize;
use serde_json::Value;
use sirenia::render::raster::{self, RasterError, RasterOptions};
use sirenia::render::{Canvas, ChartKind, HeadlessError, HeadlessRenderer, sanitize_mount_id};
use sirenia::{PointerEvent, SiteConfig};
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(String),
    Io(std::io::Error),
    Config(sirenia::Error),
    Render(sirenia::render::HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
    NotAnArray,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NotAnArray => write!(f, "chart data must be a JSON array of records"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<sirenia::Error> for CliError {
    fn from(value: sirenia::Error) -> Self {
        Self::Config(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<sirenia::render::RenderError> for CliError {
    fn from(value: sirenia::render::RenderError) -> Self {
        Self::Render(value.into())
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

fn usage_error() -> CliError {
    CliError::Usage(usage().to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Render,
    Hover,
    Format,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    kind: Option<ChartKind>,
    input: Option<String>,
    options: Option<String>,
    config: Option<String>,
    sets: Vec<String>,
    mount_id: Option<String>,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    out: Option<String>,
    pointer_x: Option<f64>,
    pointer_y: f64,
    spec: Option<String>,
    number: Option<f64>,
    pretty: bool,
    verbose: u8,
}

#[derive(Serialize)]
struct HoverOut<'a> {
    /// Index of the hovered record, `null` when the pointer designates nothing.
    index: Option<usize>,
    selection: Option<&'a Value>,
}

fn usage() -> &'static str {
    "sirenia-cli\n\
\n\
USAGE:\n\
  sirenia-cli [render] --kind donut|hbar|vbar|line [--options <json|path>] [--config <path>] [--set <key=value>]... [--id <mount-id>] [--format svg|png] [--scale <n>] [--background <color>] [--out <path>] [-v] [<data.json>|-]\n\
  sirenia-cli hover --kind vbar|line --x <px> [--y <px>] [--pretty] [render flags] [<data.json>|-]\n\
  sirenia-cli format <number> [--spec <d3-format>] [--config <path>] [--set <key=value>]...\n\
\n\
NOTES:\n\
  - If <data.json> is omitted or '-', records are read from stdin as a JSON array.\n\
  - --options takes inline JSON (starting with '{') or a path to a JSON file.\n\
  - Site defaults from --config under `charts.<kind>` are merged below --options.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - hover prints the tooltip state and selected record as JSON; --out saves the hovered SVG.\n\
  - format without --spec prints the CHF price label (`CHF 12'345`, `2.50 Mio.`).\n\
  - Logging goes to stderr; SIRENIA_LOG takes an env-filter directive, -v/-vv raise the default.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or_else(usage_error)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(usage_error()),
            "render" => args.command = Command::Render,
            "hover" => args.command = Command::Hover,
            "format" => args.command = Command::Format,
            "--pretty" => args.pretty = true,
            "-v" | "--verbose" => args.verbose = args.verbose.saturating_add(1),
            "-vv" => args.verbose = args.verbose.saturating_add(2),
            "--kind" => {
                let kind = next_value(&mut it)?;
                args.kind = Some(kind.parse::<ChartKind>().map_err(|e| {
                    CliError::Usage(format!("{e}\n\n{}", usage()))
                })?);
            }
            "--options" => args.options = Some(next_value(&mut it)?.clone()),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--set" => args.sets.push(next_value(&mut it)?.clone()),
            "--id" => args.mount_id = Some(next_value(&mut it)?.clone()),
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| usage_error())?;
            }
            "--scale" => {
                args.render_scale = next_value(&mut it)?
                    .parse::<f32>()
                    .map_err(|_| usage_error())?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(usage_error());
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--x" => {
                args.pointer_x = Some(
                    next_value(&mut it)?
                        .parse::<f64>()
                        .map_err(|_| usage_error())?,
                );
            }
            "--y" => {
                args.pointer_y = next_value(&mut it)?
                    .parse::<f64>()
                    .map_err(|_| usage_error())?;
            }
            "--spec" => args.spec = Some(next_value(&mut it)?.clone()),
            "--" => {
                if let Some(rest) = it.next() {
                    positional(&mut args, rest)?;
                }
                if it.next().is_some() {
                    return Err(usage_error());
                }
            }
            // Negative numbers are positional for `format`.
            other if other.starts_with('-') && other != "-" && other.parse::<f64>().is_err() => {
                return Err(usage_error());
            }
            other => positional(&mut args, other)?,
        }
    }

    match args.command {
        Command::Format if args.number.is_none() => return Err(usage_error()),
        Command::Render | Command::Hover if args.kind.is_none() => return Err(usage_error()),
        Command::Hover if args.pointer_x.is_none() => return Err(usage_error()),
        _ => {}
    }
    Ok(args)
}

fn positional(args: &mut Args, value: &str) -> Result<(), CliError> {
    if args.command == Command::Format {
        if args.number.is_some() {
            return Err(usage_error());
        }
        args.number = Some(value.parse::<f64>().map_err(|_| usage_error())?);
        return Ok(());
    }
    if args.input.is_some() {
        return Err(usage_error());
    }
    args.input = Some(value.to_string());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("SIRENIA_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn read_records(input: Option<&str>) -> Result<Vec<Value>, CliError> {
    let text = read_input(input)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Array(records) => Ok(records),
        _ => Err(CliError::NotAnArray),
    }
}

fn read_options(raw: Option<&str>) -> Result<Value, CliError> {
    let Some(raw) = raw else {
        return Ok(Value::Null);
    };
    let trimmed = raw.trim_start();
    let text = if trimmed.starts_with('{') {
        raw.to_string()
    } else {
        std::fs::read_to_string(raw)?
    };
    Ok(serde_json::from_str(&text)?)
}

fn load_config(args: &Args) -> Result<SiteConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => SiteConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SiteConfig::default(),
    };
    for assignment in &args.sets {
        config.set_assignment(assignment)?;
    }
    Ok(config)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;

    if args.command == Command::Format {
        let formatter = sirenia::Formatter::new(config.locale()?);
        let number = args.number.unwrap_or(f64::NAN);
        let text = match args.spec.as_deref() {
            Some(spec) => formatter.format(spec, number)?,
            None => formatter.format_price(number),
        };
        println!("{text}");
        return Ok(());
    }

    let Some(kind) = args.kind else {
        return Err(usage_error());
    };
    if args.command == Command::Hover && !kind.is_interactive() {
        return Err(CliError::Usage(format!(
            "hover needs an interactive chart kind (vbar or line), got {kind}"
        )));
    }
    let renderer = HeadlessRenderer::with_site_config(config)?;
    let records = read_records(args.input.as_deref())?;
    let options = read_options(args.options.as_deref())?;
    let mount_id = sanitize_mount_id(args.mount_id.as_deref().unwrap_or(kind.as_str()));

    let mut canvas = Canvas::new();
    canvas.mount(&mount_id);
    let mut chart = renderer.render(kind, &mut canvas, &mount_id, &records, &options)?;
    tracing::debug!(%kind, mount_id = %mount_id, records = records.len(), "chart rendered");

    if args.command == Command::Hover {
        let x = args.pointer_x.unwrap_or(0.0);
        let event = PointerEvent::Enter {
            x,
            y: args.pointer_y,
        };
        let Some(transition) = chart.pointer(&mut canvas, event)? else {
            return Err(CliError::Usage(format!("{kind} charts have no pointer overlay")));
        };
        let selection = transition.selection.as_ref().and_then(|s| s.0.as_ref());
        write_json(
            &HoverOut {
                index: transition.state.hovered(),
                selection,
            },
            args.pretty,
        )?;
        if let Some(out) = args.out.as_deref() {
            std::fs::write(out, canvas.to_svg(&mount_id)?)?;
        }
        return Ok(());
    }

    let svg = canvas.to_svg(&mount_id)?;
    match args.render_format {
        RenderFormat::Svg => write_text(&svg, args.out.as_deref())?,
        RenderFormat::Png => {
            let bytes = raster::svg_to_png(
                &svg,
                &RasterOptions {
                    scale: args.render_scale,
                    background: args.background.clone(),
                },
            )?;
            let out = args.out.clone().unwrap_or_else(|| {
                default_raster_out_path(args.input.as_deref(), "png")
                    .to_string_lossy()
                    .to_string()
            });
            if out == "-" {
                use std::io::Write;
                std::io::stdout().lock().write_all(&bytes)?;
            } else {
                std::fs::write(&out, bytes)?;
                tracing::info!(path = %out, "wrote PNG");
            }
        }
    }
    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::Usage(_)) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
