use netdiag::render::raster::{RasterError, RasterOptions, svg_to_png};
use netdiag::render::{
    HeadlessError, RenderError, RenderOptions, layout_document, render_parsed_svg,
};
use netdiag::{InputFormat, LinkPalette, ParsedDiagram};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Diagram(netdiag::Error),
    Render(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Diagram(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<netdiag::Error> for CliError {
    fn from(value: netdiag::Error) -> Self {
        Self::Diagram(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<RenderError> for CliError {
    fn from(value: RenderError) -> Self {
        Self::Render(HeadlessError::Render(value))
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

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Parse,
    Validate,
    Layout,
    Render,
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
    input: Option<String>,
    input_format: Option<InputFormat>,
    pretty: bool,
    palette: Option<LinkPalette>,
    title: Option<String>,
    no_legend: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "netdiag-cli\n\
\n\
USAGE:\n\
  netdiag-cli [parse] [--input-format json|script] [--pretty] [<path>|-]\n\
  netdiag-cli validate [--input-format json|script] [<path>|-]\n\
  netdiag-cli layout [--input-format json|script] [--pretty] [<path>|-]\n\
  netdiag-cli render [--input-format json|script] [--palette <name>] [--title <text>] [--no-legend] [--format svg|png] [--scale <n>] [--background <color>] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Without --input-format, '.json' files are JSON commands and other files are scripts;\n\
    stdin is sniffed (a leading '{' means JSON).\n\
  - parse prints the validated diagram and style as JSON; validate prints 'ok'.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - Palettes: red-green, blue-yellow, grayscale, cold, warm, rainbow, purple-yellow.\n\
"
}

fn usage_error<T>() -> Result<T, CliError> {
    Err(CliError::Usage(usage()))
}

/// The value following a flag, e.g. `png` in `--format png`.
fn flag_value<'a>(rest: &mut impl Iterator<Item = &'a String>) -> Result<&'a str, CliError> {
    match rest.next() {
        Some(value) => Ok(value.as_str()),
        None => usage_error(),
    }
}

fn parsed_flag<'a, T: FromStr>(
    rest: &mut impl Iterator<Item = &'a String>,
) -> Result<T, CliError> {
    flag_value(rest)?.parse::<T>().or_else(|_| usage_error())
}

fn set_input(args: &mut Args, path: &str) -> Result<(), CliError> {
    if args.input.is_some() {
        return usage_error();
    }
    args.input = Some(path.to_string());
    Ok(())
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut rest = argv.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--help" | "-h" => return usage_error(),
            "parse" => args.command = Command::Parse,
            "validate" => args.command = Command::Validate,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--no-legend" => args.no_legend = true,
            "--input-format" => args.input_format = Some(parsed_flag(&mut rest)?),
            "--palette" => args.palette = Some(parsed_flag(&mut rest)?),
            "--title" => args.title = Some(flag_value(&mut rest)?.to_string()),
            "--format" => args.render_format = parsed_flag(&mut rest)?,
            "--scale" => {
                let scale: f32 = parsed_flag(&mut rest)?;
                if !scale.is_finite() || scale <= 0.0 {
                    return usage_error();
                }
                args.render_scale = scale;
            }
            "--background" => {
                let bg = flag_value(&mut rest)?.trim();
                args.background = (!bg.is_empty()).then(|| bg.to_string());
            }
            "--out" => args.out = Some(flag_value(&mut rest)?.to_string()),
            "--" => {
                if let Some(path) = rest.next() {
                    set_input(&mut args, path)?;
                }
                if rest.next().is_some() {
                    return usage_error();
                }
            }
            "-" => set_input(&mut args, "-")?,
            flag if flag.starts_with('-') => return usage_error(),
            path => set_input(&mut args, path)?,
        }
    }

    Ok(args)
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

fn input_format(args: &Args, text: &str) -> InputFormat {
    if let Some(format) = args.input_format {
        return format;
    }
    match args.input.as_deref() {
        None | Some("-") => InputFormat::detect(text),
        Some(path) => InputFormat::from_path(std::path::Path::new(path)),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

/// Command-line style overrides win over the document's own config.
fn apply_style_overrides(parsed: &mut ParsedDiagram, args: &Args) {
    if let Some(palette) = args.palette {
        parsed.style.link_palette = palette;
    }
    if let Some(title) = &args.title {
        parsed.style.title = Some(title.clone());
        parsed.style.show_title = true;
    }
    if args.no_legend {
        parsed.style.show_legend = false;
    }
}

fn write_png(args: &Args, svg: &str) -> Result<(), CliError> {
    let raster = RasterOptions {
        scale: args.render_scale,
        background: args.background.clone(),
    };
    let bytes = svg_to_png(svg, &raster)?;
    match args.out.as_deref() {
        Some("-") => std::io::stdout().lock().write_all(&bytes)?,
        Some(path) => std::fs::write(path, bytes)?,
        None => std::fs::write(default_raster_out_path(args.input.as_deref(), "png"), bytes)?,
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let source = read_input(args.input.as_deref())?;
    let mut parsed = netdiag::parse(&source, input_format(&args, &source))?;

    match args.command {
        Command::Parse => write_json(&parsed, args.pretty),
        Command::Validate => {
            println!("ok");
            Ok(())
        }
        Command::Layout => write_json(&layout_document(&parsed.diagram)?, args.pretty),
        Command::Render => {
            apply_style_overrides(&mut parsed, &args);
            let svg = render_parsed_svg(&parsed, &RenderOptions::default())?;
            match args.render_format {
                RenderFormat::Svg => write_text(&svg, args.out.as_deref()),
                RenderFormat::Png => write_png(&args, &svg),
            }
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
