use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use texplot::output::parse_timeout_secs;
use texplot::{AxisStyle, Compiler, Figure, LegendPosition, OutputMode, SeriesKind};

#[derive(Parser, Debug)]
#[command(
    name = "texplot",
    version,
    about = "Write pgfplots/TikZ figures, or compile them to PDF/PNG"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the damped-oscillation demo figure.
    Demo(DemoArgs),
    /// Plot columns of a CSV file (first column is x, one series per other column).
    Csv(CsvArgs),
    /// Save a figure described in JSON.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// LaTeX compiler used for .pdf/.png targets.
    #[arg(long, env = "TEXPLOT_COMPILER", default_value = "pdflatex")]
    compiler: String,
    /// Kill the compiler after this many seconds.
    #[arg(long, env = "TEXPLOT_COMPILE_TIMEOUT")]
    timeout: Option<String>,
}

impl CompileArgs {
    fn to_compiler(&self) -> Result<Compiler> {
        let mut compiler = Compiler::new(self.compiler.clone());
        if let Some(raw) = self.timeout.as_deref() {
            compiler.timeout = Some(parse_timeout_secs(raw)?);
        }
        Ok(compiler)
    }
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Output path; .pdf/.png are compiled, anything else gets raw markup.
    #[arg(long, default_value = "out.pdf")]
    out: PathBuf,
    #[command(flatten)]
    compile: CompileArgs,
}

#[derive(Args, Debug)]
struct CsvArgs {
    /// CSV file with a header row.
    input: PathBuf,
    /// Output path; .pdf/.png are compiled, anything else gets raw markup.
    #[arg(long)]
    out: PathBuf,
    /// Draw the series as stems instead of lines.
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// Axis style (standard or center).
    #[arg(long)]
    axis: Option<AxisStyle>,
    /// x bounds as MIN:MAX.
    #[arg(long, allow_hyphen_values = true, value_parser = parse_range)]
    xlim: Option<(f64, f64)>,
    /// y bounds as MIN:MAX.
    #[arg(long, allow_hyphen_values = true, value_parser = parse_range)]
    ylim: Option<(f64, f64)>,
    /// Major grid lines.
    #[arg(long, default_value_t = false)]
    grid: bool,
    /// Width in cm (needs --height).
    #[arg(long, requires = "height")]
    width: Option<f64>,
    /// Height in cm (needs --width).
    #[arg(long, requires = "width")]
    height: Option<f64>,
    #[arg(long)]
    xlabel: Option<String>,
    #[arg(long)]
    ylabel: Option<String>,
    /// Legend position, e.g. "north east" or north-west.
    #[arg(long)]
    legend_pos: Option<LegendPosition>,
    /// Series colors separated by comma, applied in column order.
    #[arg(long)]
    colors: Option<String>,
    #[command(flatten)]
    compile: CompileArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// JSON figure description.
    input: PathBuf,
    /// Override the target stored in the description.
    #[arg(long)]
    out: Option<PathBuf>,
    #[command(flatten)]
    compile: CompileArgs,
}

fn parse_range(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX, got `{s}`"))?;
    let min = a.trim().parse::<f64>().map_err(|e| format!("bad MIN `{a}`: {e}"))?;
    let max = b.trim().parse::<f64>().map_err(|e| format!("bad MAX `{b}`: {e}"))?;
    Ok((min, max))
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo(args) => cmd_demo(args),
        Command::Csv(args) => cmd_csv(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_demo(args: DemoArgs) -> Result<()> {
    let fig = demo_figure(&args.out)?;
    save(fig, &args.compile)
}

/// Damped sine, critically damped response and a decaying sequence as stems.
fn demo_figure(out: &Path) -> Result<Figure> {
    let t: Vec<f64> = (0..1000).map(|i| i as f64 * 0.01).collect();
    let damped: Vec<f64> = t.iter().map(|t| (-t / 8.0).exp() * (2.0 * t).sin()).collect();
    let critical: Vec<f64> = t.iter().map(|t| t * (-t / 2.0).exp()).collect();
    let n: Vec<f64> = (0..=10).map(f64::from).collect();
    let decay: Vec<f64> = n.iter().map(|n| 0.75f64.powf(*n)).collect();

    let mut fig = Figure::new(out);
    fig.add_line_series(&t, &damped, Some("teal"), Some("$y_1(t)$"))?
        .add_line_series(&t, &critical, Some("orange"), Some("$y_2(t)$"))?
        .add_stem_series(&n, &decay, Some("red"), Some("$y_d[n]$"))?;
    fig.set_axis_style(AxisStyle::Centered)
        .set_x_range(0.0, 10.0)
        .set_y_range(-1.1, 1.1)
        .enable_grid()
        .set_dimensions(12.0, 8.0)
        .set_x_label("$t$")
        .set_y_label("$y(t)$");
    Ok(fig)
}

fn cmd_csv(args: CsvArgs) -> Result<()> {
    let mut rdr = csv::Reader::from_path(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;
    let headers = rdr.headers()?.clone();
    if headers.len() < 2 {
        bail!("{} needs an x column and at least one y column", args.input.display());
    }

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        for (col, cell) in record.iter().enumerate() {
            let v: f64 = cell.trim().parse().with_context(|| {
                format!("row {}, column `{}`: not a number: `{cell}`", row + 1, &headers[col])
            })?;
            columns[col].push(v);
        }
    }

    let kind = if args.stem { SeriesKind::Stem } else { SeriesKind::Line };
    let colors = args.colors.as_deref().map(parse_list).unwrap_or_default();
    let mut fig = Figure::new(&args.out);
    for (idx, ys) in columns.iter().enumerate().skip(1) {
        let color = colors.get(idx - 1).map(String::as_str);
        fig.add_series(kind, &columns[0], ys, color, Some(&headers[idx]))?;
    }

    if let Some(style) = args.axis {
        fig.set_axis_style(style);
    }
    if let Some((min, max)) = args.xlim {
        fig.set_x_range(min, max);
    }
    if let Some((min, max)) = args.ylim {
        fig.set_y_range(min, max);
    }
    if args.grid {
        fig.enable_grid();
    }
    if let (Some(w), Some(h)) = (args.width, args.height) {
        fig.set_dimensions(w, h);
    }
    if let Some(label) = args.xlabel {
        fig.set_x_label(label);
    }
    if let Some(label) = args.ylabel {
        fig.set_y_label(label);
    }
    if let Some(pos) = args.legend_pos {
        fig.set_legend_position(pos);
    }
    save(fig, &args.compile)
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let mut fig = Figure::from_json_file(&args.input)?;
    if let Some(out) = args.out {
        fig.set_target(out);
    }
    save(fig, &args.compile)
}

fn save(fig: Figure, compile: &CompileArgs) -> Result<()> {
    let target = fig.target().to_path_buf();
    let series = fig.series().len();
    // Compiler flags only matter (and are only validated) for compiled targets.
    let compiler = match OutputMode::for_target(&target) {
        OutputMode::Raw => Compiler::default(),
        OutputMode::Compiled(_) => compile.to_compiler()?,
    };
    let saved = fig
        .save_with(&compiler)
        .with_context(|| format!("saving {}", target.display()))?;
    match saved.mode {
        OutputMode::Raw => eprintln!("Wrote {} series to {}", series, saved.output.display()),
        OutputMode::Compiled(_) => eprintln!(
            "Compiled {} series to {} (removed {} intermediate files)",
            series,
            saved.output.display(),
            saved.removed.len()
        ),
    }
    Ok(())
}
