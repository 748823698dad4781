//! Serialize a [`Figure`] into pgfplots/TikZ markup.
//!
//! Output layout:
//! - `tikzpicture` / `axis` environments wrapping everything
//! - axis options, only the ones that are set, in a fixed order
//! - one `\addplot` entry per series in insertion order, each optionally followed by
//!   `\addlegendentry`
//!
//! [`write_document`] wraps the same body in a minimal `standalone` LaTeX document.

pub mod format;

use crate::error::{PlotError, Result};
use crate::figure::Figure;
use crate::models::{AxisStyle, Series, SeriesKind};
use std::io::{self, Write};

use format::{coordinate, fixed};

/// pgfplots compatibility level pinned in standalone documents.
pub const PGFPLOTS_COMPAT: &str = "1.18";

/// Axis lines through the origin, labels anchored at the positive ends.
const CENTERED_AXIS_STYLE: &str = "\
axis lines=center,
axis x line = middle,
every axis x label/.style={
at={(ticklabel* cs:1.0)},
anchor=west,
},
axis y line = left,
every axis y label/.style={
at={(ticklabel* cs:1.0)},
anchor=south,
},
";

/// Options for the `standalone` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Extra class options, e.g. `convert={outext=.png}`.
    pub class_options: Vec<String>,
}

/// Write the figure body (`tikzpicture` environment) to `out`.
pub fn render_figure<W: Write>(figure: &Figure, out: &mut W) -> io::Result<()> {
    writeln!(out, "\\begin{{tikzpicture}}")?;
    writeln!(out, "\\begin{{axis}}[")?;
    write_axis_options(figure, out)?;
    writeln!(out, "]")?;
    for series in figure.series() {
        write_series(series, out)?;
    }
    writeln!(out, "\\end{{axis}}")?;
    writeln!(out, "\\end{{tikzpicture}}")?;
    Ok(())
}

/// Write a complete `standalone` document around the figure body.
pub fn write_document<W: Write>(
    figure: &Figure,
    opts: &DocumentOptions,
    out: &mut W,
) -> io::Result<()> {
    let mut class_opts = vec!["tikz".to_string()];
    class_opts.extend(opts.class_options.iter().cloned());
    writeln!(out, "\\documentclass[{}]{{standalone}}", class_opts.join(","))?;
    writeln!(out, "\\usepackage{{pgfplots}}")?;
    writeln!(out, "\\pgfplotsset{{compat={}}}", PGFPLOTS_COMPAT)?;
    writeln!(out, "\\begin{{document}}")?;
    render_figure(figure, out)?;
    writeln!(out, "\\end{{document}}")?;
    Ok(())
}

/// Render the figure body into a string.
pub fn to_string(figure: &Figure) -> Result<String> {
    let mut buf = Vec::new();
    render_figure(figure, &mut buf).map_err(|e| PlotError::io("<memory>", e))?;
    String::from_utf8(buf).map_err(|e| PlotError::InvalidArgument(e.to_string()))
}

fn write_axis_options<W: Write>(figure: &Figure, out: &mut W) -> io::Result<()> {
    match figure.axis_style() {
        AxisStyle::Centered => out.write_all(CENTERED_AXIS_STYLE.as_bytes())?,
        AxisStyle::Standard => {}
    }
    if let Some(r) = figure.x_range() {
        writeln!(out, "xmin = {}, xmax = {},", fixed(r.min), fixed(r.max))?;
    }
    if let Some(r) = figure.y_range() {
        writeln!(out, "ymin = {}, ymax = {},", fixed(r.min), fixed(r.max))?;
    }
    if figure.grid() {
        writeln!(out, "grid=major,")?;
    }
    if let Some(d) = figure.dimensions() {
        writeln!(out, "width={} cm,", fixed(d.width))?;
        writeln!(out, "height={} cm,", fixed(d.height))?;
    }
    if let Some(label) = figure.x_label() {
        writeln!(out, "xlabel={{{}}},", label)?;
    }
    if let Some(label) = figure.y_label() {
        writeln!(out, "ylabel={{{}}},", label)?;
    }
    if let Some(pos) = figure.legend_position() {
        writeln!(out, "legend pos={},", pos.as_pgf())?;
    }
    Ok(())
}

fn write_series<W: Write>(series: &Series, out: &mut W) -> io::Result<()> {
    match series.kind() {
        SeriesKind::Line => {
            writeln!(out, "\\addplot [")?;
            if let Some(color) = series.color() {
                writeln!(out, "color={},", color)?;
            }
            writeln!(out, "line width=1pt,")?;
            writeln!(out, "] coordinates {{")?;
        }
        SeriesKind::Stem => {
            // color stays in its slot even when empty; pgfkeys skips the blank entry
            writeln!(
                out,
                "\\addplot+ [ycomb, {}, mark=*, line width=1pt] coordinates {{",
                series.color().unwrap_or("")
            )?;
        }
    }
    for &(x, y) in series.points() {
        writeln!(out, "    {}", coordinate(x, y))?;
    }
    writeln!(out, "}};")?;
    if let Some(legend) = series.legend() {
        writeln!(out, "\\addlegendentry{{{}}}", legend)?;
    }
    Ok(())
}
