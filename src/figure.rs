//! The mutable figure description callers build before saving.
//!
//! Typical usage:
//! ```no_run
//! # use texplot::{AxisStyle, Figure};
//! let mut fig = Figure::new("damped.pdf");
//! fig.set_axis_style(AxisStyle::Centered)
//!     .set_x_range(0.0, 10.0)
//!     .enable_grid()
//!     .set_x_label("$t$");
//! fig.add_line_series(&[0.0, 1.0], &[0.0, 0.5], Some("teal"), Some("$y_1(t)$"))?;
//! fig.save()?;
//! # Ok::<(), texplot::PlotError>(())
//! ```
use crate::error::{PlotError, Result};
use crate::markup;
use crate::models::{
    AxisConfig, AxisRange, AxisStyle, Dimensions, LegendPosition, Series, SeriesKind,
};
use crate::output::{self, Compiler, OutputMode, Saved};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One logical plot: axis configuration plus its series, in insertion order.
///
/// A figure is consumed by [`Figure::save`]. Abandoning it without saving is done
/// explicitly with [`Figure::discard`].
#[must_use = "a Figure produces nothing until `save` is called"]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Figure {
    target: PathBuf,
    axis_style: AxisStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    x_range: Option<AxisRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y_range: Option<AxisRange>,
    grid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legend_position: Option<LegendPosition>,
    series: Vec<Series>,
}

impl Figure {
    /// Start an empty figure that will be written to `target`.
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Load a figure description from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| PlotError::InvalidArgument(format!("bad figure description: {e}")))
    }

    /// Load a figure description from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PlotError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Apply every member of `config` that is set.
    pub fn define_axis(&mut self, config: AxisConfig) -> &mut Self {
        if let Some(style) = config.style {
            self.axis_style = style;
        }
        if let Some(r) = config.x_range {
            self.x_range = Some(r);
        }
        if let Some(r) = config.y_range {
            self.y_range = Some(r);
        }
        self
    }

    pub fn set_target(&mut self, target: impl Into<PathBuf>) -> &mut Self {
        self.target = target.into();
        self
    }

    pub fn set_axis_style(&mut self, style: AxisStyle) -> &mut Self {
        self.axis_style = style;
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some(AxisRange::new(min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some(AxisRange::new(min, max));
        self
    }

    /// Width and height in centimetres.
    pub fn set_dimensions(&mut self, width: f64, height: f64) -> &mut Self {
        self.dimensions = Some(Dimensions { width, height });
        self
    }

    /// Major grid lines.
    pub fn enable_grid(&mut self) -> &mut Self {
        self.grid = true;
        self
    }

    pub fn set_x_label(&mut self, text: impl Into<String>) -> &mut Self {
        self.x_label = Some(text.into());
        self
    }

    pub fn set_y_label(&mut self, text: impl Into<String>) -> &mut Self {
        self.y_label = Some(text.into());
        self
    }

    pub fn set_legend_position(&mut self, pos: LegendPosition) -> &mut Self {
        self.legend_position = Some(pos);
        self
    }

    /// Append a line series. `xs` and `ys` are copied and must have equal length.
    pub fn add_line_series(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        color: Option<&str>,
        legend: Option<&str>,
    ) -> Result<&mut Self> {
        self.add_series(SeriesKind::Line, xs, ys, color, legend)
    }

    /// Append a stem series (markers on droplines from the baseline).
    pub fn add_stem_series(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        color: Option<&str>,
        legend: Option<&str>,
    ) -> Result<&mut Self> {
        self.add_series(SeriesKind::Stem, xs, ys, color, legend)
    }

    /// Append a series of the given kind. On error the figure is left unchanged.
    pub fn add_series(
        &mut self,
        kind: SeriesKind,
        xs: &[f64],
        ys: &[f64],
        color: Option<&str>,
        legend: Option<&str>,
    ) -> Result<&mut Self> {
        let series = Series::new(kind, xs, ys, color, legend)?;
        self.series.push(series);
        Ok(self)
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn axis_style(&self) -> AxisStyle {
        self.axis_style
    }

    pub fn x_range(&self) -> Option<AxisRange> {
        self.x_range
    }

    pub fn y_range(&self) -> Option<AxisRange> {
        self.y_range
    }

    pub fn grid(&self) -> bool {
        self.grid
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn x_label(&self) -> Option<&str> {
        self.x_label.as_deref()
    }

    pub fn y_label(&self) -> Option<&str> {
        self.y_label.as_deref()
    }

    pub fn legend_position(&self) -> Option<LegendPosition> {
        self.legend_position
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// The figure body as markup, without any document wrapper.
    pub fn to_markup(&self) -> Result<String> {
        markup::to_string(self)
    }

    /// Serialize the description back to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PlotError::InvalidArgument(format!("cannot serialize figure: {e}")))
    }

    /// Write the figure to its target, compiling it when the target is `.pdf` or `.png`.
    ///
    /// For compiled targets the compiler is configured from the environment, see
    /// [`Compiler::from_env`]; raw targets never look at it.
    pub fn save(self) -> Result<Saved> {
        let compiler = match OutputMode::for_target(&self.target) {
            OutputMode::Raw => Compiler::default(),
            OutputMode::Compiled(_) => Compiler::from_env()?,
        };
        self.save_with(&compiler)
    }

    /// Like [`Figure::save`] with an explicit compiler configuration.
    pub fn save_with(self, compiler: &Compiler) -> Result<Saved> {
        output::save(self, compiler)
    }

    /// Drop the figure without writing anything.
    pub fn discard(self) {
        log::debug!(
            "discarding figure for {} with {} series",
            self.target.display(),
            self.series.len()
        );
    }
}
