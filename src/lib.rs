//! texplot
//!
//! Build figures in memory and write them as pgfplots/TikZ markup. Pairs with the
//! `texplot` CLI.
//!
//! ### Features
//! - Line and stem series with optional colors and legend entries
//! - Standard or centered (cartesian) axes, bounds, grid, size, labels, legend position
//! - Save as raw markup (`.tikz`, `.tex`, anything else) for `\input` into a document
//! - Save as `.pdf` / `.png` through a standalone document and an external LaTeX
//!   compiler (`pdflatex` by default); intermediate files are removed afterwards
//! - Figure descriptions can be loaded from JSON
//!
//! ### Example
//! ```no_run
//! use texplot::{AxisStyle, Figure, LegendPosition};
//!
//! let t: Vec<f64> = (0..1000).map(|i| i as f64 * 0.01).collect();
//! let y: Vec<f64> = t.iter().map(|t| (-t / 8.0).exp() * (2.0 * t).sin()).collect();
//!
//! let mut fig = Figure::new("damped.pdf");
//! fig.set_axis_style(AxisStyle::Centered)
//!     .set_x_range(0.0, 10.0)
//!     .set_y_range(-1.1, 1.1)
//!     .enable_grid()
//!     .set_dimensions(12.0, 8.0)
//!     .set_legend_position(LegendPosition::NorthEast);
//! fig.add_line_series(&t, &y, Some("teal"), Some("$y_1(t)$"))?;
//! let saved = fig.save()?;
//! println!("{}", saved.output.display());
//! # Ok::<(), texplot::PlotError>(())
//! ```

pub mod error;
pub mod figure;
pub mod markup;
pub mod models;
pub mod output;

pub use error::{ErrorKind, PlotError, Result};
pub use figure::Figure;
pub use models::{AxisConfig, AxisRange, AxisStyle, Dimensions, LegendPosition, Series, SeriesKind};
pub use output::{CompiledFormat, Compiler, OutputMode, Saved};
