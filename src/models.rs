use crate::error::{PlotError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the axes are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisStyle {
    /// Box axes along the plot border, as matplotlib draws them.
    #[default]
    Standard,
    /// Cartesian axes crossing at the origin.
    #[serde(alias = "center")]
    Centered,
}

impl FromStr for AxisStyle {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(AxisStyle::Standard),
            "center" | "centered" => Ok(AxisStyle::Centered),
            other => Err(PlotError::InvalidArgument(format!(
                "unknown axis style `{other}`, expected `standard` or `center`"
            ))),
        }
    }
}

/// Legend anchor inside the axis area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendPosition {
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl LegendPosition {
    /// The value pgfplots expects for `legend pos`.
    pub fn as_pgf(&self) -> &'static str {
        match self {
            LegendPosition::NorthEast => "north east",
            LegendPosition::SouthEast => "south east",
            LegendPosition::SouthWest => "south west",
            LegendPosition::NorthWest => "north west",
        }
    }
}

impl fmt::Display for LegendPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_pgf())
    }
}

impl FromStr for LegendPosition {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        // "north east", "north-east", "north_east" and "northeast" all collapse to one key
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(*c, ' ' | '-' | '_'))
            .collect();
        match key.as_str() {
            "northeast" => Ok(LegendPosition::NorthEast),
            "southeast" => Ok(LegendPosition::SouthEast),
            "southwest" => Ok(LegendPosition::SouthWest),
            "northwest" => Ok(LegendPosition::NorthWest),
            _ => Err(PlotError::InvalidArgument(format!(
                "unknown legend position `{}`, expected one of \
                 `north east`, `south east`, `south west`, `north west`",
                s.trim()
            ))),
        }
    }
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Continuous line through the points.
    Line,
    /// Filled markers on vertical droplines from the baseline.
    Stem,
}

impl FromStr for SeriesKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "plot" => Ok(SeriesKind::Line),
            "stem" => Ok(SeriesKind::Stem),
            other => Err(PlotError::InvalidArgument(format!(
                "unknown plot type `{other}`, expected `line` or `stem`"
            ))),
        }
    }
}

/// Inclusive axis bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Figure size in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Axis definition with independently optional members.
///
/// Members left as `None` keep whatever the figure already has.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisConfig {
    pub style: Option<AxisStyle>,
    pub x_range: Option<AxisRange>,
    pub y_range: Option<AxisRange>,
}

impl AxisConfig {
    pub fn style(mut self, style: AxisStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn x_range(mut self, min: f64, max: f64) -> Self {
        self.x_range = Some(AxisRange::new(min, max));
        self
    }

    pub fn y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some(AxisRange::new(min, max));
        self
    }
}

/// One data trace. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    kind: SeriesKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    legend: Option<String>,
    points: Vec<(f64, f64)>,
}

impl Series {
    /// Build a series from parallel coordinate slices, copying them.
    ///
    /// Empty `color`/`legend` strings are treated as absent.
    pub fn new(
        kind: SeriesKind,
        xs: &[f64],
        ys: &[f64],
        color: Option<&str>,
        legend: Option<&str>,
    ) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(PlotError::InvalidArgument(format!(
                "x and y must have the same length (got {} and {})",
                xs.len(),
                ys.len()
            )));
        }
        Ok(Self {
            kind,
            color: non_empty(color),
            legend: non_empty(legend),
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
        })
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn legend(&self) -> Option<&str> {
        self.legend.as_deref()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_owned)
}
