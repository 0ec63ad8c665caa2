use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{DrawMethod, IndexDateFormatter, VolumeFormatter};
use crate::render::{Color, LegendLocation, LineStrokeStyle};

/// Handle of a drawing axis: a panel or a twin axis sharing a panel's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PanelHandle(u32);

impl PanelHandle {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Contiguous range of grid rows occupied by a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: usize,
    pub span: usize,
}

impl RowRange {
    #[must_use]
    pub const fn new(start: usize, span: usize) -> Self {
        Self { start, span }
    }

    #[must_use]
    pub const fn end(self) -> usize {
        self.start + self.span
    }
}

/// Panel creation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub rows: RowRange,
    pub total_rows: usize,
    pub share_x: Option<PanelHandle>,
    pub ticks_right: bool,
    pub grid: bool,
}

/// Style of one sub-series drawn with [`DrawMethod`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeriesStyle {
    pub method: DrawMethod,
    pub color: Color,
    pub label: Option<String>,
    pub z_order: Option<f64>,
    pub antialiased: bool,
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Style of price bars, candles and volume bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeriesStyle {
    pub color_up: Color,
    pub color_down: Color,
    pub alpha: f64,
    pub label: Option<String>,
    pub z_order: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OhlcColumns<'a> {
    pub open: &'a [f64],
    pub high: &'a [f64],
    pub low: &'a [f64],
    pub close: &'a [f64],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeColumns<'a> {
    pub open: &'a [f64],
    pub close: &'a [f64],
    pub volume: &'a [f64],
}

/// Result of a draw call: the z-order it landed on and its legend label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub z_order: f64,
    pub legend_label: Option<String>,
}

/// Boxed value label anchored at the right edge of a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextTag {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub face_color: Color,
    pub edge_color: Color,
    pub alpha: f64,
    pub font_size: f64,
    pub z_order: f64,
}

/// Horizontal reference line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HLine {
    pub y: f64,
    pub color: Color,
    pub style: LineStrokeStyle,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Prune {
    #[default]
    None,
    Lower,
    Upper,
    Both,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum TickLocator {
    #[default]
    Auto,
    /// At most `bins` intervals, optionally dropping the edge ticks.
    MaxN { bins: u32, prune: Prune },
    Fixed(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AxisFormatter {
    Volume(VolumeFormatter),
    IndexDate(IndexDateFormatter),
}

impl AxisFormatter {
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Volume(formatter) => formatter.format(value),
            Self::IndexDate(formatter) => formatter.format(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub location: LegendLocation,
    pub align_left: bool,
    pub columns: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxisSpec {
    pub tick_labels_visible: bool,
    pub tick_rotation: f64,
    pub locator: Option<TickLocator>,
    pub formatter: Option<AxisFormatter>,
}

impl XAxisSpec {
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            tick_labels_visible: false,
            tick_rotation: 0.0,
            locator: None,
            formatter: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoscaleAxis {
    X,
    Both,
}

/// Figure-level spacing and autoscale policy applied once all panels exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureLayout {
    pub hspace: f64,
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub tight_axis: AutoscaleAxis,
}
