use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LegendLocation, LineStrokeStyle};

/// Renderer used for the price series of a data feed.
///
/// Parsed from a style name by prefix: `"line..."` selects [`PriceStyle::Line`],
/// `"candle..."` selects [`PriceStyle::Candlestick`] and every other name,
/// including unknown ones, falls back to [`PriceStyle::OhlcBar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PriceStyle {
    Line,
    Candlestick,
    #[default]
    OhlcBar,
}

impl PriceStyle {
    #[must_use]
    pub fn from_style_name(name: &str) -> Self {
        if name.starts_with("line") {
            Self::Line
        } else if name.starts_with("candle") {
            Self::Candlestick
        } else {
            Self::OhlcBar
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Candlestick => "candle",
            Self::OhlcBar => "bar",
        }
    }
}

impl From<String> for PriceStyle {
    fn from(value: String) -> Self {
        Self::from_style_name(&value)
    }
}

impl From<PriceStyle> for String {
    fn from(value: PriceStyle) -> Self {
        value.name().to_owned()
    }
}

/// Direction in which successive artifacts on one axis drift in z-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZOrderDrift {
    #[default]
    Descending,
    Ascending,
}

impl ZOrderDrift {
    pub const EPSILON: f64 = 1e-4;

    #[must_use]
    pub fn next(self, z_order: f64) -> f64 {
        match self {
            Self::Descending => z_order * (1.0 - Self::EPSILON),
            Self::Ascending => z_order * (1.0 + Self::EPSILON),
        }
    }
}

fn tableau10() -> Vec<Color> {
    [
        (31, 119, 180),
        (255, 127, 14),
        (44, 160, 44),
        (214, 39, 40),
        (148, 103, 189),
        (140, 86, 75),
        (227, 119, 194),
        (127, 127, 127),
        (188, 189, 34),
        (23, 190, 207),
    ]
    .into_iter()
    .map(|(red, green, blue)| Color::from_rgb8(red, green, blue))
    .collect()
}

/// Immutable chart style configuration.
///
/// Serializable so hosts can persist a scheme; missing fields take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotScheme {
    pub style: PriceStyle,
    /// Rows taken by a price panel.
    pub rows_major: usize,
    /// Rows taken by indicator, observer and standalone volume panels.
    pub rows_minor: usize,
    /// Vertical space between panels.
    pub plot_dist: f64,
    pub grid: bool,
    pub volume: bool,
    pub vol_overlay: bool,
    /// Fraction of the price panel height the overlaid volume bars may use.
    pub vol_scaling: f64,
    /// Fraction by which the overlaid price axis bottom is lowered.
    pub vol_push_up: f64,
    pub vol_trans: f64,
    pub vol_up: Color,
    pub vol_down: Color,
    pub line_on_close_color: Color,
    pub bar_up: Color,
    pub bar_down: Color,
    /// Symmetric padding of indicator panels as a fraction of the y range.
    pub y_adjust: f64,
    pub z_order_drift: ZOrderDrift,
    pub tick_rotation: f64,
    pub y_tight: bool,
    pub legend_ind: bool,
    pub legend_ind_loc: LegendLocation,
    pub hlines_color: Color,
    pub hlines_style: LineStrokeStyle,
    pub hlines_width: f64,
    pub sub_text_size: f64,
    pub palette: Vec<Color>,
}

impl Default for PlotScheme {
    fn default() -> Self {
        Self {
            style: PriceStyle::Line,
            rows_major: 5,
            rows_minor: 1,
            plot_dist: 0.0,
            grid: true,
            volume: true,
            vol_overlay: true,
            vol_scaling: 0.33,
            vol_push_up: 0.0,
            vol_trans: 0.5,
            vol_up: Color::from_rgb8(0xaa, 0xaa, 0xaa),
            vol_down: Color::from_rgb8(0xcc, 0x60, 0x73),
            line_on_close_color: Color::BLACK,
            bar_up: Color::grey(0.75),
            bar_down: Color::rgb(1.0, 0.0, 0.0),
            y_adjust: 0.0,
            z_order_drift: ZOrderDrift::Descending,
            tick_rotation: 15.0,
            y_tight: false,
            legend_ind: true,
            legend_ind_loc: LegendLocation::UpperLeft,
            hlines_color: Color::grey(0.66),
            hlines_style: LineStrokeStyle::Dashed,
            hlines_width: 1.0,
            sub_text_size: 9.0,
            palette: tableau10(),
        }
    }
}

impl PlotScheme {
    /// Palette color for a cycle counter. Negative counters wrap from the end.
    #[must_use]
    pub fn color(&self, index: i64) -> Color {
        if self.palette.is_empty() {
            return Color::BLACK;
        }
        let len = i64::try_from(self.palette.len()).unwrap_or(i64::MAX);
        self.palette[index.rem_euclid(len) as usize]
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.rows_major == 0 || self.rows_minor == 0 {
            return Err(ChartError::InvalidData(
                "row spans must be >= 1".to_owned(),
            ));
        }
        if !self.vol_scaling.is_finite() || self.vol_scaling <= 0.0 {
            return Err(ChartError::InvalidData(
                "volume scaling must be finite and > 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("vol_push_up", self.vol_push_up),
            ("y_adjust", self.y_adjust),
            ("plot_dist", self.plot_dist),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if self.palette.is_empty() {
            return Err(ChartError::InvalidData(
                "color palette must not be empty".to_owned(),
            ));
        }
        for color in &self.palette {
            color.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn with_style(mut self, style: PriceStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the price style from a style name, e.g. `"candlestick"`.
    #[must_use]
    pub fn with_style_name(mut self, name: &str) -> Self {
        self.style = PriceStyle::from_style_name(name);
        self
    }

    #[must_use]
    pub fn with_row_spans(mut self, rows_major: usize, rows_minor: usize) -> Self {
        self.rows_major = rows_major;
        self.rows_minor = rows_minor;
        self
    }

    #[must_use]
    pub fn with_volume(mut self, volume: bool, overlay: bool) -> Self {
        self.volume = volume;
        self.vol_overlay = overlay;
        self
    }

    #[must_use]
    pub fn with_volume_scaling(mut self, vol_scaling: f64, vol_push_up: f64) -> Self {
        self.vol_scaling = vol_scaling;
        self.vol_push_up = vol_push_up;
        self
    }

    #[must_use]
    pub fn with_z_order_drift(mut self, drift: ZOrderDrift) -> Self {
        self.z_order_drift = drift;
        self
    }

    #[must_use]
    pub fn with_y_adjust(mut self, y_adjust: f64) -> Self {
        self.y_adjust = y_adjust;
        self
    }

    #[must_use]
    pub fn with_y_tight(mut self, y_tight: bool) -> Self {
        self.y_tight = y_tight;
        self
    }

    #[must_use]
    pub fn with_grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }

    #[must_use]
    pub fn with_legend_ind(mut self, legend_ind: bool) -> Self {
        self.legend_ind = legend_ind;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }
}
