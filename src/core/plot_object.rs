use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ObjectId;
use crate::core::primitives::last_finite;
use crate::render::Color;

/// Reference from a plottable object to the clock it is computed on.
///
/// A clock is either the owner itself or a stub series (for example one line
/// of a multi-line indicator) that points at the real owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerRef {
    Direct(ObjectId),
    Stub { target: ObjectId },
}

impl OwnerRef {
    /// Owning object used as the placement key.
    #[must_use]
    pub const fn resolve(self) -> ObjectId {
        match self {
            Self::Direct(id) => id,
            Self::Stub { target } => target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Indicator,
    Observer,
}

/// Primitive used to draw one sub-series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMethod {
    #[default]
    Line,
    Bar,
    Scatter,
    Step,
}

/// Per-line styling directives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub color: Option<Color>,
    pub skip: bool,
    /// Reuse the color of the previously drawn series on the same axis.
    pub same_color: bool,
    pub method: DrawMethod,
    /// Backend keyword styling, forwarded in insertion order.
    pub extra: IndexMap<String, serde_json::Value>,
}

impl LineStyle {
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_same_color(mut self, same_color: bool) -> Self {
        self.same_color = same_color;
        self
    }

    #[must_use]
    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: DrawMethod) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// One named sub-series of a plottable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotLine {
    pub alias: String,
    /// Samples aligned with the shared time axis. `NaN` marks a missing value.
    pub values: Vec<f64>,
    #[serde(default)]
    pub style: LineStyle,
}

impl PlotLine {
    #[must_use]
    pub fn new(alias: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            alias: alias.into(),
            values,
            style: LineStyle::default(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    /// Final sample when it is finite; a trailing NaN means no current value.
    #[must_use]
    pub fn last_valid(&self) -> Option<f64> {
        last_finite(&self.values)
    }
}

/// Object-level plot metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotInfo {
    pub plot: bool,
    pub skip: bool,
    pub subplot: bool,
    pub plot_above: bool,
    /// Show every line alias in the legend even when overlaid.
    pub line_labels: bool,
    pub legend: bool,
    pub label: Option<String>,
    pub y_ticks: Option<Vec<f64>>,
    pub h_lines: Vec<f64>,
}

impl Default for PlotInfo {
    fn default() -> Self {
        Self {
            plot: true,
            skip: false,
            subplot: false,
            plot_above: false,
            line_labels: false,
            legend: true,
            label: None,
            y_ticks: None,
            h_lines: Vec::new(),
        }
    }
}

impl PlotInfo {
    #[must_use]
    pub fn subplot() -> Self {
        Self {
            subplot: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn overlay() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_plot_above(mut self, plot_above: bool) -> Self {
        self.plot_above = plot_above;
        self
    }

    #[must_use]
    pub fn with_plot(mut self, plot: bool) -> Self {
        self.plot = plot;
        self
    }

    #[must_use]
    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    #[must_use]
    pub fn with_line_labels(mut self, line_labels: bool) -> Self {
        self.line_labels = line_labels;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_y_ticks(mut self, ticks: Vec<f64>) -> Self {
        self.y_ticks = Some(ticks);
        self
    }

    #[must_use]
    pub fn with_h_lines(mut self, h_lines: Vec<f64>) -> Self {
        self.h_lines = h_lines;
        self
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.plot && !self.skip
    }
}

/// Indicator or observer as seen by the chart composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlottableObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub name: String,
    pub clock: OwnerRef,
    pub lines: SmallVec<[PlotLine; 4]>,
    /// `None` for internal helper series without plotting support.
    pub plot_info: Option<PlotInfo>,
}

impl PlottableObject {
    #[must_use]
    pub fn indicator(id: ObjectId, name: impl Into<String>, clock: OwnerRef) -> Self {
        Self::new(id, ObjectKind::Indicator, name, clock)
    }

    #[must_use]
    pub fn observer(id: ObjectId, name: impl Into<String>, clock: OwnerRef) -> Self {
        Self::new(id, ObjectKind::Observer, name, clock)
    }

    fn new(id: ObjectId, kind: ObjectKind, name: impl Into<String>, clock: OwnerRef) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            clock,
            lines: SmallVec::new(),
            plot_info: Some(PlotInfo::default()),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: PlotLine) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_plot_info(mut self, plot_info: PlotInfo) -> Self {
        self.plot_info = Some(plot_info);
        self
    }

    #[must_use]
    pub fn without_plot_info(mut self) -> Self {
        self.plot_info = None;
        self
    }

    /// Display label: the configured plot label, else the object name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.plot_info
            .as_ref()
            .and_then(|info| info.label.as_deref())
            .unwrap_or(&self.name)
    }

    #[must_use]
    pub fn owner(&self) -> ObjectId {
        self.clock.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjectId, OwnerRef, PlotInfo, PlotLine, PlottableObject};

    #[test]
    fn stub_owner_resolves_to_target() {
        let data = ObjectId::new(1);
        assert_eq!(OwnerRef::Direct(data).resolve(), data);
        assert_eq!(OwnerRef::Stub { target: data }.resolve(), data);
    }

    #[test]
    fn last_valid_is_only_the_final_finite_sample() {
        let line = PlotLine::new("sma", vec![1.0, f64::NAN, 2.5]);
        assert_eq!(line.last_valid(), Some(2.5));
        let trailing = PlotLine::new("sma", vec![1.0, 2.5, f64::NAN]);
        assert_eq!(trailing.last_valid(), None);
        let empty = PlotLine::new("sma", Vec::new());
        assert_eq!(empty.last_valid(), None);
    }

    #[test]
    fn label_prefers_plot_info_override() {
        let object = PlottableObject::indicator(
            ObjectId::new(2),
            "SimpleMovingAverage",
            OwnerRef::Direct(ObjectId::new(1)),
        );
        assert_eq!(object.label(), "SimpleMovingAverage");
        let object = object.with_plot_info(PlotInfo::overlay().with_label("SMA(15)"));
        assert_eq!(object.label(), "SMA(15)");
    }
}
