use crate::core::DrawMethod;
use crate::core::primitives::finite_range;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Artifact, AxisFormatter, BarSeriesStyle, Color, DrawAdapter, FigureLayout, HLine, Legend,
    LineSeriesStyle, OhlcColumns, PanelHandle, PanelSpec, TextTag, TickLocator, VolumeColumns,
    XAxisSpec,
};

const LINE_Z_ORDER: f64 = 2.0;
const COLLECTION_Z_ORDER: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Series(DrawMethod),
    Ohlc,
    Candlestick,
    Volume,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactRecord {
    pub kind: ArtifactKind,
    pub z_order: f64,
    pub label: Option<String>,
    pub color: Color,
    pub len: usize,
}

/// Everything drawn on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisRecord {
    pub handle: PanelHandle,
    /// `None` for twin axes.
    pub spec: Option<PanelSpec>,
    pub twin_of: Option<PanelHandle>,
    pub artifacts: Vec<ArtifactRecord>,
    pub tags: Vec<TextTag>,
    pub hlines: Vec<HLine>,
    pub data_range: Option<(f64, f64)>,
    pub explicit_y_limits: Option<(f64, f64)>,
    pub y_locator: Option<TickLocator>,
    pub y_formatter: Option<AxisFormatter>,
    pub legend: Option<Legend>,
    pub x_axis: Option<XAxisSpec>,
}

impl AxisRecord {
    fn new(handle: PanelHandle, spec: Option<PanelSpec>, twin_of: Option<PanelHandle>) -> Self {
        Self {
            handle,
            spec,
            twin_of,
            artifacts: Vec::new(),
            tags: Vec::new(),
            hlines: Vec::new(),
            data_range: None,
            explicit_y_limits: None,
            y_locator: None,
            y_formatter: None,
            legend: None,
            x_axis: None,
        }
    }

    #[must_use]
    pub fn is_panel(&self) -> bool {
        self.spec.is_some()
    }

    /// Legend labels of drawn artifacts in draw order.
    #[must_use]
    pub fn artifact_labels(&self) -> Vec<&str> {
        self.artifacts
            .iter()
            .filter_map(|artifact| artifact.label.as_deref())
            .collect()
    }

    fn autoscaled_limits(&self) -> (f64, f64) {
        match self.data_range {
            Some((low, high)) if high > low => (low, high),
            Some((value, _)) => (value - 0.5, value + 0.5),
            None => (0.0, 1.0),
        }
    }

    fn extend_range(&mut self, range: Option<(f64, f64)>) {
        let Some((low, high)) = range else {
            return;
        };
        self.data_range = Some(match self.data_range {
            Some((current_low, current_high)) => (current_low.min(low), current_high.max(high)),
            None => (low, high),
        });
    }
}

/// Headless adapter that records every command.
///
/// Used by tests and by hosts that want the composed layout without drawing.
/// It validates slice lengths so mismatched series fail loudly, and assigns
/// default z-orders of 2.0 for lines and 1.0 for bar collections unless the
/// caller pins one.
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    axes: Vec<AxisRecord>,
    figure: Option<FigureLayout>,
    shown: bool,
}

impl RecordingAdapter {
    #[must_use]
    pub fn axes(&self) -> &[AxisRecord] {
        &self.axes
    }

    /// Panels in creation order, twin axes excluded.
    pub fn panels(&self) -> impl Iterator<Item = &AxisRecord> {
        self.axes.iter().filter(|axis| axis.is_panel())
    }

    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panels().count()
    }

    #[must_use]
    pub fn axis(&self, handle: PanelHandle) -> Option<&AxisRecord> {
        self.axes.iter().find(|axis| axis.handle == handle)
    }

    #[must_use]
    pub fn twins_of(&self, panel: PanelHandle) -> Vec<&AxisRecord> {
        self.axes
            .iter()
            .filter(|axis| axis.twin_of == Some(panel))
            .collect()
    }

    #[must_use]
    pub fn figure(&self) -> Option<&FigureLayout> {
        self.figure.as_ref()
    }

    #[must_use]
    pub fn was_shown(&self) -> bool {
        self.shown
    }

    fn axis_mut(&mut self, handle: PanelHandle) -> ChartResult<&mut AxisRecord> {
        self.axes
            .iter_mut()
            .find(|axis| axis.handle == handle)
            .ok_or(ChartError::UnknownAxis(handle))
    }

    fn next_handle(&self) -> PanelHandle {
        PanelHandle::new(u32::try_from(self.axes.len()).unwrap_or(u32::MAX))
    }

    fn record(
        &mut self,
        axis: PanelHandle,
        record: ArtifactRecord,
        range: Option<(f64, f64)>,
    ) -> ChartResult<Artifact> {
        let target = self.axis_mut(axis)?;
        target.extend_range(range);
        let artifact = Artifact {
            z_order: record.z_order,
            legend_label: record.label.clone(),
        };
        target.artifacts.push(record);
        Ok(artifact)
    }

    fn record_bars(
        &mut self,
        axis: PanelHandle,
        kind: ArtifactKind,
        x: &[f64],
        bars: OhlcColumns<'_>,
        style: &BarSeriesStyle,
    ) -> ChartResult<Artifact> {
        for column in [bars.open, bars.high, bars.low, bars.close] {
            ensure_same_len(x, column)?;
        }
        let record = ArtifactRecord {
            kind,
            z_order: style.z_order.unwrap_or(COLLECTION_Z_ORDER),
            label: style.label.clone(),
            color: style.color_up,
            len: x.len(),
        };
        self.record(axis, record, finite_range([bars.low, bars.high]))
    }
}

fn ensure_same_len(x: &[f64], y: &[f64]) -> ChartResult<()> {
    if x.len() != y.len() {
        return Err(ChartError::InvalidData(format!(
            "series length {} does not match x axis length {}",
            y.len(),
            x.len()
        )));
    }
    Ok(())
}

impl DrawAdapter for RecordingAdapter {
    fn new_panel(&mut self, spec: &PanelSpec) -> ChartResult<PanelHandle> {
        if spec.rows.span == 0 || spec.rows.end() > spec.total_rows {
            return Err(ChartError::Adapter(format!(
                "panel rows {}..{} outside grid of {} rows",
                spec.rows.start,
                spec.rows.end(),
                spec.total_rows
            )));
        }
        let handle = self.next_handle();
        self.axes.push(AxisRecord::new(handle, Some(*spec), None));
        Ok(handle)
    }

    fn twin_axis(&mut self, panel: PanelHandle) -> ChartResult<PanelHandle> {
        self.axis_mut(panel)?;
        let handle = self.next_handle();
        self.axes.push(AxisRecord::new(handle, None, Some(panel)));
        Ok(handle)
    }

    fn draw_line(
        &mut self,
        axis: PanelHandle,
        x: &[f64],
        y: &[f64],
        style: &LineSeriesStyle,
    ) -> ChartResult<Artifact> {
        ensure_same_len(x, y)?;
        let default_z = match style.method {
            DrawMethod::Bar => COLLECTION_Z_ORDER,
            DrawMethod::Line | DrawMethod::Scatter | DrawMethod::Step => LINE_Z_ORDER,
        };
        let record = ArtifactRecord {
            kind: ArtifactKind::Series(style.method),
            z_order: style.z_order.unwrap_or(default_z),
            label: style.label.clone(),
            color: style.color,
            len: y.len(),
        };
        self.record(axis, record, finite_range([y]))
    }

    fn draw_ohlc(
        &mut self,
        axis: PanelHandle,
        x: &[f64],
        bars: OhlcColumns<'_>,
        style: &BarSeriesStyle,
    ) -> ChartResult<Artifact> {
        self.record_bars(axis, ArtifactKind::Ohlc, x, bars, style)
    }

    fn draw_candlestick(
        &mut self,
        axis: PanelHandle,
        x: &[f64],
        bars: OhlcColumns<'_>,
        style: &BarSeriesStyle,
    ) -> ChartResult<Artifact> {
        self.record_bars(axis, ArtifactKind::Candlestick, x, bars, style)
    }

    fn draw_volume(
        &mut self,
        axis: PanelHandle,
        x: &[f64],
        bars: VolumeColumns<'_>,
        style: &BarSeriesStyle,
    ) -> ChartResult<Artifact> {
        for column in [bars.open, bars.close, bars.volume] {
            ensure_same_len(x, column)?;
        }
        let record = ArtifactRecord {
            kind: ArtifactKind::Volume,
            z_order: style.z_order.unwrap_or(COLLECTION_Z_ORDER),
            label: style.label.clone(),
            color: style.color_up.with_alpha(style.alpha),
            len: x.len(),
        };
        let range = finite_range([bars.volume]).map(|(_, high)| (0.0, high));
        self.record(axis, record, range)
    }

    fn draw_text_tag(&mut self, axis: PanelHandle, tag: &TextTag) -> ChartResult<()> {
        self.axis_mut(axis)?.tags.push(tag.clone());
        Ok(())
    }

    fn draw_hline(&mut self, axis: PanelHandle, line: &HLine) -> ChartResult<()> {
        let target = self.axis_mut(axis)?;
        target.hlines.push(*line);
        target.extend_range(Some((line.y, line.y)));
        Ok(())
    }

    fn y_limits(&self, axis: PanelHandle) -> ChartResult<(f64, f64)> {
        let target = self.axis(axis).ok_or(ChartError::UnknownAxis(axis))?;
        Ok(target
            .explicit_y_limits
            .unwrap_or_else(|| target.autoscaled_limits()))
    }

    fn set_y_limits(&mut self, axis: PanelHandle, bottom: f64, top: f64) -> ChartResult<()> {
        if !bottom.is_finite() || !top.is_finite() {
            return Err(ChartError::InvalidData(
                "y limits must be finite".to_owned(),
            ));
        }
        self.axis_mut(axis)?.explicit_y_limits = Some((bottom, top));
        Ok(())
    }

    fn set_y_axis(
        &mut self,
        axis: PanelHandle,
        locator: TickLocator,
        formatter: Option<AxisFormatter>,
    ) -> ChartResult<()> {
        let target = self.axis_mut(axis)?;
        target.y_locator = Some(locator);
        target.y_formatter = formatter;
        Ok(())
    }

    fn set_legend(&mut self, axis: PanelHandle, legend: &Legend) -> ChartResult<()> {
        self.axis_mut(axis)?.legend = Some(legend.clone());
        Ok(())
    }

    fn set_x_axis(&mut self, axis: PanelHandle, spec: &XAxisSpec) -> ChartResult<()> {
        self.axis_mut(axis)?.x_axis = Some(spec.clone());
        Ok(())
    }

    fn finish_figure(&mut self, layout: &FigureLayout) -> ChartResult<()> {
        self.figure = Some(*layout);
        Ok(())
    }

    fn show_figure(&mut self) -> ChartResult<()> {
        self.shown = true;
        Ok(())
    }
}
