mod commands;
mod primitives;
mod recording;

pub use commands::{
    Artifact, AutoscaleAxis, AxisFormatter, BarSeriesStyle, FigureLayout, HLine, Legend,
    LineSeriesStyle, OhlcColumns, PanelHandle, PanelSpec, Prune, RowRange, TextTag, TickLocator,
    VolumeColumns, XAxisSpec,
};
pub use primitives::{Color, LegendLocation, LineStrokeStyle};
pub use recording::{ArtifactKind, ArtifactRecord, AxisRecord, RecordingAdapter};

use crate::error::ChartResult;

/// Contract implemented by any plotting backend.
///
/// The composer decides layout, colors, z-order and legends; the adapter only
/// materializes what it is told. Every x slice passed in is the dense bar-index
/// axis, so adapters never see calendar gaps.
pub trait DrawAdapter {
    fn new_panel(&mut self, spec: &PanelSpec) -> ChartResult<PanelHandle>;

    /// Secondary y-axis on the rows of `panel`, sharing its x range.
    fn twin_axis(&mut self, panel: PanelHandle) -> ChartResult<PanelHandle>;

    fn draw_line(
        &mut self,
        axis: PanelHandle,
        x: &[f64],
        y: &[f64],
        style: &LineSeriesStyle,
    ) -> ChartResult<Artifact>;

    fn draw_ohlc(
        &mut self,
        axis: PanelHandle,
        x: &[f64],
        bars: OhlcColumns<'_>,
        style: &BarSeriesStyle,
    ) -> ChartResult<Artifact>;

    fn draw_candlestick(
        &mut self,
        axis: PanelHandle,
        x: &[f64],
        bars: OhlcColumns<'_>,
        style: &BarSeriesStyle,
    ) -> ChartResult<Artifact>;

    fn draw_volume(
        &mut self,
        axis: PanelHandle,
        x: &[f64],
        bars: VolumeColumns<'_>,
        style: &BarSeriesStyle,
    ) -> ChartResult<Artifact>;

    fn draw_text_tag(&mut self, axis: PanelHandle, tag: &TextTag) -> ChartResult<()>;

    fn draw_hline(&mut self, axis: PanelHandle, line: &HLine) -> ChartResult<()>;

    /// Current `(bottom, top)` y-limits, autoscaled unless set explicitly.
    fn y_limits(&self, axis: PanelHandle) -> ChartResult<(f64, f64)>;

    fn set_y_limits(&mut self, axis: PanelHandle, bottom: f64, top: f64) -> ChartResult<()>;

    fn set_y_axis(
        &mut self,
        axis: PanelHandle,
        locator: TickLocator,
        formatter: Option<AxisFormatter>,
    ) -> ChartResult<()>;

    fn set_legend(&mut self, axis: PanelHandle, legend: &Legend) -> ChartResult<()>;

    fn set_x_axis(&mut self, axis: PanelHandle, spec: &XAxisSpec) -> ChartResult<()>;

    fn finish_figure(&mut self, layout: &FigureLayout) -> ChartResult<()>;

    fn show_figure(&mut self) -> ChartResult<()> {
        Ok(())
    }
}
