use chrono::{Duration, TimeZone, Utc};
use strategy_chart::api::{ChartComposer, PanelKey, PlotScheme, RunState};
use strategy_chart::core::{
    DataFeed, ObjectId, OhlcvBar, OwnerRef, PlotInfo, PlotLine, PlottableObject, SharedTimeAxis,
    Strategy,
};
use strategy_chart::render::{
    Artifact, AxisFormatter, BarSeriesStyle, DrawAdapter, FigureLayout, HLine, Legend,
    LineSeriesStyle, OhlcColumns, PanelHandle, PanelSpec, RecordingAdapter, TextTag, TickLocator,
    VolumeColumns, XAxisSpec,
};
use strategy_chart::{ChartError, ChartResult};

const DATA: ObjectId = ObjectId::new(1);

fn feed(id: ObjectId, bars: usize) -> DataFeed {
    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid start");
    DataFeed::new(id, "ES").with_bars((0..bars).map(|i| {
        let close = 100.0 + i as f64;
        OhlcvBar::new(
            start + Duration::days(i as i64),
            close,
            close + 1.0,
            close - 1.0,
            close,
            10.0,
        )
    }))
}

/// Records like [`RecordingAdapter`] but refuses volume bars.
#[derive(Default)]
struct VolumeRefusingAdapter {
    inner: RecordingAdapter,
}

impl DrawAdapter for VolumeRefusingAdapter {
    fn new_panel(&mut self, spec: &PanelSpec) -> ChartResult<PanelHandle> {
        self.inner.new_panel(spec)
    }

    fn twin_axis(&mut self, panel: PanelHandle) -> ChartResult<PanelHandle> {
        self.inner.twin_axis(panel)
    }

    fn draw_line(
        &mut self,
        axis: PanelHandle,
        x: &[f64],
        y: &[f64],
        style: &LineSeriesStyle,
    ) -> ChartResult<Artifact> {
        self.inner.draw_line(axis, x, y, style)
    }

    fn draw_ohlc(
        &mut self,
        axis: PanelHandle,
        x: &[f64],
        bars: OhlcColumns<'_>,
        style: &BarSeriesStyle,
    ) -> ChartResult<Artifact> {
        self.inner.draw_ohlc(axis, x, bars, style)
    }

    fn draw_candlestick(
        &mut self,
        axis: PanelHandle,
        x: &[f64],
        bars: OhlcColumns<'_>,
        style: &BarSeriesStyle,
    ) -> ChartResult<Artifact> {
        self.inner.draw_candlestick(axis, x, bars, style)
    }

    fn draw_volume(
        &mut self,
        _axis: PanelHandle,
        _x: &[f64],
        _bars: VolumeColumns<'_>,
        _style: &BarSeriesStyle,
    ) -> ChartResult<Artifact> {
        Err(ChartError::Adapter("volume bars unsupported".to_owned()))
    }

    fn draw_text_tag(&mut self, axis: PanelHandle, tag: &TextTag) -> ChartResult<()> {
        self.inner.draw_text_tag(axis, tag)
    }

    fn draw_hline(&mut self, axis: PanelHandle, line: &HLine) -> ChartResult<()> {
        self.inner.draw_hline(axis, line)
    }

    fn y_limits(&self, axis: PanelHandle) -> ChartResult<(f64, f64)> {
        self.inner.y_limits(axis)
    }

    fn set_y_limits(&mut self, axis: PanelHandle, bottom: f64, top: f64) -> ChartResult<()> {
        self.inner.set_y_limits(axis, bottom, top)
    }

    fn set_y_axis(
        &mut self,
        axis: PanelHandle,
        locator: TickLocator,
        formatter: Option<AxisFormatter>,
    ) -> ChartResult<()> {
        self.inner.set_y_axis(axis, locator, formatter)
    }

    fn set_legend(&mut self, axis: PanelHandle, legend: &Legend) -> ChartResult<()> {
        self.inner.set_legend(axis, legend)
    }

    fn set_x_axis(&mut self, axis: PanelHandle, spec: &XAxisSpec) -> ChartResult<()> {
        self.inner.set_x_axis(axis, spec)
    }

    fn finish_figure(&mut self, layout: &FigureLayout) -> ChartResult<()> {
        self.inner.finish_figure(layout)
    }
}

#[test]
fn adapter_failures_abort_the_chart() {
    let strategy = Strategy::new().with_data(feed(DATA, 3));
    let composer = ChartComposer::new(PlotScheme::default()).expect("scheme");
    let mut adapter = VolumeRefusingAdapter::default();

    let err = composer
        .plot(&strategy, &mut adapter)
        .expect_err("volume failure must propagate");
    assert!(matches!(err, ChartError::Adapter(_)));
    assert!(adapter.inner.figure().is_none());

    let mut adapter = VolumeRefusingAdapter::default();
    let composer =
        ChartComposer::new(PlotScheme::default().with_volume(false, false)).expect("scheme");
    composer
        .plot(&strategy, &mut adapter)
        .expect("volume disabled never reaches the failing call");
}

#[test]
fn composer_works_through_a_trait_object() {
    let strategy = Strategy::new().with_data(feed(DATA, 3));
    let composer = ChartComposer::new(PlotScheme::default()).expect("scheme");
    let mut recording = RecordingAdapter::default();
    let adapter: &mut dyn DrawAdapter = &mut recording;

    let chart = composer.plot(&strategy, adapter).expect("compose");
    assert_eq!(chart.panel_count(), 1);
}

#[test]
fn series_shorter_than_the_clock_are_rejected() {
    let short = PlottableObject::indicator(ObjectId::new(10), "SMA", OwnerRef::Direct(DATA))
        .with_plot_info(PlotInfo::overlay())
        .with_line(PlotLine::new("sma", vec![1.0, 2.0]));
    let strategy = Strategy::new().with_data(feed(DATA, 3)).with_indicator(short);
    let composer = ChartComposer::new(PlotScheme::default()).expect("scheme");
    let mut adapter = RecordingAdapter::default();

    let err = composer
        .plot(&strategy, &mut adapter)
        .expect_err("length mismatch");
    assert!(matches!(err, ChartError::InvalidData(ref message) if message.contains("sma")));
    assert!(adapter.axes().is_empty());
}

#[test]
fn hidden_objects_are_exempt_from_length_checks() {
    let hidden = PlottableObject::indicator(ObjectId::new(10), "SMA", OwnerRef::Direct(DATA))
        .with_plot_info(PlotInfo::overlay().with_plot(false))
        .with_line(PlotLine::new("sma", vec![1.0]));
    let strategy = Strategy::new().with_data(feed(DATA, 3)).with_indicator(hidden);
    let composer = ChartComposer::new(PlotScheme::default()).expect("scheme");
    let mut adapter = RecordingAdapter::default();
    assert!(composer.plot(&strategy, &mut adapter).is_ok());
}

#[test]
fn series_that_are_never_drawn_are_exempt_from_length_checks() {
    let orphan_owner = ObjectId::new(50);
    let orphan =
        PlottableObject::indicator(ObjectId::new(10), "RSI", OwnerRef::Direct(orphan_owner))
            .with_plot_info(PlotInfo::subplot())
            .with_line(PlotLine::new("rsi", vec![1.0]));
    let stranded_overlay =
        PlottableObject::indicator(ObjectId::new(11), "SMA", OwnerRef::Direct(ObjectId::new(10)))
            .with_plot_info(PlotInfo::overlay())
            .with_line(PlotLine::new("sma", vec![1.0, 2.0]));
    let strategy = Strategy::new()
        .with_data(feed(DATA, 3))
        .with_indicator(orphan)
        .with_indicator(stranded_overlay);
    let composer = ChartComposer::new(PlotScheme::default()).expect("scheme");
    let mut adapter = RecordingAdapter::default();

    let chart = composer
        .plot(&strategy, &mut adapter)
        .expect("unreachable series cannot abort the chart");
    assert!(chart.panel(PanelKey::Object(ObjectId::new(10))).is_none());
    assert!(chart.panel(PanelKey::Object(ObjectId::new(11))).is_none());
}

#[test]
fn overlays_of_drawn_indicators_are_still_length_checked() {
    let rsi = PlottableObject::indicator(ObjectId::new(10), "RSI", OwnerRef::Direct(DATA))
        .with_plot_info(PlotInfo::subplot())
        .with_line(PlotLine::new("rsi", vec![1.0, 2.0, 3.0]));
    let short =
        PlottableObject::indicator(ObjectId::new(11), "SMA", OwnerRef::Direct(ObjectId::new(10)))
            .with_plot_info(PlotInfo::overlay())
            .with_line(PlotLine::new("sma", vec![1.0, 2.0]));
    let strategy = Strategy::new()
        .with_data(feed(DATA, 3))
        .with_indicator(rsi)
        .with_indicator(short);
    let composer = ChartComposer::new(PlotScheme::default()).expect("scheme");
    let mut adapter = RecordingAdapter::default();

    let err = composer
        .plot(&strategy, &mut adapter)
        .expect_err("overlay of a drawn panel");
    assert!(matches!(err, ChartError::InvalidData(ref message) if message.contains("sma")));
}

#[test]
fn data_feeds_must_match_the_primary_clock() {
    let strategy = Strategy::new()
        .with_data(feed(DATA, 3))
        .with_data(feed(ObjectId::new(2), 4));
    let composer = ChartComposer::new(PlotScheme::default()).expect("scheme");
    let mut adapter = RecordingAdapter::default();
    assert!(matches!(
        composer.plot(&strategy, &mut adapter),
        Err(ChartError::InvalidData(_))
    ));
}

#[test]
fn empty_primary_clock_is_rejected() {
    let strategy = Strategy::new().with_data(feed(DATA, 0));
    let composer = ChartComposer::new(PlotScheme::default()).expect("scheme");
    let mut adapter = RecordingAdapter::default();
    let err = composer
        .plot(&strategy, &mut adapter)
        .expect_err("no bars");
    assert_eq!(err.to_string(), "invalid data: primary clock has no bars");
}

#[test]
fn invalid_schemes_are_refused_up_front() {
    assert!(ChartComposer::new(PlotScheme::default().with_row_spans(0, 1)).is_err());
    assert!(ChartComposer::new(PlotScheme::default().with_volume_scaling(0.0, 0.0)).is_err());
    assert!(ChartComposer::new(PlotScheme::default().with_palette(Vec::new())).is_err());
}

#[test]
fn allocating_past_the_planned_rows_reports_inconsistent_layout() {
    let scheme = PlotScheme::default();
    let mut state = RunState::new(&scheme, 6, SharedTimeAxis::default());
    let mut adapter = RecordingAdapter::default();
    state
        .new_panel(PanelKey::Object(DATA), 5, &mut adapter)
        .expect("price panel fits");

    let err = state
        .new_panel(PanelKey::Object(ObjectId::new(2)), 5, &mut adapter)
        .expect_err("second major panel overflows");
    assert_eq!(
        err.to_string(),
        "inconsistent layout: panel of 5 rows at row 5 exceeds planned total 6"
    );
    assert_eq!(state.rows_used(), 5);
}
