use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace, warn};

use crate::core::primitives::{finite_max, last_finite};
use crate::core::{
    DataFeed, DrawMethod, IndexDateFormatter, ObjectId, PlotInfo, Strategy, VolumeFormatter, format_value,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    AutoscaleAxis, AxisFormatter, BarSeriesStyle, Color, DrawAdapter, FigureLayout, HLine, Legend,
    LegendLocation, LineSeriesStyle, OhlcColumns, PanelHandle, Prune, TextTag, TickLocator,
    VolumeColumns, XAxisSpec,
};

use super::legend::{SeriesLabelContext, VOLUME_LABEL, order_price_legend, series_label};
use super::{
    AllocatedPanel, PanelKey, PlacementGroups, PlotScheme, PriceStyle, RunState, classify,
    plan_rows,
};

const PRICE_Y_BINS: u32 = 10;
const INDICATOR_Y_BINS: u32 = 4;
const VOLUME_Y_BINS: f64 = 6.0;
const TAG_ALPHA: f64 = 0.9;

/// Stages of one chart composition, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeStage {
    Init,
    Classify,
    PlanRows,
    RenderTop,
    RenderPerData,
    FinalizeAxis,
    Done,
}

/// Final state of one axis after composition.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSummary {
    pub handle: PanelHandle,
    pub z_order: Option<f64>,
    pub color_index: i64,
    pub legend: Vec<String>,
}

/// Layout outcome of a composition, mirroring what was sent to the adapter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComposedChart {
    pub total_rows: usize,
    pub rows_used: usize,
    /// Panels in creation order.
    pub panels: Vec<AllocatedPanel>,
    pub last_panel: Option<PanelHandle>,
    /// Every axis, twin axes included, in registration order.
    pub axes: Vec<AxisSummary>,
    /// Ordered price-panel legend of each data feed.
    pub price_legends: IndexMap<ObjectId, Vec<String>>,
}

impl ComposedChart {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn panel(&self, key: PanelKey) -> Option<&AllocatedPanel> {
        self.panels.iter().find(|panel| panel.key == key)
    }

    #[must_use]
    pub fn axis(&self, handle: PanelHandle) -> Option<&AxisSummary> {
        self.axes.iter().find(|axis| axis.handle == handle)
    }
}

/// Builds multi-panel strategy charts from an immutable [`PlotScheme`].
///
/// The composer holds no per-run state, so one instance can compose any
/// number of charts; each `plot` call owns a fresh [`RunState`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartComposer {
    scheme: PlotScheme,
}

impl ChartComposer {
    pub fn new(scheme: PlotScheme) -> ChartResult<Self> {
        scheme.validate()?;
        Ok(Self { scheme })
    }

    #[must_use]
    pub fn scheme(&self) -> &PlotScheme {
        &self.scheme
    }

    /// Composes the chart of `strategy` onto `adapter`.
    ///
    /// A strategy without data feeds draws nothing and succeeds. Any failure
    /// aborts the whole chart.
    pub fn plot<A: DrawAdapter + ?Sized>(
        &self,
        strategy: &Strategy,
        adapter: &mut A,
    ) -> ChartResult<ComposedChart> {
        let mut stage = ComposeStage::Init;
        let result = self.run(strategy, adapter, &mut stage);
        if let Err(err) = &result {
            warn!(?stage, error = %err, "chart composition aborted");
        }
        result
    }

    /// Composes the chart and asks the adapter to display it.
    pub fn plot_and_show<A: DrawAdapter + ?Sized>(
        &self,
        strategy: &Strategy,
        adapter: &mut A,
    ) -> ChartResult<ComposedChart> {
        let chart = self.plot(strategy, adapter)?;
        if chart.panel_count() > 0 {
            adapter.show_figure()?;
        }
        Ok(chart)
    }

    fn run<A: DrawAdapter + ?Sized>(
        &self,
        strategy: &Strategy,
        adapter: &mut A,
        stage: &mut ComposeStage,
    ) -> ChartResult<ComposedChart> {
        if strategy.datas().is_empty() {
            debug!("strategy has no data feeds; nothing to plot");
            *stage = ComposeStage::Done;
            return Ok(ComposedChart::empty());
        }

        enter(stage, ComposeStage::Classify);
        let groups = classify(strategy);

        enter(stage, ComposeStage::PlanRows);
        let plan = plan_rows(strategy, &groups, &self.scheme);
        validate_series_lengths(strategy, &groups, plan.time_axis.len())?;

        let mut composition = Composition {
            strategy,
            groups: &groups,
            state: RunState::new(&self.scheme, plan.total_rows, plan.time_axis),
            adapter,
            drawn: IndexSet::new(),
            price_legends: IndexMap::new(),
        };

        enter(stage, ComposeStage::RenderTop);
        for &top in groups.top() {
            composition.plot_object(top, None)?;
        }

        enter(stage, ComposeStage::RenderPerData);
        for data in strategy.datas() {
            for &above in groups.above(data.id) {
                composition.plot_object(above, None)?;
            }
            composition.plot_data(data)?;
            for &below in groups.below(data.id) {
                composition.plot_object(below, None)?;
            }
        }

        enter(stage, ComposeStage::FinalizeAxis);
        composition.finalize_axis()?;
        composition.report_unplaced_owners();

        enter(stage, ComposeStage::Done);
        Ok(composition.into_chart())
    }
}

fn enter(stage: &mut ComposeStage, next: ComposeStage) {
    let previous = *stage;
    debug!(from = ?previous, to = ?next, "compose stage");
    *stage = next;
}

/// Objects the render stages will visit: top observers, everything placed
/// around a data feed, then overlay chains of those.
fn reachable_objects(strategy: &Strategy, groups: &PlacementGroups) -> IndexSet<ObjectId> {
    let mut pending: Vec<ObjectId> = groups.top().to_vec();
    for data in strategy.datas() {
        pending.extend_from_slice(groups.above(data.id));
        pending.extend_from_slice(groups.below(data.id));
        pending.extend_from_slice(groups.overlay(data.id));
    }
    let mut reachable = IndexSet::new();
    while let Some(id) = pending.pop() {
        if reachable.insert(id) {
            pending.extend_from_slice(groups.overlay(id));
        }
    }
    reachable
}

fn validate_series_lengths(
    strategy: &Strategy,
    groups: &PlacementGroups,
    bars: usize,
) -> ChartResult<()> {
    if bars == 0 {
        return Err(ChartError::InvalidData(
            "primary clock has no bars".to_owned(),
        ));
    }
    for data in strategy.datas() {
        if data.len() != bars {
            return Err(ChartError::InvalidData(format!(
                "data feed `{}` has {} bars, clock has {bars}",
                data.name,
                data.len()
            )));
        }
    }
    let reachable = reachable_objects(strategy, groups);
    let drawn = strategy
        .observers()
        .iter()
        .chain(strategy.indicators())
        .filter(|object| reachable.contains(&object.id));
    for object in drawn {
        for line in object.lines.iter().filter(|line| !line.style.skip) {
            if line.values.len() != bars {
                return Err(ChartError::InvalidData(format!(
                    "line `{}` of `{}` has {} samples, clock has {bars}",
                    line.alias,
                    object.name,
                    line.values.len()
                )));
            }
        }
    }
    Ok(())
}

struct Composition<'a, 's, A: DrawAdapter + ?Sized> {
    strategy: &'a Strategy,
    groups: &'a PlacementGroups,
    state: RunState<'s>,
    adapter: &'a mut A,
    drawn: IndexSet<ObjectId>,
    price_legends: IndexMap<ObjectId, Vec<String>>,
}

impl<A: DrawAdapter + ?Sized> Composition<'_, '_, A> {
    fn scheme(&self) -> &PlotScheme {
        self.state.scheme()
    }

    /// Draws an indicator or observer on its own minor panel, or onto
    /// `master` when overlaid, followed by everything overlaid on it.
    fn plot_object(&mut self, id: ObjectId, master: Option<PanelHandle>) -> ChartResult<()> {
        if self.drawn.contains(&id) {
            warn!(id = id.raw(), "plot object reached twice through overlays; drawn once");
            return Ok(());
        }
        let strategy = self.strategy;
        let object = strategy
            .object(id)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown plot object {id:?}")))?;
        let default_info = PlotInfo::default();
        let info = object.plot_info.as_ref().unwrap_or(&default_info);

        let axis = match master {
            Some(axis) => axis,
            None => {
                let rows_minor = self.scheme().rows_minor;
                self.state
                    .new_panel(PanelKey::Object(id), rows_minor, &mut *self.adapter)?
            }
        };
        self.drawn.insert(id);

        let object_label = object.label();
        for (line_index, line) in object.lines.iter().enumerate() {
            if line.style.skip {
                continue;
            }
            let last_value = line.last_valid();
            let label = series_label(SeriesLabelContext {
                object_label,
                alias: &line.alias,
                line_index,
                on_master_axis: master.is_some(),
                line_labels: info.line_labels,
                last_value,
            });

            let color = match line.style.color {
                Some(color) => color,
                None => {
                    if !line.style.same_color {
                        self.state.next_color(axis)?;
                    }
                    self.state.current_color(axis)?
                }
            };
            let z_order = self.state.next_z_order(axis)?;
            let style = LineSeriesStyle {
                method: line.style.method,
                color,
                label,
                z_order,
                antialiased: true,
                extra: line.style.extra.clone(),
            };
            let artifact =
                self.adapter
                    .draw_line(axis, self.state.time_axis().x(), &line.values, &style)?;
            self.state.set_z_order(axis, artifact.z_order)?;
            if let Some(label) = artifact.legend_label {
                self.state.record_legend(axis, label)?;
            }
            trace!(
                object = %object.name,
                line = %line.alias,
                axis = axis.raw(),
                z_order = artifact.z_order,
                "drew series"
            );

            if let Some(value) = last_value {
                self.draw_value_tag(axis, value, color)?;
            }
        }

        let groups = self.groups;
        for &overlay in groups.overlay(id) {
            self.plot_object(overlay, Some(axis))?;
        }

        if master.is_none() {
            self.finish_indicator_panel(axis, object_label, info)?;
        }
        Ok(())
    }

    fn finish_indicator_panel(
        &mut self,
        axis: PanelHandle,
        title: &str,
        info: &PlotInfo,
    ) -> ChartResult<()> {
        let y_adjust = self.scheme().y_adjust;
        if y_adjust > 0.0 {
            let (bottom, top) = self.adapter.y_limits(axis)?;
            let extra = (top - bottom) * y_adjust / 2.0;
            self.adapter.set_y_limits(axis, bottom - extra, top + extra)?;
        }

        let locator = match &info.y_ticks {
            Some(ticks) => TickLocator::Fixed(ticks.clone()),
            None => TickLocator::MaxN {
                bins: INDICATOR_Y_BINS,
                prune: Prune::Both,
            },
        };
        self.adapter.set_y_axis(axis, locator, None)?;

        let scheme = self.state.scheme();
        for &y in &info.h_lines {
            let line = HLine {
                y,
                color: scheme.hlines_color,
                style: scheme.hlines_style,
                width: scheme.hlines_width,
            };
            self.adapter.draw_hline(axis, &line)?;
        }

        let labels = self.state.legend_labels(axis)?;
        let any_label = labels.iter().any(|label| !label.is_empty());
        if scheme.legend_ind && info.legend && any_label {
            let legend = Legend {
                title: Some(title.to_owned()),
                labels: labels.to_vec(),
                location: scheme.legend_ind_loc,
                align_left: true,
                columns: 1,
            };
            self.adapter.set_legend(axis, &legend)?;
        }
        Ok(())
    }

    fn plot_data(&mut self, data: &DataFeed) -> ChartResult<()> {
        let scheme = self.state.scheme();
        let volume_overlaid = scheme.volume && scheme.vol_overlay;

        let price_axis = if volume_overlaid {
            let volume_axis = self.plot_volume(data)?;
            self.state.twin_axis(volume_axis, &mut *self.adapter)?
        } else {
            self.state
                .new_panel(PanelKey::Object(data.id), scheme.rows_major, &mut *self.adapter)?
        };
        self.drawn.insert(data.id);

        let price_label = data.plot_label();
        let x = self.state.time_axis().x();
        let bars = OhlcColumns {
            open: data.open(),
            high: data.high(),
            low: data.low(),
            close: data.close(),
        };
        let bar_style = BarSeriesStyle {
            color_up: scheme.bar_up,
            color_down: scheme.bar_down,
            alpha: 1.0,
            label: Some(price_label.clone()),
            z_order: None,
        };
        let artifact = match scheme.style {
            PriceStyle::Line => {
                let style = LineSeriesStyle {
                    method: DrawMethod::Line,
                    color: scheme.line_on_close_color,
                    label: Some(price_label.clone()),
                    z_order: None,
                    antialiased: true,
                    extra: IndexMap::new(),
                };
                self.adapter.draw_line(price_axis, x, data.close(), &style)?
            }
            PriceStyle::Candlestick => {
                self.adapter
                    .draw_candlestick(price_axis, x, bars, &bar_style)?
            }
            PriceStyle::OhlcBar => self.adapter.draw_ohlc(price_axis, x, bars, &bar_style)?,
        };
        self.state.set_z_order(price_axis, artifact.z_order)?;
        self.state.record_legend(price_axis, price_label.clone())?;
        debug!(
            data = %data.name,
            style = scheme.style.name(),
            axis = price_axis.raw(),
            volume_overlaid,
            "drew price series"
        );

        if let Some(close) = last_finite(data.close()) {
            self.draw_value_tag(price_axis, close, scheme.line_on_close_color)?;
        }

        self.adapter.set_y_axis(
            price_axis,
            TickLocator::MaxN {
                bins: PRICE_Y_BINS,
                prune: Prune::Both,
            },
            None,
        )?;
        // Freeze the price range so overlays cannot rescale it.
        let (bottom, top) = self.adapter.y_limits(price_axis)?;
        self.adapter.set_y_limits(price_axis, bottom, top)?;

        if scheme.volume {
            if !scheme.vol_overlay {
                self.plot_volume(data)?;
            } else if scheme.vol_push_up > 0.0 {
                let lowered = bottom * (1.0 - scheme.vol_push_up);
                self.adapter.set_y_limits(price_axis, lowered, top)?;
            }
        }

        let groups = self.groups;
        for &overlay in groups.overlay(data.id) {
            self.plot_object(overlay, Some(price_axis))?;
        }

        let ordered = order_price_legend(
            self.state.legend_labels(price_axis)?,
            &price_label,
            volume_overlaid.then_some(VOLUME_LABEL),
        );
        let legend = Legend {
            title: None,
            labels: ordered.clone(),
            location: LegendLocation::UpperLeft,
            align_left: true,
            columns: 1,
        };
        self.adapter.set_legend(price_axis, &legend)?;
        self.price_legends.insert(data.id, ordered);
        Ok(())
    }

    /// Draws the volume bars of `data` on a new panel and returns it.
    fn plot_volume(&mut self, data: &DataFeed) -> ChartResult<PanelHandle> {
        let scheme = self.state.scheme();
        let overlay = scheme.vol_overlay;
        let (row_span, alpha) = if overlay {
            (scheme.rows_major, scheme.vol_trans)
        } else {
            (scheme.rows_minor, 1.0)
        };
        let axis = self
            .state
            .new_panel(PanelKey::Volume(data.id), row_span, &mut *self.adapter)?;

        let style = BarSeriesStyle {
            color_up: scheme.vol_up,
            color_down: scheme.vol_down,
            alpha,
            label: Some(VOLUME_LABEL.to_owned()),
            z_order: None,
        };
        let columns = VolumeColumns {
            open: data.open(),
            close: data.close(),
            volume: data.volume(),
        };
        let artifact =
            self.adapter
                .draw_volume(axis, self.state.time_axis().x(), columns, &style)?;
        self.state.set_z_order(axis, artifact.z_order)?;
        self.state.record_legend(axis, VOLUME_LABEL.to_owned())?;

        let max_volume = finite_max(data.volume()).unwrap_or(0.0);
        let (bins, prune) = if overlay {
            if max_volume > 0.0 {
                self.adapter
                    .set_y_limits(axis, 0.0, max_volume / scheme.vol_scaling)?;
            }
            let bins = (VOLUME_Y_BINS / scheme.vol_scaling).floor().max(1.0) as u32;
            (bins, Prune::None)
        } else {
            let legend = Legend {
                title: None,
                labels: self.state.legend_labels(axis)?.to_vec(),
                location: scheme.legend_ind_loc,
                align_left: false,
                columns: 1,
            };
            self.adapter.set_legend(axis, &legend)?;
            (VOLUME_Y_BINS as u32, Prune::Both)
        };
        self.adapter.set_y_axis(
            axis,
            TickLocator::MaxN { bins, prune },
            Some(AxisFormatter::Volume(VolumeFormatter::new(max_volume))),
        )?;
        debug!(data = %data.name, axis = axis.raw(), overlay, max_volume, "drew volume");
        Ok(axis)
    }

    fn draw_value_tag(&mut self, axis: PanelHandle, value: f64, edge: Color) -> ChartResult<()> {
        let tag = TextTag {
            x: self.state.time_axis().right_edge(),
            y: value,
            text: format_value(value),
            face_color: Color::WHITE,
            edge_color: edge,
            alpha: TAG_ALPHA,
            font_size: self.scheme().sub_text_size,
            z_order: self.state.tag_z_order(axis)?,
        };
        self.adapter.draw_text_tag(axis, &tag)
    }

    /// Only the last panel carries date labels; every other panel hides them.
    fn finalize_axis(&mut self) -> ChartResult<()> {
        let Some(last) = self.state.last_panel() else {
            return Ok(());
        };
        let scheme = self.state.scheme();
        let panels: Vec<PanelHandle> = self.state.panels().map(|panel| panel.handle).collect();
        for panel in panels.into_iter().filter(|panel| *panel != last) {
            self.adapter.set_x_axis(panel, &XAxisSpec::hidden())?;
        }

        let formatter = IndexDateFormatter::new(
            self.state.time_axis().real().to_vec(),
            IndexDateFormatter::DEFAULT_PATTERN,
        );
        self.adapter.set_x_axis(
            last,
            &XAxisSpec {
                tick_labels_visible: true,
                tick_rotation: scheme.tick_rotation,
                locator: Some(TickLocator::Auto),
                formatter: Some(AxisFormatter::IndexDate(formatter)),
            },
        )?;

        self.adapter.finish_figure(&FigureLayout {
            hspace: scheme.plot_dist,
            top: 0.98,
            left: 0.05,
            bottom: 0.05,
            right: 0.95,
            tight_axis: if scheme.y_tight {
                AutoscaleAxis::Both
            } else {
                AutoscaleAxis::X
            },
        })?;

        if self.state.rows_used() != self.state.total_rows() {
            warn!(
                rows_used = self.state.rows_used(),
                total_rows = self.state.total_rows(),
                "chart left planned rows unused"
            );
        }
        Ok(())
    }

    fn report_unplaced_owners(&self) {
        for owner in self.groups.owners() {
            if !self.drawn.contains(&owner) {
                warn!(
                    owner = owner.raw(),
                    "placement group owner was never drawn; its entries are not plotted"
                );
            }
        }
    }

    fn into_chart(self) -> ComposedChart {
        ComposedChart {
            total_rows: self.state.total_rows(),
            rows_used: self.state.rows_used(),
            panels: self.state.panels().copied().collect(),
            last_panel: self.state.last_panel(),
            axes: self
                .state
                .axes()
                .map(|(handle, axis)| AxisSummary {
                    handle,
                    z_order: axis.z_order(),
                    color_index: axis.color_index(),
                    legend: axis.legend().to_vec(),
                })
                .collect(),
            price_legends: self.price_legends,
        }
    }
}
