use indexmap::IndexMap;
use tracing::trace;

use crate::core::{ObjectId, SharedTimeAxis};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DrawAdapter, PanelHandle, PanelSpec, RowRange};

use super::PlotScheme;

/// Text tags sit this far above the current top z-order of their axis.
pub const TAG_Z_ORDER_OFFSET: f64 = 3.0;

/// Layout slot a panel was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKey {
    Object(ObjectId),
    Volume(ObjectId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatedPanel {
    pub key: PanelKey,
    pub handle: PanelHandle,
    pub rows: RowRange,
}

/// Per-axis drawing state: z-order, color cycle and legend entries.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisState {
    z_order: Option<f64>,
    color_index: i64,
    legend: Vec<String>,
}

impl Default for AxisState {
    fn default() -> Self {
        Self {
            z_order: None,
            color_index: -1,
            legend: Vec::new(),
        }
    }
}

impl AxisState {
    #[must_use]
    pub fn z_order(&self) -> Option<f64> {
        self.z_order
    }

    #[must_use]
    pub fn color_index(&self) -> i64 {
        self.color_index
    }

    #[must_use]
    pub fn legend(&self) -> &[String] {
        &self.legend
    }
}

/// Mutable state of one chart composition.
///
/// Owned by a single `plot` call; independent compositions use independent
/// states.
#[derive(Debug)]
pub struct RunState<'s> {
    scheme: &'s PlotScheme,
    total_rows: usize,
    cursor: usize,
    shared_x: Option<PanelHandle>,
    panels: IndexMap<PanelKey, AllocatedPanel>,
    axes: IndexMap<PanelHandle, AxisState>,
    time_axis: SharedTimeAxis,
}

impl<'s> RunState<'s> {
    #[must_use]
    pub fn new(scheme: &'s PlotScheme, total_rows: usize, time_axis: SharedTimeAxis) -> Self {
        Self {
            scheme,
            total_rows,
            cursor: 0,
            shared_x: None,
            panels: IndexMap::new(),
            axes: IndexMap::new(),
            time_axis,
        }
    }

    /// Reserves the next `row_span` rows and asks the adapter for a panel.
    ///
    /// Overflowing the planned total is a layout bug and aborts the chart.
    pub fn new_panel<A: DrawAdapter + ?Sized>(
        &mut self,
        key: PanelKey,
        row_span: usize,
        adapter: &mut A,
    ) -> ChartResult<PanelHandle> {
        if self.cursor + row_span > self.total_rows {
            return Err(ChartError::InconsistentLayout {
                requested: row_span,
                cursor: self.cursor,
                total: self.total_rows,
            });
        }
        if self.panels.contains_key(&key) {
            return Err(ChartError::InvalidData(format!(
                "panel for {key:?} allocated twice"
            )));
        }

        let rows = RowRange::new(self.cursor, row_span);
        let handle = adapter.new_panel(&PanelSpec {
            rows,
            total_rows: self.total_rows,
            share_x: self.shared_x,
            ticks_right: true,
            grid: self.scheme.grid,
        })?;
        if self.shared_x.is_none() {
            self.shared_x = Some(handle);
        }
        self.cursor += row_span;
        self.panels
            .insert(key, AllocatedPanel { key, handle, rows });
        self.axes.insert(handle, AxisState::default());
        trace!(?key, handle = handle.raw(), start = rows.start, span = rows.span, "allocated panel");
        Ok(handle)
    }

    /// Opens a secondary y-axis on `panel`'s rows without consuming rows.
    pub fn twin_axis<A: DrawAdapter + ?Sized>(
        &mut self,
        panel: PanelHandle,
        adapter: &mut A,
    ) -> ChartResult<PanelHandle> {
        self.axis(panel)?;
        let handle = adapter.twin_axis(panel)?;
        self.axes.insert(handle, AxisState::default());
        trace!(panel = panel.raw(), twin = handle.raw(), "opened twin axis");
        Ok(handle)
    }

    /// Advances the axis color cycle and returns the new counter.
    pub fn next_color(&mut self, axis: PanelHandle) -> ChartResult<i64> {
        let state = self.axis_mut(axis)?;
        state.color_index += 1;
        Ok(state.color_index)
    }

    /// Palette color at the axis' current cycle position.
    pub fn current_color(&self, axis: PanelHandle) -> ChartResult<Color> {
        Ok(self.scheme.color(self.axis(axis)?.color_index))
    }

    /// Z-order for the next artifact, `None` before the axis has any.
    pub fn next_z_order(&self, axis: PanelHandle) -> ChartResult<Option<f64>> {
        Ok(self
            .axis(axis)?
            .z_order
            .map(|z_order| self.scheme.z_order_drift.next(z_order)))
    }

    pub fn current_z_order(&self, axis: PanelHandle) -> ChartResult<Option<f64>> {
        Ok(self.axis(axis)?.z_order)
    }

    pub fn set_z_order(&mut self, axis: PanelHandle, z_order: f64) -> ChartResult<()> {
        self.axis_mut(axis)?.z_order = Some(z_order);
        Ok(())
    }

    pub fn tag_z_order(&self, axis: PanelHandle) -> ChartResult<f64> {
        Ok(self.axis(axis)?.z_order.unwrap_or(0.0) + TAG_Z_ORDER_OFFSET)
    }

    pub fn record_legend(&mut self, axis: PanelHandle, label: String) -> ChartResult<()> {
        self.axis_mut(axis)?.legend.push(label);
        Ok(())
    }

    pub fn legend_labels(&self, axis: PanelHandle) -> ChartResult<&[String]> {
        Ok(&self.axis(axis)?.legend)
    }

    pub fn axis(&self, handle: PanelHandle) -> ChartResult<&AxisState> {
        self.axes.get(&handle).ok_or(ChartError::UnknownAxis(handle))
    }

    fn axis_mut(&mut self, handle: PanelHandle) -> ChartResult<&mut AxisState> {
        self.axes
            .get_mut(&handle)
            .ok_or(ChartError::UnknownAxis(handle))
    }

    /// Panels in creation order.
    pub fn panels(&self) -> impl Iterator<Item = &AllocatedPanel> {
        self.panels.values()
    }

    #[must_use]
    pub fn last_panel(&self) -> Option<PanelHandle> {
        self.panels.values().last().map(|panel| panel.handle)
    }

    /// Axis states in registration order, twin axes included.
    pub fn axes(&self) -> impl Iterator<Item = (PanelHandle, &AxisState)> {
        self.axes.iter().map(|(handle, state)| (*handle, state))
    }

    #[must_use]
    pub fn shared_x(&self) -> Option<PanelHandle> {
        self.shared_x
    }

    #[must_use]
    pub fn rows_used(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    #[must_use]
    pub fn time_axis(&self) -> &SharedTimeAxis {
        &self.time_axis
    }

    #[must_use]
    pub fn scheme(&self) -> &'s PlotScheme {
        self.scheme
    }
}
