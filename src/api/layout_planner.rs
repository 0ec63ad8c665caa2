use tracing::debug;

use crate::core::{SharedTimeAxis, Strategy};

use super::{PlacementGroups, PlotScheme};

/// Row budget and time axis of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub total_rows: usize,
    pub time_axis: SharedTimeAxis,
}

/// Counts rows for every panel the composer will create.
///
/// Above/below groups count only when their owner is a data feed, since those
/// are the only owners the composer renders stacked panels for.
#[must_use]
pub fn plan_rows(strategy: &Strategy, groups: &PlacementGroups, scheme: &PlotScheme) -> LayoutPlan {
    let data_count = strategy.datas().len();

    let mut total_rows = data_count * scheme.rows_major;
    if scheme.volume && !scheme.vol_overlay {
        total_rows += data_count * scheme.rows_minor;
    }
    total_rows += groups.top().len() * scheme.rows_minor;

    let stacked: usize = strategy
        .datas()
        .iter()
        .map(|data| groups.above(data.id).len() + groups.below(data.id).len())
        .sum();
    total_rows += stacked * scheme.rows_minor;

    let time_axis = SharedTimeAxis::from_clock(strategy.clock());
    debug!(
        data_count,
        top = groups.top().len(),
        stacked,
        total_rows,
        bars = time_axis.len(),
        "planned chart rows"
    );

    LayoutPlan {
        total_rows,
        time_axis,
    }
}
