mod classifier;
mod composer;
mod json_contract;
mod layout_planner;
mod legend;
mod panel_allocator;
mod plot_scheme;

pub use classifier::{Placement, PlacementGroups, classify, placement_for};
pub use composer::{AxisSummary, ChartComposer, ComposeStage, ComposedChart};
pub use json_contract::{PLOT_SCHEME_JSON_SCHEMA_V1, PlotSchemeJsonContractV1};
pub use layout_planner::{LayoutPlan, plan_rows};
pub use legend::{SeriesLabelContext, VOLUME_LABEL, order_price_legend, series_label};
pub use panel_allocator::{AllocatedPanel, AxisState, PanelKey, RunState, TAG_Z_ORDER_OFFSET};
pub use plot_scheme::{PlotScheme, PriceStyle, ZOrderDrift};
