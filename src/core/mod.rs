pub mod data_feed;
pub mod formatters;
pub mod plot_object;
pub mod primitives;
pub mod strategy;
pub mod time_axis;
pub mod types;

pub use data_feed::{DataFeed, OhlcvBar};
pub use formatters::{IndexDateFormatter, VolumeFormatter, format_value};
pub use plot_object::{
    DrawMethod, LineStyle, ObjectKind, OwnerRef, PlotInfo, PlotLine, PlottableObject,
};
pub use strategy::Strategy;
pub use time_axis::SharedTimeAxis;
pub use types::{ObjectId, TimeFrame};
