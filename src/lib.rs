//! strategy-chart: multi-panel layout and composition for trading strategy charts.
//!
//! The crate decides which panels a strategy chart needs, how many grid rows
//! each one takes, what lands on which axis and in which order. Drawing itself
//! goes through the [`render::DrawAdapter`] contract, so any plotting backend
//! can materialize the result.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartComposer, ComposedChart, PlotScheme};
pub use error::{ChartError, ChartResult};
