use thiserror::Error;

use crate::render::PanelHandle;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(
        "inconsistent layout: panel of {requested} rows at row {cursor} exceeds planned total {total}"
    )]
    InconsistentLayout {
        requested: usize,
        cursor: usize,
        total: usize,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown axis handle: {0:?}")]
    UnknownAxis(PanelHandle),

    #[error("draw adapter failure: {0}")]
    Adapter(String),
}
