use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Last element of `values` when it is finite.
#[must_use]
pub fn last_finite(values: &[f64]) -> Option<f64> {
    values.last().copied().filter(|value| value.is_finite())
}

/// Largest finite element, `None` when there is none.
#[must_use]
pub fn finite_max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .max_by(f64::total_cmp)
}

/// Finite `(min, max)` of every slice, `None` when all values are missing.
#[must_use]
pub fn finite_range<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> Option<(f64, f64)> {
    series
        .into_iter()
        .flat_map(|values| values.iter().copied())
        .filter(|value| value.is_finite())
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((low, high)) => Some((low.min(value), high.max(value))),
        })
}
