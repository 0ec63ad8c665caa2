use crate::core::format_value;

pub const VOLUME_LABEL: &str = "Volume";

/// Inputs deciding the legend label of one sub-series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesLabelContext<'a> {
    pub object_label: &'a str,
    pub alias: &'a str,
    pub line_index: usize,
    /// The series is drawn onto another object's axis.
    pub on_master_axis: bool,
    pub line_labels: bool,
    pub last_value: Option<f64>,
}

/// Legend label for one sub-series, `None` when it stays out of the legend.
///
/// Overlaid objects show their display label once, on line 0; objects on
/// their own panel (or forcing line labels) show every alias. The final
/// value is appended when finite. Blank labels never reach the legend.
#[must_use]
pub fn series_label(ctx: SeriesLabelContext<'_>) -> Option<String> {
    let mut label = if ctx.on_master_axis && !ctx.line_labels {
        if ctx.line_index != 0 || ctx.object_label.is_empty() {
            return None;
        }
        ctx.object_label.to_owned()
    } else {
        ctx.alias.to_owned()
    };

    if let Some(value) = ctx.last_value {
        label.push(' ');
        label.push_str(&format_value(value));
    }
    (!label.is_empty()).then_some(label)
}

/// Orders the price panel legend: price first, then overlays in draw order.
/// An overlaid volume label goes in front of everything.
#[must_use]
pub fn order_price_legend(
    labels: &[String],
    price_label: &str,
    volume_label: Option<&str>,
) -> Vec<String> {
    let mut ordered = labels.to_vec();
    if let Some(index) = ordered.iter().position(|label| label == price_label) {
        let price = ordered.remove(index);
        ordered.insert(0, price);
    }
    if let Some(volume) = volume_label {
        ordered.insert(0, volume.to_owned());
    }
    ordered
}
