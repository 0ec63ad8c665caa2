use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::decimal_to_f64;
use crate::core::{ObjectId, TimeFrame};
use crate::error::ChartResult;

/// One OHLCV bar. Missing values are `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    #[must_use]
    pub fn new(
        time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn from_decimal(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> ChartResult<Self> {
        Ok(Self {
            time,
            open: decimal_to_f64(open, "open")?,
            high: decimal_to_f64(high, "high")?,
            low: decimal_to_f64(low, "low")?,
            close: decimal_to_f64(close, "close")?,
            volume: decimal_to_f64(volume, "volume")?,
        })
    }
}

/// Price data feed stored column-wise, the layout draw adapters consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFeed {
    pub id: ObjectId,
    pub name: String,
    pub timeframe: TimeFrame,
    pub compression: u32,
    timestamps: Vec<DateTime<Utc>>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl DataFeed {
    #[must_use]
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            timeframe: TimeFrame::Days,
            compression: 1,
            timestamps: Vec::new(),
            open: Vec::new(),
            high: Vec::new(),
            low: Vec::new(),
            close: Vec::new(),
            volume: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_timeframe(mut self, timeframe: TimeFrame, compression: u32) -> Self {
        self.timeframe = timeframe;
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_bars(mut self, bars: impl IntoIterator<Item = OhlcvBar>) -> Self {
        for bar in bars {
            self.push_bar(bar);
        }
        self
    }

    pub fn push_bar(&mut self, bar: OhlcvBar) {
        self.timestamps.push(bar.time);
        self.open.push(bar.open);
        self.high.push(bar.high);
        self.low.push(bar.low);
        self.close.push(bar.close);
        self.volume.push(bar.volume);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    #[must_use]
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    #[must_use]
    pub fn open(&self) -> &[f64] {
        &self.open
    }

    #[must_use]
    pub fn high(&self) -> &[f64] {
        &self.high
    }

    #[must_use]
    pub fn low(&self) -> &[f64] {
        &self.low
    }

    #[must_use]
    pub fn close(&self) -> &[f64] {
        &self.close
    }

    #[must_use]
    pub fn volume(&self) -> &[f64] {
        &self.volume
    }

    /// Legend label of the price series:
    /// `"<name> (<compression> <timeframe>) O:.. H:.. L:.. C:.."`.
    #[must_use]
    pub fn plot_label(&self) -> String {
        let mut label = String::new();
        if !self.name.is_empty() {
            label.push_str(&self.name);
            label.push(' ');
        }
        label.push_str(&format!(
            "({} {})",
            self.compression,
            self.timeframe.name(self.compression)
        ));
        let last = |values: &[f64]| values.last().copied().unwrap_or(f64::NAN);
        label.push_str(&format!(
            " O:{:.2} H:{:.2} L:{:.2} C:{:.2}",
            last(&self.open),
            last(&self.high),
            last(&self.low),
            last(&self.close)
        ));
        label
    }
}
