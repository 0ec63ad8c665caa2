use chrono::{DateTime, Utc};

use crate::core::{DataFeed, ObjectId, PlottableObject};

/// Read-only view of a strategy handed to the chart composer.
///
/// Registries keep declaration order; the composer never sorts them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Strategy {
    datas: Vec<DataFeed>,
    indicators: Vec<PlottableObject>,
    observers: Vec<PlottableObject>,
    clock: Option<Vec<DateTime<Utc>>>,
}

impl Strategy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_data(mut self, data: DataFeed) -> Self {
        self.datas.push(data);
        self
    }

    #[must_use]
    pub fn with_indicator(mut self, indicator: PlottableObject) -> Self {
        self.indicators.push(indicator);
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: PlottableObject) -> Self {
        self.observers.push(observer);
        self
    }

    /// Overrides the primary clock, which otherwise is the first data feed.
    #[must_use]
    pub fn with_clock(mut self, clock: Vec<DateTime<Utc>>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn datas(&self) -> &[DataFeed] {
        &self.datas
    }

    #[must_use]
    pub fn indicators(&self) -> &[PlottableObject] {
        &self.indicators
    }

    #[must_use]
    pub fn observers(&self) -> &[PlottableObject] {
        &self.observers
    }

    #[must_use]
    pub fn clock(&self) -> &[DateTime<Utc>] {
        match &self.clock {
            Some(clock) => clock,
            None => self.datas.first().map(DataFeed::timestamps).unwrap_or_default(),
        }
    }

    /// Looks up an indicator or observer.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&PlottableObject> {
        self.observers
            .iter()
            .chain(self.indicators.iter())
            .find(|object| object.id == id)
    }
}
