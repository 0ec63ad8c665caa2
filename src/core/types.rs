use serde::{Deserialize, Serialize};

/// Identity of a plottable object (data feed, indicator or observer).
///
/// Data feeds share the id space with indicators and observers so any of
/// them can act as a placement owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Bar period unit of a data feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFrame {
    Ticks,
    MicroSeconds,
    Seconds,
    Minutes,
    #[default]
    Days,
    Weeks,
    Months,
    Years,
    NoTimeFrame,
}

impl TimeFrame {
    #[must_use]
    pub const fn plural_name(self) -> &'static str {
        match self {
            Self::Ticks => "Ticks",
            Self::MicroSeconds => "MicroSeconds",
            Self::Seconds => "Seconds",
            Self::Minutes => "Minutes",
            Self::Days => "Days",
            Self::Weeks => "Weeks",
            Self::Months => "Months",
            Self::Years => "Years",
            Self::NoTimeFrame => "NoTimeFrame",
        }
    }

    /// Display name for `compression` units: plural above one, singular otherwise.
    #[must_use]
    pub fn name(self, compression: u32) -> &'static str {
        let plural = self.plural_name();
        if compression > 1 || self == Self::NoTimeFrame {
            return plural;
        }
        &plural[..plural.len() - 1]
    }
}
