use chrono::{DateTime, Utc};

/// Dense bar-index coordinates shared by every panel, plus the real
/// timestamps used only for final axis labeling.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SharedTimeAxis {
    x: Vec<f64>,
    real: Vec<DateTime<Utc>>,
}

impl SharedTimeAxis {
    #[must_use]
    pub fn from_clock(clock: &[DateTime<Utc>]) -> Self {
        Self {
            x: (0..clock.len()).map(|index| index as f64).collect(),
            real: clock.to_vec(),
        }
    }

    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[must_use]
    pub fn real(&self) -> &[DateTime<Utc>] {
        &self.real
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Coordinate one step past the last bar, where value tags are anchored.
    #[must_use]
    pub fn right_edge(&self) -> f64 {
        self.x.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::SharedTimeAxis;

    #[test]
    fn coordinates_stay_dense_across_calendar_gaps() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single().expect("time");
        let clock = vec![start, start + Duration::days(1), start + Duration::days(4)];
        let axis = SharedTimeAxis::from_clock(&clock);
        assert_eq!(axis.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(axis.real(), clock.as_slice());
        assert_eq!(axis.right_edge(), 3.0);
    }
}
