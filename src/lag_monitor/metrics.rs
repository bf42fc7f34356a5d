use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

/// Aggregated lag of a Consumer over all the Partitions of a Topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LagMetrics {
    /// Sum of the lag of every Partition.
    pub total_lag: i64,

    /// Number of Partitions of the Topic, `0` if those could not be determined.
    pub partition_count: usize,
}

impl LagMetrics {
    /// Value of [`LastCalculatedMetrics`] before any metrics cycle completes.
    pub const NOT_CALCULATED: LagMetrics = LagMetrics::new(-1, 0);

    /// Result of a metrics cycle that could not determine the lag.
    pub const DEGRADED: LagMetrics = LagMetrics::new(0, 0);

    pub const fn new(total_lag: i64, partition_count: usize) -> Self {
        Self {
            total_lag,
            partition_count,
        }
    }
}

#[derive(Debug)]
struct Calculated {
    metrics: LagMetrics,
    at: Option<DateTime<Utc>>,
}

/// Read-only view over the [`LagMetrics`] produced by the latest metrics cycle.
///
/// Cheap to clone: all clones observe the same value.
#[derive(Debug, Clone)]
pub struct LastCalculatedMetrics {
    inner: Arc<RwLock<Calculated>>,
}

impl Default for LastCalculatedMetrics {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Calculated {
                metrics: LagMetrics::NOT_CALCULATED,
                at: None,
            })),
        }
    }
}

impl LastCalculatedMetrics {
    /// Latest [`LagMetrics`], or [`LagMetrics::NOT_CALCULATED`] if no cycle completed yet.
    pub fn get(&self) -> LagMetrics {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).metrics
    }

    /// When the latest cycle completed, if any did.
    pub fn calculated_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).at
    }

    pub(super) fn set(&self, metrics: LagMetrics, at: DateTime<Utc>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Calculated {
            metrics,
            at: Some(at),
        };
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn not_calculated_until_set() {
        let last = LastCalculatedMetrics::default();
        let view = last.clone();
        assert_eq!(view.get(), LagMetrics::new(-1, 0));
        assert_eq!(view.calculated_at(), None);

        let now = Utc::now();
        last.set(LagMetrics::new(70, 2), now);
        assert_eq!(view.get(), LagMetrics::new(70, 2));
        assert_eq!(view.calculated_at(), Some(now));

        last.set(LagMetrics::DEGRADED, now);
        assert_eq!(view.get(), LagMetrics::new(0, 0));
    }
}
