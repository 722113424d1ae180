//! Multi-month projections and history built on top of the monthly cache.

use serde::Serialize;
use tracing::debug;

use fintrack_domain::{FinanceState, MonthKey, MonthlyData};

use crate::summary_service::{SteadyState, SummaryService};

/// Which months, relative to an anchor month, a projection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionRange {
    /// `n` months starting at the anchor.
    Forward(u32),
    /// `n` months ending at the anchor.
    Backward(u32),
    /// `before` months before the anchor, the anchor, then `after` months after it.
    Around { before: u32, after: u32 },
}

impl ProjectionRange {
    /// Month keys covered by the range, oldest first.
    ///
    /// Months outside `0000-01..=9999-12` are dropped.
    pub fn months(self, anchor: MonthKey) -> Vec<MonthKey> {
        let (first, last) = match self {
            ProjectionRange::Forward(count) => (0, i64::from(count) - 1),
            ProjectionRange::Backward(count) => (1 - i64::from(count), 0),
            ProjectionRange::Around { before, after } => (-i64::from(before), i64::from(after)),
        };
        let first = first.max(i64::from(anchor.months_until(MonthKey::MIN)));
        let last = last.min(i64::from(anchor.months_until(MonthKey::MAX)));
        (first..=last)
            .filter_map(|offset| i32::try_from(offset).ok())
            .map(|offset| anchor.shift(offset))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectionOrder {
    #[default]
    Chronological,
    ReverseChronological,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    /// Taken from the monthly cache.
    Recorded,
    /// Built from steady-state monthly equivalents.
    Synthesized,
    /// No data for the month; all figures are zero.
    Empty,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionEntry {
    pub data: MonthlyData,
    pub source: EntrySource,
}

impl ProjectionEntry {
    pub fn month(&self) -> MonthKey {
        self.data.month()
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CumulativePoint {
    pub month: MonthKey,
    pub savings: f64,
    pub cumulative: f64,
}

pub struct ForecastService;

impl ForecastService {
    /// Projects `range` around `anchor`.
    ///
    /// Months present in the cache are reported as recorded. Every other month
    /// gets the steady-state figures of the current records, with zero actuals.
    pub fn projection(
        state: &FinanceState,
        anchor: MonthKey,
        range: ProjectionRange,
        order: ProjectionOrder,
    ) -> Vec<ProjectionEntry> {
        let steady = SummaryService::steady_state(state);
        let mut synthesized = 0usize;
        let entries: Vec<ProjectionEntry> = range
            .months(anchor)
            .into_iter()
            .map(|month| match state.monthly_data_for(month) {
                Some(recorded) => ProjectionEntry {
                    data: recorded.clone(),
                    source: EntrySource::Recorded,
                },
                None => {
                    synthesized += 1;
                    Self::synthesize(month, steady)
                }
            })
            .collect();
        debug!(%anchor, months = entries.len(), synthesized, "built projection");
        Self::ordered(entries, order)
    }

    /// Past view of `months` months ending at `anchor`. Missing months are zero-filled.
    pub fn history(
        state: &FinanceState,
        anchor: MonthKey,
        months: u32,
        order: ProjectionOrder,
    ) -> Vec<ProjectionEntry> {
        let entries = ProjectionRange::Backward(months)
            .months(anchor)
            .into_iter()
            .map(|month| match state.monthly_data_for(month) {
                Some(recorded) => ProjectionEntry {
                    data: recorded.clone(),
                    source: EntrySource::Recorded,
                },
                None => ProjectionEntry {
                    data: MonthlyData::empty(month),
                    source: EntrySource::Empty,
                },
            })
            .collect();
        Self::ordered(entries, order)
    }

    /// Running total of projected savings, accumulated from the oldest month and
    /// returned in `order`.
    pub fn cumulative_savings(
        entries: &[ProjectionEntry],
        order: ProjectionOrder,
    ) -> Vec<CumulativePoint> {
        let mut oldest_first: Vec<&ProjectionEntry> = entries.iter().collect();
        oldest_first.sort_by_key(|entry| entry.month());
        let savings: Vec<f64> = oldest_first
            .iter()
            .map(|entry| entry.data.projected_savings())
            .collect();
        let mut points: Vec<CumulativePoint> = oldest_first
            .iter()
            .zip(running_totals(&savings))
            .map(|(entry, cumulative)| CumulativePoint {
                month: entry.month(),
                savings: entry.data.projected_savings(),
                cumulative,
            })
            .collect();
        if order == ProjectionOrder::ReverseChronological {
            points.reverse();
        }
        points
    }

    fn synthesize(month: MonthKey, steady: SteadyState) -> ProjectionEntry {
        ProjectionEntry {
            data: MonthlyData::with_actuals(month, steady.income, steady.expenses, 0.0, 0.0),
            source: EntrySource::Synthesized,
        }
    }

    fn ordered(mut entries: Vec<ProjectionEntry>, order: ProjectionOrder) -> Vec<ProjectionEntry> {
        if order == ProjectionOrder::ReverseChronological {
            entries.reverse();
        }
        entries
    }
}

/// Prefix sums of `values`.
pub fn running_totals(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |total, value| {
            *total += value;
            Some(*total)
        })
        .collect()
}
