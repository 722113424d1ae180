//! Conversion of per-period amounts into monthly equivalents.

use fintrack_domain::{Frequency, MonthKey, Scheduled};

use crate::recurrence_service::RecurrenceService;

/// Average number of weeks in a calendar month.
pub const WEEKS_PER_MONTH: f64 = 4.33;
/// Average number of two-week periods in a calendar month.
pub const BIWEEKS_PER_MONTH: f64 = 2.17;
/// Approximate number of days in a calendar month.
pub const DAYS_PER_MONTH: f64 = 30.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Normalizes amounts recorded at different cadences to a per-month figure.
pub struct FrequencyService;

impl FrequencyService {
    /// Steady-state monthly contribution of `amount` paid at `frequency`.
    ///
    /// One-time amounts contribute nothing to a steady-state rate. Unrecognized
    /// frequencies pass the raw amount through unchanged.
    pub fn monthly_equivalent(amount: f64, frequency: &Frequency) -> f64 {
        match frequency {
            Frequency::Monthly => amount,
            Frequency::Weekly => amount * WEEKS_PER_MONTH,
            Frequency::Biweekly => amount * BIWEEKS_PER_MONTH,
            Frequency::Yearly => amount / MONTHS_PER_YEAR,
            Frequency::Daily => amount * DAYS_PER_MONTH,
            Frequency::OneTime => 0.0,
            Frequency::Other(_) => amount,
        }
    }

    pub fn record_monthly_equivalent<R: Scheduled>(record: &R) -> f64 {
        Self::monthly_equivalent(record.amount(), record.frequency())
    }

    /// What `record` contributes to `month`: the full amount of a one-time record
    /// occurring that month, the monthly equivalent of an active recurring record,
    /// and zero otherwise.
    pub fn month_actual<R: Scheduled>(record: &R, month: MonthKey) -> f64 {
        if !RecurrenceService::is_active(record, month) {
            return 0.0;
        }
        if record.frequency().is_one_time() {
            record.amount()
        } else {
            Self::record_monthly_equivalent(record)
        }
    }
}
