//! Decides whether a record contributes to a given month.

use fintrack_domain::{MonthKey, Scheduled};

/// Temporal filter shared by income sources and expenses.
pub struct RecurrenceService;

impl RecurrenceService {
    /// Returns `true` when `record` is active in `month`.
    ///
    /// A month pin wins over everything else. One-time records match only the
    /// month of their occurrence date. Recurring records are active from their
    /// start month onward, or always when no start month is set. Start months
    /// are `YYYY-MM` only. Dates that do not parse never match.
    pub fn is_active<R: Scheduled>(record: &R, month: MonthKey) -> bool {
        if let Some(pin) = record.pinned_month() {
            return MonthKey::parse(pin).map_or(false, |pinned| pinned == month);
        }

        if record.frequency().is_one_time() {
            return record
                .occurrence_date()
                .and_then(|date| MonthKey::from_date_prefix(date).ok())
                .map_or(false, |occurs| occurs == month);
        }

        match record.start_month() {
            None => true,
            Some(raw) => MonthKey::parse(raw).map_or(false, |start| start <= month),
        }
    }

    /// Iterates over the records of `records` that are active in `month`.
    pub fn active_in<'a, R: Scheduled + 'a>(
        records: &'a [R],
        month: MonthKey,
    ) -> impl Iterator<Item = &'a R> + 'a {
        records
            .iter()
            .filter(move |record| Self::is_active(*record, month))
    }
}
