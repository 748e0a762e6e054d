//! Next-occurrence projection.

use chrono::{DateTime, Months, Utc};

use super::error::ScheduleError;
use super::types::Repetition;

/// Schedule service for business logic.
pub struct ScheduleService;

impl ScheduleService {
    /// Returns true if an item scheduled at `repeat_at` should run at `now`.
    #[must_use]
    pub fn is_due(repeat_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        repeat_at <= now
    }

    /// The occurrence after `repeat_at`.
    ///
    /// Calendar months are added with day clamping, so Jan 31 monthly
    /// becomes Feb 28 (or 29).
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::DateOutOfRange` past chrono's maximum date.
    pub fn next_occurrence(
        repeat_at: DateTime<Utc>,
        repetition: Repetition,
    ) -> Result<DateTime<Utc>, ScheduleError> {
        repeat_at
            .checked_add_months(Months::new(repetition.months()))
            .ok_or(ScheduleError::DateOutOfRange(repeat_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    #[rstest]
    #[case(Repetition::Monthly, date(2024, 1, 15), date(2024, 2, 15))]
    #[case(Repetition::Quarterly, date(2024, 1, 15), date(2024, 4, 15))]
    #[case(Repetition::SemiAnnually, date(2024, 1, 15), date(2024, 7, 15))]
    #[case(Repetition::Annually, date(2024, 1, 15), date(2025, 1, 15))]
    #[case(Repetition::Monthly, date(2024, 1, 31), date(2024, 2, 29))]
    #[case(Repetition::Monthly, date(2023, 1, 31), date(2023, 2, 28))]
    #[case(Repetition::Annually, date(2024, 2, 29), date(2025, 2, 28))]
    #[case(Repetition::Monthly, date(2024, 12, 10), date(2025, 1, 10))]
    fn test_next_occurrence(
        #[case] repetition: Repetition,
        #[case] from: DateTime<Utc>,
        #[case] expected: DateTime<Utc>,
    ) {
        assert_eq!(
            ScheduleService::next_occurrence(from, repetition).unwrap(),
            expected
        );
    }

    #[test]
    fn test_next_occurrence_keeps_time_of_day() {
        let from = Utc.with_ymd_and_hms(2024, 3, 5, 23, 45, 10).unwrap();
        let next = ScheduleService::next_occurrence(from, Repetition::Monthly).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 4, 5, 23, 45, 10).unwrap());
    }

    #[test]
    fn test_next_occurrence_out_of_range() {
        let result = ScheduleService::next_occurrence(DateTime::<Utc>::MAX_UTC, Repetition::Monthly);
        assert!(matches!(result, Err(ScheduleError::DateOutOfRange(_))));
    }

    #[test]
    fn test_is_due() {
        let now = date(2024, 1, 15);
        assert!(ScheduleService::is_due(date(2024, 1, 15), now));
        assert!(ScheduleService::is_due(date(2023, 12, 1), now));
        assert!(!ScheduleService::is_due(date(2024, 1, 16), now));
    }

    #[rstest]
    #[case("monthly", Repetition::Monthly)]
    #[case("3 months", Repetition::Quarterly)]
    #[case("6 months", Repetition::SemiAnnually)]
    #[case("annually", Repetition::Annually)]
    fn test_repetition_round_trips_through_str(#[case] raw: &str, #[case] expected: Repetition) {
        let parsed: Repetition = raw.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
    }

    #[test]
    fn test_unknown_repetition() {
        assert_eq!(
            "weekly".parse::<Repetition>(),
            Err(ScheduleError::UnknownRepetition("weekly".to_string()))
        );
    }
}
