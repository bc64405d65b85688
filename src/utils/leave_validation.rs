use chrono::{Datelike, NaiveDate};

/// Orders a pair of dates so the earlier one comes first
#[inline]
fn ordered(a: NaiveDate, b: NaiveDate) -> (NaiveDate, NaiveDate) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Counts the days in the inclusive range that are not Saturday or Sunday.
///
/// A reversed range is counted from the earlier date to the later one, so the
/// result never goes negative. Whole weeks contribute five days each; only the
/// trailing partial week is looked at day by day.
pub fn business_days(from: NaiveDate, to: NaiveDate) -> i64 {
    let (start, end) = ordered(from, to);

    let days = end.signed_duration_since(start).num_days() + 1;
    let first = i64::from(start.weekday().num_days_from_monday());
    let partial = (0..days % 7)
        .filter(|offset| (first + offset) % 7 < 5)
        .count() as i64;

    days / 7 * 5 + partial
}

/// true if the two inclusive ranges share at least one calendar day
pub fn overlaps(
    start_a: NaiveDate,
    end_a: NaiveDate,
    start_b: NaiveDate,
    end_b: NaiveDate,
) -> bool {
    let (start_a, end_a) = ordered(start_a, end_a);
    let (start_b, end_b) = ordered(start_b, end_b);

    start_a <= end_b && start_b <= end_a
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use test_case::test_case;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // 2025-06-02 is a Monday
    #[test_case(d(2025, 6, 2), d(2025, 6, 2), 1 ; "single weekday")]
    #[test_case(d(2025, 6, 7), d(2025, 6, 7), 0 ; "single saturday")]
    #[test_case(d(2025, 6, 8), d(2025, 6, 8), 0 ; "single sunday")]
    #[test_case(d(2025, 6, 2), d(2025, 6, 6), 5 ; "monday to friday")]
    #[test_case(d(2025, 6, 2), d(2025, 6, 8), 5 ; "full week")]
    #[test_case(d(2025, 6, 6), d(2025, 6, 9), 2 ; "across weekend")]
    #[test_case(d(2025, 6, 7), d(2025, 6, 8), 0 ; "weekend only")]
    #[test_case(d(2025, 6, 2), d(2025, 6, 13), 10 ; "two weeks")]
    #[test_case(d(2024, 12, 30), d(2025, 1, 3), 5 ; "across new year")]
    #[test_case(d(2025, 1, 1), d(2025, 12, 31), 261 ; "whole year")]
    #[test_case(d(2025, 6, 5), d(2025, 6, 17), 9 ; "thursday to tuesday")]
    fn counts_business_days(from: NaiveDate, to: NaiveDate, expected: i64) {
        assert_eq!(business_days(from, to), expected);
    }

    #[test]
    fn reversed_range_counts_the_same_days() {
        let mon = d(2025, 6, 2);
        let fri = d(2025, 6, 6);
        assert_eq!(business_days(fri, mon), 5);
        assert_eq!(business_days(fri, mon), business_days(mon, fri));
    }

    #[test]
    fn matches_a_day_by_day_count() {
        let weekday = |day: &NaiveDate| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun);

        // every start weekday, spans up to three weeks
        for start in d(2025, 6, 2).iter_days().take(7) {
            for end in start.iter_days().take(21) {
                let walked = start.iter_days().take_while(|day| *day <= end).filter(weekday).count();
                assert_eq!(business_days(start, end), walked as i64, "{} to {}", start, end);
            }
        }
    }

    #[test]
    fn widest_range_is_counted_without_walking_it() {
        let all = business_days(NaiveDate::MIN, NaiveDate::MAX);
        let span = NaiveDate::MAX.signed_duration_since(NaiveDate::MIN).num_days() + 1;

        assert!(all > span / 7 * 5 - 5 && all <= span / 7 * 5 + 5);
        assert_eq!(business_days(NaiveDate::MAX, NaiveDate::MIN), all);
    }

    #[test_case(d(2025, 6, 1), d(2025, 6, 5), d(2025, 6, 5), d(2025, 6, 10), true ; "touching endpoints")]
    #[test_case(d(2025, 6, 1), d(2025, 6, 5), d(2025, 6, 6), d(2025, 6, 10), false ; "disjoint")]
    #[test_case(d(2025, 6, 1), d(2025, 6, 10), d(2025, 6, 3), d(2025, 6, 4), true ; "contained")]
    #[test_case(d(2025, 6, 3), d(2025, 6, 3), d(2025, 6, 3), d(2025, 6, 3), true ; "same single day")]
    #[test_case(d(2025, 6, 1), d(2025, 6, 5), d(2025, 5, 20), d(2025, 5, 31), false ; "before")]
    #[test_case(d(2025, 6, 5), d(2025, 6, 1), d(2025, 6, 3), d(2025, 6, 8), true ; "reversed bounds")]
    fn overlap_is_inclusive_and_symmetric(
        a0: NaiveDate,
        a1: NaiveDate,
        b0: NaiveDate,
        b1: NaiveDate,
        expected: bool,
    ) {
        assert_eq!(overlaps(a0, a1, b0, b1), expected);
        assert_eq!(overlaps(b0, b1, a0, a1), expected);
    }
}
