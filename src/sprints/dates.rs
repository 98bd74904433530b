//! Sprint date-range generation: the ordered business days (Mon-Fri) inside
//! a sprint's inclusive date range. Pure and deterministic.

use time::{Date, Weekday};

pub fn business_days(start: Date, end: Date) -> Vec<Date> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Saturday | Weekday::Sunday) {
            days.push(day);
        }
        day = match day.next_day() {
            Some(next) => next,
            None => break,
        };
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn two_week_sprint_has_ten_business_days() {
        // 2024-01-01 is a Monday.
        let days = business_days(date!(2024 - 01 - 01), date!(2024 - 01 - 14));
        assert_eq!(days.len(), 10);
        assert!(days
            .iter()
            .all(|d| !matches!(d.weekday(), Weekday::Saturday | Weekday::Sunday)));
        assert_eq!(days.first(), Some(&date!(2024 - 01 - 01)));
        assert_eq!(days.last(), Some(&date!(2024 - 01 - 12)));
    }

    #[test]
    fn output_is_ordered() {
        let days = business_days(date!(2024 - 01 - 01), date!(2024 - 02 - 11));
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn weekend_only_range_is_empty() {
        // Saturday and Sunday.
        assert!(business_days(date!(2024 - 01 - 06), date!(2024 - 01 - 07)).is_empty());
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(business_days(date!(2024 - 01 - 14), date!(2024 - 01 - 01)).is_empty());
    }

    #[test]
    fn single_weekday_range_is_that_day() {
        let days = business_days(date!(2024 - 01 - 03), date!(2024 - 01 - 03));
        assert_eq!(days, vec![date!(2024 - 01 - 03)]);
    }

    #[test]
    fn range_crossing_month_boundary_keeps_count() {
        // Mon 2024-01-29 .. Sun 2024-02-11: two full work weeks.
        let days = business_days(date!(2024 - 01 - 29), date!(2024 - 02 - 11));
        assert_eq!(days.len(), 10);
    }
}
