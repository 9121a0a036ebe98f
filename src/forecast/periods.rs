//! Future period generation with month/year rollover.

use crate::domain::YearMonth;

/// The `horizon` periods following `last`, in chronological order.
///
/// Period `i` (1-based) is `last.plus_months(i)`, so December rolls into
/// January of the next year and horizons longer than a year keep counting.
pub fn future_periods(last: YearMonth, horizon: usize) -> Vec<YearMonth> {
    (1..=horizon as u32).map(|i| last.plus_months(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn november_rolls_into_next_year() {
        assert_eq!(
            future_periods(ym(2023, 11), 3),
            vec![ym(2023, 12), ym(2024, 1), ym(2024, 2)]
        );
    }

    #[test]
    fn december_rolls_to_january() {
        assert_eq!(future_periods(ym(2023, 12), 1), vec![ym(2024, 1)]);
    }

    #[test]
    fn horizon_of_a_year_from_december() {
        let periods = future_periods(ym(2023, 12), 12);
        assert_eq!(periods.first(), Some(&ym(2024, 1)));
        assert_eq!(periods.last(), Some(&ym(2024, 12)));
    }

    #[test]
    fn multi_year_horizon_lands_on_expected_month() {
        // 30 months after 2023-05 is 2025-11.
        let periods = future_periods(ym(2023, 5), 30);
        assert_eq!(periods.len(), 30);
        assert_eq!(periods[29], ym(2025, 11));
        assert_eq!(periods[7], ym(2024, 1));
    }

    #[test]
    fn zero_horizon_is_empty() {
        assert!(future_periods(ym(2023, 5), 0).is_empty());
    }
}
