use proptest::prelude::*;
use sales_forecast::domain::YearMonth;
use sales_forecast::forecast::future_periods;

proptest! {
    #[test]
    fn future_periods_are_consecutive_months(
        year in 1990i32..2100,
        month in 1u32..=12,
        horizon in 1usize..=60,
    ) {
        let last = YearMonth::new(year, month).unwrap();
        let periods = future_periods(last, horizon);

        prop_assert_eq!(periods.len(), horizon);
        prop_assert_eq!(periods[0], last.next());
        prop_assert_eq!(periods[0].ordinal(), last.ordinal() + 1);
        for w in periods.windows(2) {
            prop_assert!(w[0] < w[1]);
            prop_assert_eq!(w[1].ordinal() - w[0].ordinal(), 1);
        }
        for p in &periods {
            prop_assert!((1..=12).contains(&p.month()));
        }
    }

    #[test]
    fn year_advances_only_after_december(
        year in 1990i32..2100,
        month in 1u32..=12,
        horizon in 1usize..=60,
    ) {
        let last = YearMonth::new(year, month).unwrap();
        let mut prev = last;
        for p in future_periods(last, horizon) {
            if prev.month() == 12 {
                prop_assert_eq!((p.year(), p.month()), (prev.year() + 1, 1));
            } else {
                prop_assert_eq!((p.year(), p.month()), (prev.year(), prev.month() + 1));
            }
            prev = p;
        }
    }
}
