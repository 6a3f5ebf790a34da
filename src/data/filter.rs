use super::model::{Detection, FilterCriteria};

// ---------------------------------------------------------------------------
// Date filter
// ---------------------------------------------------------------------------

/// Return the detections whose acquisition date passes `criteria`.
///
/// * `Exact(d)` keeps rows dated `d`.
/// * `Range { start, end }` keeps rows with `start <= date <= end`.
///
/// An empty result is a normal outcome. Source order is preserved.
pub fn filter_by_date<'a>(
    detections: &'a [Detection],
    criteria: &FilterCriteria,
) -> Vec<&'a Detection> {
    detections
        .iter()
        .filter(|d| criteria.matches(d.acq_date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{date, dated};

    fn sample() -> Vec<Detection> {
        vec![
            dated(2025, 4, 9),
            dated(2025, 4, 10),
            dated(2025, 4, 10),
            dated(2025, 4, 11),
        ]
    }

    #[test]
    fn exact_keeps_only_that_day() {
        let rows = sample();
        let hits = filter_by_date(&rows, &FilterCriteria::exact(date(2025, 4, 10)));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|d| d.acq_date == date(2025, 4, 10)));
    }

    #[test]
    fn range_is_inclusive() {
        let rows = sample();
        let criteria = FilterCriteria::range(date(2025, 4, 10), date(2025, 4, 11)).unwrap();
        let hits = filter_by_date(&rows, &criteria);
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn single_day_range_equals_exact() {
        let rows = sample();
        for day in 8..=12 {
            let d = date(2025, 4, day);
            let exact = filter_by_date(&rows, &FilterCriteria::exact(d));
            let range = filter_by_date(&rows, &FilterCriteria::range(d, d).unwrap());
            assert_eq!(exact, range, "day {d}");
        }
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let rows = sample();
        assert!(filter_by_date(&rows, &FilterCriteria::exact(date(2024, 1, 1))).is_empty());
        assert!(filter_by_date(&[], &FilterCriteria::exact(date(2025, 4, 10))).is_empty());
    }
}
