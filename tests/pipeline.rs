// End-to-end: embedded table -> filter -> aggregation -> export

use chrono::NaiveDate;
use tour_dashboard::{
    apply, load, mean, to_csv_string, top_n_by_destination, total, DashboardView, DatasetCache,
    DatasetSource, FilterCriteria, NumericField, Record, ViewOptions,
};

fn embedded() -> Vec<Record> {
    load(&DatasetSource::Embedded).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A spread of criteria combinations used by the property checks
fn criteria_grid() -> Vec<FilterCriteria> {
    vec![
        FilterCriteria::all(),
        FilterCriteria::all().with_age_range(20, 50).with_min_rating(4.0),
        FilterCriteria::all().with_age_range(25, 44),
        FilterCriteria::all().with_destinations(["Goa", "Agra", "Manali"]),
        FilterCriteria::all().with_min_rating(4.5),
        FilterCriteria::all().with_date_range(date(2023, 1, 3), date(2023, 1, 7)),
        FilterCriteria::all()
            .with_destinations(["Goa", "Delhi", "Varanasi", "Udaipur"])
            .with_age_range(21, 49)
            .with_date_range(date(2023, 1, 1), date(2023, 1, 9))
            .with_min_rating(4.5),
    ]
}

fn brute_force(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    records
        .iter()
        .filter(|r| {
            (criteria.destinations.is_empty() || criteria.destinations.contains(&r.destination))
                && r.age >= criteria.age_range.min
                && r.age <= criteria.age_range.max
                && criteria
                    .date_range
                    .map_or(true, |d| r.booking_date >= d.start && r.booking_date <= d.end)
                && criteria.min_rating.map_or(true, |m| r.rating >= m)
        })
        .cloned()
        .collect()
}

#[test]
fn test_filter_is_a_conjunction_of_predicates() {
    let records = embedded();

    for criteria in criteria_grid() {
        assert_eq!(apply(&records, &criteria), brute_force(&records, &criteria));
    }
}

#[test]
fn test_dropping_a_criterion_never_shrinks_the_result() {
    let records = embedded();

    for criteria in criteria_grid() {
        let size = apply(&records, &criteria).len();

        let mut relaxed = criteria.clone();
        relaxed.destinations.clear();
        assert!(apply(&records, &relaxed).len() >= size);

        let mut relaxed = criteria.clone();
        relaxed.age_range = Default::default();
        assert!(apply(&records, &relaxed).len() >= size);

        let mut relaxed = criteria.clone();
        relaxed.date_range = None;
        assert!(apply(&records, &relaxed).len() >= size);

        let mut relaxed = criteria.clone();
        relaxed.min_rating = None;
        assert!(apply(&records, &relaxed).len() >= size);
    }
}

#[test]
fn test_filter_is_idempotent() {
    let records = embedded();

    for criteria in criteria_grid() {
        let once = apply(&records, &criteria);
        let twice = apply(&once, &criteria);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_embedded_scenario() {
    let records = embedded();
    let criteria = FilterCriteria::all().with_age_range(20, 50).with_min_rating(4.0);

    let filtered = apply(&records, &criteria);

    let expected: Vec<&Record> = records
        .iter()
        .filter(|r| (20..=50).contains(&r.age) && r.rating >= 4.0)
        .collect();
    assert_eq!(filtered.iter().collect::<Vec<_>>(), expected);

    let expected_total: u64 = expected.iter().map(|r| r.bookings).sum();
    assert_eq!(total(&filtered, NumericField::Bookings), expected_total as f64);
    assert_eq!(expected_total, 1160);
}

#[test]
fn test_stricter_scenario_keeps_load_order() {
    let records = embedded();
    let criteria = FilterCriteria::all().with_age_range(25, 50).with_min_rating(4.5);

    let names: Vec<String> = apply(&records, &criteria)
        .into_iter()
        .map(|r| r.destination)
        .collect();

    assert_eq!(names, vec!["Goa", "Varanasi", "Udaipur", "Rishikesh"]);
}

#[test]
fn test_everything_filtered_out() {
    let records = embedded();
    let criteria = FilterCriteria::all().with_age_range(60, 70);

    let filtered = apply(&records, &criteria);

    assert!(filtered.is_empty());
    assert_eq!(total(&filtered, NumericField::Revenue), 0.0);
    assert_eq!(mean(&filtered, NumericField::Rating), None);
    assert!(top_n_by_destination(&filtered, NumericField::Bookings, 10).is_empty());

    let view = DashboardView::build(&records, &criteria, &ViewOptions::default());
    assert_eq!(view.kpis.rating_display(), "n/a");
}

#[test]
fn test_cache_then_view_then_export() {
    let cache = DatasetCache::new(DatasetSource::Embedded);
    let records = cache.get().unwrap();
    let criteria = FilterCriteria::all().with_destinations(["Goa", "Delhi"]);

    let view = DashboardView::build(&records, &criteria, &ViewOptions::default());
    let csv_text = to_csv_string(&view.records).unwrap();

    assert_eq!(view.record_count, 2);
    assert_eq!(view.top_destinations[0].destination, "Goa");
    assert_eq!(csv_text.lines().count(), 3);
    assert!(csv_text.contains("Goa,175,"));
}
