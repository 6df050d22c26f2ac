// 🗺️ Dashboard View - the data every chart consumes for one set of criteria
// Map, time series, top destinations, age histogram, gender pie, rating
// distribution and the raw table all come from the same filtered snapshot.

use crate::aggregate::{
    group_counts, histogram, top_n_by_destination, CategoryCount, CategoryField,
    DestinationTotal, HistogramBin, Kpis, NumericField,
};
use crate::filter::{apply, FilterCriteria};
use crate::record::Record;
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    /// Bars in the destination ranking
    pub top_n: usize,

    /// Bins in the age histogram
    pub age_bins: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            top_n: 10,
            age_bins: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub destination: String,
    pub latitude: f64,
    pub longitude: f64,
    pub bookings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub bookings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub criteria: FilterCriteria,
    pub record_count: usize,
    pub kpis: Kpis,
    pub geo_points: Vec<GeoPoint>,
    pub bookings_over_time: Vec<TimePoint>,
    pub top_destinations: Vec<DestinationTotal>,
    pub age_histogram: Vec<HistogramBin>,
    pub gender_split: Vec<CategoryCount>,
    pub rating_distribution: Vec<CategoryCount>,
    pub records: Vec<Record>,
}

impl DashboardView {
    /// Filter the base records and compute every chart's input
    pub fn build(records: &[Record], criteria: &FilterCriteria, options: &ViewOptions) -> Self {
        let filtered = apply(records, criteria);

        if filtered.is_empty() && !records.is_empty() {
            warn!("Filter criteria excluded all {} records", records.len());
        }

        DashboardView::from_filtered(criteria.clone(), filtered, options)
    }

    /// Compute the view from records that are already filtered
    pub fn from_filtered(
        criteria: FilterCriteria,
        filtered: Vec<Record>,
        options: &ViewOptions,
    ) -> Self {
        let geo_points = filtered
            .iter()
            .map(|r| GeoPoint {
                destination: r.destination.clone(),
                latitude: r.latitude,
                longitude: r.longitude,
                bookings: r.bookings,
            })
            .collect();

        let bookings_over_time = filtered
            .iter()
            .map(|r| TimePoint {
                date: r.booking_date,
                bookings: r.bookings,
            })
            .collect();

        DashboardView {
            criteria,
            record_count: filtered.len(),
            kpis: Kpis::compute(&filtered),
            geo_points,
            bookings_over_time,
            top_destinations: top_n_by_destination(&filtered, NumericField::Bookings, options.top_n),
            age_histogram: histogram(&filtered, NumericField::Age, options.age_bins),
            gender_split: group_counts(&filtered, CategoryField::Gender),
            rating_distribution: group_counts(&filtered, CategoryField::Rating),
            records: filtered,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_embedded;

    #[test]
    fn test_full_view_over_embedded_table() {
        let records = load_embedded().unwrap();
        let view = DashboardView::build(&records, &FilterCriteria::all(), &ViewOptions::default());

        assert_eq!(view.record_count, 10);
        assert_eq!(view.kpis.total_bookings, 1160);
        assert_eq!(view.kpis.total_revenue, 1160 * 350);
        assert_eq!(view.geo_points.len(), 10);
        assert_eq!(view.top_destinations[0].destination, "Mumbai");
        assert_eq!(view.top_destinations.len(), 10);
        assert_eq!(
            view.age_histogram.iter().map(|b| b.count).sum::<usize>(),
            10
        );
        assert_eq!(view.gender_split[0].count, 5);
        assert_eq!(view.gender_split[1].count, 5);
    }

    #[test]
    fn test_time_series_follows_booking_dates() {
        let records = load_embedded().unwrap();
        let view = DashboardView::build(&records, &FilterCriteria::all(), &ViewOptions::default());

        for pair in view.bookings_over_time.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        assert_eq!(view.bookings_over_time[1].bookings, 200);
    }

    #[test]
    fn test_top_n_respects_options() {
        let records = load_embedded().unwrap();
        let options = ViewOptions {
            top_n: 3,
            age_bins: 5,
        };
        let view = DashboardView::build(&records, &FilterCriteria::all(), &options);

        let top: Vec<&str> = view
            .top_destinations
            .iter()
            .map(|t| t.destination.as_str())
            .collect();
        assert_eq!(top, vec!["Mumbai", "Goa", "Delhi"]);
        assert_eq!(view.age_histogram.len(), 5);
    }

    #[test]
    fn test_empty_selection() {
        let records = load_embedded().unwrap();
        let criteria = FilterCriteria::all().with_destinations(["Atlantis"]);
        let view = DashboardView::build(&records, &criteria, &ViewOptions::default());

        assert!(view.is_empty());
        assert_eq!(view.kpis.average_rating, None);
        assert!(view.top_destinations.is_empty());
        assert!(view.age_histogram.is_empty());
        assert!(view.gender_split.is_empty());
    }
}
