// 🧳 Booking Record - one row of the working dataset
// Base columns come from the source, synthetic columns are derived on load

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dummy revenue per booking
pub const REVENUE_PER_BOOKING: u64 = 350;

/// Youngest derived traveler age
pub const BASE_AGE: u32 = 20;

/// Span of derived ages (ages fall in BASE_AGE..BASE_AGE + AGE_SPAN)
pub const AGE_SPAN: u64 = 30;

/// Rating for an even booking count
pub const BASE_RATING: f64 = 4.0;

/// Extra rating for an odd booking count
pub const ODD_RATING_BONUS: f64 = 0.5;

/// First booking date; record `i` is booked `i` days later
pub fn booking_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

// ============================================================================
// GENDER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Alternating label by load position
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// A destination's booking statistics.
/// Field names on the wire match the dashboard's column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    // ------------------------------------------------------------------------
    // BASE FIELDS (from the source)
    // ------------------------------------------------------------------------
    #[serde(rename = "Destination")]
    pub destination: String,

    #[serde(rename = "Bookings")]
    pub bookings: u64,

    #[serde(rename = "Latitude")]
    pub latitude: f64,

    #[serde(rename = "Longitude")]
    pub longitude: f64,

    // ------------------------------------------------------------------------
    // DERIVED FIELDS (pure functions of bookings and load position)
    // ------------------------------------------------------------------------
    #[serde(rename = "Revenue")]
    pub revenue: u64,

    #[serde(rename = "Rating")]
    pub rating: f64,

    #[serde(rename = "Booking_Date")]
    pub booking_date: NaiveDate,

    #[serde(rename = "Age")]
    pub age: u32,

    #[serde(rename = "Gender")]
    pub gender: Gender,
}

impl Record {
    /// Build a record from its base fields and its position in the dataset.
    ///
    /// Derivation order: revenue, rating, booking date, age, gender.
    pub fn derive(
        destination: impl Into<String>,
        bookings: u64,
        latitude: f64,
        longitude: f64,
        index: usize,
    ) -> Result<Self> {
        let revenue = bookings
            .checked_mul(REVENUE_PER_BOOKING)
            .with_context(|| format!("Revenue overflow for {} bookings", bookings))?;

        let rating = if bookings % 2 == 0 {
            BASE_RATING
        } else {
            BASE_RATING + ODD_RATING_BONUS
        };

        let booking_date = booking_epoch()
            .checked_add_days(Days::new(index as u64))
            .with_context(|| format!("Booking date out of range for record {}", index))?;

        let age = BASE_AGE + (bookings % AGE_SPAN) as u32;

        Ok(Record {
            destination: destination.into(),
            bookings,
            latitude,
            longitude,
            revenue,
            rating,
            booking_date,
            age,
            gender: Gender::for_index(index),
        })
    }
}

/// Derive a full record set from (destination, bookings, latitude, longitude)
/// rows, numbering them in iteration order.
pub fn derive_records<I, S>(rows: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = (S, u64, f64, f64)>,
    S: Into<String>,
{
    rows.into_iter()
        .enumerate()
        .map(|(index, (destination, bookings, lat, lon))| {
            Record::derive(destination, bookings, lat, lon, index)
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_fields_first_record() {
        let record = Record::derive("DEL", 150, 28.61, 77.21, 0).unwrap();

        assert_eq!(record.revenue, 52_500);
        assert_eq!(record.rating, 4.0);
        assert_eq!(record.age, 20);
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.booking_date, booking_epoch());
    }

    #[test]
    fn test_odd_bookings_get_higher_rating() {
        let record = Record::derive("GOA", 175, 15.3, 74.1, 1).unwrap();

        assert_eq!(record.rating, 4.5);
        assert_eq!(record.age, 45);
        assert_eq!(record.gender, Gender::Female);
    }

    #[test]
    fn test_age_wraps_every_thirty_bookings() {
        let a = Record::derive("A", 29, 0.0, 0.0, 0).unwrap();
        let b = Record::derive("B", 30, 0.0, 0.0, 0).unwrap();

        assert_eq!(a.age, 49);
        assert_eq!(b.age, 20);
    }

    #[test]
    fn test_booking_dates_advance_one_day_per_record() {
        let records = derive_records(vec![
            ("A", 1, 0.0, 0.0),
            ("B", 2, 0.0, 0.0),
            ("C", 3, 0.0, 0.0),
        ])
        .unwrap();

        for pair in records.windows(2) {
            let gap = pair[1].booking_date - pair[0].booking_date;
            assert_eq!(gap.num_days(), 1);
        }
        assert_eq!(
            records[2].booking_date,
            NaiveDate::from_ymd_opt(2023, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let first = Record::derive("X", 1234, 1.0, 2.0, 7).unwrap();
        let second = Record::derive("X", 1234, 1.0, 2.0, 7).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_revenue_overflow_is_an_error() {
        assert!(Record::derive("X", u64::MAX, 0.0, 0.0, 0).is_err());
    }

    #[test]
    fn test_gender_display() {
        assert_eq!(Gender::Male.to_string(), "Male");
        assert_eq!(Gender::for_index(3).to_string(), "Female");
    }
}
