// 🔎 Filter Evaluator - keep records that satisfy every supplied predicate
// Absent criteria match everything; output preserves input order

use crate::record::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

// ============================================================================
// RANGES
// ============================================================================

/// Inclusive age range. An inverted range (min > max) matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub const ALL: AgeRange = AgeRange {
        min: 0,
        max: u32::MAX,
    };

    pub fn new(min: u32, max: u32) -> Self {
        AgeRange { min, max }
    }

    pub fn contains(&self, age: u32) -> bool {
        self.min <= age && age <= self.max
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        AgeRange::ALL
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ============================================================================
// FILTER CRITERIA
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Destinations to keep (empty = all)
    #[serde(default)]
    pub destinations: BTreeSet<String>,

    #[serde(default)]
    pub age_range: AgeRange,

    #[serde(default)]
    pub date_range: Option<DateRange>,

    /// Inclusive lower bound on rating
    #[serde(default)]
    pub min_rating: Option<f64>,
}

impl FilterCriteria {
    /// Criteria that match every record
    pub fn all() -> Self {
        FilterCriteria::default()
    }

    pub fn with_destinations<I, S>(mut self, destinations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.destinations = destinations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_age_range(mut self, min: u32, max: u32) -> Self {
        self.age_range = AgeRange::new(min, max);
        self
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    /// Toggle one destination in the inclusion set
    pub fn toggle_destination(&mut self, destination: &str) {
        if !self.destinations.remove(destination) {
            self.destinations.insert(destination.to_string());
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        if !self.destinations.is_empty() && !self.destinations.contains(&record.destination) {
            return false;
        }

        if !self.age_range.contains(record.age) {
            return false;
        }

        if let Some(range) = &self.date_range {
            if !range.contains(record.booking_date) {
                return false;
            }
        }

        // A NaN bound matches nothing
        if let Some(min_rating) = self.min_rating {
            if min_rating.is_nan() || record.rating < min_rating {
                return false;
            }
        }

        true
    }
}

/// Apply criteria to a record set. Pure; keeps input order.
pub fn apply(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

// ============================================================================
// QUERY PARAMETERS
// ============================================================================

/// Flat, string-friendly form of the criteria (HTTP query strings, CLI flags).
///
/// `destinations` is a comma separated list. A date range with only one end
/// given is open on the other side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaParams {
    pub destinations: Option<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub min_rating: Option<f64>,
}

impl From<CriteriaParams> for FilterCriteria {
    fn from(params: CriteriaParams) -> Self {
        let destinations = params
            .destinations
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();

        let age_range = AgeRange::new(
            params.min_age.unwrap_or(AgeRange::ALL.min),
            params.max_age.unwrap_or(AgeRange::ALL.max),
        );

        let date_range = match (params.start, params.end) {
            (None, None) => None,
            (start, end) => Some(DateRange::new(
                start.unwrap_or(NaiveDate::MIN),
                end.unwrap_or(NaiveDate::MAX),
            )),
        };

        FilterCriteria {
            destinations,
            age_range,
            date_range,
            min_rating: params.min_rating,
        }
    }
}

// ============================================================================
// WIDGET BOUNDS
// ============================================================================

/// Distinct destinations in first-occurrence order
pub fn destinations(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.destination.as_str()))
        .map(|r| r.destination.clone())
        .collect()
}

/// Smallest and largest age present (None for an empty set)
pub fn age_bounds(records: &[Record]) -> Option<AgeRange> {
    let min = records.iter().map(|r| r.age).min()?;
    let max = records.iter().map(|r| r.age).max()?;
    Some(AgeRange::new(min, max))
}

/// Earliest and latest booking date present (None for an empty set)
pub fn date_bounds(records: &[Record]) -> Option<DateRange> {
    let start = records.iter().map(|r| r.booking_date).min()?;
    let end = records.iter().map(|r| r.booking_date).max()?;
    Some(DateRange::new(start, end))
}

// ============================================================================
// TESTS
// ============================================================================
