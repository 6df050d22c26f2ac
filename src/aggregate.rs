// 📊 Aggregation Functions - sums, means, grouped totals, histograms, KPIs
// All functions are pure and accept an empty record set without panicking

use crate::record::Record;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// FIELD SELECTORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Bookings,
    Revenue,
    Rating,
    Age,
    Latitude,
    Longitude,
}

impl NumericField {
    pub fn value(self, record: &Record) -> f64 {
        match self {
            NumericField::Bookings => record.bookings as f64,
            NumericField::Revenue => record.revenue as f64,
            NumericField::Rating => record.rating,
            NumericField::Age => record.age as f64,
            NumericField::Latitude => record.latitude,
            NumericField::Longitude => record.longitude,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NumericField::Bookings => "bookings",
            NumericField::Revenue => "revenue",
            NumericField::Rating => "rating",
            NumericField::Age => "age",
            NumericField::Latitude => "latitude",
            NumericField::Longitude => "longitude",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bookings" => Ok(NumericField::Bookings),
            "revenue" => Ok(NumericField::Revenue),
            "rating" => Ok(NumericField::Rating),
            "age" => Ok(NumericField::Age),
            "latitude" | "lat" => Ok(NumericField::Latitude),
            "longitude" | "long" | "lon" => Ok(NumericField::Longitude),
            other => bail!("Unknown numeric field: {}", other),
        }
    }
}

/// Categorical keys usable for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    Destination,
    Gender,
    Age,
    Rating,
}

impl CategoryField {
    pub fn key(self, record: &Record) -> String {
        match self {
            CategoryField::Destination => record.destination.clone(),
            CategoryField::Gender => record.gender.to_string(),
            CategoryField::Age => record.age.to_string(),
            CategoryField::Rating => format!("{:.1}", record.rating),
        }
    }
}

impl FromStr for CategoryField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "destination" => Ok(CategoryField::Destination),
            "gender" => Ok(CategoryField::Gender),
            "age" => Ok(CategoryField::Age),
            "rating" => Ok(CategoryField::Rating),
            other => bail!("Unknown category field: {}", other),
        }
    }
}

// ============================================================================
// SCALAR SUMMARIES
// ============================================================================

/// Sum of a numeric field (0 for an empty set).
/// Integer fields are summed exactly and rounded to f64 once at the end.
pub fn total(records: &[Record], field: NumericField) -> f64 {
    match integer_total(records, field) {
        Some(sum) => sum as f64,
        None => records.iter().map(|r| field.value(r)).sum(),
    }
}

/// Exact sum for integer fields (bookings, revenue, age); None for float fields
pub fn integer_total(records: &[Record], field: NumericField) -> Option<u128> {
    let value: fn(&Record) -> u128 = match field {
        NumericField::Bookings => |r| r.bookings as u128,
        NumericField::Revenue => |r| r.revenue as u128,
        NumericField::Age => |r| r.age as u128,
        NumericField::Rating | NumericField::Latitude | NumericField::Longitude => return None,
    };
    Some(records.iter().map(value).sum())
}

/// Arithmetic mean of a numeric field.
/// Returns None for an empty set instead of dividing by zero.
pub fn mean(records: &[Record], field: NumericField) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    Some(total(records, field) / records.len() as f64)
}

// ============================================================================
// GROUPED SUMMARIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationTotal {
    pub destination: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub key: String,
    pub count: usize,
}

/// Sum `field` per destination, sort descending, keep the first `n`.
/// Ties keep the order in which destinations first appear.
pub fn top_n_by_destination(
    records: &[Record],
    field: NumericField,
    n: usize,
) -> Vec<DestinationTotal> {
    let mut groups: Vec<DestinationTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let value = field.value(record);
        match index.get(record.destination.as_str()) {
            Some(&i) => groups[i].total += value,
            None => {
                index.insert(record.destination.as_str(), groups.len());
                groups.push(DestinationTotal {
                    destination: record.destination.clone(),
                    total: value,
                });
            }
        }
    }

    // sort_by is stable, so equal totals stay in first-occurrence order
    groups.sort_by(|a, b| b.total.total_cmp(&a.total));
    groups.truncate(n);
    groups
}

/// Number of records per distinct value of a categorical field,
/// in first-occurrence order.
pub fn group_counts(records: &[Record], field: CategoryField) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = field.key(record);
        match index.get(&key) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push(CategoryCount { key, count: 1 });
            }
        }
    }

    counts
}

// ============================================================================
// HISTOGRAM
// ============================================================================

/// One equal-width bin: `[lower, upper)`, except the last bin which is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Split the observed range of `field` into `bins` equal-width bins.
/// Empty input or zero bins yields no bins; a constant field yields one bin.
pub fn histogram(records: &[Record], field: NumericField, bins: usize) -> Vec<HistogramBin> {
    if records.is_empty() || bins == 0 {
        return Vec::new();
    }

    let values: Vec<f64> = records.iter().map(|r| field.value(r)).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in values {
        let slot = (((value - min) / width).floor() as usize).min(bins - 1);
        result[slot].count += 1;
    }

    result
}

// ============================================================================
// KPIs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_bookings: u128,
    pub total_revenue: u128,
    /// Mean rating rounded to 2 decimals; None when no record matched
    pub average_rating: Option<f64>,
}

impl Kpis {
    pub fn compute(records: &[Record]) -> Self {
        Kpis {
            total_bookings: records.iter().map(|r| r.bookings as u128).sum(),
            total_revenue: records.iter().map(|r| r.revenue as u128).sum(),
            average_rating: mean(records, NumericField::Rating)
                .map(|rating| (rating * 100.0).round() / 100.0),
        }
    }

    pub fn revenue_display(&self) -> String {
        format!("${}", group_thousands(self.total_revenue))
    }

    pub fn rating_display(&self) -> String {
        match self.average_rating {
            Some(rating) => format!("{:.2}", rating),
            None => "n/a".to_string(),
        }
    }
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
