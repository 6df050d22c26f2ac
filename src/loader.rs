// 📥 Dataset Loader - remote airport CSV, local CSV file, or embedded city table
// Every source goes through the same derivation rules (see record.rs)

use crate::record::{derive_records, Record};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// February 2011 US airport traffic (plotly sample datasets)
pub const AIRPORT_TRAFFIC_URL: &str =
    "https://raw.githubusercontent.com/plotly/datasets/master/2011_february_us_airport_traffic.csv";

/// Embedded destinations: (destination, bookings, latitude, longitude)
pub const EMBEDDED_CITIES: [(&str, u64, f64, f64); 10] = [
    ("Delhi", 150, 28.6139, 77.2090),
    ("Mumbai", 200, 19.0760, 72.8777),
    ("Goa", 175, 15.2993, 74.1240),
    ("Jaipur", 120, 26.9124, 75.7873),
    ("Agra", 90, 27.1767, 78.0081),
    ("Kerala", 130, 10.8505, 76.2711),
    ("Varanasi", 85, 25.3176, 82.9739),
    ("Manali", 60, 32.2432, 77.1892),
    ("Udaipur", 95, 24.5854, 73.7125),
    ("Rishikesh", 55, 30.0869, 78.2676),
];

// ============================================================================
// DATASET SOURCE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetSource {
    /// Airport traffic CSV fetched over HTTP
    Remote { url: String },

    /// Airport traffic CSV on disk
    File { path: PathBuf },

    /// Built-in city table
    Embedded,
}

impl Default for DatasetSource {
    fn default() -> Self {
        DatasetSource::Remote {
            url: AIRPORT_TRAFFIC_URL.to_string(),
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Remote { url } => write!(f, "remote CSV {}", url),
            DatasetSource::File { path } => write!(f, "CSV file {}", path.display()),
            DatasetSource::Embedded => write!(f, "embedded city table"),
        }
    }
}

// ============================================================================
// AIRPORT CSV LAYOUT
// ============================================================================

/// Columns we use from the airport traffic CSV; the rest are ignored.
#[derive(Debug, Deserialize)]
struct AirportRow {
    iata: String,
    lat: f64,
    long: f64,
    cnt: u64,
}

// ============================================================================
// LOADING
// ============================================================================

/// Load the base record set from a source
pub fn load(source: &DatasetSource) -> Result<Vec<Record>> {
    let records = match source {
        DatasetSource::Remote { url } => load_remote_csv(url)?,
        DatasetSource::File { path } => load_csv_file(path)?,
        DatasetSource::Embedded => load_embedded()?,
    };

    info!("Loaded {} records from {}", records.len(), source);
    Ok(records)
}

/// Fetch the airport CSV over HTTP. Any network or HTTP status failure is fatal.
pub fn load_remote_csv(url: &str) -> Result<Vec<Record>> {
    info!("Fetching dataset from {}", url);

    let response = ureq::get(url)
        .call()
        .with_context(|| format!("Failed to fetch dataset from {}", url))?;

    let body = response
        .into_body()
        .read_to_string()
        .context("Failed to read dataset response body")?;

    parse_airport_csv(body.as_bytes())
}

pub fn load_csv_file(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset file: {:?}", path))?;

    parse_airport_csv(file)
}

pub fn load_embedded() -> Result<Vec<Record>> {
    derive_records(EMBEDDED_CITIES)
}

/// Parse airport traffic CSV text: `iata` becomes the destination,
/// `cnt` becomes the booking count.
pub fn parse_airport_csv<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize::<AirportRow>().enumerate() {
        let row = result.with_context(|| format!("Failed to parse dataset row {}", line + 1))?;
        rows.push((row.iata, row.cnt, row.lat, row.long));
    }

    derive_records(rows)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Gender;

    const SAMPLE_CSV: &str = "\
iata,airport,city,state,country,lat,long,cnt
ORD,Chicago O'Hare International,Chicago,IL,USA,41.979595,-87.90446417,25129
ATL,William B Hartsfield-Atlanta Intl,Atlanta,GA,USA,33.64044444,-84.42694444,21925
DFW,Dallas-Fort Worth International,Dallas-Fort Worth,TX,USA,32.89595056,-97.0372,20662
";

    #[test]
    fn test_parse_airport_csv_renames_columns() {
        let records = parse_airport_csv(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].destination, "ORD");
        assert_eq!(records[0].bookings, 25129);
        assert_eq!(records[0].latitude, 41.979595);
        assert_eq!(records[1].destination, "ATL");
        assert_eq!(records[1].gender, Gender::Female);
    }

    #[test]
    fn test_parse_airport_csv_derives_fields() {
        let records = parse_airport_csv(SAMPLE_CSV.as_bytes()).unwrap();

        // 25129 is odd, 25129 % 30 = 19
        assert_eq!(records[0].revenue, 25129 * 350);
        assert_eq!(records[0].rating, 4.5);
        assert_eq!(records[0].age, 39);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv_text = "iata,lat,long\nORD,41.9,-87.9\n";

        assert!(parse_airport_csv(csv_text.as_bytes()).is_err());
    }

    #[test]
    fn test_malformed_count_is_an_error() {
        let csv_text = "iata,lat,long,cnt\nORD,41.9,-87.9,lots\n";

        assert!(parse_airport_csv(csv_text.as_bytes()).is_err());
    }

    #[test]
    fn test_embedded_table() {
        let records = load(&DatasetSource::Embedded).unwrap();

        assert_eq!(records.len(), EMBEDDED_CITIES.len());
        assert_eq!(records[0].destination, "Delhi");
        assert_eq!(records[0].revenue, 52_500);
        assert_eq!(records[9].destination, "Rishikesh");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let source = DatasetSource::File {
            path: PathBuf::from("/nonexistent/airport_traffic.csv"),
        };

        assert!(load(&source).is_err());
    }

    #[test]
    fn test_default_source_is_airport_traffic() {
        assert_eq!(
            DatasetSource::default(),
            DatasetSource::Remote {
                url: AIRPORT_TRAFFIC_URL.to_string()
            }
        );
    }

    #[test]
    fn test_source_json_shape() {
        let source: DatasetSource = serde_json::from_str(r#"{"kind":"embedded"}"#).unwrap();
        assert_eq!(source, DatasetSource::Embedded);

        let source: DatasetSource =
            serde_json::from_str(r#"{"kind":"file","path":"data/traffic.csv"}"#).unwrap();
        assert_eq!(
            source,
            DatasetSource::File {
                path: PathBuf::from("data/traffic.csv")
            }
        );
    }
}
