// 📤 CSV Export - filtered records as a downloadable CSV
// One header row, one row per record, standard CSV quoting

use crate::record::Record;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Default file name offered for downloads
pub const EXPORT_FILE_NAME: &str = "filtered_bookings.csv";

pub const EXPORT_HEADER: [&str; 9] = [
    "Destination",
    "Bookings",
    "Latitude",
    "Longitude",
    "Revenue",
    "Rating",
    "Booking_Date",
    "Age",
    "Gender",
];

pub fn write_csv<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    // Written explicitly so an empty selection still gets a header row
    wtr.write_record(EXPORT_HEADER)
        .context("Failed to write CSV header")?;

    for record in records {
        wtr.write_record(&[
            record.destination.clone(),
            record.bookings.to_string(),
            record.latitude.to_string(),
            record.longitude.to_string(),
            record.revenue.to_string(),
            format!("{:.1}", record.rating),
            record.booking_date.format("%Y-%m-%d").to_string(),
            record.age.to_string(),
            record.gender.to_string(),
        ])
        .with_context(|| format!("Failed to write CSV row for {}", record.destination))?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn to_csv_string(records: &[Record]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, records)?;
    String::from_utf8(buffer).context("Exported CSV is not valid UTF-8")
}

/// Write records to a file, returning how many rows were written
pub fn export_to_path(path: &Path, records: &[Record]) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {:?}", path))?;

    write_csv(file, records)?;
    Ok(records.len())
}

// ============================================================================
// TESTS
// ============================================================================
