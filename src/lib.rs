// Tour Dashboard - Core Library
// Loader -> cache -> filter -> aggregation, shared by the CLI, TUI and API server

pub mod record;
pub mod loader;
pub mod cache;
pub mod filter;
pub mod aggregate;
pub mod dashboard;
pub mod export;
pub mod config;

// Re-export commonly used types
pub use record::{Gender, Record, derive_records, booking_epoch, REVENUE_PER_BOOKING};
pub use loader::{
    DatasetSource, AIRPORT_TRAFFIC_URL, EMBEDDED_CITIES,
    load, load_remote_csv, load_csv_file, load_embedded, parse_airport_csv,
};
pub use cache::DatasetCache;
pub use filter::{
    AgeRange, DateRange, FilterCriteria, CriteriaParams,
    apply, destinations, age_bounds, date_bounds,
};
pub use aggregate::{
    NumericField, CategoryField, DestinationTotal, CategoryCount, HistogramBin, Kpis,
    total, integer_total, mean, top_n_by_destination, group_counts, histogram,
};
pub use dashboard::{DashboardView, ViewOptions, GeoPoint, TimePoint};
pub use export::{write_csv, to_csv_string, export_to_path, EXPORT_FILE_NAME};
pub use config::DashboardConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
