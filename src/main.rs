// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::{Path, PathBuf};

// Use library instead of local modules
use tour_dashboard::{
    export_to_path, DashboardConfig, DashboardView, DatasetCache, DatasetSource, FilterCriteria,
};

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Ui,
    Summary,
    Export(PathBuf),
}

#[derive(Debug, Default)]
struct CliArgs {
    config_path: Option<PathBuf>,
    source: Option<DatasetSource>,
    command: Option<Command>,
    destinations: Option<Vec<String>>,
    min_age: Option<u32>,
    max_age: Option<u32>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    min_rating: Option<f64>,
}

impl CliArgs {
    fn parse(args: &[String]) -> Result<Self> {
        let mut cli = CliArgs::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = || -> Result<String> {
                iter.next()
                    .cloned()
                    .with_context(|| format!("Missing value for {}", arg))
            };

            match arg.as_str() {
                "--config" => cli.config_path = Some(PathBuf::from(value()?)),
                "--embedded" => cli.source = Some(DatasetSource::Embedded),
                "--url" => cli.source = Some(DatasetSource::Remote { url: value()? }),
                "--file" => {
                    cli.source = Some(DatasetSource::File {
                        path: PathBuf::from(value()?),
                    })
                }
                "--destinations" => {
                    cli.destinations = Some(
                        value()?
                            .split(',')
                            .map(str::trim)
                            .filter(|d| !d.is_empty())
                            .map(str::to_string)
                            .collect(),
                    )
                }
                "--min-age" => cli.min_age = Some(value()?.parse().context("Invalid --min-age")?),
                "--max-age" => cli.max_age = Some(value()?.parse().context("Invalid --max-age")?),
                "--start" => cli.start = Some(value()?.parse().context("Invalid --start date")?),
                "--end" => cli.end = Some(value()?.parse().context("Invalid --end date")?),
                "--min-rating" => {
                    cli.min_rating = Some(value()?.parse().context("Invalid --min-rating")?)
                }
                "ui" => cli.command = Some(Command::Ui),
                "summary" => cli.command = Some(Command::Summary),
                "export" => cli.command = Some(Command::Export(PathBuf::from(value()?))),
                other => bail!("Unknown argument: {}", other),
            }
        }

        Ok(cli)
    }

    /// Start from the configured criteria and apply any flags on top
    fn criteria(&self, config: &DashboardConfig) -> FilterCriteria {
        let mut criteria = config.initial_criteria();

        if let Some(destinations) = &self.destinations {
            criteria = criteria.with_destinations(destinations.iter().cloned());
        }
        if let Some(min_age) = self.min_age {
            criteria.age_range.min = min_age;
        }
        if let Some(max_age) = self.max_age {
            criteria.age_range.max = max_age;
        }
        if self.start.is_some() || self.end.is_some() {
            criteria = criteria.with_date_range(
                self.start.unwrap_or(NaiveDate::MIN),
                self.end.unwrap_or(NaiveDate::MAX),
            );
        }
        if let Some(min_rating) = self.min_rating {
            criteria = criteria.with_min_rating(min_rating);
        }

        criteria
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = CliArgs::parse(&args)?;

    let mut config = match &cli.config_path {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(source) = &cli.source {
        config.source = source.clone();
    }

    let cache = DatasetCache::new(config.source.clone());
    let criteria = cli.criteria(&config);

    match cli.command.clone().unwrap_or(default_command()) {
        Command::Ui => run_ui_mode(&cache, &config, criteria)?,
        Command::Summary => run_summary(&cache, &config, &criteria)?,
        Command::Export(path) => run_export(&cache, &config, &criteria, &path)?,
    }

    Ok(())
}

fn default_command() -> Command {
    if cfg!(feature = "tui") {
        Command::Ui
    } else {
        Command::Summary
    }
}

fn load_view(
    cache: &DatasetCache,
    config: &DashboardConfig,
    criteria: &FilterCriteria,
) -> Result<DashboardView> {
    println!("📂 Loading dataset from {}...", cache.source());
    let records = cache.get()?;
    println!("✓ Loaded {} records", records.len());

    Ok(DashboardView::build(&records, criteria, &config.view_options()))
}

fn run_summary(
    cache: &DatasetCache,
    config: &DashboardConfig,
    criteria: &FilterCriteria,
) -> Result<()> {
    println!("🌎 Global Tours & Travels Dashboard");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let view = load_view(cache, config, criteria)?;

    println!("\n📊 KPIs ({} matching records)", view.record_count);
    println!("   Total Bookings:  {}", view.kpis.total_bookings);
    println!("   Total Revenue:   {}", view.kpis.revenue_display());
    println!("   Average Rating:  {}", view.kpis.rating_display());

    if view.is_empty() {
        println!("\n⚠️  No records match the current filters");
        return Ok(());
    }

    println!("\n🏆 Top {} Destinations", config.top_n);
    for (rank, entry) in view.top_destinations.iter().enumerate() {
        println!("   {:>2}. {:<16} {:>10}", rank + 1, entry.destination, entry.total);
    }

    println!("\n👥 Gender Distribution");
    for entry in &view.gender_split {
        println!("   {:<8} {}", entry.key, entry.count);
    }

    println!("\n⭐ Customer Ratings");
    for entry in &view.rating_distribution {
        println!("   {:<8} {}", entry.key, entry.count);
    }

    println!("\n🎂 Traveler Age Distribution");
    for bin in &view.age_histogram {
        println!("   {:>5.1} - {:<5.1} {}", bin.lower, bin.upper, bin.count);
    }

    Ok(())
}

fn run_export(
    cache: &DatasetCache,
    config: &DashboardConfig,
    criteria: &FilterCriteria,
    path: &Path,
) -> Result<()> {
    let view = load_view(cache, config, criteria)?;

    println!("\n💾 Exporting filtered records...");
    let written = export_to_path(path, &view.records)?;
    println!("✓ Wrote {} records to {:?}", written, path);

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(
    cache: &DatasetCache,
    config: &DashboardConfig,
    criteria: FilterCriteria,
) -> Result<()> {
    println!("🖥️  Loading Tour Dashboard UI...\n");

    println!("📂 Loading dataset from {}...", cache.source());
    let records = cache.get()?;
    println!("✓ Loaded {} records\n", records.len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(records, criteria, config.view_options());
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(
    _cache: &DatasetCache,
    _config: &DashboardConfig,
    _criteria: FilterCriteria,
) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the summary: cargo run -- summary");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_source_and_command() {
        let cli = CliArgs::parse(&args(&["--embedded", "export", "out.csv"])).unwrap();

        assert_eq!(cli.source, Some(DatasetSource::Embedded));
        assert_eq!(cli.command, Some(Command::Export(PathBuf::from("out.csv"))));
    }

    #[test]
    fn test_flags_override_config_criteria() {
        let cli = CliArgs::parse(&args(&[
            "--destinations",
            "Goa,Agra",
            "--max-age",
            "40",
            "--min-rating",
            "4.5",
        ]))
        .unwrap();

        let criteria = cli.criteria(&DashboardConfig::default());

        assert_eq!(criteria.destinations.len(), 2);
        assert_eq!(criteria.age_range.min, 20);
        assert_eq!(criteria.age_range.max, 40);
        assert_eq!(criteria.min_rating, Some(4.5));
        assert!(criteria.date_range.is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(CliArgs::parse(&args(&["--min-age"])).is_err());
        assert!(CliArgs::parse(&args(&["--min-age", "old"])).is_err());
        assert!(CliArgs::parse(&args(&["--bogus"])).is_err());
    }
}
