//! solar-sizer entry point: CLI wiring, catalog loading, and report output.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use solar_sizer::catalog::RuleCatalog;
use solar_sizer::config::CatalogConfig;
use solar_sizer::io::export::export_csv;
use solar_sizer::profile::{LoadProfile, ProfileBatch};
use solar_sizer::report::{SizingReport, size_profile};

/// Size an inverter, battery bank, and panel array for a household load.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    catalog: CatalogSource,

    #[command(flatten)]
    profiles: ProfileSource,

    /// Catalog appliance and quantity, e.g. `tv=2` (repeatable)
    #[arg(long = "appliance", value_name = "NAME=QTY", value_parser = parse_selection)]
    appliances: Vec<(String, u32)>,

    /// Appliance not in the catalog, e.g. `borehole pump:750:1` (repeatable)
    #[arg(long = "custom", value_name = "NAME:WATTS[:QTY]", value_parser = parse_custom)]
    customs: Vec<(String, f64, u32)>,

    /// Installation location (catalog key)
    #[arg(long)]
    location: Option<String>,

    /// Required backup duration in hours
    #[arg(long)]
    backup_hours: Option<f64>,

    /// Write one CSV row per sized profile to this path
    #[arg(long, value_name = "PATH")]
    csv_out: Option<PathBuf>,

    /// Print the catalog's appliances, locations, and backup options, then exit
    #[arg(long)]
    list: bool,

    /// Log rule selection details (same as RUST_LOG=debug)
    #[arg(long, short)]
    verbose: bool,

    /// Serve the REST API instead of sizing once
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct CatalogSource {
    /// Load the rule catalog from a TOML or JSON file
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Use a built-in catalog preset (default: standard)
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,
}

#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct ProfileSource {
    /// Load profile file (TOML or JSON); inline options are applied on top
    #[arg(long, value_name = "PATH")]
    profile: Option<PathBuf>,

    /// File with several `[[profiles]]` to size in one run
    #[arg(long, value_name = "PATH")]
    batch: Option<PathBuf>,
}

fn parse_selection(s: &str) -> Result<(String, u32), String> {
    let (name, qty) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=QTY, got \"{s}\""))?;
    let qty = qty
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("quantity \"{qty}\" is not a whole number: {e}"))?;
    Ok((name.trim().to_string(), qty))
}

fn parse_custom(s: &str) -> Result<(String, f64, u32), String> {
    let mut parts = s.split(':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(format!("expected NAME:WATTS[:QTY], got \"{s}\""));
    }
    let watts = parts
        .next()
        .ok_or_else(|| format!("missing wattage in \"{s}\""))?
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid wattage in \"{s}\": {e}"))?;
    let qty = match parts.next() {
        Some(q) => q
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid quantity in \"{s}\": {e}"))?,
        None => 1,
    };
    if parts.next().is_some() {
        return Err(format!("too many fields in \"{s}\""));
    }
    Ok((name.to_string(), watts, qty))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(source: &CatalogSource) -> Result<RuleCatalog> {
    match (&source.catalog, &source.preset) {
        (Some(path), _) => RuleCatalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display())),
        (None, Some(name)) => {
            RuleCatalog::from_preset(name).with_context(|| format!("failed to load preset {name}"))
        }
        (None, None) => RuleCatalog::from_preset(CatalogConfig::PRESETS[0])
            .context("failed to load the default preset"),
    }
}

impl Cli {
    fn has_inline_profile(&self) -> bool {
        !self.appliances.is_empty()
            || !self.customs.is_empty()
            || self.location.is_some()
            || self.backup_hours.is_some()
    }

    /// Profiles to size, in output order.
    fn load_profiles(&self) -> Result<Vec<LoadProfile>> {
        if let Some(path) = &self.profiles.batch {
            if self.has_inline_profile() {
                bail!("--batch cannot be combined with inline profile options");
            }
            let batch = ProfileBatch::from_path(path)
                .with_context(|| format!("failed to load batch {}", path.display()))?;
            return Ok(batch.profiles);
        }

        let mut profile = match &self.profiles.profile {
            Some(path) => LoadProfile::from_path(path)
                .with_context(|| format!("failed to load profile {}", path.display()))?,
            None => LoadProfile::new(),
        };
        for (name, qty) in &self.appliances {
            profile.set_quantity(name.clone(), *qty);
        }
        for (name, watts, qty) in &self.customs {
            profile.add_custom_appliance(name.clone(), *watts, *qty);
        }
        if let Some(location) = &self.location {
            profile.set_location(location.clone());
        }
        if let Some(hours) = self.backup_hours {
            profile.set_backup_hours(hours);
        }
        profile.validate().context("invalid load profile")?;
        Ok(vec![profile])
    }
}

fn print_catalog(catalog: &RuleCatalog) {
    println!("--- Appliances ---");
    for (name, watts) in catalog.appliances().iter() {
        println!("{name:<20} {watts} W");
    }
    println!("\n--- Locations ---");
    for (name, hours) in catalog.locations().iter() {
        println!("{name:<20} {hours} sun-hours");
    }
    let options: Vec<String> = catalog
        .backup_options()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("\n--- Backup options (h) ---");
    println!("{}", options.join(", "));
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = load_catalog(&cli.catalog)?;

    if cli.list {
        print_catalog(&catalog);
        return Ok(());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(solar_sizer::api::AppState::new(catalog));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        return rt
            .block_on(solar_sizer::api::serve(state, addr))
            .with_context(|| format!("API server on {addr} failed"));
    }

    let profiles = cli.load_profiles()?;
    let reports: Vec<SizingReport> = profiles
        .iter()
        .map(|profile| size_profile(profile, &catalog))
        .collect();

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{report}");
    }

    if let Some(path) = &cli.csv_out {
        export_csv(&reports, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        info!(path = %path.display(), rows = reports.len(), "sizing CSV written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_argument_parses() {
        assert_eq!(parse_selection("tv=2"), Ok(("tv".to_string(), 2)));
        assert!(parse_selection("tv").is_err());
        assert!(parse_selection("tv=-1").is_err());
    }

    #[test]
    fn custom_argument_defaults_quantity() {
        assert_eq!(
            parse_custom("borehole pump:750"),
            Ok(("borehole pump".to_string(), 750.0, 1))
        );
        assert_eq!(parse_custom("kettle:2000:2"), Ok(("kettle".to_string(), 2000.0, 2)));
        assert!(parse_custom(":100").is_err());
        assert!(parse_custom("kettle").is_err());
        assert!(parse_custom("kettle:hot").is_err());
        assert!(parse_custom("a:1:2:3").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
