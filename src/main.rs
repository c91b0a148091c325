use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use small_booking::config::Command;
use small_booking::utils::{logger, validation::Validate};
use small_booking::{BookingService, CliConfig, ReservationEngine, SnapshotTarget, TomlConfig};
use std::path::Path;

fn main() {
    let cli = CliConfig::parse();

    let settings = match cli.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if settings.logging.format == "json" {
        logger::init_json_logger(Some(settings.logging.level.as_str()));
    } else {
        logger::init_cli_logger(cli.verbose, Some(settings.logging.level.as_str()));
    }

    tracing::info!("Starting small-booking");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli.command, &settings) {
        tracing::error!("{:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(2);
    }
}

fn run(command: &Command, settings: &TomlConfig) -> anyhow::Result<()> {
    match command {
        Command::Show { file } => {
            let path = if file.is_relative() && !file.exists() {
                Path::new(&settings.snapshot.output_path).join(file)
            } else {
                file.clone()
            };

            let records = SnapshotTarget::new(&path)
                .and_then(|target| target.read())
                .with_context(|| format!("reading snapshot {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Quote {
            price,
            check_in,
            check_out,
        } => {
            let check_in = parse_date(check_in)?;
            let check_out = parse_date(check_out)?;
            anyhow::ensure!(check_in < check_out, "check-out must be after check-in");
            anyhow::ensure!(price.is_finite() && *price >= 0.0, "price must be non-negative");

            let total = BookingService::calculate_price(*price, check_in, check_out);
            println!("{:.2}", total);
        }
        Command::Check => {
            let engine = ReservationEngine::from_config(settings)?;
            println!("users:    {}", settings.users_path().display());
            println!("bookings: {}", settings.bookings_path().display());
            if let Some(path) = settings.properties_path() {
                println!("properties: {}", path.display());
            }
            println!(
                "status policy: {:?}",
                engine.booking_service().status_policy()
            );
            println!("✅ Configuration is valid");
        }
    }

    Ok(())
}

fn parse_date(value: &str) -> anyhow::Result<chrono::NaiveDateTime> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("'{}' is not a YYYY-MM-DD date", value))?;
    Ok(date.and_time(chrono::NaiveTime::MIN))
}
