use anyhow::Context;
use clap::Parser;
use marketplace_profit::config::toml_config::LogFormat;
use marketplace_profit::config::Command;
use marketplace_profit::domain::ResultConsumer;
use marketplace_profit::utils::error::ErrorSeverity;
use marketplace_profit::utils::logger;
use marketplace_profit::{AppConfig, Catalog, CliConfig, ProfitCalculator, ProfitError, WriterConsumer};
use std::io::Write;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = cli.app_config();
    let json_logs = cli.log_json
        || matches!(&config, Ok(c) if c.log_format() == LogFormat::Json);
    let log_dir = match &config {
        Ok(c) => c.log_directory().map(Path::new),
        Err(_) => cli.log_dir.as_deref().map(Path::new),
    };
    if json_logs {
        logger::init_json_logger(cli.verbose, log_dir)?;
    } else {
        logger::init_cli_logger(cli.verbose, log_dir)?;
    }

    tracing::debug!("CLI config: {:?}", cli);

    let outcome = config
        .map_err(anyhow::Error::from)
        .and_then(|config| run(&cli, &config));

    if let Err(e) = outcome {
        let Some(profit_error) = e.downcast_ref::<ProfitError>() else {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        };

        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            profit_error,
            profit_error.category(),
            profit_error.severity()
        );
        eprintln!("❌ {}", profit_error.user_friendly_message());
        eprintln!("💡 {}", profit_error.recovery_suggestion());

        let exit_code = match profit_error.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run(cli: &CliConfig, config: &AppConfig) -> anyhow::Result<()> {
    let catalog = Catalog::load(config)?;

    match &cli.command {
        Command::List => print_catalog(&catalog).context("writing catalog listing"),
        Command::Calculate(args) => {
            let selection = args.resolve(config)?;
            let marketplace = catalog.marketplace(&selection.marketplace)?;
            let carrier = catalog.carrier(&selection.carrier)?;

            tracing::info!(
                "Calculating profit on {} ({}) shipping with {} ({})",
                marketplace.name,
                selection.request.tier_id,
                carrier.name,
                selection.request.shipping_service_id
            );

            let calculator = ProfitCalculator::new(marketplace, carrier);
            let result = calculator.calculate_profit(&selection.request)?;

            let mut consumer = WriterConsumer::new(std::io::stdout().lock(), selection.format);
            consumer.consume(&selection.request, &result)?;
            Ok(())
        }
    }
}

fn print_catalog(catalog: &Catalog) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();

    writeln!(out, "Marketplaces")?;
    for (name, marketplace) in &catalog.marketplaces {
        writeln!(out, "  {}", name)?;
        for (tier_id, tier) in &marketplace.tiers {
            writeln!(out, "    {} ({}, {} fees)", tier_id, tier.name, tier.fees.len())?;
        }
    }

    writeln!(out, "Shipping carriers")?;
    for (name, carrier) in &catalog.carriers {
        writeln!(out, "  {}", name)?;
        for (service_id, service) in &carrier.services {
            let limits = service.weight_limits();
            if service.is_manual_entry() {
                writeln!(out, "    {} ({}, manual price)", service_id, service.name())?;
            } else {
                writeln!(
                    out,
                    "    {} ({}, {}-{} oz, {} bands)",
                    service_id,
                    service.name(),
                    limits.min,
                    limits.max,
                    service.rates().len()
                )?;
            }
        }
    }

    Ok(())
}
