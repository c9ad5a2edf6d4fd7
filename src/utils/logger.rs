use crate::utils::error::Result;
use chrono::{Local, NaiveDate};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// One log file per day, e.g. `app_20240131.log`.
pub fn log_file_name(date: NaiveDate) -> String {
    format!("app_{}.log", date.format("%Y%m%d"))
}

/// Opens today's log file under `dir` for appending, creating the directory if needed.
pub fn open_daily_log(dir: &Path) -> Result<(PathBuf, File)> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(log_file_name(Local::now().date_naive()));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}

pub fn init_cli_logger(verbose: bool, log_dir: Option<&Path>) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("marketplace_profit=debug,profit_calc=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("marketplace_profit=info,profit_calc=info,warn"))
    };

    let log_file = log_dir.map(open_daily_log).transpose()?;
    let log_path = log_file.as_ref().map(|(path, _)| path.clone());
    let file_layer = log_file.map(|(_, file)| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(file_layer)
        .init();

    if let Some(path) = log_path {
        tracing::debug!("Writing log file {}", path.display());
    }
    Ok(())
}

pub fn init_json_logger(verbose: bool, log_dir: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "marketplace_profit={lvl},profit_calc={lvl},warn",
            lvl = default_level
        ))
    });

    let file_layer = log_dir
        .map(open_daily_log)
        .transpose()?
        .map(|(_, file)| {
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(Mutex::new(file))
                .json()
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .json(),
        )
        .with(file_layer)
        .init();
    Ok(())
}
