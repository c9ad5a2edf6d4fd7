use crate::config::toml_config::{AppConfig, SelectionDefaults};
use crate::config::CliConfig;
use crate::core::report::ReportFormat;
use crate::domain::model::ProfitRequest;
use crate::utils::error::{ProfitError, Result};
use crate::utils::validation::Validate;
use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct CalculateArgs {
    #[arg(long)]
    pub sale_price: f64,

    #[arg(long, default_value = "1")]
    pub quantity: u32,

    #[arg(long, default_value = "0")]
    pub cost: f64,

    /// Weight of one item; not needed for manual-entry services
    #[arg(long, default_value = "0")]
    pub weight: f64,

    /// Shipping price for manual-entry services
    #[arg(long)]
    pub manual_shipping: Option<f64>,

    #[arg(long)]
    pub marketplace: Option<String>,

    #[arg(long)]
    pub tier: Option<String>,

    #[arg(long)]
    pub carrier: Option<String>,

    #[arg(long)]
    pub service: Option<String>,

    /// Report format: text, json or csv
    #[arg(long)]
    pub format: Option<ReportFormat>,
}

/// Fully resolved selection for one calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub marketplace: String,
    pub carrier: String,
    pub format: ReportFormat,
    pub request: ProfitRequest,
}

impl CalculateArgs {
    /// Fills anything the command line left out from the config file defaults.
    pub fn resolve(&self, config: &AppConfig) -> Result<Selection> {
        let defaults = config.default_selection();
        let pick = |flag: &Option<String>, default: &Option<String>, field: &str| {
            flag.clone()
                .or_else(|| default.clone())
                .ok_or_else(|| {
                    ProfitError::invalid_input(field, "", "No value given and no default configured")
                })
        };
        let SelectionDefaults {
            marketplace,
            tier,
            carrier,
            service,
        } = &defaults;

        Ok(Selection {
            marketplace: pick(&self.marketplace, marketplace, "marketplace")?,
            carrier: pick(&self.carrier, carrier, "carrier")?,
            format: self
                .format
                .or_else(|| config.report_format())
                .unwrap_or_default(),
            request: ProfitRequest {
                sale_price: self.sale_price,
                quantity: self.quantity,
                cost_per_item: self.cost,
                weight_per_item: self.weight,
                tier_id: pick(&self.tier, tier, "tier")?,
                shipping_service_id: pick(&self.service, service, "service")?,
                manual_shipping_price: self.manual_shipping,
            },
        })
    }
}

impl CliConfig {
    /// Loads the TOML file when given and applies directory overrides.
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(dir) = &self.marketplaces_dir {
            config.data.marketplaces_dir = dir.clone();
        }
        if let Some(dir) = &self.shipping_dir {
            config.data.shipping_dir = dir.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.logging.get_or_insert_with(Default::default).directory = Some(dir.clone());
        }

        config.validate()?;
        Ok(config)
    }
}
