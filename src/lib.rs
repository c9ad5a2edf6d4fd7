pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{loader::Catalog, AppConfig};
pub use crate::core::calculator::ProfitCalculator;
pub use crate::core::report::{render_report, ReportFormat, WriterConsumer};
pub use domain::{
    FeeApplication, FeeRule, FeeType, Marketplace, ProfitRequest, ProfitResult, SellerTier,
    ShippingCarrier, ShippingRateBand, ShippingService, ShippingSource, WeightLimits,
};
pub use utils::error::{ProfitError, Result};
