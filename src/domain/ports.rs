use crate::domain::model::{ProfitRequest, ProfitResult};
use crate::utils::error::Result;

/// Where the rate tables live on disk.
pub trait ConfigProvider {
    fn marketplaces_dir(&self) -> &str;
    fn shipping_dir(&self) -> &str;
}

/// Receives a finished calculation, e.g. to print or store it.
pub trait ResultConsumer {
    fn consume(&mut self, request: &ProfitRequest, result: &ProfitResult) -> Result<()>;
}
