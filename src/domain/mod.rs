// Domain layer: rate tables, fee rules and the calculation inputs/outputs, plus the ports
// the outer layers implement.

pub mod model;
pub mod ports;

pub use model::{
    FeeApplication, FeeCharge, FeeRule, FeeType, Marketplace, ProfitRequest, ProfitResult,
    SellerTier, ShippingCarrier, ShippingRateBand, ShippingService, ShippingSource, WeightLimits,
};
pub use ports::{ConfigProvider, ResultConsumer};
