use crate::utils::error::{ProfitError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    Percentage,
    Flat,
    Compound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeApplication {
    PerItem,
    PerOrder,
}

/// The amounts a fee charges. Each kind carries exactly the values it needs,
/// so a constructed `FeeRule` is always well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeeCharge {
    Percentage { percentage: f64 },
    Flat { flat_fee: f64 },
    Compound { percentage: f64, flat_fee: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeeRule {
    #[serde(flatten)]
    charge: FeeCharge,
    application: FeeApplication,
}

impl FeeRule {
    /// Builds a rule from loosely-typed parts, rejecting combinations where
    /// the kind is missing the amount it charges.
    pub fn new(
        fee_type: FeeType,
        application: FeeApplication,
        percentage: Option<f64>,
        flat_amount: Option<f64>,
    ) -> Result<Self> {
        let charge = match (fee_type, percentage, flat_amount) {
            (FeeType::Percentage, Some(p), _) => FeeCharge::Percentage {
                percentage: check_amount("percentage", p)?,
            },
            (FeeType::Flat, _, Some(f)) => FeeCharge::Flat {
                flat_fee: check_amount("flat amount", f)?,
            },
            (FeeType::Compound, Some(p), Some(f)) => FeeCharge::Compound {
                percentage: check_amount("percentage", p)?,
                flat_fee: check_amount("flat amount", f)?,
            },
            (FeeType::Percentage, None, _) => {
                return Err(invalid_fee("percentage fee requires a percentage"))
            }
            (FeeType::Flat, _, None) => return Err(invalid_fee("flat fee requires a flat amount")),
            (FeeType::Compound, _, _) => {
                return Err(invalid_fee(
                    "compound fee requires both a percentage and a flat amount",
                ))
            }
        };

        Ok(Self {
            charge,
            application,
        })
    }

    pub fn percentage_of_sale(percentage: f64, application: FeeApplication) -> Result<Self> {
        Self::new(FeeType::Percentage, application, Some(percentage), None)
    }

    pub fn flat(flat_amount: f64, application: FeeApplication) -> Result<Self> {
        Self::new(FeeType::Flat, application, None, Some(flat_amount))
    }

    pub fn compound(percentage: f64, flat_amount: f64, application: FeeApplication) -> Result<Self> {
        Self::new(FeeType::Compound, application, Some(percentage), Some(flat_amount))
    }

    pub fn fee_type(&self) -> FeeType {
        match self.charge {
            FeeCharge::Percentage { .. } => FeeType::Percentage,
            FeeCharge::Flat { .. } => FeeType::Flat,
            FeeCharge::Compound { .. } => FeeType::Compound,
        }
    }

    pub fn charge(&self) -> FeeCharge {
        self.charge
    }

    pub fn application(&self) -> FeeApplication {
        self.application
    }

    pub fn percentage(&self) -> Option<f64> {
        match self.charge {
            FeeCharge::Percentage { percentage } | FeeCharge::Compound { percentage, .. } => {
                Some(percentage)
            }
            FeeCharge::Flat { .. } => None,
        }
    }

    pub fn flat_amount(&self) -> Option<f64> {
        match self.charge {
            FeeCharge::Flat { flat_fee } | FeeCharge::Compound { flat_fee, .. } => Some(flat_fee),
            FeeCharge::Percentage { .. } => None,
        }
    }
}

fn check_amount(what: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid_fee(&format!(
            "{} must be a non-negative finite number, got {}",
            what, value
        )));
    }
    Ok(value)
}

// The fee id is filled in by the loader, which knows where the rule came from.
fn invalid_fee(reason: &str) -> ProfitError {
    ProfitError::InvalidFeeDefinition {
        fee_id: String::new(),
        reason: reason.to_string(),
    }
}

/// One pricing plan within a marketplace. Fee order is the order the
/// configuration listed them in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerTier {
    pub name: String,
    pub fees: IndexMap<String, FeeRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marketplace {
    pub name: String,
    pub tiers: IndexMap<String, SellerTier>,
}

impl Marketplace {
    pub fn tier(&self, tier_id: &str) -> Result<&SellerTier> {
        self.tiers
            .get(tier_id)
            .ok_or_else(|| ProfitError::UnknownTier {
                tier_id: tier_id.to_string(),
                available: self.tiers.keys().cloned().collect(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShippingRateBand {
    pub weight_up_to: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightLimits {
    pub min: f64,
    pub max: f64,
}

impl WeightLimits {
    pub fn contains(&self, weight: f64) -> bool {
        weight >= self.min && weight <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingService {
    name: String,
    weight_limits: WeightLimits,
    rates: Vec<ShippingRateBand>,
    manual_entry: bool,
}

impl ShippingService {
    /// Rejects limits or bands that could never produce a sensible price.
    /// Bands may arrive in any order.
    pub fn new(
        name: impl Into<String>,
        weight_limits: WeightLimits,
        rates: Vec<ShippingRateBand>,
        manual_entry: bool,
    ) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: String| ProfitError::InvalidShippingDefinition {
            service_id: name.clone(),
            reason,
        };

        if !weight_limits.min.is_finite() || !weight_limits.max.is_finite() {
            return Err(invalid("weight limits must be finite".to_string()));
        }
        if weight_limits.min < 0.0 || weight_limits.min > weight_limits.max {
            return Err(invalid(format!(
                "weight limits must satisfy 0 <= min <= max, got min={} max={}",
                weight_limits.min, weight_limits.max
            )));
        }
        for band in &rates {
            if !band.weight_up_to.is_finite() || !band.price.is_finite() || band.price < 0.0 {
                return Err(invalid(format!(
                    "rate band {{weight_up_to: {}, price: {}}} is not valid",
                    band.weight_up_to, band.price
                )));
            }
        }

        Ok(Self {
            name,
            weight_limits,
            rates,
            manual_entry,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight_limits(&self) -> WeightLimits {
        self.weight_limits
    }

    /// Bands in the order they were configured.
    pub fn rates(&self) -> &[ShippingRateBand] {
        &self.rates
    }

    pub fn is_manual_entry(&self) -> bool {
        self.manual_entry
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingCarrier {
    pub name: String,
    pub services: IndexMap<String, ShippingService>,
}

impl ShippingCarrier {
    pub fn service(&self, service_id: &str) -> Result<&ShippingService> {
        self.services
            .get(service_id)
            .ok_or_else(|| ProfitError::UnknownShippingService {
                service_id: service_id.to_string(),
                available: self.services.keys().cloned().collect(),
            })
    }
}

/// Caller-supplied inputs for one profit calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitRequest {
    pub sale_price: f64,
    pub quantity: u32,
    pub cost_per_item: f64,
    /// Ignored when the selected service is manual-entry.
    pub weight_per_item: f64,
    pub tier_id: String,
    pub shipping_service_id: String,
    pub manual_shipping_price: Option<f64>,
}

/// Where the shipping cost in a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingSource {
    RateTable,
    Manual,
    /// No band covered the shipment, so shipping was charged as zero.
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitResult {
    pub gross_revenue: f64,
    pub total_marketplace_fees: f64,
    pub shipping_cost: f64,
    pub shipping_source: ShippingSource,
    pub total_cost: f64,
    pub net_profit: f64,
    pub profit_margin_percent: f64,
    pub fee_breakdown: IndexMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_rule_requires_amounts_for_its_kind() {
        assert!(FeeRule::new(FeeType::Percentage, FeeApplication::PerItem, None, Some(1.0)).is_err());
        assert!(FeeRule::new(FeeType::Flat, FeeApplication::PerOrder, Some(10.0), None).is_err());
        assert!(FeeRule::new(FeeType::Compound, FeeApplication::PerItem, Some(10.0), None).is_err());
        assert!(FeeRule::new(FeeType::Compound, FeeApplication::PerItem, None, Some(0.3)).is_err());

        let rule = FeeRule::new(FeeType::Compound, FeeApplication::PerItem, Some(2.9), Some(0.3))
            .unwrap();
        assert_eq!(rule.fee_type(), FeeType::Compound);
        assert_eq!(rule.percentage(), Some(2.9));
        assert_eq!(rule.flat_amount(), Some(0.3));
    }

    #[test]
    fn test_fee_rule_ignores_unused_amount() {
        let rule =
            FeeRule::new(FeeType::Percentage, FeeApplication::PerItem, Some(13.25), Some(5.0)).unwrap();
        assert_eq!(rule.flat_amount(), None);
    }

    #[test]
    fn test_fee_rule_rejects_negative_and_nan() {
        assert!(matches!(
            FeeRule::flat(-0.3, FeeApplication::PerOrder),
            Err(ProfitError::InvalidFeeDefinition { .. })
        ));
        assert!(FeeRule::percentage_of_sale(f64::NAN, FeeApplication::PerItem).is_err());
    }

    #[test]
    fn test_shipping_service_rejects_inverted_limits() {
        let err = ShippingService::new(
            "Ground",
            WeightLimits { min: 10.0, max: 1.0 },
            vec![],
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ProfitError::InvalidShippingDefinition { .. }));
    }

    #[test]
    fn test_unknown_tier_lists_available() {
        let marketplace = Marketplace {
            name: "Etsy".to_string(),
            tiers: IndexMap::from([(
                "standard".to_string(),
                SellerTier {
                    name: "Standard".to_string(),
                    fees: IndexMap::new(),
                },
            )]),
        };
        match marketplace.tier("plus") {
            Err(ProfitError::UnknownTier { tier_id, available }) => {
                assert_eq!(tier_id, "plus");
                assert_eq!(available, vec!["standard".to_string()]);
            }
            other => panic!("expected UnknownTier, got {:?}", other),
        }
    }
}
