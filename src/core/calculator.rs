use crate::domain::model::{
    Marketplace, ProfitRequest, ProfitResult, ShippingCarrier, ShippingSource,
};
use crate::utils::error::{ProfitError, Result};
use crate::utils::validation::{
    validate_non_empty_identifier, validate_non_negative_amount, validate_positive_amount,
    validate_positive_quantity,
};
use indexmap::IndexMap;

/// Computes seller profit against one marketplace and one carrier.
///
/// Holds only borrowed, read-only tables, so a calculator is cheap to build
/// per call and safe to share between threads.
#[derive(Debug, Clone, Copy)]
pub struct ProfitCalculator<'a> {
    marketplace: &'a Marketplace,
    carrier: &'a ShippingCarrier,
}

impl<'a> ProfitCalculator<'a> {
    pub fn new(marketplace: &'a Marketplace, carrier: &'a ShippingCarrier) -> Self {
        Self {
            marketplace,
            carrier,
        }
    }

    pub fn calculate_profit(&self, request: &ProfitRequest) -> Result<ProfitResult> {
        let service = self.carrier.service(&request.shipping_service_id)?;
        let is_manual = service.is_manual_entry();

        validate_positive_amount("sale_price", request.sale_price)?;
        validate_positive_quantity("quantity", request.quantity)?;
        validate_non_negative_amount("cost_per_item", request.cost_per_item)?;
        validate_non_empty_identifier("tier_id", &request.tier_id)?;
        validate_non_empty_identifier("shipping_service_id", &request.shipping_service_id)?;

        let manual_price = if is_manual {
            let price = request.manual_shipping_price.ok_or_else(|| {
                ProfitError::invalid_input(
                    "manual_shipping_price",
                    "",
                    format!("Service '{}' requires a manual shipping price", service.name()),
                )
            })?;
            validate_non_negative_amount("manual_shipping_price", price)?;
            Some(price)
        } else {
            validate_positive_amount("weight_per_item", request.weight_per_item)?;
            None
        };

        let tier = self.marketplace.tier(&request.tier_id).map_err(|e| {
            tracing::warn!(
                "Tier '{}' not found in marketplace '{}'",
                request.tier_id,
                self.marketplace.name
            );
            e
        })?;

        let quantity = f64::from(request.quantity);
        let gross_revenue = request.sale_price * quantity;
        tracing::debug!("Gross revenue: ${:.2}", gross_revenue);

        let mut fee_breakdown = IndexMap::with_capacity(tier.fees.len());
        let mut total_marketplace_fees = 0.0;
        for (fee_id, fee) in &tier.fees {
            let amount = fee.calculate(request.sale_price, request.quantity);
            tracing::debug!("Fee {}: ${:.2}", fee_id, amount);
            total_marketplace_fees += amount;
            fee_breakdown.insert(fee_id.clone(), amount);
        }

        let (shipping_cost, shipping_source) = match manual_price {
            Some(price) => (price, ShippingSource::Manual),
            None => {
                let total_weight = request.weight_per_item * quantity;
                match service.resolve_rate(total_weight) {
                    Some(price) => (price, ShippingSource::RateTable),
                    None => {
                        // Unshippable weight is charged as free shipping, not an error.
                        tracing::warn!(
                            "No shipping rate for {} at total weight {}; shipping counted as $0.00",
                            service.name(),
                            total_weight
                        );
                        (0.0, ShippingSource::OutOfRange)
                    }
                }
            }
        };
        tracing::debug!("Shipping cost: ${:.2} ({:?})", shipping_cost, shipping_source);

        let item_cost = request.cost_per_item * quantity;
        let total_cost = item_cost + total_marketplace_fees + shipping_cost;
        let net_profit = gross_revenue - total_cost;

        ensure_finite("sale_price", request.sale_price, gross_revenue)?;
        ensure_finite("sale_price", request.sale_price, total_marketplace_fees)?;
        ensure_finite("cost_per_item", request.cost_per_item, item_cost)?;
        ensure_finite("cost_per_item", request.cost_per_item, total_cost)?;
        ensure_finite("sale_price", request.sale_price, net_profit)?;
        let profit_margin_percent = if gross_revenue > 0.0 {
            net_profit / gross_revenue * 100.0
        } else {
            0.0
        };

        tracing::debug!(
            "Totals: cost=${:.2}, profit=${:.2}, margin={:.2}%",
            total_cost,
            net_profit,
            profit_margin_percent
        );

        Ok(ProfitResult {
            gross_revenue,
            total_marketplace_fees,
            shipping_cost,
            shipping_source,
            total_cost,
            net_profit,
            profit_margin_percent,
            fee_breakdown,
        })
    }
}

/// Inputs that pass their own checks can still overflow once multiplied out.
fn ensure_finite(field: &str, input: f64, computed: f64) -> Result<()> {
    if computed.is_finite() {
        return Ok(());
    }
    tracing::warn!("{} = {} overflows the calculation", field, input);
    Err(ProfitError::invalid_input(
        field,
        input,
        "Value is too large to calculate with",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        FeeApplication, FeeRule, SellerTier, ShippingRateBand, ShippingService, WeightLimits,
    };

    fn marketplace() -> Marketplace {
        let mut fees = IndexMap::new();
        fees.insert(
            "final_value".to_string(),
            FeeRule::percentage_of_sale(15.0, FeeApplication::PerItem).unwrap(),
        );
        fees.insert(
            "order_fee".to_string(),
            FeeRule::flat(0.30, FeeApplication::PerOrder).unwrap(),
        );
        Marketplace {
            name: "eBay".to_string(),
            tiers: IndexMap::from([(
                "standard".to_string(),
                SellerTier {
                    name: "Standard".to_string(),
                    fees,
                },
            )]),
        }
    }

    fn carrier() -> ShippingCarrier {
        let ground = ShippingService::new(
            "Ground Advantage",
            WeightLimits { min: 1.0, max: 32.0 },
            vec![
                ShippingRateBand {
                    weight_up_to: 8.0,
                    price: 4.50,
                },
                ShippingRateBand {
                    weight_up_to: 16.0,
                    price: 6.00,
                },
            ],
            false,
        )
        .unwrap();
        let freight = ShippingService::new(
            "Freight",
            WeightLimits { min: 0.0, max: 0.0 },
            vec![],
            true,
        )
        .unwrap();
        ShippingCarrier {
            name: "USPS".to_string(),
            services: IndexMap::from([
                ("ground".to_string(), ground),
                ("freight".to_string(), freight),
            ]),
        }
    }

    fn request() -> ProfitRequest {
        ProfitRequest {
            sale_price: 20.0,
            quantity: 3,
            cost_per_item: 5.0,
            weight_per_item: 4.0,
            tier_id: "standard".to_string(),
            shipping_service_id: "ground".to_string(),
            manual_shipping_price: None,
        }
    }

    #[test]
    fn test_unknown_service_is_checked_before_inputs() {
        let (m, c) = (marketplace(), carrier());
        let calc = ProfitCalculator::new(&m, &c);
        let mut req = request();
        req.shipping_service_id = "drone".to_string();
        req.sale_price = -1.0;
        assert!(matches!(
            calc.calculate_profit(&req),
            Err(ProfitError::UnknownShippingService { .. })
        ));
    }

    #[test]
    fn test_inputs_are_checked_before_tier() {
        let (m, c) = (marketplace(), carrier());
        let calc = ProfitCalculator::new(&m, &c);
        let mut req = request();
        req.tier_id = "gold".to_string();
        req.quantity = 0;
        match calc.calculate_profit(&req) {
            Err(ProfitError::InvalidInput { field, .. }) => assert_eq!(field, "quantity"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_weight_required_for_rated_service() {
        let (m, c) = (marketplace(), carrier());
        let calc = ProfitCalculator::new(&m, &c);
        let mut req = request();
        req.weight_per_item = 0.0;
        match calc.calculate_profit(&req) {
            Err(ProfitError::InvalidInput { field, .. }) => assert_eq!(field, "weight_per_item"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_manual_service_requires_price() {
        let (m, c) = (marketplace(), carrier());
        let calc = ProfitCalculator::new(&m, &c);
        let mut req = request();
        req.shipping_service_id = "freight".to_string();
        assert!(matches!(
            calc.calculate_profit(&req),
            Err(ProfitError::InvalidInput { .. })
        ));

        req.manual_shipping_price = Some(-2.0);
        assert!(matches!(
            calc.calculate_profit(&req),
            Err(ProfitError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_manual_price_of_zero_is_allowed() {
        let (m, c) = (marketplace(), carrier());
        let calc = ProfitCalculator::new(&m, &c);
        let mut req = request();
        req.shipping_service_id = "freight".to_string();
        req.manual_shipping_price = Some(0.0);
        let result = calc.calculate_profit(&req).unwrap();
        assert_eq!(result.shipping_cost, 0.0);
        assert_eq!(result.shipping_source, ShippingSource::Manual);
    }

    #[test]
    fn test_identifiers_are_not_trimmed() {
        let (mut m, c) = (marketplace(), carrier());
        let calc = ProfitCalculator::new(&m, &c);
        let mut req = request();
        req.tier_id = " ".to_string();
        assert!(matches!(
            calc.calculate_profit(&req),
            Err(ProfitError::UnknownTier { .. })
        ));

        let standard = m.tiers["standard"].clone();
        m.tiers.insert(" ".to_string(), standard);
        let calc = ProfitCalculator::new(&m, &c);
        assert!(calc.calculate_profit(&req).is_ok());

        req.tier_id = String::new();
        match calc.calculate_profit(&req) {
            Err(ProfitError::InvalidInput { field, .. }) => assert_eq!(field, "tier_id"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_cost_is_invalid_input() {
        let (m, c) = (marketplace(), carrier());
        let calc = ProfitCalculator::new(&m, &c);
        let mut req = request();
        req.cost_per_item = f64::MAX;
        match calc.calculate_profit(&req) {
            Err(ProfitError::InvalidInput { field, .. }) => assert_eq!(field, "cost_per_item"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_breakdown_follows_tier_order() {
        let (m, c) = (marketplace(), carrier());
        let calc = ProfitCalculator::new(&m, &c);
        let result = calc.calculate_profit(&request()).unwrap();
        let keys: Vec<&str> = result.fee_breakdown.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["final_value", "order_fee"]);
        assert_eq!(result.shipping_source, ShippingSource::RateTable);
    }
}
