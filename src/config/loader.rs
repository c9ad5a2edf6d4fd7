use crate::domain::model::{
    FeeApplication, FeeRule, FeeType, Marketplace, SellerTier, ShippingCarrier, ShippingRateBand,
    ShippingService, WeightLimits,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ProfitError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceFile {
    pub name: String,
    pub tiers: IndexMap<String, TierDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierDefinition {
    pub name: String,
    #[serde(default)]
    pub fees: IndexMap<String, FeeDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeDefinition {
    pub r#type: FeeType,
    pub application: FeeApplication,
    pub value: Option<f64>,
    pub percentage: Option<f64>,
    pub flat_fee: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingFile {
    pub name: String,
    pub services: IndexMap<String, ServiceDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub name: String,
    pub weight_limits: WeightLimits,
    #[serde(default)]
    pub manual_entry: bool,
    #[serde(default)]
    pub rates: Vec<ShippingRateBand>,
}

impl FeeDefinition {
    /// `value` stands in for whichever single amount the fee type needs;
    /// the explicit `percentage` / `flat_fee` keys win when both are given.
    pub fn into_rule(self, fee_id: &str) -> Result<FeeRule> {
        let (percentage, flat_fee) = match self.r#type {
            FeeType::Percentage => (self.percentage.or(self.value), self.flat_fee),
            FeeType::Flat => (self.percentage, self.flat_fee.or(self.value)),
            FeeType::Compound => (self.percentage, self.flat_fee),
        };

        FeeRule::new(self.r#type, self.application, percentage, flat_fee).map_err(|e| match e {
            ProfitError::InvalidFeeDefinition { reason, .. } => ProfitError::InvalidFeeDefinition {
                fee_id: fee_id.to_string(),
                reason,
            },
            other => other,
        })
    }
}

impl MarketplaceFile {
    pub fn into_marketplace(self) -> Result<Marketplace> {
        let mut tiers = IndexMap::with_capacity(self.tiers.len());
        for (tier_id, tier) in self.tiers {
            let mut fees = IndexMap::with_capacity(tier.fees.len());
            for (fee_id, fee) in tier.fees {
                let rule = fee.into_rule(&format!("{}/{}", tier_id, fee_id))?;
                fees.insert(fee_id, rule);
            }
            tiers.insert(
                tier_id,
                SellerTier {
                    name: tier.name,
                    fees,
                },
            );
        }

        Ok(Marketplace {
            name: self.name,
            tiers,
        })
    }
}

impl ShippingFile {
    pub fn into_carrier(self) -> Result<ShippingCarrier> {
        let mut services = IndexMap::with_capacity(self.services.len());
        for (service_id, service) in self.services {
            let built = ShippingService::new(
                service.name,
                service.weight_limits,
                service.rates,
                service.manual_entry,
            )
            .map_err(|e| match e {
                ProfitError::InvalidShippingDefinition { reason, .. } => {
                    ProfitError::InvalidShippingDefinition {
                        service_id: service_id.clone(),
                        reason,
                    }
                }
                other => other,
            })?;
            services.insert(service_id, built);
        }

        Ok(ShippingCarrier {
            name: self.name,
            services,
        })
    }
}

pub fn parse_marketplace(content: &str) -> Result<Marketplace> {
    let file: MarketplaceFile = serde_json::from_str(content)?;
    file.into_marketplace()
}

pub fn parse_shipping(content: &str) -> Result<ShippingCarrier> {
    let file: ShippingFile = serde_json::from_str(content)?;
    file.into_carrier()
}

pub fn load_marketplace<P: AsRef<Path>>(path: P) -> Result<Marketplace> {
    let path = path.as_ref();
    tracing::debug!("Loading marketplace from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_marketplace(&content)
}

pub fn load_shipping<P: AsRef<Path>>(path: P) -> Result<ShippingCarrier> {
    let path = path.as_ref();
    tracing::debug!("Loading shipping carrier from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_shipping(&content)
}

/// `*.json` files directly inside `dir`, sorted by file name.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ProfitError::config(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load_dir<T, F, N>(dir: &Path, kind: &str, load: F, name_of: N) -> Result<IndexMap<String, T>>
where
    F: Fn(&Path) -> Result<T>,
    N: Fn(&T) -> &str,
{
    let mut loaded = IndexMap::new();
    for path in json_files(dir)? {
        let item = load(&path).map_err(|e| {
            tracing::error!("Failed to load {} file {}: {}", kind, path.display(), e);
            e
        })?;
        let name = name_of(&item).to_string();
        if loaded.contains_key(&name) {
            return Err(ProfitError::config(format!(
                "Duplicate {} name '{}' in {}",
                kind,
                name,
                path.display()
            )));
        }
        loaded.insert(name, item);
    }

    if loaded.is_empty() {
        tracing::warn!("No {} files found in {}", kind, dir.display());
    }
    Ok(loaded)
}

pub fn load_marketplaces_dir<P: AsRef<Path>>(dir: P) -> Result<IndexMap<String, Marketplace>> {
    load_dir(dir.as_ref(), "marketplace", |p| load_marketplace(p), |m| m.name.as_str())
}

pub fn load_carriers_dir<P: AsRef<Path>>(dir: P) -> Result<IndexMap<String, ShippingCarrier>> {
    load_dir(dir.as_ref(), "shipping", |p| load_shipping(p), |c| c.name.as_str())
}

/// Every marketplace and carrier available for calculations, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub marketplaces: IndexMap<String, Marketplace>,
    pub carriers: IndexMap<String, ShippingCarrier>,
}

impl Catalog {
    pub fn load<C: ConfigProvider>(config: &C) -> Result<Self> {
        let marketplaces = load_marketplaces_dir(config.marketplaces_dir())?;
        let carriers = load_carriers_dir(config.shipping_dir())?;
        tracing::info!(
            "Loaded {} marketplace(s) and {} carrier(s)",
            marketplaces.len(),
            carriers.len()
        );
        Ok(Self {
            marketplaces,
            carriers,
        })
    }

    pub fn marketplace(&self, name: &str) -> Result<&Marketplace> {
        self.marketplaces
            .get(name)
            .ok_or_else(|| ProfitError::UnknownMarketplace {
                name: name.to_string(),
                available: self.marketplaces.keys().cloned().collect(),
            })
    }

    pub fn carrier(&self, name: &str) -> Result<&ShippingCarrier> {
        self.carriers
            .get(name)
            .ok_or_else(|| ProfitError::UnknownCarrier {
                name: name.to_string(),
                available: self.carriers.keys().cloned().collect(),
            })
    }
}
