//! Billing price resolution
//!
//! Maps (tier, billing period) to the Stripe price id used when creating a
//! checkout session. Price ids come from the environment and are validated
//! eagerly at startup: in production a missing id refuses to start the
//! process instead of leaking a placeholder into a live payment flow.
//! Development keeps the placeholder fallback so the app runs without a
//! Stripe account.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::tier::{BillingPeriod, Tier};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    #[error("The free tier has no purchasable price")]
    NoPriceForFreeTier,
    #[error("Missing required configuration: {0}")]
    MissingConfiguration(String),
}

/// Deployment mode, from ADRIEL_ENV. Anything but "production" is
/// treated as development.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    Production,
    Development,
}

impl Deployment {
    pub fn from_env() -> Self {
        match std::env::var("ADRIEL_ENV").as_deref() {
            Ok("production") => Deployment::Production,
            _ => Deployment::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Deployment::Production => "production",
            Deployment::Development => "development",
        }
    }
}

/// Resolved purchasable price point, handed to the checkout session creator
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceReference {
    pub tier: Tier,
    pub period: BillingPeriod,
    pub price_id: String,
}

/// Every purchasable (tier, period) pair
const PAID_PRICES: [(Tier, BillingPeriod); 6] = [
    (Tier::Starter, BillingPeriod::Monthly),
    (Tier::Starter, BillingPeriod::Annual),
    (Tier::Neural, BillingPeriod::Monthly),
    (Tier::Neural, BillingPeriod::Annual),
    (Tier::Premium, BillingPeriod::Monthly),
    (Tier::Premium, BillingPeriod::Annual),
];

fn price_env_var(tier: Tier, period: BillingPeriod) -> &'static str {
    match (tier, period) {
        (Tier::Starter, BillingPeriod::Monthly) => "STRIPE_PRICE_ID_STARTER_MONTHLY",
        (Tier::Starter, BillingPeriod::Annual) => "STRIPE_PRICE_ID_STARTER_ANNUAL",
        (Tier::Neural, BillingPeriod::Monthly) => "STRIPE_PRICE_ID_NEURAL_MONTHLY",
        (Tier::Neural, BillingPeriod::Annual) => "STRIPE_PRICE_ID_NEURAL_ANNUAL",
        (Tier::Premium, BillingPeriod::Monthly) => "STRIPE_PRICE_ID_PREMIUM_MONTHLY",
        (Tier::Premium, BillingPeriod::Annual) => "STRIPE_PRICE_ID_PREMIUM_ANNUAL",
        (Tier::Free, _) => unreachable!("free tier has no price"),
    }
}

/// Development stand-in id, e.g. "price_starter_monthly"
fn placeholder_price_id(tier: Tier, period: BillingPeriod) -> String {
    format!("price_{}_{}", tier, period)
}

/// Validated price table, built once at startup
#[derive(Debug, Clone)]
pub struct BillingConfig {
    deployment: Deployment,
    prices: HashMap<(Tier, BillingPeriod), String>,
}

impl BillingConfig {
    /// Read and validate all price ids from the process environment
    pub fn from_env() -> Result<Self, BillingError> {
        Self::from_lookup(Deployment::from_env(), |var| std::env::var(var).ok())
    }

    /// Build from an explicit lookup. In production every paid pair must
    /// resolve; in development missing values fall back to placeholders.
    pub fn from_lookup(
        deployment: Deployment,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, BillingError> {
        let mut prices = HashMap::new();

        for (tier, period) in PAID_PRICES {
            let var = price_env_var(tier, period);
            let price_id = match lookup(var) {
                Some(id) if !id.is_empty() => id,
                _ => {
                    if deployment == Deployment::Production {
                        return Err(BillingError::MissingConfiguration(var.to_string()));
                    }
                    let placeholder = placeholder_price_id(tier, period);
                    tracing::warn!("{} not set, using dev placeholder {}", var, placeholder);
                    placeholder
                }
            };
            prices.insert((tier, period), price_id);
        }

        Ok(Self { deployment, prices })
    }

    pub fn deployment(&self) -> Deployment {
        self.deployment
    }

    /// Whether any configured id is still a dev placeholder
    pub fn uses_placeholders(&self) -> bool {
        self.prices
            .iter()
            .any(|((tier, period), id)| *id == placeholder_price_id(*tier, *period))
    }

    /// Resolve the purchasable price for a (tier, period) pair
    pub fn resolve_price_id(
        &self,
        tier: Tier,
        period: BillingPeriod,
    ) -> Result<PriceReference, BillingError> {
        if tier == Tier::Free {
            return Err(BillingError::NoPriceForFreeTier);
        }

        let price_id = self
            .prices
            .get(&(tier, period))
            .cloned()
            .ok_or_else(|| BillingError::MissingConfiguration(price_env_var(tier, period).to_string()))?;

        Ok(PriceReference {
            tier,
            period,
            price_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_lookup(var: &str) -> Option<String> {
        // Realistic Stripe ids, keyed by the env var suffix
        Some(format!("price_1Nx{}", var.trim_start_matches("STRIPE_PRICE_ID_")))
    }

    #[test]
    fn test_production_resolves_configured_ids() {
        let config = BillingConfig::from_lookup(Deployment::Production, full_lookup).unwrap();
        let price = config
            .resolve_price_id(Tier::Starter, BillingPeriod::Monthly)
            .unwrap();
        assert_eq!(price.price_id, "price_1NxSTARTER_MONTHLY");
        assert!(!config.uses_placeholders());
    }

    #[test]
    fn test_production_missing_var_fails_fast() {
        let err = BillingConfig::from_lookup(Deployment::Production, |var| {
            if var == "STRIPE_PRICE_ID_NEURAL_ANNUAL" {
                None
            } else {
                full_lookup(var)
            }
        })
        .unwrap_err();
        assert_eq!(
            err,
            BillingError::MissingConfiguration("STRIPE_PRICE_ID_NEURAL_ANNUAL".to_string())
        );
    }

    #[test]
    fn test_production_rejects_empty_value() {
        let err = BillingConfig::from_lookup(Deployment::Production, |_| Some(String::new()))
            .unwrap_err();
        assert!(matches!(err, BillingError::MissingConfiguration(_)));
    }

    #[test]
    fn test_development_falls_back_to_placeholders() {
        let config = BillingConfig::from_lookup(Deployment::Development, |_| None).unwrap();
        let price = config
            .resolve_price_id(Tier::Starter, BillingPeriod::Monthly)
            .unwrap();
        assert_eq!(price.price_id, "price_starter_monthly");
        assert!(config.uses_placeholders());
    }

    #[test]
    fn test_free_tier_has_no_price() {
        let config = BillingConfig::from_lookup(Deployment::Development, |_| None).unwrap();
        for period in [BillingPeriod::Monthly, BillingPeriod::Annual] {
            assert_eq!(
                config.resolve_price_id(Tier::Free, period).unwrap_err(),
                BillingError::NoPriceForFreeTier
            );
        }
    }

    #[test]
    fn test_every_paid_pair_resolves() {
        let config = BillingConfig::from_lookup(Deployment::Production, full_lookup).unwrap();
        for tier in Tier::ALL.into_iter().filter(Tier::is_paid) {
            for period in [BillingPeriod::Monthly, BillingPeriod::Annual] {
                assert!(config.resolve_price_id(tier, period).is_ok());
            }
        }
    }

    #[test]
    fn test_production_never_serves_placeholder_pattern() {
        let config = BillingConfig::from_lookup(Deployment::Production, full_lookup).unwrap();
        for (tier, period) in PAID_PRICES {
            let resolved = config.resolve_price_id(tier, period).unwrap();
            assert_ne!(resolved.price_id, placeholder_price_id(tier, period));
        }
    }
}
