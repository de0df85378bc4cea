//! Subscription tiers and the marketing-facing pricing catalog
//!
//! The catalog is the single source for everything the pricing page shows:
//! display names, monthly/annual prices and the per-plan feature summary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TierError {
    #[error("Unknown tier: {0}")]
    UnknownTier(String),
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),
}

/// Subscription tier, ordered cheapest to most expensive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Tier {
    #[default]
    Free,
    Starter,
    Neural,
    Premium,
}

impl Tier {
    /// All tiers in ascending rank order
    pub const ALL: [Tier; 4] = [Tier::Free, Tier::Starter, Tier::Neural, Tier::Premium];

    /// Position on the upgrade ladder (free = 0)
    pub fn rank(&self) -> u8 {
        match self {
            Tier::Free => 0,
            Tier::Starter => 1,
            Tier::Neural => 2,
            Tier::Premium => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Starter => "starter",
            Tier::Neural => "neural",
            Tier::Premium => "premium",
        }
    }

    pub fn is_paid(&self) -> bool {
        !matches!(self, Tier::Free)
    }

    /// The one tier the catalog highlights on the pricing page.
    /// Its catalog entry is the only one with `recommended: true`.
    pub const fn recommended() -> Tier {
        Tier::Neural
    }

    /// Marketing-facing pricing entry for this tier
    pub fn pricing(&self) -> &'static TierPricing {
        match self {
            Tier::Free => &FREE_PRICING,
            Tier::Starter => &STARTER_PRICING,
            Tier::Neural => &NEURAL_PRICING,
            Tier::Premium => &PREMIUM_PRICING,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "starter" => Ok(Tier::Starter),
            "neural" => Ok(Tier::Neural),
            "premium" => Ok(Tier::Premium),
            other => Err(TierError::UnknownTier(other.to_string())),
        }
    }
}

/// Subscription billing cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Monthly,
    Annual,
}

impl BillingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Annual => "annual",
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-plan feature summary shown on the pricing page.
/// Copy strings, not enforcement values; the limit table enforces.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeatureSummary {
    pub ai_usage: &'static str,
    pub apps: &'static str,
    pub preview_runs: u32,
    pub storage: &'static str,
    pub private_projects: bool,
    pub exports: &'static str,
    pub models: &'static str,
    pub byok: bool,
    pub add_ons: bool,
    pub support: &'static str,
}

/// Pricing catalog entry for one tier
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TierPricing {
    pub name: &'static str,
    pub price: f64,
    pub price_formatted: &'static str,
    pub price_annual: f64,
    pub price_annual_formatted: &'static str,
    pub description: &'static str,
    pub recommended: bool,
    pub features: PlanFeatureSummary,
}

static FREE_PRICING: TierPricing = TierPricing {
    name: "Free",
    price: 0.0,
    price_formatted: "$0",
    price_annual: 0.0,
    price_annual_formatted: "$0",
    description: "For trying only",
    recommended: false,
    features: PlanFeatureSummary {
        ai_usage: "Very Low",
        apps: "5",
        preview_runs: 5,
        storage: "Tiny",
        private_projects: false,
        exports: "None",
        models: "Default Model Only",
        byok: false,
        add_ons: false,
        support: "Community",
    },
};

static STARTER_PRICING: TierPricing = TierPricing {
    name: "Starter",
    price: 7.99,
    price_formatted: "$7.99",
    price_annual: 79.0,
    price_annual_formatted: "$79",
    description: "Beginner-friendly",
    recommended: false,
    features: PlanFeatureSummary {
        ai_usage: "Low",
        apps: "25",
        preview_runs: 150,
        storage: "Small",
        private_projects: true,
        exports: "GitHub Export",
        models: "Default Models",
        byok: false,
        add_ons: false,
        support: "Standard",
    },
};

static NEURAL_PRICING: TierPricing = TierPricing {
    name: "Neural",
    price: 14.99,
    price_formatted: "$14.99",
    price_annual: 149.0,
    price_annual_formatted: "$149",
    description: "Best plan",
    recommended: true,
    features: PlanFeatureSummary {
        ai_usage: "Medium",
        apps: "65",
        preview_runs: 500,
        storage: "Medium",
        private_projects: true,
        exports: "Full Export + GitHub",
        models: "Default Models",
        byok: false,
        add_ons: true,
        support: "Priority",
    },
};

static PREMIUM_PRICING: TierPricing = TierPricing {
    name: "Premium",
    price: 24.99,
    price_formatted: "$24.99",
    price_annual: 249.0,
    price_annual_formatted: "$249",
    description: "Heavy users",
    recommended: false,
    features: PlanFeatureSummary {
        ai_usage: "High",
        apps: "100+",
        preview_runs: 5000,
        storage: "Large",
        private_projects: true,
        exports: "Full Export",
        models: "Default Models + BYOK",
        byok: true,
        add_ons: true,
        support: "Priority",
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse_roundtrip() {
        for tier in Tier::ALL {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
    }

    #[test]
    fn test_tier_parse_case_insensitive() {
        assert_eq!("NEURAL".parse::<Tier>().unwrap(), Tier::Neural);
    }

    #[test]
    fn test_tier_parse_unknown() {
        let err = "enterprise".parse::<Tier>().unwrap_err();
        assert_eq!(err, TierError::UnknownTier("enterprise".to_string()));
    }

    #[test]
    fn test_tier_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Premium).unwrap(), "\"premium\"");
        let tier: Tier = serde_json::from_str("\"starter\"").unwrap();
        assert_eq!(tier, Tier::Starter);
    }

    #[test]
    fn test_rank_strictly_increasing() {
        for pair in Tier::ALL.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_exactly_one_recommended() {
        let recommended: Vec<Tier> = Tier::ALL
            .into_iter()
            .filter(|t| t.pricing().recommended)
            .collect();
        assert_eq!(recommended, vec![Tier::recommended()]);
    }

    #[test]
    fn test_premium_pricing() {
        let pricing = Tier::Premium.pricing();
        assert_eq!(pricing.price_formatted, "$24.99");
        assert_eq!(pricing.price_annual_formatted, "$249");
        assert_eq!(pricing.price, 24.99);
    }

    #[test]
    fn test_pricing_lookup_idempotent() {
        for tier in Tier::ALL {
            let first = serde_json::to_string(tier.pricing()).unwrap();
            let second = serde_json::to_string(tier.pricing()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_only_free_is_unpaid() {
        assert!(!Tier::Free.is_paid());
        assert!(Tier::Starter.is_paid());
        assert!(Tier::Neural.is_paid());
        assert!(Tier::Premium.is_paid());
    }
}
