//! Tier-gated feature checks
//!
//! Boolean gating questions ("may this account create a private project?")
//! answered by composing the limit table flags.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::catalog::{Tier, TierError};

/// Plan-gated features
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    PrivateProjects,
    GithubExport,
    Byok,
    AddOns,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::PrivateProjects,
        Feature::GithubExport,
        Feature::Byok,
        Feature::AddOns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::PrivateProjects => "private-projects",
            Feature::GithubExport => "github-export",
            Feature::Byok => "byok",
            Feature::AddOns => "add-ons",
        }
    }

    /// Whether a plan includes this feature
    pub fn allowed_for(&self, tier: Tier) -> bool {
        let limits = tier.limits();
        match self {
            Feature::PrivateProjects => limits.private_projects,
            Feature::GithubExport => limits.github_export,
            Feature::Byok => limits.byok,
            Feature::AddOns => limits.add_ons,
        }
    }

    /// Cheapest tier that includes this feature, None if no tier does
    pub fn minimum_tier(&self) -> Option<Tier> {
        Tier::ALL.into_iter().find(|t| self.allowed_for(*t))
    }
}

impl FromStr for Feature {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private-projects" => Ok(Feature::PrivateProjects),
            "github-export" => Ok(Feature::GithubExport),
            "byok" => Ok(Feature::Byok),
            "add-ons" => Ok(Feature::AddOns),
            other => Err(TierError::UnknownFeature(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_tier_gates_everything() {
        for feature in Feature::ALL {
            assert!(!feature.allowed_for(Tier::Free));
        }
    }

    #[test]
    fn test_byok_is_premium_only() {
        assert!(!Feature::Byok.allowed_for(Tier::Starter));
        assert!(!Feature::Byok.allowed_for(Tier::Neural));
        assert!(Feature::Byok.allowed_for(Tier::Premium));
        assert_eq!(Feature::Byok.minimum_tier(), Some(Tier::Premium));
    }

    #[test]
    fn test_private_projects_from_starter() {
        assert!(Feature::PrivateProjects.allowed_for(Tier::Starter));
        assert_eq!(
            Feature::PrivateProjects.minimum_tier(),
            Some(Tier::Starter)
        );
    }

    #[test]
    fn test_add_ons_from_neural() {
        assert!(!Feature::AddOns.allowed_for(Tier::Starter));
        assert!(Feature::AddOns.allowed_for(Tier::Neural));
        assert_eq!(Feature::AddOns.minimum_tier(), Some(Tier::Neural));
    }

    #[test]
    fn test_feature_parse_roundtrip() {
        for feature in Feature::ALL {
            assert_eq!(feature.as_str().parse::<Feature>().unwrap(), feature);
        }
    }

    #[test]
    fn test_feature_parse_unknown() {
        let err = "teleportation".parse::<Feature>().unwrap_err();
        assert_eq!(err, TierError::UnknownFeature("teleportation".to_string()));
    }
}
