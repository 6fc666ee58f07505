//! Customer loyalty grades.
//!
//! A grade is never stored: it is always derived from the customer's
//! cumulative charge total via [`Grade::for_total`], so it can never drift
//! from the amount that earned it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::money::Money;

/// Loyalty grade tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    Bronze,
    Silver,
    Gold,
    Diamond,
    #[serde(rename = "VIP")]
    Vip,
}

impl Grade {
    /// Compute the grade earned by a cumulative charge total.
    ///
    /// Descending threshold ladder; the first matching threshold wins.
    #[must_use]
    pub fn for_total(total_charge: Money) -> Self {
        if total_charge >= Money::from(5_000_000) {
            Self::Vip
        } else if total_charge >= Money::from(3_000_000) {
            Self::Diamond
        } else if total_charge >= Money::from(1_500_000) {
            Self::Gold
        } else if total_charge >= Money::from(500_000) {
            Self::Silver
        } else {
            Self::Bronze
        }
    }

    /// Display name, as shown to customers and stored nowhere.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Diamond => "Diamond",
            Self::Vip => "VIP",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_boundaries() {
        assert_eq!(Grade::for_total(Money::ZERO), Grade::Bronze);
        assert_eq!(Grade::for_total(Money::from(499_999)), Grade::Bronze);
        assert_eq!(Grade::for_total(Money::from(500_000)), Grade::Silver);
        assert_eq!(Grade::for_total(Money::from(1_499_999)), Grade::Silver);
        assert_eq!(Grade::for_total(Money::from(1_500_000)), Grade::Gold);
        assert_eq!(Grade::for_total(Money::from(2_999_999)), Grade::Gold);
        assert_eq!(Grade::for_total(Money::from(3_000_000)), Grade::Diamond);
        assert_eq!(Grade::for_total(Money::from(4_999_999)), Grade::Diamond);
        assert_eq!(Grade::for_total(Money::from(5_000_000)), Grade::Vip);
        assert_eq!(Grade::for_total(Money::from(99_000_000)), Grade::Vip);
    }

    #[test]
    fn test_monotonic_in_total_charge() {
        let steps: Vec<Money> = (0..=60).map(|i| Money::from(i * 100_000)).collect();
        let mut last = Grade::Bronze;
        for total in steps {
            let grade = Grade::for_total(total);
            assert!(grade >= last, "grade regressed at total {total}");
            last = grade;
        }
    }

    #[test]
    fn test_vip_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&Grade::Vip).expect("serialize"),
            "\"VIP\""
        );
        assert_eq!(
            serde_json::to_string(&Grade::Bronze).expect("serialize"),
            "\"Bronze\""
        );
    }
}
