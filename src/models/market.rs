use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketDemand {
    Weak,
    #[default]
    Medium,
    High,
    #[serde(rename = "Very Strong", alias = "VeryStrong")]
    VeryStrong,
}

impl MarketDemand {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketDemand::Weak => "Weak",
            MarketDemand::Medium => "Medium",
            MarketDemand::High => "High",
            MarketDemand::VeryStrong => "Very Strong",
        }
    }
}

impl std::fmt::Display for MarketDemand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current market prices in INR per quintal, keyed by crop name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub prices: BTreeMap<String, f64>,
}

impl MarketSnapshot {
    pub fn new(prices: BTreeMap<String, f64>) -> Self {
        Self { prices }
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn price_for(&self, crop: &str) -> Option<f64> {
        self.prices.get(crop).copied()
    }

    pub fn average_price(&self) -> Option<f64> {
        if self.prices.is_empty() {
            return None;
        }
        Some(self.prices.values().sum::<f64>() / self.prices.len() as f64)
    }

    /// Demand relative to the snapshot average. Crops without a quote
    /// are treated as trading at the average.
    pub fn demand_for(&self, crop: &str) -> Option<MarketDemand> {
        let average = self.average_price()?;
        let price = self.price_for(crop).unwrap_or(average);

        let demand = if price > average * 1.2 {
            MarketDemand::VeryStrong
        } else if price > average * 1.1 {
            MarketDemand::High
        } else if price < average * 0.9 {
            MarketDemand::Weak
        } else {
            MarketDemand::Medium
        };
        Some(demand)
    }
}
