//! Stock tier classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::item::ItemSnapshot;

/// Derived stock level of an item relative to its minimum threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockTier {
    /// At or below the minimum.
    Critical,
    /// Above the minimum but not above twice the minimum.
    Low,
    Normal,
}

impl StockTier {
    pub fn classify(current: Decimal, min: Decimal) -> Self {
        if current <= min {
            StockTier::Critical
        } else if current <= min * Decimal::TWO {
            StockTier::Low
        } else {
            StockTier::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockTier::Critical => "critical",
            StockTier::Low => "low",
            StockTier::Normal => "normal",
        }
    }
}

impl std::fmt::Display for StockTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One slice of a stock summary chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSlice {
    pub tier: StockTier,
    pub count: u64,
}

/// Aggregate tier counts over a set of items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub critical: u64,
    pub low: u64,
    pub normal: u64,
}

impl StockSummary {
    /// Builds a summary from the active items in `items`.
    pub fn from_levels<'a>(items: impl IntoIterator<Item = &'a ItemSnapshot>) -> Self {
        items
            .into_iter()
            .filter(|item| item.active)
            .fold(Self::default(), |mut summary, item| {
                summary.add(item.stock_tier());
                summary
            })
    }

    pub fn add(&mut self, tier: StockTier) {
        match tier {
            StockTier::Critical => self.critical += 1,
            StockTier::Low => self.low += 1,
            StockTier::Normal => self.normal += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.critical + self.low + self.normal
    }

    /// Chart slices in severity order, empty tiers included.
    pub fn slices(&self) -> [StockSlice; 3] {
        [
            StockSlice {
                tier: StockTier::Critical,
                count: self.critical,
            },
            StockSlice {
                tier: StockTier::Low,
                count: self.low,
            },
            StockSlice {
                tier: StockTier::Normal,
                count: self.normal,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;
    use rust_decimal_macros::dec;

    fn snapshot(current: Decimal, min: Decimal, active: bool) -> ItemSnapshot {
        ItemSnapshot {
            id: 1,
            kind: ItemKind::Tool,
            name: "Drill".to_string(),
            initial_quantity: current,
            current_quantity: current,
            min_quantity: min,
            active,
        }
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(StockTier::classify(dec!(5.00), dec!(5.00)), StockTier::Critical);
        assert_eq!(StockTier::classify(dec!(5.01), dec!(5.00)), StockTier::Low);
        assert_eq!(StockTier::classify(dec!(10.00), dec!(5.00)), StockTier::Low);
        assert_eq!(StockTier::classify(dec!(10.01), dec!(5.00)), StockTier::Normal);
    }

    #[test]
    fn test_classify_empty_item_is_critical() {
        assert_eq!(StockTier::classify(dec!(0.00), dec!(0.00)), StockTier::Critical);
        assert_eq!(StockTier::classify(dec!(0.00), dec!(3.00)), StockTier::Critical);
    }

    #[test]
    fn test_classify_zero_minimum() {
        assert_eq!(StockTier::classify(dec!(0.01), dec!(0.00)), StockTier::Normal);
    }

    #[test]
    fn test_summary_skips_inactive_items() {
        let items = vec![
            snapshot(dec!(1), dec!(5), true),
            snapshot(dec!(7), dec!(5), true),
            snapshot(dec!(50), dec!(5), true),
            snapshot(dec!(0), dec!(5), false),
        ];

        let summary = StockSummary::from_levels(&items);

        assert_eq!(summary.critical, 1);
        assert_eq!(summary.low, 1);
        assert_eq!(summary.normal, 1);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.slices()[0].tier, StockTier::Critical);
    }
}
