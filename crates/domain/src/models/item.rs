//! Inventory item domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::validation::{max_quantity, QUANTITY_SCALE};
use std::str::FromStr;
use validator::ValidationError;

use super::stock::StockTier;

/// Identifier of a tool or material row.
pub type ItemId = i64;

/// Maximum length of an item name.
pub const MAX_ITEM_NAME_LENGTH: usize = 100;

/// The two kinds of trackable inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Tool,
    Material,
}

impl ItemKind {
    pub const ALL: [ItemKind; 2] = [ItemKind::Tool, ItemKind::Material];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Tool => "tool",
            ItemKind::Material => "material",
        }
    }

    /// Collection name used in URLs and table names.
    pub fn plural(&self) -> &'static str {
        match self {
            ItemKind::Tool => "tools",
            ItemKind::Material => "materials",
        }
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tool" | "tools" => Ok(ItemKind::Tool),
            "material" | "materials" => Ok(ItemKind::Material),
            _ => Err(format!("Unknown item kind: {}", s)),
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Point-in-time view of an item as the ledger sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: String,
    /// Quantity seeded at creation; the origin for movement replay.
    pub initial_quantity: Decimal,
    pub current_quantity: Decimal,
    pub min_quantity: Decimal,
    pub active: bool,
}

impl ItemSnapshot {
    pub fn stock_tier(&self) -> StockTier {
        StockTier::classify(self.current_quantity, self.min_quantity)
    }
}

/// Input for registering a new item in the catalog.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub kind: ItemKind,
    pub name: String,
    pub initial_quantity: Decimal,
    pub min_quantity: Decimal,
}

impl NewItem {
    pub fn new(
        kind: ItemKind,
        name: impl Into<String>,
        initial_quantity: Decimal,
        min_quantity: Decimal,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            initial_quantity,
            min_quantity,
        }
    }

    /// Checks the name and both quantities against the catalog column domains.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > MAX_ITEM_NAME_LENGTH {
            let mut err = ValidationError::new("name_length");
            err.message = Some("Name must be 1-100 characters".into());
            return Err(err);
        }
        validate_stock_level(self.initial_quantity)?;
        validate_stock_level(self.min_quantity)
    }
}

/// Validates a stored quantity: non-negative, two decimals, within range.
pub fn validate_stock_level(value: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("quantity_negative");
        err.message = Some("Quantity cannot be negative".into());
        return Err(err);
    }
    if value.normalize().scale() > QUANTITY_SCALE {
        let mut err = ValidationError::new("quantity_precision");
        err.message = Some("Quantity cannot have more than 2 decimal places".into());
        return Err(err);
    }
    if value > max_quantity() {
        let mut err = ValidationError::new("quantity_range");
        err.message = Some("Quantity cannot exceed 99999999.99".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_item_kind_from_str() {
        assert_eq!(ItemKind::from_str("tool").unwrap(), ItemKind::Tool);
        assert_eq!(ItemKind::from_str("Tools").unwrap(), ItemKind::Tool);
        assert_eq!(ItemKind::from_str("materials").unwrap(), ItemKind::Material);
        assert!(ItemKind::from_str("vehicle").is_err());
    }

    #[test]
    fn test_item_kind_display() {
        assert_eq!(ItemKind::Tool.to_string(), "tool");
        assert_eq!(ItemKind::Material.plural(), "materials");
    }

    #[test]
    fn test_new_item_validation() {
        assert!(NewItem::new(ItemKind::Tool, "Hammer", dec!(10.00), dec!(5.00))
            .validate()
            .is_ok());

        let err = NewItem::new(ItemKind::Tool, "  ", dec!(1), dec!(0))
            .validate()
            .unwrap_err();
        assert_eq!(err.code, "name_length");

        let err = NewItem::new(ItemKind::Material, "Sand", dec!(-1), dec!(0))
            .validate()
            .unwrap_err();
        assert_eq!(err.code, "quantity_negative");

        let err = NewItem::new(ItemKind::Material, "Sand", dec!(1.005), dec!(0))
            .validate()
            .unwrap_err();
        assert_eq!(err.code, "quantity_precision");
    }

    #[test]
    fn test_validate_stock_level_trailing_zeros() {
        // 1.500 has scale 3 but only two significant fractional digits.
        assert!(validate_stock_level(dec!(1.500)).is_ok());
        assert!(validate_stock_level(dec!(0)).is_ok());
        assert!(validate_stock_level(dec!(100000000)).is_err());
    }
}
