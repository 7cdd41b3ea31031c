//! Stock movement domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::item::{ItemId, ItemKind, ItemSnapshot};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Stock-in ("ingreso").
    In,
    /// Stock-out ("salida").
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    /// Signed form of `quantity` as applied to the running total.
    pub fn signed(&self, quantity: Decimal) -> Decimal {
        match self {
            Direction::In => quantity,
            Direction::Out => -quantity,
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            _ => Err(format!("Unknown movement direction: {}", s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable historical stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: i64,
    pub item_id: ItemId,
    pub item_kind: ItemKind,
    pub direction: Direction,
    pub quantity: Decimal,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// A movement about to be appended to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    pub item_id: ItemId,
    pub item_kind: ItemKind,
    pub direction: Direction,
    pub quantity: Decimal,
    pub reason: String,
}

/// Sums of all movements recorded against one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementTotals {
    pub total_in: Decimal,
    pub total_out: Decimal,
}

impl MovementTotals {
    pub fn from_movements<'a>(movements: impl IntoIterator<Item = &'a Movement>) -> Self {
        movements
            .into_iter()
            .fold(Self::default(), |mut totals, movement| {
                match movement.direction {
                    Direction::In => totals.total_in += movement.quantity,
                    Direction::Out => totals.total_out += movement.quantity,
                }
                totals
            })
    }

    pub fn net(&self) -> Decimal {
        self.total_in - self.total_out
    }
}

/// Replays movements, in commit order, on top of an initial quantity.
pub fn replay<'a>(initial: Decimal, movements: impl IntoIterator<Item = &'a Movement>) -> Decimal {
    movements
        .into_iter()
        .fold(initial, |total, movement| {
            total + movement.direction.signed(movement.quantity)
        })
}

/// Result of checking an item's running quantity against its movement log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub item_id: ItemId,
    pub item_kind: ItemKind,
    pub item_name: String,
    pub initial_quantity: Decimal,
    pub total_in: Decimal,
    pub total_out: Decimal,
    pub expected_quantity: Decimal,
    pub current_quantity: Decimal,
    pub balanced: bool,
}

impl Reconciliation {
    pub fn from_totals(item: &ItemSnapshot, totals: MovementTotals) -> Self {
        let expected_quantity = item.initial_quantity + totals.net();
        Self {
            item_id: item.id,
            item_kind: item.kind,
            item_name: item.name.clone(),
            initial_quantity: item.initial_quantity,
            total_in: totals.total_in,
            total_out: totals.total_out,
            expected_quantity,
            current_quantity: item.current_quantity,
            balanced: expected_quantity == item.current_quantity,
        }
    }
}

/// One page of movement history plus the token to continue from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementPage {
    pub movements: Vec<Movement>,
    pub next_cursor: Option<String>,
}
