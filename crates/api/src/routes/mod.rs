//! Route handlers.

pub mod health;
pub mod movements;
pub mod stats;
pub mod stock;

use domain::models::ItemKind;

use crate::error::ApiError;

/// Resolves the `{tools|materials}` path segment.
pub(crate) fn item_kind(segment: &str) -> Result<ItemKind, ApiError> {
    ItemKind::ALL
        .into_iter()
        .find(|kind| kind.plural() == segment)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown inventory collection: {}", segment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_from_collection() {
        assert_eq!(item_kind("tools").unwrap(), ItemKind::Tool);
        assert_eq!(item_kind("materials").unwrap(), ItemKind::Material);
    }

    #[test]
    fn test_unknown_collection_is_not_found() {
        assert!(matches!(item_kind("projects"), Err(ApiError::NotFound(_))));
    }
}
