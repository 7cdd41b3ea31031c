//! Database entity definitions.

pub mod audit_event;
pub mod item;
pub mod movement;

pub use audit_event::AuditEventEntity;
pub use item::ItemEntity;
pub use movement::MovementEntity;
