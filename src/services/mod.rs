//! Business logic for the replenishment flow.

pub mod order_editor;
pub mod replenishment;
pub mod snapshots;
