//! Catalog store entities.

pub mod inventory_level;
pub mod price_history;
pub mod product;
pub mod replenishment;
pub mod replenishment_line;
pub mod vendor;
