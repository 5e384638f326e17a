//! HTTP boundary. Request validation lives here; the core stays lax.

pub mod health;
pub mod replenishment;
