//! Middleware modules.

pub mod error;
pub mod origin;

pub use origin::OriginGuard;
