//! Middleware del sistema
//!
//! CORS y trazas de peticiones HTTP.

pub mod cors;
pub mod trace;

pub use cors::*;
pub use trace::*;
