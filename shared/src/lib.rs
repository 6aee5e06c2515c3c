//! FitControl shared library
//!
//! Pure domain logic and API types used by the backend and the WASM module:
//! the streak/calendar calculator, unit conversion, energy and progress
//! formulas, validation and request/response DTOs.

pub mod energy;
pub mod errors;
pub mod models;
pub mod progress;
pub mod streak;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use energy::*;
pub use errors::*;
pub use models::*;
pub use progress::*;
pub use streak::*;
pub use types::*;
pub use units::*;
