//! Database repositories
//!
//! Unit-struct repositories with one async function per query. They return
//! `anyhow::Result` and leave HTTP mapping to the services.

pub mod catalog;
pub mod diet;
pub mod energy;
pub mod progress;
pub mod routine;
pub mod user;

pub use catalog::CatalogRepository;
pub use diet::DietRepository;
pub use energy::{EnergyRepository, UpsertEnergy};
pub use progress::{CreateProgress, ProgressRepository};
pub use routine::RoutineRepository;
pub use user::UserRepository;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Convert a validated measurement for a NUMERIC column
pub(crate) fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default().round_dp(2)
}

pub(crate) fn from_decimal(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_conversion_rounds_to_cents() {
        assert_eq!(to_decimal(80.456).to_string(), "80.46");
        assert_eq!(from_decimal(to_decimal(72.5)), 72.5);
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    }
}
