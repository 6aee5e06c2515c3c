//! Business logic services
//!
//! Services validate input, coordinate repositories and translate their
//! errors into `ApiError`.

pub mod dashboard;
pub mod diet;
pub mod energy;
pub mod profile;
pub mod progress;
pub mod routine;
pub mod user;

pub use dashboard::DashboardService;
pub use diet::DietService;
pub use energy::EnergyService;
pub use profile::ProfileService;
pub use progress::ProgressService;
pub use routine::RoutineService;
pub use user::UserService;
