//! Database repository implementations

pub mod lookup_repository;
pub mod plan_repository;
pub mod preference_repository;
pub mod progress_repository;
pub mod swap_repository;
pub mod user_repository;

pub use lookup_repository::LookupRepository;
pub use plan_repository::PlanRepository;
pub use preference_repository::PreferenceRepository;
pub use progress_repository::ProgressRepository;
pub use swap_repository::SwapRepository;
pub use user_repository::UserRepository;
