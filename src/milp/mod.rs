//! MILP construction and solving: translating a [`crate::model::Problem`]
//! into variables/objective/constraints (`builder`) and invoking the backend
//! to get decoded values back (`driver`).

pub mod builder;
pub mod driver;

pub use builder::{BuiltModel, ObjectiveKind};
pub use driver::{SolveOutcome, SolverConfig};
