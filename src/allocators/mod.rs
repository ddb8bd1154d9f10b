//! The five allocator strategies: pure cost, pure response, the two
//! lexicographic compositions, and the greedy heuristic. Each implements
//! [`Allocator`], generalizing the teacher's single free-function
//! `pub fn solve(...) -> Result<_, SolveError>` (`growthrs/src/optimiser.rs`)
//! into a trait so the strategies are interchangeable call sites.

mod cost;
mod greedy;
mod lexicographic;
mod response;
mod shared;

pub use cost::CostAllocator;
pub use greedy::GreedyAllocator;
pub use lexicographic::{CostThenResponseAllocator, ResponseThenCostAllocator};
pub use response::ResponseAllocator;

use crate::error::CoreResult;
use crate::milp::SolverConfig;
use crate::model::{Problem, Solution};

pub trait Allocator {
    /// Single-shot: calling `solve` a second time on the same allocator
    /// instance is undefined behavior per the state/termination design.
    fn solve(&self, problem: &Problem, config: Option<SolverConfig>) -> CoreResult<Solution>;
}
