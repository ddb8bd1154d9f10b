use tracing::{info, instrument};

use crate::allocators::shared::assemble_solution;
use crate::allocators::Allocator;
use crate::error::{CoreError, CoreResult};
use crate::milp::builder::ObjectiveKind;
use crate::milp::driver::build_and_solve;
use crate::milp::SolverConfig;
use crate::model::{Problem, Solution};

/// Pure average-response-time objective. Requires `max_cost` to be set on
/// the Problem; fails with `MissingBound` otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseAllocator;

impl Allocator for ResponseAllocator {
    #[instrument(skip_all, fields(app_count = problem.system().apps().len(), ic_count = problem.system().ics().len(), slot_count = problem.workload_len()))]
    fn solve(&self, problem: &Problem, config: Option<SolverConfig>) -> CoreResult<Solution> {
        let config = config.unwrap_or_default();
        let Some(max_cost) = problem.max_cost else {
            return Err(CoreError::MissingBound("max_cost"));
        };
        if problem.total_requests() == 0 {
            return Err(CoreError::EmptyWorkload);
        }
        info!(max_cost = max_cost.0, "dispatching response allocator");
        let outcome = build_and_solve(problem, ObjectiveKind::Response, Some(max_cost.0), None, &config)?;
        info!(status = ?outcome.status, solving_time = ?outcome.solving_time, "response allocator returned");
        Ok(assemble_solution(problem, &config, outcome))
    }
}
