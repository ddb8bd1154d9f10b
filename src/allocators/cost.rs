use tracing::{info, instrument};

use crate::allocators::shared::assemble_solution;
use crate::allocators::Allocator;
use crate::error::CoreResult;
use crate::milp::builder::ObjectiveKind;
use crate::milp::driver::build_and_solve;
use crate::milp::SolverConfig;
use crate::model::{Problem, Solution};

/// Pure cost objective. Applies the optional average-response-time cap if
/// the Problem sets one; otherwise unconstrained beyond the base MILP.
#[derive(Debug, Default, Clone, Copy)]
pub struct CostAllocator;

impl Allocator for CostAllocator {
    #[instrument(skip_all, fields(app_count = problem.system().apps().len(), ic_count = problem.system().ics().len(), slot_count = problem.workload_len()))]
    fn solve(&self, problem: &Problem, config: Option<SolverConfig>) -> CoreResult<Solution> {
        let config = config.unwrap_or_default();
        let avg_resp_cap = problem.max_avg_resp_time.map(|t| t.to_seconds());
        info!(avg_resp_cap, "dispatching cost allocator");
        let outcome = build_and_solve(problem, ObjectiveKind::Cost, None, avg_resp_cap, &config)?;
        info!(status = ?outcome.status, solving_time = ?outcome.solving_time, "cost allocator returned");
        Ok(assemble_solution(problem, &config, outcome))
    }
}
