use tracing::info;

use crate::allocators::{Allocator, CostAllocator, ResponseAllocator};
use crate::analysis;
use crate::error::CoreResult;
use crate::milp::SolverConfig;
use crate::model::Problem;
use crate::model::{Solution, SolvingStats};

/// Solves C to obtain the optimal cost `c*`, then solves R on a derived
/// Problem with `max_cost = c*`. The second solve's fields carry through
/// except for timing, which is the sum of both stages.
#[derive(Debug, Default, Clone, Copy)]
pub struct CostThenResponseAllocator;

impl Allocator for CostThenResponseAllocator {
    fn solve(&self, problem: &Problem, config: Option<SolverConfig>) -> CoreResult<Solution> {
        let config = config.unwrap_or_default();
        let cost_solution = CostAllocator.solve(problem, Some(config.clone()))?;
        if !cost_solution.is_feasible() {
            return Ok(cost_solution);
        }
        let c_star = analysis::cost(&cost_solution)?;
        info!(cost = c_star.0, "cost stage complete, feeding bound into response stage");
        let derived = problem.with_caps(Some(c_star), problem.max_avg_resp_time);
        let response_solution = ResponseAllocator.solve(&derived, Some(config))?;
        Ok(combine(problem, &cost_solution, response_solution))
    }
}

/// Solves R to obtain the optimal average response time `t*` (requires
/// `max_cost`), then solves C on a derived Problem with the original
/// `max_cost` and `max_avg_resp_time = t*`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseThenCostAllocator;

impl Allocator for ResponseThenCostAllocator {
    fn solve(&self, problem: &Problem, config: Option<SolverConfig>) -> CoreResult<Solution> {
        let config = config.unwrap_or_default();
        let response_solution = ResponseAllocator.solve(problem, Some(config.clone()))?;
        if !response_solution.is_feasible() {
            return Ok(response_solution);
        }
        let t_star_secs = analysis::avg_resp_time_secs(&response_solution)?;
        let t_star = crate::units::TimeValue::new(t_star_secs, crate::units::TimeUnit::Second);
        info!(avg_resp_time = t_star_secs, "response stage complete, feeding bound into cost stage");
        let derived = problem.with_caps(problem.max_cost, Some(t_star));
        let cost_solution = CostAllocator.solve(&derived, Some(config))?;
        Ok(combine(problem, &response_solution, cost_solution))
    }
}

fn combine(original_problem: &Problem, first: &Solution, second: Solution) -> Solution {
    let stats = SolvingStats::combine_sequential(&first.stats, &second.stats);
    Solution::new(original_problem.clone(), second.allocation, stats)
}
