//! Shared plumbing used by the MILP-backed allocators to turn a raw
//! [`SolveOutcome`] into a [`Solution`].

use crate::milp::driver::SolveOutcome;
use crate::milp::SolverConfig;
use crate::model::{Allocation, Problem, Solution, SolvingStats, TimeSlotAllocation};

pub fn assemble_solution(problem: &Problem, config: &SolverConfig, outcome: SolveOutcome) -> Solution {
    let stats = SolvingStats {
        frac_gap: config.mip_gap,
        max_seconds: config.time_limit,
        lower_bound: outcome.lower_bound,
        creation_time: outcome.creation_time,
        solving_time: outcome.solving_time,
        status: outcome.status,
    };

    if !outcome.status.is_feasible() {
        return Solution::new(problem.clone(), Allocation::empty(), stats);
    }

    let workload_len = problem.workload_len();
    let mut slots = vec![TimeSlotAllocation::new(); workload_len];

    for ((app, ic, k), count) in outcome.x_values {
        if count > 0 {
            slots[k].vms.insert((app, ic), count);
        }
    }
    for ((app, src, ic, k), count) in outcome.y_values {
        if count > 0 {
            slots[k].requests.insert((app, src, ic), count);
        }
    }

    Solution::new(problem.clone(), Allocation { time_slot_allocs: slots }, stats)
}
