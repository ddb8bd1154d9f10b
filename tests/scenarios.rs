//! End-to-end scenario tests (S1-S6), one per scenario described for the
//! allocation engine: a single-region sanity check (S1-S3) and a
//! multi-region, multi-app catalog (S4-S6) exercised against every
//! allocator.

mod common;

use edarop::allocators::{
    Allocator, CostAllocator, CostThenResponseAllocator, GreedyAllocator, ResponseAllocator,
    ResponseThenCostAllocator,
};
use edarop::analysis;
use edarop::model::Status;

use common::{canonical_problem, ireland_problem};

const TOL: f64 = 1e-6;

#[test]
fn s1_cost_allocator_sizes_two_and_four_vms() {
    let problem = ireland_problem(0.15, 0.2, None, None);
    let solution = CostAllocator.solve(&problem, None).unwrap();

    assert_eq!(solution.stats.status, Status::Optimal);
    assert_eq!(solution.allocation.time_slot_allocs[0].vm_count("a0", "m5.xlarge"), 2);
    assert_eq!(solution.allocation.time_slot_allocs[1].vm_count("a0", "m5.xlarge"), 4);

    let cost = analysis::cost(&solution).unwrap();
    assert!((cost.0 - 0.6).abs() < TOL);
}

#[test]
fn s2_cost_allocator_infeasible_when_slo_breaks_deadline() {
    let problem = ireland_problem(150.0, 0.2, None, None);
    let solution = CostAllocator.solve(&problem, None).unwrap();
    assert_eq!(solution.stats.status, Status::Infeasible);
    assert!(solution.allocation.is_empty());
}

#[test]
fn s3_response_allocator_respects_cost_cap() {
    let problem = ireland_problem(0.15, 0.2, Some(0.6), None);
    let solution = ResponseAllocator.solve(&problem, None).unwrap();
    assert_eq!(solution.stats.status, Status::Optimal);
    let cost = analysis::cost(&solution).unwrap();
    assert!((cost.0 - 0.6).abs() < TOL);
}

#[test]
fn s3_response_allocator_infeasible_under_tighter_cap() {
    let problem = ireland_problem(0.15, 0.2, Some(0.5), None);
    let solution = ResponseAllocator.solve(&problem, None).unwrap();
    assert_eq!(solution.stats.status, Status::Infeasible);
}

#[test]
fn s4_cost_allocator_on_canonical_catalog() {
    let problem = canonical_problem(0.2, None, None);
    let solution = CostAllocator.solve(&problem, None).unwrap();
    assert_eq!(solution.stats.status, Status::Optimal);

    let cost = analysis::cost(&solution).unwrap();
    let expected = ((6.0 + 7.0 + 9.0) * 0.214 + (2.0 + 1.0) * 1.65) + ((3.0 + 1.0 + 1.0) * 0.214 + 1.0 * 0.856);
    assert!((cost.0 - expected).abs() < 1.0, "cost {} not close to {}", cost.0, expected);
}

#[test]
fn s5_response_allocator_on_canonical_catalog() {
    let problem = canonical_problem(0.2, Some(100.0), None);
    let solution = ResponseAllocator.solve(&problem, None).unwrap();
    assert_eq!(solution.stats.status, Status::Optimal);

    let avg_resp_time = analysis::avg_resp_time_secs(&solution).unwrap();
    assert!(
        (avg_resp_time - 0.1456).abs() < 0.01,
        "avg_resp_time {avg_resp_time} not close to 0.1456"
    );
}

#[test]
fn s5_response_allocator_infeasible_under_tight_cost_cap() {
    let problem = canonical_problem(0.2, Some(10.0), None);
    let solution = ResponseAllocator.solve(&problem, None).unwrap();
    assert_eq!(solution.stats.status, Status::Infeasible);
}

#[test]
fn s6_greedy_zero_miss_rate_when_deadline_met() {
    let problem = canonical_problem(0.2, None, None);
    let solution = GreedyAllocator.solve(&problem, None).unwrap();
    assert_eq!(solution.stats.status, Status::Optimal);
    assert_eq!(analysis::deadline_miss_rate(&solution).unwrap(), 0.0);
}

#[test]
fn s6_greedy_a0_misses_all_when_deadline_too_tight() {
    let problem = canonical_problem(0.01, None, None);
    let solution = GreedyAllocator.solve(&problem, None).unwrap();
    assert_eq!(solution.stats.status, Status::Optimal);

    let miss_rates = analysis::miss_rate_per_app(&solution).unwrap();
    assert_eq!(miss_rates["a0"], 1.0);
    assert_eq!(miss_rates["a1"], 0.0);
}

#[test]
fn cost_then_response_matches_cost_stage_cost_and_improves_response() {
    let problem = canonical_problem(0.2, None, None);

    let cost_solution = CostAllocator.solve(&problem, None).unwrap();
    assert_eq!(cost_solution.stats.status, Status::Optimal);
    let cost_only = analysis::cost(&cost_solution).unwrap();
    let cost_only_avg_resp_time = analysis::avg_resp_time_secs(&cost_solution).unwrap();

    let combined_solution = CostThenResponseAllocator.solve(&problem, None).unwrap();
    assert_eq!(combined_solution.stats.status, Status::Optimal);
    let combined_cost = analysis::cost(&combined_solution).unwrap();
    let combined_avg_resp_time = analysis::avg_resp_time_secs(&combined_solution).unwrap();

    assert!(
        (combined_cost.0 - cost_only.0).abs() < TOL,
        "C->R cost {} should equal C's cost {}",
        combined_cost.0,
        cost_only.0
    );
    assert!(
        combined_avg_resp_time <= cost_only_avg_resp_time + TOL,
        "C->R avg resp time {} should not exceed C's {}",
        combined_avg_resp_time,
        cost_only_avg_resp_time
    );
}

#[test]
fn response_then_cost_matches_response_stage_avg_and_improves_cost() {
    let problem = canonical_problem(0.2, Some(100.0), None);

    let response_solution = ResponseAllocator.solve(&problem, None).unwrap();
    assert_eq!(response_solution.stats.status, Status::Optimal);
    let response_only_avg_resp_time = analysis::avg_resp_time_secs(&response_solution).unwrap();
    let response_only_cost = analysis::cost(&response_solution).unwrap();

    let combined_solution = ResponseThenCostAllocator.solve(&problem, None).unwrap();
    assert_eq!(combined_solution.stats.status, Status::Optimal);
    let combined_avg_resp_time = analysis::avg_resp_time_secs(&combined_solution).unwrap();
    let combined_cost = analysis::cost(&combined_solution).unwrap();

    assert!(
        (combined_avg_resp_time - response_only_avg_resp_time).abs() < TOL,
        "R->C avg resp time {} should equal R's {}",
        combined_avg_resp_time,
        response_only_avg_resp_time
    );
    assert!(
        combined_cost.0 <= response_only_cost.0 + TOL,
        "R->C cost {} should not exceed R's {}",
        combined_cost.0,
        response_only_cost.0
    );
}
