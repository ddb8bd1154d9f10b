//! Derived metrics over a feasible [`Solution`]: cost, average response
//! time, and deadline-miss rates, overall and per app.
//!
//! Reimplements `original_source/edarop/analysis.py`'s `SolutionAnalyzer` as
//! free functions over `&Solution` rather than a stateful analyzer object —
//! the Python class held no state beyond the Solution it wrapped.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::model::Solution;
use crate::units::Currency;

fn require_feasible(solution: &Solution) -> CoreResult<()> {
    if !solution.is_feasible() {
        return Err(CoreError::NotFeasible {
            status: solution.stats.status,
        });
    }
    Ok(())
}

pub fn cost(solution: &Solution) -> CoreResult<Currency> {
    require_feasible(solution)?;
    let system = solution.problem.system();
    let slot_len = solution.problem.time_slot_unit();
    let mut total = 0.0;
    for slot in &solution.allocation.time_slot_allocs {
        for ((app, ic), count) in &slot.vms {
            let Some(ic_ref) = system.ic(ic) else { continue };
            let price_per_slot = ic_ref.price.per_slot(slot_len);
            let _ = app;
            total += price_per_slot * (*count as f64);
        }
    }
    Ok(Currency(total))
}

fn routed_response_times(solution: &Solution) -> Vec<(String, f64, u64)> {
    let system = solution.problem.system();
    let mut out = Vec::new();
    for slot in &solution.allocation.time_slot_allocs {
        for ((app, src, ic), count) in &slot.requests {
            if *count == 0 {
                continue;
            }
            if let Some(rt) = system.resp_time(app, src, ic) {
                out.push((app.clone(), rt.to_seconds(), *count));
            }
        }
    }
    out
}

pub fn avg_resp_time_secs(solution: &Solution) -> CoreResult<f64> {
    require_feasible(solution)?;
    let routed = routed_response_times(solution);
    let total: u64 = routed.iter().map(|(_, _, c)| *c).sum();
    if total == 0 {
        return Ok(0.0);
    }
    let weighted: f64 = routed.iter().map(|(_, rt, c)| rt * (*c as f64)).sum();
    Ok(weighted / total as f64)
}

pub fn deadline_miss_rate(solution: &Solution) -> CoreResult<f64> {
    require_feasible(solution)?;
    let system = solution.problem.system();
    let routed = routed_response_times(solution);
    let total: u64 = routed.iter().map(|(_, _, c)| *c).sum();
    if total == 0 {
        return Ok(0.0);
    }
    let missed: u64 = routed
        .iter()
        .filter(|(app, rt, _)| {
            system
                .app(app)
                .map(|a| *rt > a.max_resp_time.to_seconds())
                .unwrap_or(false)
        })
        .map(|(_, _, c)| c)
        .sum();
    Ok(missed as f64 / total as f64)
}

pub fn total_reqs_per_app(solution: &Solution) -> CoreResult<HashMap<String, u64>> {
    require_feasible(solution)?;
    let mut out = HashMap::new();
    for (app, _rt, count) in routed_response_times(solution) {
        *out.entry(app).or_insert(0) += count;
    }
    Ok(out)
}

pub fn missed_reqs_per_app(solution: &Solution) -> CoreResult<HashMap<String, u64>> {
    require_feasible(solution)?;
    let system = solution.problem.system();
    let mut out = HashMap::new();
    for (app, rt, count) in routed_response_times(solution) {
        let missed = system
            .app(&app)
            .map(|a| rt > a.max_resp_time.to_seconds())
            .unwrap_or(false);
        if missed {
            *out.entry(app).or_insert(0) += count;
        }
    }
    Ok(out)
}

pub fn miss_rate_per_app(solution: &Solution) -> CoreResult<HashMap<String, f64>> {
    let totals = total_reqs_per_app(solution)?;
    let missed = missed_reqs_per_app(solution)?;
    let mut out = HashMap::new();
    for app in solution.problem.system().apps() {
        let total = totals.get(&app.name).copied().unwrap_or(0);
        let miss = missed.get(&app.name).copied().unwrap_or(0);
        let rate = if total == 0 { 0.0 } else { miss as f64 / total as f64 };
        out.insert(app.name.clone(), rate);
    }
    Ok(out)
}
