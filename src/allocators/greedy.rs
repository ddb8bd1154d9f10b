//! Non-LP greedy cost heuristic: per (app, src-region, slot), narrow the
//! instance-class catalog in three stages (cheapest per request, then
//! fastest, then smallest) and size VM counts from the aggregated workload.
//!
//! Reimplements `original_source/edarop/simple_allocator.py`'s
//! `InstanceChooser.smallest_fastest_cheapest_ic` and
//! `SimpleCostAllocator.compute_alloc_time_slot`, generalized to the stored
//! `time_slot_unit` instead of assuming hour-long slots.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use crate::allocators::Allocator;
use crate::error::{CoreError, CoreResult};
use crate::milp::SolverConfig;
use crate::model::{Allocation, InstanceClass, Problem, Solution, SolvingStats, Status, TimeSlotAllocation};

/// Per-region greedy cheapest/fastest/smallest instance selection. Ignores
/// `config` entirely — there is no backend to configure.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyAllocator;

impl Allocator for GreedyAllocator {
    #[instrument(skip_all, fields(app_count = problem.system().apps().len(), ic_count = problem.system().ics().len(), slot_count = problem.workload_len()))]
    fn solve(&self, problem: &Problem, _config: Option<SolverConfig>) -> CoreResult<Solution> {
        let start = Instant::now();
        let mut slots = Vec::with_capacity(problem.workload_len());
        for k in 0..problem.workload_len() {
            slots.push(compute_alloc_time_slot(problem, k)?);
        }
        let solving_time = start.elapsed();
        info!(slots = slots.len(), ?solving_time, "greedy allocator returned");

        let stats = SolvingStats {
            frac_gap: None,
            max_seconds: None,
            lower_bound: None,
            creation_time: Duration::ZERO,
            solving_time,
            status: Status::Optimal,
        };
        Ok(Solution::new(
            problem.clone(),
            Allocation { time_slot_allocs: slots },
            stats,
        ))
    }
}

fn compute_alloc_time_slot(problem: &Problem, k: usize) -> CoreResult<TimeSlotAllocation> {
    let system = problem.system();
    let slot_len = problem.time_slot_unit();

    // (app, ic) -> aggregated workload across source regions.
    let mut wl_ic_app: HashMap<(String, String), u64> = HashMap::new();
    let mut reqs: HashMap<(String, String, String), u64> = HashMap::new();

    for app in system.apps() {
        for region in problem.regions() {
            let Some(wl) = problem.workload(&app.name, &region.name) else {
                continue;
            };
            let workload = wl.values.get(k).copied().unwrap_or(0);
            if workload == 0 {
                continue;
            }
            let ic = smallest_fastest_cheapest_ic(problem, app, &region)?;
            *wl_ic_app.entry((app.name.clone(), ic.name.clone())).or_insert(0) += workload;
            *reqs
                .entry((app.name.clone(), region.name.clone(), ic.name.clone()))
                .or_insert(0) += workload;
        }
    }

    let mut vms = HashMap::new();
    for ((app, ic), workload) in &wl_ic_app {
        let perf = system
            .performance(app, ic)
            .expect("ic was chosen because it serves this app");
        let perf_per_slot = perf.rate.per_slot(slot_len);
        let count = (*workload as f64 / perf_per_slot).ceil() as u64;
        vms.insert((app.clone(), ic.clone()), count);
    }

    Ok(TimeSlotAllocation { vms, requests: reqs })
}

/// Cheapest-per-request instance classes, narrowed by lowest latency+slo,
/// narrowed to the single smallest (cheapest) one for tie-breaking.
fn smallest_fastest_cheapest_ic<'a>(
    problem: &'a Problem,
    app: &crate::model::App,
    src_region: &crate::model::Region,
) -> CoreResult<&'a InstanceClass> {
    let cheapest = cheapest_ics(problem, app)?;
    let fastest = fastest_ics(problem, app, src_region, &cheapest)?;
    smallest_ic(&fastest)
}

fn cheapest_ics<'a>(problem: &'a Problem, app: &crate::model::App) -> CoreResult<Vec<&'a InstanceClass>> {
    let system = problem.system();
    let mut dollar_per_req: Vec<(&InstanceClass, f64)> = Vec::new();
    for ic in system.ics() {
        let Some(perf) = system.performance(&app.name, &ic.name) else {
            continue;
        };
        let price = ic.price.per_slot(problem.time_slot_unit());
        let rate = perf.rate.per_slot(problem.time_slot_unit());
        if rate <= 0.0 {
            continue;
        }
        dollar_per_req.push((ic, price / rate));
    }
    if dollar_per_req.is_empty() {
        return Err(CoreError::NoViableInstance {
            app: app.name.clone(),
            region: String::new(),
        });
    }
    let min = dollar_per_req
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::INFINITY, f64::min);
    Ok(dollar_per_req
        .into_iter()
        .filter(|(_, v)| (*v - min).abs() < 1e-12)
        .map(|(ic, _)| ic)
        .collect())
}

fn fastest_ics<'a>(
    problem: &'a Problem,
    app: &crate::model::App,
    src_region: &crate::model::Region,
    candidates: &[&'a InstanceClass],
) -> CoreResult<Vec<&'a InstanceClass>> {
    let system = problem.system();
    let mut resp_times: Vec<(&InstanceClass, f64)> = Vec::new();
    for ic in candidates {
        if let Some(rt) = system.resp_time(&app.name, &src_region.name, &ic.name) {
            resp_times.push((ic, rt.to_seconds()));
        }
    }
    if resp_times.is_empty() {
        return Err(CoreError::NoViableInstance {
            app: app.name.clone(),
            region: src_region.name.clone(),
        });
    }
    let min = resp_times
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::INFINITY, f64::min);
    Ok(resp_times
        .into_iter()
        .filter(|(_, v)| (*v - min).abs() < 1e-12)
        .map(|(ic, _)| ic)
        .collect())
}

fn smallest_ic<'a>(candidates: &[&'a InstanceClass]) -> CoreResult<&'a InstanceClass> {
    candidates
        .iter()
        .min_by(|a, b| a.price.magnitude().partial_cmp(&b.price.magnitude()).unwrap())
        .copied()
        .ok_or_else(|| CoreError::NoViableInstance {
            app: String::new(),
            region: String::new(),
        })
}
