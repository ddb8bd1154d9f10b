//! Variable families, objective assembly, and constraint emission.
//!
//! Mirrors the teacher's `create_decision_variables`/`build_objective`/
//! `add_constraints<P: SolverModel>` split (`growthrs/src/optimiser.rs`):
//! variable creation is separate from constraint emission, and constraint
//! emission is generic over the concrete backend problem type so the same
//! code runs against whichever `good_lp` backend is plugged in.

use std::collections::HashMap;

use good_lp::solvers::coin_cbc::CoinCbcProblem;
use good_lp::{constraint, variable, Expression, ProblemVariables, Variable};

use crate::model::Problem;

/// X[a,i,k], Y[a,e,i,k] and Z[a,e,i,k] plus the cached per-slot coefficients
/// the constraints and objectives are built from.
pub struct BuiltModel {
    pub x: HashMap<(String, String, usize), Variable>,
    pub y: HashMap<(String, String, String, usize), Variable>,
    pub z: HashMap<(String, String, String, usize), Variable>,
    /// (app, ic) -> price per slot.
    pub price_per_slot: HashMap<(String, String), f64>,
    /// (app, ic) -> serving rate per slot.
    pub perf_per_slot: HashMap<(String, String), f64>,
    /// (app, src_region, ic) -> constant route response time, in seconds.
    pub resp_time_secs: HashMap<(String, String, String), f64>,
    pub total_requests: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveKind {
    Cost,
    Response,
}

/// Builds every X/Y/Z variable the problem admits and registers them with
/// `vars`. Call once per allocator solve.
pub fn build_variables(problem: &Problem, vars: &mut ProblemVariables) -> BuiltModel {
    let system = problem.system();
    let slot_len = problem.time_slot_unit();
    let workload_len = problem.workload_len();

    let mut price_per_slot = HashMap::new();
    let mut perf_per_slot = HashMap::new();
    let mut x = HashMap::new();

    for app in system.apps() {
        for ic in system.ics() {
            let Some(perf) = system.performance(&app.name, &ic.name) else {
                continue;
            };
            let price = ic.price.per_slot(slot_len);
            let rate = perf.rate.per_slot(slot_len);
            price_per_slot.insert((app.name.clone(), ic.name.clone()), price);
            perf_per_slot.insert((app.name.clone(), ic.name.clone()), rate);
            for k in 0..workload_len {
                let v = vars.add(
                    variable()
                        .integer()
                        .min(0)
                        .name(format!("x_{}_{}_{}", app.name, ic.name, k)),
                );
                x.insert((app.name.clone(), ic.name.clone(), k), v);
            }
        }
    }

    let mut y = HashMap::new();
    let mut z = HashMap::new();
    let mut resp_time_secs = HashMap::new();

    for app in system.apps() {
        for (src_app, src_region) in problem.workloads().keys() {
            if src_app != &app.name {
                continue;
            }
            for ic in system.ics() {
                if !perf_per_slot.contains_key(&(app.name.clone(), ic.name.clone())) {
                    continue;
                }
                let Some(rt) = system.resp_time(&app.name, src_region, &ic.name) else {
                    continue;
                };
                resp_time_secs.insert(
                    (app.name.clone(), src_region.clone(), ic.name.clone()),
                    rt.to_seconds(),
                );
                for k in 0..workload_len {
                    let yv = vars.add(
                        variable().integer().min(0).name(format!(
                            "y_{}_{}_{}_{}",
                            app.name, src_region, ic.name, k
                        )),
                    );
                    y.insert((app.name.clone(), src_region.clone(), ic.name.clone(), k), yv);

                    let zv = vars.add(variable().binary().name(format!(
                        "z_{}_{}_{}_{}",
                        app.name, src_region, ic.name, k
                    )));
                    z.insert((app.name.clone(), src_region.clone(), ic.name.clone(), k), zv);
                }
            }
        }
    }

    let total_requests = problem.total_requests() as f64;

    BuiltModel {
        x,
        y,
        z,
        price_per_slot,
        perf_per_slot,
        resp_time_secs,
        total_requests,
    }
}

pub fn cost_expression(built: &BuiltModel) -> Expression {
    built
        .x
        .iter()
        .map(|((app, ic, _k), var)| {
            let price = built.price_per_slot[&(app.clone(), ic.clone())];
            *var * price
        })
        .sum()
}

/// Unscaled weighted sum of `Y * R(a,e,i)`; divide by `total_requests` to get
/// the actual average response time.
pub fn weighted_response_expression(built: &BuiltModel) -> Expression {
    built
        .y
        .iter()
        .map(|((app, src, ic, _k), var)| {
            let rt = built.resp_time_secs[&(app.clone(), src.clone(), ic.clone())];
            *var * rt
        })
        .sum()
}

pub fn objective_expression(built: &BuiltModel, kind: ObjectiveKind) -> Expression {
    match kind {
        ObjectiveKind::Cost => cost_expression(built),
        ObjectiveKind::Response => {
            weighted_response_expression(built) * (1.0 / built.total_requests)
        }
    }
}

/// Constraint family 1-5 (always present) plus 6/7 (only when a cap is
/// supplied). Mutates `problem` in place, matching the coin_cbc backend's
/// `add_constraint` (non-chaining) API.
pub fn add_constraints(
    problem: &mut CoinCbcProblem,
    model_problem: &Problem,
    built: &BuiltModel,
    cost_cap: Option<f64>,
    avg_resp_time_cap: Option<f64>,
) {
    let system = model_problem.system();
    let workload_len = model_problem.workload_len();

    // 1. capacity per (app, slot).
    for app in system.apps() {
        for k in 0..workload_len {
            let capacity: Expression = built
                .x
                .iter()
                .filter(|((a, _ic, vk), _)| a == &app.name && *vk == k)
                .map(|((a, ic, _vk), var)| *var * built.perf_per_slot[&(a.clone(), ic.clone())])
                .sum();
            let demand: u64 = model_problem
                .workloads()
                .iter()
                .filter(|((a, _e), _)| a == &app.name)
                .map(|(_, wl)| wl.values.get(k).copied().unwrap_or(0))
                .sum();
            problem.add_constraint(constraint!(capacity >= demand as f64));
        }
    }

    // 2. capacity per (app, ic, slot).
    for ((app, ic, k), x_var) in &built.x {
        let served: Expression = built
            .y
            .iter()
            .filter(|((a, _e, i, vk), _)| a == app && i == ic && vk == k)
            .map(|(_, var)| *var)
            .sum();
        let perf = built.perf_per_slot[&(app.clone(), ic.clone())];
        problem.add_constraint(constraint!(*x_var * perf >= served));
    }

    // 3. demand routed exactly once, per (app, src, slot).
    for ((app, src_region), wl) in model_problem.workloads() {
        for k in 0..workload_len {
            let routed: Expression = built
                .y
                .iter()
                .filter(|((a, e, _i, vk), _)| a == app && e == src_region && *vk == k)
                .map(|(_, var)| *var)
                .sum();
            let demand = wl.values.get(k).copied().unwrap_or(0) as f64;
            problem.add_constraint(constraint!(routed == demand));
        }
    }

    // 4. route activation: Y <= M * Z, M = total demand (tight bound).
    let big_m = built.total_requests.max(1.0);
    for (key, y_var) in &built.y {
        let z_var = built.z[key];
        problem.add_constraint(constraint!(*y_var <= big_m * z_var));
    }

    // 5. deadline per active route.
    for ((app, src_region, ic, k), z_var) in &built.z {
        let rt = built.resp_time_secs[&(app.clone(), src_region.clone(), ic.clone())];
        let max_rt = system.app(app).expect("app exists for its own route").max_resp_time.to_seconds();
        let _ = k;
        problem.add_constraint(constraint!(rt * *z_var <= max_rt));
    }

    // 6. optional cost cap.
    if let Some(cap) = cost_cap {
        let cost = cost_expression(built);
        problem.add_constraint(constraint!(cost <= cap));
    }

    // 7. optional average-response-time cap (reformulated without division:
    // weighted_sum <= cap * total_requests).
    if let Some(cap) = avg_resp_time_cap {
        let weighted = weighted_response_expression(built);
        problem.add_constraint(constraint!(weighted <= cap * built.total_requests));
    }
}
