//! Solver driver: dispatches a built model to the `coin_cbc` backend,
//! measures creation/solving time, maps backend outcomes onto [`Status`],
//! and decodes variable values with the epsilon tolerance the spec requires.
//!
//! Backend configuration (`threads`, `seconds`/time limit, `logLevel`)
//! mirrors the `set_parameter` calls the pack's coin_cbc scheduler reference
//! uses — those are the only three knobs this driver exposes. When
//! `log_path` is set, CBC's own solver log is captured verbatim by
//! redirecting the process's stdout fd for the duration of the solve.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use coin_cbc::{SecondaryStatus, Status as CbcStatus};
use good_lp::solvers::coin_cbc::coin_cbc;
use good_lp::{ProblemVariables, ResolutionError, Solution as GoodLpSolution, SolverModel};

use crate::error::{CoreError, CoreResult};
use crate::milp::builder::{self, BuiltModel, ObjectiveKind};
use crate::model::{Problem, Status};

/// Recognized solver configuration (programmatic API, spec §6).
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    pub time_limit: Option<f64>,
    pub mip_gap: Option<f64>,
    pub threads: Option<u32>,
    pub msg: Option<bool>,
    pub log_path: Option<PathBuf>,
}

/// What a solve produced: status/timing/bound plus the decoded values
/// needed to build an [`crate::model::Allocation`].
pub struct SolveOutcome {
    pub status: Status,
    pub lower_bound: Option<f64>,
    pub creation_time: Duration,
    pub solving_time: Duration,
    pub x_values: HashMap<(String, String, usize), u64>,
    pub y_values: HashMap<(String, String, String, usize), u64>,
}

/// Builds the model, applies the given objective and optional caps, and
/// solves it. This is the one function every allocator's `solve` funnels
/// through.
pub fn build_and_solve(
    problem: &Problem,
    objective: ObjectiveKind,
    cost_cap: Option<f64>,
    avg_resp_time_cap: Option<f64>,
    config: &SolverConfig,
) -> CoreResult<SolveOutcome> {
    let creation_start = Instant::now();

    let mut vars = ProblemVariables::new();
    let built = builder::build_variables(problem, &mut vars);
    let objective_expr = builder::objective_expression(&built, objective);
    let unsolved = vars.minimise(objective_expr);
    let mut cbc_problem = coin_cbc(unsolved);

    if let Some(threads) = config.threads {
        cbc_problem.set_parameter("threads", &threads.to_string());
    }
    if let Some(seconds) = config.time_limit {
        cbc_problem.set_parameter("seconds", &seconds.to_string());
    }
    if let Some(gap) = config.mip_gap {
        cbc_problem.set_parameter("ratioGap", &gap.to_string());
    }
    // `msg: Some(false)` silences CBC entirely; otherwise, when a log is
    // requested but the caller didn't ask for console chatter, bump the log
    // level just enough that there is something to capture to `log_path`.
    match config.msg {
        Some(false) => cbc_problem.set_parameter("logLevel", "0"),
        None if config.log_path.is_some() => cbc_problem.set_parameter("logLevel", "1"),
        _ => {}
    }

    builder::add_constraints(&mut cbc_problem, problem, &built, cost_cap, avg_resp_time_cap);

    let creation_time = creation_start.elapsed();

    let solving_start = Instant::now();
    let log_path = config.log_path.clone();
    let result = capture_log(log_path.as_deref(), move || cbc_problem.solve())?;
    let solving_time = solving_start.elapsed();

    match result {
        Ok(solution) => {
            let model = solution.model();
            let lower_bound = Some(model.best_bound());
            let status = map_cbc_status(model);
            let x_values = decode_family(&built.x, &solution)?;
            let y_values = decode_family(&built.y, &solution)?;
            Ok(SolveOutcome {
                status,
                lower_bound,
                creation_time,
                solving_time,
                x_values,
                y_values,
            })
        }
        Err(ResolutionError::Infeasible) => Ok(SolveOutcome {
            status: Status::Infeasible,
            lower_bound: log_path.as_deref().and_then(parse_lower_bound_from_log),
            creation_time,
            solving_time,
            x_values: HashMap::new(),
            y_values: HashMap::new(),
        }),
        Err(ResolutionError::Unbounded) => Ok(SolveOutcome {
            status: Status::Unknown,
            lower_bound: log_path.as_deref().and_then(parse_lower_bound_from_log),
            creation_time,
            solving_time,
            x_values: HashMap::new(),
            y_values: HashMap::new(),
        }),
        Err(other) => Err(CoreError::SolverError(format!("{other:?}"))),
    }
}

/// Maps CBC's own primary/secondary termination codes onto [`Status`].
/// `Finished` with a non-optimal secondary status covers both a time-limited
/// run that still returned the best incumbent found (`INTEGER_FEASIBLE`) and
/// a proven-optimal one; any other primary status (stopped, abandoned, a
/// user event) never reached a usable incumbent and maps to `ABORTED`.
fn map_cbc_status(model: &coin_cbc::Model) -> Status {
    match model.status() {
        CbcStatus::Finished => match model.secondary_status() {
            SecondaryStatus::Optimal => Status::Optimal,
            SecondaryStatus::Infeasible => Status::IntegerInfeasible,
            _ => Status::IntegerFeasible,
        },
        CbcStatus::Stopped | CbcStatus::Abandoned | CbcStatus::UserEvent | CbcStatus::Unlaunched => {
            Status::Aborted
        }
    }
}

/// Redirects the process's stdout fd to `path` for the duration of `f` and
/// restores it afterwards. CBC writes its solver log straight to the C
/// stdio stream, bypassing Rust's buffered `Stdout`, so this is the only way
/// to capture it verbatim per spec §6.
fn capture_log<T>(log_path: Option<&std::path::Path>, f: impl FnOnce() -> T) -> CoreResult<T> {
    let Some(path) = log_path else {
        return Ok(f());
    };

    use std::io::Write;
    use std::os::fd::AsRawFd;

    std::io::stdout().flush().ok();
    let file = std::fs::File::create(path)?;
    let saved_fd = unsafe { libc::dup(1) };
    if saved_fd < 0 {
        return Err(CoreError::Io(std::io::Error::last_os_error()));
    }
    if unsafe { libc::dup2(file.as_raw_fd(), 1) } < 0 {
        unsafe { libc::close(saved_fd) };
        return Err(CoreError::Io(std::io::Error::last_os_error()));
    }

    let result = f();

    std::io::stdout().flush().ok();
    unsafe {
        libc::dup2(saved_fd, 1);
        libc::close(saved_fd);
    }
    Ok(result)
}

fn decode_family<K: Clone + std::hash::Hash + Eq + std::fmt::Debug>(
    vars: &HashMap<K, good_lp::Variable>,
    solution: &impl GoodLpSolution,
) -> CoreResult<HashMap<K, u64>> {
    let mut out = HashMap::with_capacity(vars.len());
    for (key, var) in vars {
        let raw = solution.value(*var);
        let decoded = decode_nonneg(raw, &format!("{key:?}"))?;
        out.insert(key.clone(), decoded);
    }
    Ok(out)
}

/// Values within +/-1e-7 round to 0; positive values pass through (rounded
/// to the nearest integer); any other negative value is a backend artifact
/// outside tolerance.
fn decode_nonneg(value: f64, name: &str) -> CoreResult<u64> {
    if value.abs() <= 1e-7 {
        Ok(0)
    } else if value > 0.0 {
        Ok(value.round() as u64)
    } else {
        Err(CoreError::InvalidSolverValue {
            variable: name.to_string(),
            value,
        })
    }
}

/// Best-effort fallback used when the backend doesn't expose a bound
/// programmatically: scan a solver log file for a line starting with
/// `Lower bound:` (case-sensitive), per spec §6.
fn parse_lower_bound_from_log(path: &std::path::Path) -> Option<f64> {
    let text = std::fs::read_to_string(path).ok()?;
    text.lines()
        .find_map(|line| line.strip_prefix("Lower bound:"))
        .and_then(|rest| rest.trim().parse::<f64>().ok())
}
