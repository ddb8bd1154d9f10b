//! Unified error taxonomy for the allocation engine.
//!
//! One enum per the error-handling design: input validation fails at
//! construction, configuration/solving errors abort the enclosing `solve`,
//! infeasibility is a normal [`crate::model::Status`] return (not an error),
//! and `Analysis`/`Io` variants are the ambient edges the CLI touches.

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Two entities of the same category (App, IC, Region) share a name.
    #[error("duplicate name in {category}: {name}")]
    DuplicateName { category: &'static str, name: String },

    /// Workloads in a Problem disagree on slot unit or slot count.
    #[error("inconsistent workloads: {reason}")]
    InconsistentWorkloads { reason: String },

    /// A quantity conversion was asked to cross incompatible dimensions.
    #[error("unit mismatch: cannot convert {from} to {to}")]
    UnitMismatch { from: String, to: String },

    /// An allocator requires a bound the Problem didn't set (e.g. R without `max_cost`).
    #[error("missing required bound: {0}")]
    MissingBound(&'static str),

    /// The greedy allocator could not choose a viable instance class for a route.
    #[error("no viable instance class for app {app} from region {region}")]
    NoViableInstance { app: String, region: String },

    /// The response objective is undefined when there are no requests to route.
    #[error("workload is empty, response objective is undefined")]
    EmptyWorkload,

    /// The MILP backend itself failed (as opposed to returning INFEASIBLE).
    #[error("solver backend error: {0}")]
    SolverError(String),

    /// A decoded variable value fell outside the epsilon-tolerant decode window.
    #[error("invalid solver value for {variable}: {value}")]
    InvalidSolverValue { variable: String, value: f64 },

    /// A metric was requested on a Solution whose status is not feasible.
    #[error("solution is not feasible (status = {status:?})")]
    NotFeasible { status: crate::model::Status },

    /// Ambient I/O failure reading/writing a serialized Solution.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Ambient (de)serialization failure for the opaque binary solution format.
    #[error("serialization error: {0}")]
    Serialization(String),
}
