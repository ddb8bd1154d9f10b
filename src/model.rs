//! Immutable domain entities: the vocabulary every other module builds on.
//!
//! Everything here is built once and read-only afterwards. Validation
//! (duplicate names, inconsistent workloads) happens in the constructors, not
//! scattered through later code.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::units::{Currency, RequestCount, TimeRatioValue, TimeUnit, TimeValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub name: String,
    pub max_resp_time: TimeValue,
}

impl App {
    pub fn new(name: impl Into<String>, max_resp_time: TimeValue) -> Self {
        Self {
            name: name.into(),
            max_resp_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
}

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceClass {
    pub name: String,
    pub price: TimeRatioValue,
    pub region: Region,
}

impl InstanceClass {
    pub fn new(name: impl Into<String>, price: TimeRatioValue, region: Region) -> Self {
        Self {
            name: name.into(),
            price,
            region,
        }
    }
}

/// A workload: one non-negative request count per time slot, all slots the
/// same length (`time_unit`, assumed to span exactly one unit — a workload
/// with `time_unit = Hour` has hour-long slots).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub values: Vec<RequestCount>,
    pub time_unit: TimeUnit,
}

impl Workload {
    pub fn new(values: Vec<RequestCount>, time_unit: TimeUnit) -> Self {
        Self { values, time_unit }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub rate: TimeRatioValue,
    pub slo: TimeValue,
}

impl Performance {
    pub fn new(rate: TimeRatioValue, slo: TimeValue) -> Self {
        Self { rate, slo }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Latency {
    pub value: TimeValue,
}

impl Latency {
    pub fn new(value: TimeValue) -> Self {
        Self { value }
    }
}

/// The full catalog: apps, instance classes, and the (partial) performance
/// and latency maps that connect them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct System {
    apps: Vec<App>,
    ics: Vec<InstanceClass>,
    perfs: HashMap<(String, String), Performance>,
    latencies: HashMap<(String, String), Latency>,
}

impl System {
    pub fn new(
        apps: Vec<App>,
        ics: Vec<InstanceClass>,
        perfs: HashMap<(String, String), Performance>,
        latencies: HashMap<(String, String), Latency>,
    ) -> CoreResult<Self> {
        check_unique(apps.iter().map(|a| a.name.as_str()), "App")?;
        check_unique(ics.iter().map(|i| i.name.as_str()), "InstanceClass")?;
        Ok(Self {
            apps,
            ics,
            perfs,
            latencies,
        })
    }

    pub fn apps(&self) -> &[App] {
        &self.apps
    }

    pub fn ics(&self) -> &[InstanceClass] {
        &self.ics
    }

    pub fn app(&self, name: &str) -> Option<&App> {
        self.apps.iter().find(|a| a.name == name)
    }

    pub fn ic(&self, name: &str) -> Option<&InstanceClass> {
        self.ics.iter().find(|i| i.name == name)
    }

    pub fn performance(&self, app: &str, ic: &str) -> Option<&Performance> {
        self.perfs.get(&(app.to_string(), ic.to_string()))
    }

    pub fn latency(&self, src_region: &str, dst_region: &str) -> Option<&Latency> {
        self.latencies
            .get(&(src_region.to_string(), dst_region.to_string()))
    }

    /// `latency(src, ic.region) + perf(app, ic).slo`, or `None` if either
    /// leg of the route is undefined.
    pub fn resp_time(&self, app: &str, src_region: &str, ic: &str) -> Option<TimeValue> {
        let ic_ref = self.ic(ic)?;
        let latency = self.latency(src_region, &ic_ref.region.name)?;
        let perf = self.performance(app, ic)?;
        Some(latency.value + perf.slo)
    }
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>, category: &'static str) -> CoreResult<()> {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(CoreError::DuplicateName {
                category,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// A System plus the workloads to route through it, and the optional caps
/// that bound a solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    system: System,
    workloads: HashMap<(String, String), Workload>,
    /// (app, region) keys in the order the caller supplied them, so
    /// `regions()` can preserve first-seen order deterministically —
    /// `workloads`'s `HashMap` iteration order does not.
    workload_order: Vec<(String, String)>,
    pub max_cost: Option<Currency>,
    pub max_avg_resp_time: Option<TimeValue>,
}

impl Problem {
    pub fn new(
        system: System,
        workloads: Vec<((String, String), Workload)>,
        max_cost: Option<Currency>,
        max_avg_resp_time: Option<TimeValue>,
    ) -> CoreResult<Self> {
        let mut unit: Option<TimeUnit> = None;
        let mut len: Option<usize> = None;
        for (_, wl) in &workloads {
            match unit {
                None => unit = Some(wl.time_unit),
                Some(u) if std::mem::discriminant(&u) != std::mem::discriminant(&wl.time_unit) => {
                    return Err(CoreError::InconsistentWorkloads {
                        reason: "workloads do not share the same time unit".into(),
                    });
                }
                _ => {}
            }
            match len {
                None => len = Some(wl.len()),
                Some(l) if l != wl.len() => {
                    return Err(CoreError::InconsistentWorkloads {
                        reason: "workloads do not share the same slot count".into(),
                    });
                }
                _ => {}
            }
        }
        let workload_order: Vec<(String, String)> = workloads.iter().map(|(k, _)| k.clone()).collect();
        let workloads: HashMap<(String, String), Workload> = workloads.into_iter().collect();
        Ok(Self {
            system,
            workloads,
            workload_order,
            max_cost,
            max_avg_resp_time,
        })
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn workload(&self, app: &str, region: &str) -> Option<&Workload> {
        self.workloads.get(&(app.to_string(), region.to_string()))
    }

    pub fn workloads(&self) -> &HashMap<(String, String), Workload> {
        &self.workloads
    }

    pub fn workload_len(&self) -> usize {
        self.workloads.values().next().map(Workload::len).unwrap_or(0)
    }

    /// All regions appearing as an IC region or a workload source region,
    /// first-seen order (IC regions first, then workload regions).
    pub fn regions(&self) -> Vec<Region> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for ic in self.system.ics() {
            if seen.insert(ic.region.name.clone()) {
                out.push(ic.region.clone());
            }
        }
        for (_app, region_name) in &self.workload_order {
            if seen.insert(region_name.clone()) {
                out.push(Region::new(region_name.clone()));
            }
        }
        out
    }

    pub fn time_slot_unit(&self) -> TimeValue {
        let unit = self
            .workloads
            .values()
            .next()
            .map(|w| w.time_unit)
            .unwrap_or(TimeUnit::Hour);
        TimeValue::new(1.0, unit)
    }

    pub fn total_requests(&self) -> u64 {
        self.workloads.values().flat_map(|w| w.values.iter()).sum()
    }

    /// Construct a derived Problem sharing this one's System and workloads
    /// but with new caps — used by the two-stage (C→R, R→C) allocators.
    pub fn with_caps(&self, max_cost: Option<Currency>, max_avg_resp_time: Option<TimeValue>) -> Problem {
        Problem {
            system: self.system.clone(),
            workloads: self.workloads.clone(),
            workload_order: self.workload_order.clone(),
            max_cost,
            max_avg_resp_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Unsolved,
    Optimal,
    IntegerFeasible,
    Infeasible,
    IntegerInfeasible,
    Aborted,
    SolverError,
    Unknown,
}

impl Status {
    pub fn is_feasible(self) -> bool {
        matches!(self, Status::Optimal | Status::IntegerFeasible)
    }
}

/// One slot's worth of VM counts and routed request counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSlotAllocation {
    /// (app, ic) -> VM count.
    pub vms: HashMap<(String, String), u64>,
    /// (app, src_region, ic) -> routed request count.
    pub requests: HashMap<(String, String, String), u64>,
}

impl TimeSlotAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vm_count(&self, app: &str, ic: &str) -> u64 {
        self.vms
            .get(&(app.to_string(), ic.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn request_count(&self, app: &str, src_region: &str, ic: &str) -> u64 {
        self.requests
            .get(&(app.to_string(), src_region.to_string(), ic.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Allocation {
    pub time_slot_allocs: Vec<TimeSlotAllocation>,
}

impl Allocation {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.time_slot_allocs.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolvingStats {
    pub frac_gap: Option<f64>,
    pub max_seconds: Option<f64>,
    pub lower_bound: Option<f64>,
    #[serde(with = "duration_secs")]
    pub creation_time: Duration,
    #[serde(with = "duration_secs")]
    pub solving_time: Duration,
    pub status: Status,
}

impl SolvingStats {
    pub fn combine_sequential(first: &SolvingStats, second: &SolvingStats) -> SolvingStats {
        SolvingStats {
            frac_gap: second.frac_gap,
            max_seconds: second.max_seconds,
            lower_bound: second.lower_bound,
            creation_time: first.creation_time + second.creation_time,
            solving_time: first.solving_time + second.solving_time,
            status: second.status,
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.as_secs_f64().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Ok(Duration::from_secs_f64(secs.max(0.0)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub problem: Problem,
    pub allocation: Allocation,
    pub stats: SolvingStats,
}

impl Solution {
    pub fn new(problem: Problem, allocation: Allocation, stats: SolvingStats) -> Self {
        Self {
            problem,
            allocation,
            stats,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.stats.status.is_feasible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::TimeUnit;

    fn ireland() -> Region {
        Region::new("Ireland")
    }

    #[test]
    fn duplicate_app_name_is_rejected() {
        let apps = vec![
            App::new("a0", TimeValue::new(1.0, TimeUnit::Second)),
            App::new("a0", TimeValue::new(2.0, TimeUnit::Second)),
        ];
        let err = System::new(apps, vec![], HashMap::new(), HashMap::new()).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateName { .. }));
    }

    #[test]
    fn inconsistent_workload_lengths_are_rejected() {
        let system = System::new(vec![], vec![], HashMap::new(), HashMap::new()).unwrap();
        let workloads = vec![
            (
                ("a0".to_string(), "Ireland".to_string()),
                Workload::new(vec![1, 2], TimeUnit::Hour),
            ),
            (
                ("a0".to_string(), "Madrid".to_string()),
                Workload::new(vec![1, 2, 3], TimeUnit::Hour),
            ),
        ];
        let err = Problem::new(system, workloads, None, None).unwrap_err();
        assert!(matches!(err, CoreError::InconsistentWorkloads { .. }));
    }

    #[test]
    fn regions_preserve_first_seen_order() {
        let ic = InstanceClass::new(
            "m5.xlarge",
            TimeRatioValue::currency_per(0.1, TimeUnit::Hour),
            ireland(),
        );
        let system = System::new(vec![], vec![ic], HashMap::new(), HashMap::new()).unwrap();
        let workloads = vec![
            (
                ("a0".to_string(), "Dublin".to_string()),
                Workload::new(vec![1], TimeUnit::Hour),
            ),
            (
                ("a0".to_string(), "Madrid".to_string()),
                Workload::new(vec![1], TimeUnit::Hour),
            ),
            (
                ("a1".to_string(), "Singapore".to_string()),
                Workload::new(vec![1], TimeUnit::Hour),
            ),
        ];
        let problem = Problem::new(system, workloads, None, None).unwrap();
        let regions: Vec<_> = problem.regions().into_iter().map(|r| r.name).collect();
        assert_eq!(
            regions,
            vec![
                "Ireland".to_string(),
                "Dublin".to_string(),
                "Madrid".to_string(),
                "Singapore".to_string(),
            ]
        );
    }
}
