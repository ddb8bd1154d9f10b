//! Shared problem fixtures for the end-to-end scenario tests (S1-S6).

use std::collections::HashMap;

use edarop::model::{App, InstanceClass, Latency, Performance, Problem, Region, System, Workload};
use edarop::units::{Currency, TimeRatioValue, TimeUnit, TimeValue};

/// S1-S3: one region, one instance class, one app.
pub fn ireland_problem(
    slo_secs: f64,
    max_resp_time_secs: f64,
    max_cost: Option<f64>,
    max_avg_resp_time_secs: Option<f64>,
) -> Problem {
    let ireland = Region::new("Ireland");
    let app = App::new("a0", TimeValue::new(max_resp_time_secs, TimeUnit::Second));
    let ic = InstanceClass::new(
        "m5.xlarge",
        TimeRatioValue::currency_per(0.1, TimeUnit::Hour),
        ireland.clone(),
    );

    let mut perfs = HashMap::new();
    perfs.insert(
        (app.name.clone(), ic.name.clone()),
        Performance::new(
            TimeRatioValue::requests_per(5.0, TimeUnit::Hour),
            TimeValue::new(slo_secs, TimeUnit::Second),
        ),
    );

    let mut latencies = HashMap::new();
    latencies.insert(
        (ireland.name.clone(), ireland.name.clone()),
        Latency::new(TimeValue::new(0.05, TimeUnit::Second)),
    );

    let system = System::new(vec![app], vec![ic], perfs, latencies).unwrap();

    let workloads = vec![(
        ("a0".to_string(), "Ireland".to_string()),
        Workload::new(vec![10, 20], TimeUnit::Hour),
    )];

    Problem::new(
        system,
        workloads,
        max_cost.map(Currency),
        max_avg_resp_time_secs.map(|t| TimeValue::new(t, TimeUnit::Second)),
    )
    .unwrap()
}

/// S4-S6: two cloud regions (Ireland, Hong Kong), two edge regions (Dublin,
/// Madrid), two apps, eight instance classes, six time slots.
pub fn canonical_problem(
    a0_max_resp_time_secs: f64,
    max_cost: Option<f64>,
    max_avg_resp_time_secs: Option<f64>,
) -> Problem {
    let ireland = Region::new("Ireland");
    let hong_kong = Region::new("HongKong");
    let dublin = Region::new("Dublin");
    let madrid = Region::new("Madrid");

    let a0 = App::new("a0", TimeValue::new(a0_max_resp_time_secs, TimeUnit::Second));
    let a1 = App::new("a1", TimeValue::new(0.325, TimeUnit::Second));

    let ics = vec![
        InstanceClass::new("m5.xlarge_ireland", TimeRatioValue::currency_per(0.214, TimeUnit::Hour), ireland.clone()),
        InstanceClass::new("m5.2xlarge_ireland", TimeRatioValue::currency_per(0.428, TimeUnit::Hour), ireland.clone()),
        InstanceClass::new("m5.xlarge_hong_kong", TimeRatioValue::currency_per(0.264, TimeUnit::Hour), hong_kong.clone()),
        InstanceClass::new("m5.2xlarge_hong_kong", TimeRatioValue::currency_per(0.528, TimeUnit::Hour), hong_kong.clone()),
        InstanceClass::new("c3.medium_madrid", TimeRatioValue::currency_per(1.65, TimeUnit::Hour), madrid.clone()),
        InstanceClass::new("c3.medium_dublin", TimeRatioValue::currency_per(1.65, TimeUnit::Hour), dublin.clone()),
        InstanceClass::new("m3.large_madrid", TimeRatioValue::currency_per(3.4, TimeUnit::Hour), madrid.clone()),
        InstanceClass::new("m3.large_dublin", TimeRatioValue::currency_per(3.4, TimeUnit::Hour), dublin.clone()),
    ];

    let a0_rates = [2000.0, 4000.0, 2000.0, 4000.0, 16000.0, 16000.0, 32000.0, 32000.0];
    let a1_rates = [9000.0, 12000.0, 9000.0, 12000.0, 24000.0, 24000.0, 48000.0, 48000.0];

    let mut perfs = HashMap::new();
    for (ic, rate) in ics.iter().zip(a0_rates) {
        perfs.insert(
            (a0.name.clone(), ic.name.clone()),
            Performance::new(TimeRatioValue::requests_per(rate, TimeUnit::Hour), TimeValue::new(0.1, TimeUnit::Second)),
        );
    }
    for (ic, rate) in ics.iter().zip(a1_rates) {
        perfs.insert(
            (a1.name.clone(), ic.name.clone()),
            Performance::new(TimeRatioValue::requests_per(rate, TimeUnit::Hour), TimeValue::new(0.12, TimeUnit::Second)),
        );
    }

    let mut latencies = HashMap::new();
    latencies.insert((dublin.name.clone(), ireland.name.clone()), Latency::new(TimeValue::new(0.05, TimeUnit::Second)));
    latencies.insert((dublin.name.clone(), hong_kong.name.clone()), Latency::new(TimeValue::new(0.2, TimeUnit::Second)));
    latencies.insert((dublin.name.clone(), dublin.name.clone()), Latency::new(TimeValue::new(0.04, TimeUnit::Second)));
    latencies.insert((madrid.name.clone(), ireland.name.clone()), Latency::new(TimeValue::new(0.07, TimeUnit::Second)));
    latencies.insert((madrid.name.clone(), hong_kong.name.clone()), Latency::new(TimeValue::new(0.21, TimeUnit::Second)));
    latencies.insert((madrid.name.clone(), madrid.name.clone()), Latency::new(TimeValue::new(0.045, TimeUnit::Second)));

    let system = System::new(vec![a0, a1], ics, perfs, latencies).unwrap();

    let workloads = vec![
        (("a0".to_string(), "Dublin".to_string()), Workload::new(vec![5000, 10000, 13123, 0, 16000, 15000], TimeUnit::Hour)),
        (("a0".to_string(), "Madrid".to_string()), Workload::new(vec![6000, 4000, 4000, 0, 15000, 0], TimeUnit::Hour)),
        (("a1".to_string(), "Dublin".to_string()), Workload::new(vec![4000, 600, 600, 0, 10854, 0], TimeUnit::Hour)),
        (("a1".to_string(), "Madrid".to_string()), Workload::new(vec![3000, 900, 900, 0, 1002, 0], TimeUnit::Hour)),
    ];

    Problem::new(
        system,
        workloads,
        max_cost.map(Currency),
        max_avg_resp_time_secs.map(|t| TimeValue::new(t, TimeUnit::Second)),
    )
    .unwrap()
}
