//! `print-prob`/`print-sol` command definitions and plain-text table
//! printing, consumed by the `edarop-cli` binary.
//!
//! Reimplements `original_source/edarop/visualization.py`'s
//! `ProblemPrettyPrinter`/`SolutionPrettyPrinter` as plain `println!` tables
//! (no `rich`-equivalent table crate appears in the pack) instead of
//! generating a `Solution` from scratch the way the original `cli.py` did
//! via `click`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::analysis;
use crate::model::{Problem, Solution};

#[derive(Debug, Parser)]
#[command(name = "edarop-cli", about = "Inspect serialized edarop solutions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a serialized Solution and print its embedded Problem.
    PrintProb { file: PathBuf },
    /// Load a serialized Solution and print allocation tables and a summary.
    PrintSol { file: PathBuf },
}

pub fn print_problem(problem: &Problem) {
    print_ics(problem);
    print_apps(problem);
    print_latencies(problem);
    print_perfs(problem);
}

fn print_ics(problem: &Problem) {
    println!("== Regions and instance classes ==");
    for region in problem.regions() {
        let ics: Vec<_> = problem
            .system()
            .ics()
            .iter()
            .filter(|ic| ic.region.name == region.name)
            .collect();
        if ics.is_empty() {
            continue;
        }
        println!("  {}", region.name);
        for ic in ics {
            println!(
                "    {} - {:.4} {:?}/unit",
                ic.name,
                ic.price.magnitude(),
                ic.price.per()
            );
        }
    }
}

fn print_apps(problem: &Problem) {
    println!("== Apps ==");
    for app in problem.system().apps() {
        let total: u64 = problem
            .regions()
            .iter()
            .filter_map(|r| problem.workload(&app.name, &r.name))
            .flat_map(|wl| wl.values.iter())
            .sum();
        println!(
            "  {} - max resp. time: {:.3} s - total workload: {}",
            app.name,
            app.max_resp_time.to_seconds(),
            total
        );
        for region in problem.regions() {
            if let Some(wl) = problem.workload(&app.name, &region.name) {
                let region_total: u64 = wl.values.iter().sum();
                println!("    {}: {}", region.name, region_total);
            }
        }
    }
}

fn print_latencies(problem: &Problem) {
    println!("== Latencies (ms) ==");
    let regions = problem.regions();
    for src in &regions {
        let mut row = Vec::new();
        for dst in &regions {
            match problem.system().latency(&src.name, &dst.name) {
                Some(latency) => row.push(format!("{:.2}", latency.value.to(crate::units::TimeUnit::Second) * 1000.0)),
                None => row.push("-".to_string()),
            }
        }
        if row.iter().any(|v| v != "-") {
            println!("  {}: {}", src.name, row.join(", "));
        }
    }
}

fn print_perfs(problem: &Problem) {
    println!("== Performances ==");
    for ic in problem.system().ics() {
        for app in problem.system().apps() {
            let Some(perf) = problem.system().performance(&app.name, &ic.name) else {
                continue;
            };
            println!(
                "  {} ({}) / {}: rate {:.1} req/{:?}, slo {:.3} s",
                ic.name,
                ic.region.name,
                app.name,
                perf.rate.magnitude(),
                perf.rate.per(),
                perf.slo.to_seconds()
            );
        }
    }
}

pub fn print_solution(solution: &Solution) {
    if !solution.is_feasible() {
        println!("Non feasible solution. status = {:?}", solution.stats.status);
        return;
    }

    for app in solution.problem.system().apps() {
        print_table_app(solution, &app.name);
    }
    print_summary(solution);
}

fn print_table_app(solution: &Solution, app_name: &str) {
    println!("== Application {app_name} ==");
    for (k, slot) in solution.allocation.time_slot_allocs.iter().enumerate() {
        for ((app, ic), count) in &slot.vms {
            if app != app_name || *count == 0 {
                continue;
            }
            println!("  t={k} {ic}: {count} vms");
        }
    }
}

fn print_summary(solution: &Solution) {
    let cost = analysis::cost(solution).expect("checked feasible above");
    let avg_resp_time = analysis::avg_resp_time_secs(solution).expect("checked feasible above");
    let miss_rate = analysis::deadline_miss_rate(solution).expect("checked feasible above");

    println!();
    print!("Total cost: {:.3}", cost.0);
    if let Some(max_cost) = solution.problem.max_cost {
        print!(" (max. cost: {:.3})", max_cost.0);
    }
    println!();
    print!("Average response time: {avg_resp_time:.3} s");
    if let Some(max_avg) = solution.problem.max_avg_resp_time {
        print!(" (max. avg. resp. time: {:.3} s)", max_avg.to_seconds());
    }
    println!();
    println!("Deadline miss ratio: {miss_rate:.3}");
}
