//! `matepar place`: run placement on a problem file.

use std::collections::BTreeMap;
use std::path::Path;

use matepar_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use matepar_engine::{PlacementEngine, PlacementReport};
use serde::Serialize;

use crate::problem::Problem;
use crate::timing::TimedPolicy;
use crate::{load_settings, GlobalArgs, PlaceArgs, ReportFormat};

/// Machine-readable result of `matepar place --format json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    success: bool,
    report: Option<&'a PlacementReport>,
    placement: BTreeMap<&'a str, Option<&'a str>>,
    diagnostics: &'a [Diagnostic],
}

/// Runs the `matepar place` command.
///
/// Prints one `netlist-node -> device-node` line per netlist node on success.
/// Returns exit code 0 if placement succeeded, 1 otherwise.
pub fn run(args: &PlaceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = load_settings(global)?;
    let mut config = settings.engine;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_temperature) = args.max_temperature {
        config.max_temperature = max_temperature;
    }
    config.verbose |= global.verbose;
    let seed = config.seed;

    let problem = Problem::load(Path::new(&args.problem))?;
    let mut design = problem.build()?;
    let sink = DiagnosticSink::new();

    let mut policy = TimedPolicy::new(design.timing, &design.delays);
    let mut engine = PlacementEngine::new(&mut design.netlist, &mut design.device, config);
    let result = engine.place_and_route(&mut policy, &design.labels, seed, &sink);
    drop(engine);

    let placement: BTreeMap<&str, Option<&str>> = design
        .netlist
        .iter()
        .map(|(_, node)| {
            let site = node.mate().map(|site| design.device.node(site).data().as_str());
            (node.data().as_str(), site)
        })
        .collect();
    let diagnostics = sink.take_all();

    match args.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(settings.color);
            for diag in &diagnostics {
                eprint!("{}", renderer.render(diag));
            }
            if let Ok(report) = &result {
                for (node, site) in &placement {
                    println!("{node} -> {}", site.unwrap_or("-"));
                }
                if !global.quiet {
                    eprintln!(
                        "   Placed {} node(s) in {} iteration(s), cost {}, seed {}, fingerprint {}",
                        placement.len(),
                        report.iterations,
                        report.cost,
                        report.seed,
                        report.fingerprint
                    );
                }
            }
        }
        ReportFormat::Json => {
            let output = JsonOutput {
                success: result.is_ok(),
                report: result.as_ref().ok(),
                placement,
                diagnostics: &diagnostics,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(if result.is_ok() { 0 } else { 1 })
}
