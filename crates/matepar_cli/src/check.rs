//! `matepar check`: validate a problem file without placing it.

use std::path::Path;

use crate::problem::Problem;
use crate::{load_settings, CheckArgs, GlobalArgs};

/// Runs the `matepar check` command.
///
/// Builds both graphs and prints, per label, how many netlist nodes use it as
/// their primary label against how many device sites carry it. Returns exit
/// code 1 if any label is over-subscribed.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    load_settings(global)?;
    let problem = Problem::load(Path::new(&args.problem))?;
    let design = problem.build()?;

    let demand = design.netlist.count_labels();
    let supply = design.device.count_labels();
    let mut over = 0;
    for label in design.netlist.labels() {
        let need = demand[label.index()];
        let have = supply.get(label.index()).copied().unwrap_or(0);
        if need > have {
            over += 1;
        }
        if !global.quiet || need > have {
            println!("{:<12} {need:>5} / {have:<5}{}", design.labels.name(label), flag(need, have));
        }
    }

    if !global.quiet {
        eprintln!(
            "   {} netlist node(s), {} device site(s), {} over-subscribed label(s)",
            design.netlist.num_nodes(),
            design.device.num_nodes(),
            over
        );
    }
    Ok(if over > 0 { 1 } else { 0 })
}

fn flag(need: u32, have: u32) -> &'static str {
    if need > have {
        "  over"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::tests::TWO_BY_TWO;
    use crate::ColorChoice;
    use std::fs;
    use tempfile::TempDir;

    fn check(text: &str) -> i32 {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("design.json");
        fs::write(&path, text).unwrap();
        let args = CheckArgs {
            problem: path.display().to_string(),
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: ColorChoice::Never,
            config: Some(dir.path().display().to_string()),
        };
        run(&args, &global).unwrap()
    }

    #[test]
    fn fitting_problem_passes() {
        assert_eq!(check(TWO_BY_TWO), 0);
    }

    #[test]
    fn oversubscribed_label_fails() {
        let text = TWO_BY_TWO.replace(
            r#"{ "name": "b", "label": "LUT" }"#,
            r#"{ "name": "b", "label": "LUT" }, { "name": "c", "label": "LUT" }"#,
        );
        assert_eq!(check(&text), 1);
    }
}
