use super::cli_main::get_user_input;
use crate::Equilibrium::TitrationCurve::{TitrationCurves, run_sweep};
use crate::settings::TitrationConfig;
use std::fs;
use std::io::{self, Write};

pub fn titration_menu() {
    let mut config = TitrationConfig::default();
    let mut curves: Option<TitrationCurves> = None;
    loop {
        println!("\n=== Titration: antacid added to hydrochloric acid ===");
        println!("1. Equilibrium at one base concentration");
        println!("2. pH curve");
        println!("3. Load config from JSON file");
        println!("4. Save current config to JSON file");
        println!("5. Export last curves (JSON + CSV)");
        println!("0. Back to main menu");
        print!("Choose option: ");
        io::stdout().flush().ok();

        let result = match get_user_input().trim() {
            "1" => single_point(&config),
            "2" => sweep(&config).map(|c| curves = Some(c)),
            "3" => load(&mut config),
            "4" => save(&config),
            "5" => export(curves.as_ref()),
            "0" => break,
            _ => {
                println!("Invalid option");
                Ok(())
            }
        };
        if let Err(e) = result {
            println!("Error: {}", e);
        }
    }
}

pub fn rate_of_reaction_menu() {
    let config = TitrationConfig::default();
    loop {
        println!("\n=== Rate of reaction: calcium carbonate -> calcium chloride ===");
        println!("1. Print concentration profile");
        println!("2. Export concentration profile (CSV)");
        println!("0. Back to main menu");
        print!("Choose option: ");
        io::stdout().flush().ok();

        let result = match get_user_input().trim() {
            "1" => print_profile(&config),
            "2" => export_profile(&config),
            "0" => break,
            _ => {
                println!("Invalid option");
                Ok(())
            }
        };
        if let Err(e) = result {
            println!("Error: {}", e);
        }
    }
}

/// parses a user-typed number
pub fn parse_f64(input: &str, what: &str) -> Result<f64, String> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid {} format: '{}'", what, input.trim()))
}

fn prompt(text: &str) -> String {
    print!("{}", text);
    io::stdout().flush().ok();
    get_user_input().trim().to_string()
}

fn single_point(config: &TitrationConfig) -> Result<(), String> {
    let base = parse_f64(
        &prompt("initial base concentration (mol/L): "),
        "concentration",
    )?;
    let solver = config.build_solver().map_err(|e| e.to_string())?;
    let result = solver.equilibrate(base).map_err(|e| e.to_string())?;
    result.pretty_print();
    Ok(())
}

fn sweep(config: &TitrationConfig) -> Result<TitrationCurves, String> {
    let solver = config.build_solver().map_err(|e| e.to_string())?;
    solver.pretty_print_settings();
    println!("Solving...");
    let curves = run_sweep(&solver, &config.sweep).map_err(|e| e.to_string())?;
    curves
        .ph_graph
        .pretty_print(Some("pH as Tums is added to Hydrochloric Acid"));
    if let Some(neutral) = curves.base_for_ph(7.0) {
        println!("pH 7 is reached at {:.3} mol/L of base", neutral);
    }
    let not_converged = curves.not_converged();
    if !not_converged.is_empty() {
        println!(
            "{} points did not reach the change cutoff: {:?}",
            not_converged.len(),
            not_converged
        );
    }
    Ok(curves)
}

fn load(config: &mut TitrationConfig) -> Result<(), String> {
    let path = prompt("config file: ");
    *config = TitrationConfig::load_config(&path).map_err(|e| e.to_string())?;
    println!("config loaded");
    Ok(())
}

fn save(config: &TitrationConfig) -> Result<(), String> {
    let path = prompt("config file: ");
    config.save_config(&path).map_err(|e| e.to_string())?;
    println!("config saved to {}", path);
    Ok(())
}

fn export(curves: Option<&TitrationCurves>) -> Result<(), String> {
    let curves = curves.ok_or("No curves yet, run the pH curve first".to_string())?;
    let stem = prompt("file name without extension: ");
    for (suffix, graph) in [("ph", &curves.ph_graph), ("changes", &curves.change_graph)] {
        let json = graph.to_json().map_err(|e| e.to_string())?;
        let json_path = format!("{}_{}.json", stem, suffix);
        fs::write(&json_path, json).map_err(|e| e.to_string())?;
        let csv_path = format!("{}_{}.csv", stem, suffix);
        fs::write(&csv_path, graph.to_csv()).map_err(|e| e.to_string())?;
        println!("written {} and {}", json_path, csv_path);
    }
    Ok(())
}

fn print_profile(config: &TitrationConfig) -> Result<(), String> {
    let reaction = config.rate.build_reaction().map_err(|e| e.to_string())?;
    println!("k1 = {}, k2 = {}", reaction.k1, reaction.k2);
    // the full grid has tens of thousands of rows, one row per second is printed
    let graph = reaction
        .profile(config.rate.time_end, 1.0)
        .map_err(|e| e.to_string())?;
    graph.pretty_print(Some("concentration (mol/l) against time (s)"));
    Ok(())
}

fn export_profile(config: &TitrationConfig) -> Result<(), String> {
    let reaction = config.rate.build_reaction().map_err(|e| e.to_string())?;
    let graph = reaction
        .profile(config.rate.time_end, config.rate.time_step)
        .map_err(|e| e.to_string())?;
    let path = prompt("CSV file: ");
    fs::write(&path, graph.to_csv()).map_err(|e| e.to_string())?;
    println!("written {} rows to {}", graph.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(" 0.25\n", "concentration"), Ok(0.25));
        assert_eq!(
            parse_f64("abc", "concentration"),
            Err("Invalid concentration format: 'abc'".to_string())
        );
    }
}
