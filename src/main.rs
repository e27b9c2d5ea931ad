use TitraKin::Equilibrium::TitrationCurve::run_sweep;
use TitraKin::cli::cli_main::run_interactive_menu;
use TitraKin::settings::TitrationConfig;
use log::{LevelFilter, error};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

fn main() {
    if let Err(e) = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("logger is not available: {}", e);
    }
    // with a config file as argument the pH curve is computed without the menu
    match std::env::args().nth(1) {
        Some(path) => {
            if let Err(e) = sweep_from_config(&path) {
                error!("{}", e);
                std::process::exit(1);
            }
        }
        None => run_interactive_menu(),
    }
}

fn sweep_from_config(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = TitrationConfig::load_config(path)?;
    let solver = config.build_solver()?;
    solver.pretty_print_settings();
    let curves = run_sweep(&solver, &config.sweep)?;
    curves
        .ph_graph
        .pretty_print(Some("pH as Tums is added to Hydrochloric Acid"));
    curves
        .change_graph
        .pretty_print(Some("Change in Concentration per reaction"));
    Ok(())
}
