use crate::Equilibrium::AcidBaseReactions::Species;
use crate::Equilibrium::EquilibriumSolver::{EquilibriumSolver, SolverSettings};
use crate::Equilibrium::TitrationCurve::{TitrationSweep, run_sweep};
use crate::Equilibrium::conservation::{ConservationCheck, MOIETIES};
use crate::Kinetics::rate_of_reaction::ConsecutiveReaction;
use crate::settings::TitrationConfig;

pub fn titration_examples(task: usize) {
    //
    let solver = EquilibriumSolver::with_defaults();
    match task {
        0 => {
            // 1 mol/L hydrochloric acid, no antacid yet
            match solver.equilibrate(0.0) {
                Ok(result) => result.pretty_print(),
                Err(e) => println!("Error: {}", e),
            }
        }
        1 => {
            // twice as much base as acid: the solution turns basic
            match solver.equilibrate(2.0) {
                Ok(result) => {
                    result.pretty_print();
                    println!(
                        "[H3O] = {:e}, [OH] = {:e}",
                        result.concentrations.get(Species::Hydronium),
                        result.concentrations.get(Species::Hydroxide)
                    );
                }
                Err(e) => println!("Error: {}", e),
            }
        }
        2 => {
            let sweep = TitrationSweep {
                start: 0.0,
                end: 2.0,
                step: 0.1,
            };
            match run_sweep(&solver, &sweep) {
                Ok(curves) => {
                    curves.ph_graph.pretty_print(Some("pH curve"));
                    curves
                        .change_graph
                        .pretty_print(Some("total change of every reaction"));
                }
                Err(e) => println!("Error: {}", e),
            }
        }
        3 => {
            for base in [0.0, 0.5, 1.0, 1.5] {
                let initial = solver.model().initial_state(base);
                match solver.equilibrate(base) {
                    Ok(result) => {
                        let check = ConservationCheck::new(&initial, &result);
                        println!("base {} mol/L:", base);
                        for (i, moiety) in MOIETIES.iter().enumerate() {
                            println!(
                                "  {}: initial {:.12}, final {:.12}",
                                moiety, check.initial_totals[i], check.final_totals[i]
                            );
                        }
                        println!("  max deviation {:e}", check.max_deviation());
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
        }
        4 => {
            let reaction = ConsecutiveReaction::default();
            println!("k1 = {}, k2 = {}", reaction.k1, reaction.k2);
            println!(
                "intermediate peaks at t = {:.3} s",
                reaction.intermediate_peak_time()
            );
            match reaction.profile(10.0, 1.0) {
                Ok(graph) => graph.pretty_print(Some("rate of reaction")),
                Err(e) => println!("Error: {}", e),
            }
        }
        5 => {
            // fixed budget of 1000 iterations against early termination
            let mut config = TitrationConfig::default();
            config.solver = SolverSettings::reference();
            let fixed = config.build_solver();
            match (fixed, solver.equilibrate(0.95)) {
                (Ok(fixed), Ok(early)) => match fixed.equilibrate(0.95) {
                    Ok(full) => {
                        println!(
                            "fixed budget: {} iterations, pH {:?}, converged {}",
                            full.iterations,
                            full.pH(),
                            full.converged
                        );
                        println!(
                            "early stop:   {} iterations, pH {:?}, converged {}",
                            early.iterations,
                            early.pH(),
                            early.converged
                        );
                    }
                    Err(e) => println!("Error: {}", e),
                },
                (Err(e), _) => println!("Error: {}", e),
                (_, Err(e)) => println!("Error: {}", e),
            }
        }
        _ => {
            println!("Wrong task number");
        }
    }
}
