#[cfg(test)]
mod tests {
    use crate::Equilibrium::AcidBaseReactions::{
        AcidDissociation, BaseDissociation, Concentrations, EquilibriumConstants, Polarity,
        ReactionEquation, ReactionKind, ReactionModel, Species, WaterAutoIonization,
    };
    use crate::Equilibrium::EquilibriumSolver::{
        EquilibriumSolver, SolverSettings, clamp_change,
    };
    use crate::Equilibrium::equilibrium_errors::EquilibriumError;
    use approx::assert_relative_eq;

    fn grid(step: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 * step).collect()
    }

    #[test]
    fn test_concentrations_stay_non_negative() {
        for settings in [SolverSettings::default(), SolverSettings::reference()] {
            let solver = EquilibriumSolver::new(ReactionModel::default(), settings).unwrap();
            for base in grid(0.05, 40) {
                let result = solver.equilibrate(base).unwrap();
                assert!(
                    result.concentrations.min_value() >= 0.0,
                    "negative concentration at base {}: {:?}",
                    base,
                    result.concentrations
                );
            }
        }
    }

    #[test]
    fn test_identical_input_identical_output() {
        let solver = EquilibriumSolver::with_defaults();
        let first = solver.equilibrate(0.8).unwrap();
        let _other = solver.equilibrate(1.6).unwrap();
        let second = solver.equilibrate(0.8).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pure_acid_baseline() {
        let solver = EquilibriumSolver::with_defaults();
        let result = solver.equilibrate(0.0).unwrap();
        assert!(result.converged);
        let h3o = result.concentrations.get(Species::Hydronium);
        // weak dissociation of 1 mol/L acid: [H3O] ~ sqrt(K_ACID)
        assert_relative_eq!(h3o, (1.0e-3f64).sqrt(), max_relative = 5e-2);
        let ph = result.pH().unwrap();
        assert!(ph > 1.0 && ph < 2.0, "pH {}", ph);
        assert_eq!(result.total_change(ReactionKind::from(BaseDissociation)), 0.0);
        assert_eq!(result.concentrations.get(Species::CalciumIons), 0.0);
    }

    #[test]
    fn test_excess_base_reaches_water_floor() {
        let solver = EquilibriumSolver::with_defaults();
        let result = solver.equilibrate(2.0).unwrap();
        let h3o = result.concentrations.get(Species::Hydronium);
        assert!(h3o > 1e-8 && h3o < 1e-7, "[H3O] = {}", h3o);
        assert!(result.pH().unwrap() > 7.0);
        // nearly all acid ended up as salt
        assert!(result.concentrations.get(Species::Salt) > 0.99);
        // water ionic product
        let oh = result.concentrations.get(Species::Hydroxide);
        assert_relative_eq!(oh * h3o, 1e-8, max_relative = 1e-6);
    }

    #[test]
    fn test_ph_non_decreasing_with_added_base() {
        let solver = EquilibriumSolver::with_defaults();
        let mut previous = f64::NEG_INFINITY;
        for base in grid(0.05, 40) {
            let ph = solver.equilibrate(base).unwrap().pH().unwrap();
            assert!(ph >= previous - 1e-9, "pH dropped at base {}: {} < {}", base, ph, previous);
            previous = ph;
        }
    }

    #[test]
    fn test_total_changes_reconstruct_final_state() {
        let solver = EquilibriumSolver::with_defaults();
        for base in [0.0, 0.3, 1.0, 1.7] {
            let r = solver.equilibrate(base).unwrap();
            let acid = r.total_change(ReactionKind::from(AcidDissociation));
            let base_change = r.total_change(ReactionKind::from(BaseDissociation));
            let water = r.total_change(ReactionKind::from(WaterAutoIonization));
            let neutralization = r.total_change(ReactionKind::ALL[3]);
            let c = &r.concentrations;
            assert_relative_eq!(c.get(Species::Base), base - base_change, epsilon = 1e-12);
            assert_relative_eq!(c.get(Species::Salt), acid + neutralization, epsilon = 1e-12);
            assert_relative_eq!(
                c.get(Species::Hydronium),
                1e-7 + acid + water,
                epsilon = 1e-12
            );
            assert_relative_eq!(
                c.get(Species::Hydroxide),
                1e-7 + base_change + water - neutralization,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_reference_settings_spend_whole_budget() {
        let solver =
            EquilibriumSolver::new(ReactionModel::default(), SolverSettings::reference()).unwrap();
        let result = solver.equilibrate(0.5).unwrap();
        assert_eq!(result.iterations, 1000);
        assert_eq!(
            result.converged,
            result.max_last_change <= SolverSettings::reference().change_cutoff
        );
    }

    #[test]
    fn test_early_stop_within_budget() {
        let solver = EquilibriumSolver::with_defaults();
        for base in grid(0.1, 20) {
            let result = solver.equilibrate(base).unwrap();
            assert!(result.converged, "base {} did not converge", base);
            assert!(result.iterations < 1000);
            assert!(result.max_last_change <= 1e-15);
        }
        // with early stop disabled the same state is reached, only later
        let settings = SolverSettings {
            stop_on_convergence: false,
            ..SolverSettings::default()
        };
        let full = EquilibriumSolver::new(ReactionModel::default(), settings)
            .unwrap()
            .equilibrate(1.5)
            .unwrap();
        let early = solver.equilibrate(1.5).unwrap();
        assert_eq!(full.iterations, 1000);
        assert_relative_eq!(full.pH().unwrap(), early.pH().unwrap(), epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_input_and_settings() {
        let solver = EquilibriumSolver::with_defaults();
        assert_eq!(
            solver.equilibrate(-0.1),
            Err(EquilibriumError::NegativeBaseConcentration(-0.1))
        );
        assert!(solver.equilibrate(f64::NAN).is_err());

        let zero_budget = SolverSettings {
            max_iterations: 0,
            ..SolverSettings::default()
        };
        assert!(EquilibriumSolver::new(ReactionModel::default(), zero_budget).is_err());
        let overshoot = SolverSettings {
            damping: 1.5,
            ..SolverSettings::default()
        };
        assert!(matches!(
            EquilibriumSolver::new(ReactionModel::default(), overshoot),
            Err(EquilibriumError::InvalidSettings(_))
        ));
        let bad_constants = ReactionModel::new(EquilibriumConstants {
            kw: -1.0,
            ..EquilibriumConstants::default()
        });
        assert!(EquilibriumSolver::new(bad_constants, SolverSettings::default()).is_err());
    }

    #[test]
    fn test_independent_solvers_with_different_constants() {
        let reference = EquilibriumSolver::with_defaults();
        let stronger_acid = EquilibriumSolver::new(
            ReactionModel::new(EquilibriumConstants::new(1e-8, 1e-1, 0.45).unwrap()),
            SolverSettings::default(),
        )
        .unwrap();
        let weak = reference.equilibrate(0.0).unwrap();
        let strong = stronger_acid.equilibrate(0.0).unwrap();
        assert!(strong.pH().unwrap() < weak.pH().unwrap());
        assert_eq!(reference.model().constants, EquilibriumConstants::default());
        assert!(strong.concentrations.min_value() >= 0.0);
    }

    #[test]
    fn test_clamp_limits_both_directions() {
        let state: Concentrations = [
            (Species::Acid, 0.2),
            (Species::Hydronium, 0.05),
            (Species::Salt, 0.01),
        ]
        .into_iter()
        .collect();
        let stoichiometry = AcidDissociation.stoichiometry();
        // forward change limited by the consumed acid
        assert_eq!(clamp_change(0.5, stoichiometry, &state), 0.2);
        assert_eq!(clamp_change(0.1, stoichiometry, &state), 0.1);
        // backward change limited by the scarcest product
        assert_eq!(clamp_change(-0.5, stoichiometry, &state), -0.01);
        assert_eq!(clamp_change(-0.001, stoichiometry, &state), -0.001);
        assert_eq!(clamp_change(0.0, &[(Species::Acid, Polarity::Consumed)], &state), 0.0);
    }

    #[test]
    fn test_single_reaction_halving_converges_monotonically() {
        let solver = EquilibriumSolver::with_defaults();
        let constants = solver.model().constants;
        let reaction = ReactionKind::from(AcidDissociation);
        let mut state = solver.model().initial_state(0.0);
        let root = reaction.required_change(&state, &constants).unwrap();
        let history = solver.relax_single(reaction, &mut state, 60).unwrap();
        assert_relative_eq!(history[0], 0.5 * root, max_relative = 1e-12);
        for pair in history.windows(2) {
            assert!(pair[1] >= pair[0]);
            assert!(pair[1] <= root * (1.0 + 1e-12));
        }
        assert_relative_eq!(history[59], root, max_relative = 1e-12);
        // the relation itself is now satisfied
        let residual = reaction.required_change(&state, &constants).unwrap();
        assert!(residual.abs() < 1e-15);
    }
}
