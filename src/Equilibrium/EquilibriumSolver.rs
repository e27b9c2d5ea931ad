//! # Equilibrium Solver
//!
//! Fixed-point relaxation of the four coupled equilibria of the antacid network.
//! The reactions are never assembled into one polynomial. Every iteration visits the
//! reactions in a fixed order and for each of them:
//! 1. evaluates the equilibrium function against the current state;
//! 2. skips the reaction if the required change is exactly zero;
//! 3. clamps the change so that no species of the stoichiometry list can become negative;
//! 4. multiplies it by the damping factor (0.5: the equations are coupled, full steps
//!    overshoot and oscillate);
//! 5. applies it to every species of the stoichiometry list (+ produced, - consumed);
//! 6. adds it to the running total of that reaction.
//!
//! The run stops when the iteration budget is exhausted or, if `stop_on_convergence`
//! is set, as soon as the largest change applied during one iteration is not above
//! `change_cutoff`. Whether the cutoff was reached is reported in `EquilibriumResult::converged`.
//! # Examples
//! ```
//! use TitraKin::Equilibrium::EquilibriumSolver::EquilibriumSolver;
//! use TitraKin::Equilibrium::AcidBaseReactions::Species;
//! let solver = EquilibriumSolver::with_defaults();
//! let result = solver.equilibrate(2.0).unwrap();
//! assert!(result.converged);
//! assert!(result.concentrations.get(Species::Hydronium) < 1e-7);
//! assert!(result.pH().unwrap() > 7.0);
//! ```
use crate::Equilibrium::AcidBaseReactions::{
    Concentrations, Polarity, ReactionEquation, ReactionKind, ReactionModel, Species,
};
use crate::Equilibrium::equilibrium_errors::EquilibriumError;
use crate::Equilibrium::pH::calculate_pH;
use log::{debug, info};
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// numerical settings of the relaxation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// iteration budget
    pub max_iterations: usize,
    /// largest change per iteration that still counts as converged, mol/L
    pub change_cutoff: f64,
    /// multiplier applied to every clamped change
    pub damping: f64,
    /// stop as soon as the cutoff is reached instead of spending the whole budget
    pub stop_on_convergence: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            change_cutoff: 1.0e-15,
            damping: 0.5,
            stop_on_convergence: true,
        }
    }
}

impl SolverSettings {
    /// fixed budget of 1000 iterations and a 1e-20 cutoff that is only reported
    pub fn reference() -> Self {
        Self {
            max_iterations: 1000,
            change_cutoff: 1.0e-20,
            damping: 0.5,
            stop_on_convergence: false,
        }
    }

    pub fn validate(&self) -> Result<(), EquilibriumError> {
        if self.max_iterations == 0 {
            return Err(EquilibriumError::InvalidSettings(
                "max_iterations must be positive".to_string(),
            ));
        }
        if !self.change_cutoff.is_finite() || self.change_cutoff < 0.0 {
            return Err(EquilibriumError::InvalidSettings(format!(
                "change_cutoff must be non-negative, got {}",
                self.change_cutoff
            )));
        }
        // damping above 1 would void the non-negativity guarantee of the clamp
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(EquilibriumError::InvalidSettings(format!(
                "damping must be in (0, 1], got {}",
                self.damping
            )));
        }
        Ok(())
    }
}

/// outcome of one equilibrium run
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumResult {
    pub initial_base: f64,
    pub concentrations: Concentrations,
    /// cumulative signed displacement applied by each reaction
    pub total_changes: BTreeMap<ReactionKind, f64>,
    pub iterations: usize,
    /// largest absolute change applied during the last iteration
    pub max_last_change: f64,
    pub converged: bool,
}

impl EquilibriumResult {
    #[allow(non_snake_case)]
    pub fn pH(&self) -> Result<f64, EquilibriumError> {
        calculate_pH(self.concentrations.get(Species::Hydronium))
    }

    pub fn total_change(&self, reaction: ReactionKind) -> f64 {
        self.total_changes.get(&reaction).copied().unwrap_or(0.0)
    }

    /// total changes keyed by reaction name
    pub fn named_total_changes(&self) -> BTreeMap<String, f64> {
        self.total_changes
            .iter()
            .map(|(r, v)| (r.name().to_string(), *v))
            .collect()
    }

    pub fn pretty_print(&self) {
        println!(
            "__________equilibrium at initial base concentration {} mol/L__________",
            self.initial_base
        );
        let mut table = Table::new();
        table.add_row(row!["species", "concentration, mol/L"]);
        for (species, value) in self.concentrations.iter() {
            table.add_row(row![species, format!("{:.6e}", value)]);
        }
        table.printstd();
        let mut changes = Table::new();
        changes.add_row(row!["reaction", "total change, mol/L"]);
        for (reaction, value) in &self.total_changes {
            changes.add_row(row![reaction, format!("{:.6e}", value)]);
        }
        changes.printstd();
        match self.pH() {
            Ok(ph) => println!("pH = {:.4}", ph),
            Err(e) => println!("pH: {}", e),
        }
        println!(
            "iterations: {}, last max change: {:e}, converged: {}",
            self.iterations, self.max_last_change, self.converged
        );
        println!("_____________________________________________________________");
    }
}

/// Limits a displacement so that applying it cannot drive any species of the
/// stoichiometry list below zero. Consumed species bound forward (positive) changes,
/// produced species bound backward (negative) ones.
pub fn clamp_change(
    required_change: f64,
    stoichiometry: &[(Species, Polarity)],
    state: &Concentrations,
) -> f64 {
    let mut change = required_change;
    for (species, polarity) in stoichiometry {
        let available = state.get(*species);
        match polarity {
            Polarity::Produced => {
                if change < 0.0 {
                    change = -(-change).min(available);
                }
            }
            Polarity::Consumed => {
                if change > 0.0 {
                    change = change.min(available);
                }
            }
        }
    }
    change
}

/// relaxation solver bound to one reaction model
#[derive(Debug, Clone)]
pub struct EquilibriumSolver {
    model: ReactionModel,
    settings: SolverSettings,
}

impl EquilibriumSolver {
    pub fn new(model: ReactionModel, settings: SolverSettings) -> Result<Self, EquilibriumError> {
        model.constants.validate()?;
        settings.validate()?;
        Ok(Self { model, settings })
    }

    /// reference constants and default settings
    pub fn with_defaults() -> Self {
        Self {
            model: ReactionModel::default(),
            settings: SolverSettings::default(),
        }
    }

    pub fn model(&self) -> &ReactionModel {
        &self.model
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Runs steps 1-5 for one reaction and returns the change actually applied.
    fn apply_reaction(
        &self,
        reaction: ReactionKind,
        state: &mut Concentrations,
    ) -> Result<f64, EquilibriumError> {
        let required_change = reaction.required_change(state, &self.model.constants)?;
        if required_change == 0.0 {
            return Ok(0.0);
        }
        let stoichiometry = reaction.stoichiometry();
        let change = clamp_change(required_change, stoichiometry, state) * self.settings.damping;
        for (species, polarity) in stoichiometry {
            state.add(*species, polarity.sign() * change);
        }
        Ok(change)
    }

    /// equilibrium of the network after `initial_base` mol/L of base has been added
    pub fn equilibrate(&self, initial_base: f64) -> Result<EquilibriumResult, EquilibriumError> {
        if !initial_base.is_finite() || initial_base < 0.0 {
            return Err(EquilibriumError::NegativeBaseConcentration(initial_base));
        }
        debug!("equilibrate: initial base concentration {}", initial_base);
        let mut state = self.model.initial_state(initial_base);
        let mut total_changes: BTreeMap<ReactionKind, f64> =
            self.model.reactions().iter().map(|r| (*r, 0.0)).collect();

        let mut iterations = 0;
        let mut max_change = f64::INFINITY;
        while iterations < self.settings.max_iterations {
            iterations += 1;
            max_change = 0.0;
            for reaction in self.model.reactions() {
                let change = self.apply_reaction(*reaction, &mut state)?;
                if let Some(total) = total_changes.get_mut(reaction) {
                    *total += change;
                }
                max_change = f64::max(max_change, change.abs());
            }
            if self.settings.stop_on_convergence && max_change <= self.settings.change_cutoff {
                break;
            }
        }
        let converged = max_change <= self.settings.change_cutoff;
        if converged {
            debug!(
                "equilibrate: converged after {} iterations (base {})",
                iterations, initial_base
            );
        } else {
            debug!(
                "equilibrate: budget of {} iterations exhausted, last max change {:e} (base {})",
                iterations, max_change, initial_base
            );
        }
        Ok(EquilibriumResult {
            initial_base,
            concentrations: state,
            total_changes,
            iterations,
            max_last_change: max_change,
            converged,
        })
    }

    /// Relaxes a single reaction while every other concentration stays fixed.
    /// Returns the cumulative change after each iteration.
    pub fn relax_single(
        &self,
        reaction: ReactionKind,
        state: &mut Concentrations,
        iterations: usize,
    ) -> Result<Vec<f64>, EquilibriumError> {
        let mut history = Vec::with_capacity(iterations);
        let mut total = 0.0;
        for _ in 0..iterations {
            total += self.apply_reaction(reaction, state)?;
            history.push(total);
        }
        Ok(history)
    }

    pub fn pretty_print_settings(&self) {
        info!(
            "KW = {:e}, K_ACID = {:e}, K_BASE = {}, K_ACID_BASE = {:e}",
            self.model.constants.kw,
            self.model.constants.k_acid,
            self.model.constants.k_base,
            self.model.constants.k_acid_base()
        );
        info!(
            "max iterations = {}, change cutoff = {:e}, damping = {}, early stop = {}",
            self.settings.max_iterations,
            self.settings.change_cutoff,
            self.settings.damping,
            self.settings.stop_on_convergence
        );
    }
}
