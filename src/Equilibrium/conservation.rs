//! Conservation laws of the antacid network.
//!
//! Every displacement is applied to all species of a stoichiometry list at once, so the
//! left null space of the stoichiometric matrix is preserved exactly (up to rounding) by the
//! relaxation, whether or not it converged. Three independent moieties span that space:
//!
//! | moiety | combination |
//! |--------|-------------|
//! | chloride | Acid + Salt |
//! | calcium | Base + Calcium ions |
//! | proton balance | Acid + H3O - OH + Calcium ions |
use crate::Equilibrium::AcidBaseReactions::{Concentrations, ReactionEquation, ReactionKind, Species};
use crate::Equilibrium::EquilibriumSolver::EquilibriumResult;
use nalgebra::{DMatrix, DVector};

pub const MOIETIES: [&str; 3] = ["chloride", "calcium", "proton balance"];

/// species x reactions matrix of signed stoichiometric coefficients
pub fn stoichiometric_matrix(reactions: &[ReactionKind]) -> DMatrix<f64> {
    let mut matrix = DMatrix::zeros(Species::ALL.len(), reactions.len());
    for (j, reaction) in reactions.iter().enumerate() {
        for (species, polarity) in reaction.stoichiometry() {
            matrix[(species_index(*species), j)] += polarity.sign();
        }
    }
    matrix
}

/// moieties x species matrix of the conserved combinations
pub fn moiety_matrix() -> DMatrix<f64> {
    let mut matrix = DMatrix::zeros(MOIETIES.len(), Species::ALL.len());
    let rows: [&[(Species, f64)]; 3] = [
        &[(Species::Acid, 1.0), (Species::Salt, 1.0)],
        &[(Species::Base, 1.0), (Species::CalciumIons, 1.0)],
        &[
            (Species::Acid, 1.0),
            (Species::Hydronium, 1.0),
            (Species::Hydroxide, -1.0),
            (Species::CalciumIons, 1.0),
        ],
    ];
    for (i, row) in rows.iter().enumerate() {
        for (species, coefficient) in row.iter() {
            matrix[(i, species_index(*species))] = *coefficient;
        }
    }
    matrix
}

fn species_index(species: Species) -> usize {
    Species::ALL
        .iter()
        .position(|s| *s == species)
        .unwrap_or_default()
}

pub fn concentration_vector(c: &Concentrations) -> DVector<f64> {
    DVector::from_iterator(Species::ALL.len(), Species::ALL.iter().map(|s| c.get(*s)))
}

/// moiety totals before and after an equilibrium run
#[derive(Debug, Clone)]
pub struct ConservationCheck {
    pub initial_totals: DVector<f64>,
    pub final_totals: DVector<f64>,
}

impl ConservationCheck {
    pub fn new(initial: &Concentrations, result: &EquilibriumResult) -> Self {
        let m = moiety_matrix();
        Self {
            initial_totals: &m * concentration_vector(initial),
            final_totals: &m * concentration_vector(&result.concentrations),
        }
    }

    pub fn max_deviation(&self) -> f64 {
        (&self.final_totals - &self.initial_totals).amax()
    }

    pub fn is_conserved(&self, tolerance: f64) -> bool {
        self.max_deviation() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Equilibrium::EquilibriumSolver::EquilibriumSolver;
    use approx::assert_relative_eq;

    #[test]
    fn test_moieties_span_left_null_space() {
        let n = stoichiometric_matrix(&ReactionKind::ALL);
        assert_eq!(n.shape(), (6, 4));
        let product = moiety_matrix() * n;
        assert!(product.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_stoichiometric_matrix_columns() {
        let n = stoichiometric_matrix(&ReactionKind::ALL);
        // water auto-ionization produces H3O and OH only
        let water = n.column(2);
        assert_eq!(water.iter().filter(|v| **v != 0.0).count(), 2);
        assert_eq!(water[species_index(Species::Hydronium)], 1.0);
        assert_eq!(water[species_index(Species::Hydroxide)], 1.0);
        assert_eq!(n[(species_index(Species::Acid), 3)], -1.0);
    }

    #[test]
    fn test_mass_balance_across_sweep() {
        let solver = EquilibriumSolver::with_defaults();
        for i in 0..20 {
            let base = i as f64 * 0.1;
            let result = solver.equilibrate(base).unwrap();
            let initial = solver.model().initial_state(base);
            let check = ConservationCheck::new(&initial, &result);
            assert!(
                check.is_conserved(1e-9),
                "base {}: deviation {}",
                base,
                check.max_deviation()
            );
            // chloride: initial acid minus the salt formed is what is left as acid
            assert_relative_eq!(
                result.concentrations.get(Species::Acid),
                1.0 - result.concentrations.get(Species::Salt),
                epsilon = 1e-9
            );
        }
    }
}
