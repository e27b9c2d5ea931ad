use crate::Equilibrium::equilibrium_errors::EquilibriumError;

/// pH = -log10([H3O]). Undefined for non-positive or non-finite concentrations.
pub fn calculate_pH(hydronium_concentration: f64) -> Result<f64, EquilibriumError> {
    if !hydronium_concentration.is_finite() || hydronium_concentration <= 0.0 {
        return Err(EquilibriumError::PhDomain(hydronium_concentration));
    }
    Ok(-hydronium_concentration.log10())
}

/// pOH = -log10([OH])
pub fn calculate_pOH(hydroxide_concentration: f64) -> Result<f64, EquilibriumError> {
    if !hydroxide_concentration.is_finite() || hydroxide_concentration <= 0.0 {
        return Err(EquilibriumError::PhDomain(hydroxide_concentration));
    }
    Ok(-hydroxide_concentration.log10())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ph_values() {
        assert_relative_eq!(calculate_pH(1.0).unwrap(), 0.0);
        assert_relative_eq!(calculate_pH(1e-7).unwrap(), 7.0, epsilon = 1e-12);
        assert_relative_eq!(calculate_pH(0.1).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(calculate_pOH(1e-3).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ph_domain_error() {
        assert_eq!(calculate_pH(0.0), Err(EquilibriumError::PhDomain(0.0)));
        assert!(calculate_pH(-1e-9).is_err());
        assert!(calculate_pH(f64::INFINITY).is_err());
        assert!(calculate_pOH(0.0).is_err());
    }
}
