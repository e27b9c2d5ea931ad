use thiserror::Error;

/// error types of the acid-base equilibrium calculations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EquilibriumError {
    /// the quadratic of the equilibrium function has no real root: the concentration state
    /// violates the preconditions of the model
    #[error("Negative discriminant {value:e} in the equilibrium equation of '{reaction}'")]
    NegativeDiscriminant { reaction: &'static str, value: f64 },
    #[error("Initial base concentration must be finite and non-negative, got {0}")]
    NegativeBaseConcentration(f64),
    #[error("Equilibrium equation of '{reaction}' returned a non-finite change")]
    NonFiniteChange { reaction: &'static str },
    #[error("pH is undefined for hydronium concentration {0}")]
    PhDomain(f64),
    #[error("Invalid equilibrium constant {name} = {value}")]
    InvalidConstant { name: &'static str, value: f64 },
    #[error("Invalid solver settings: {0}")]
    InvalidSettings(String),
}

/// error types of the titration sweep and of the curve collector
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Invalid sweep range: start {start}, end {end}, step {step}")]
    InvalidRange { start: f64, end: f64, step: f64 },
    #[error("Equilibrium failed at base concentration {base}: {source}")]
    Equilibrium {
        base: f64,
        #[source]
        source: EquilibriumError,
    },
    #[error("No data point for x = {x} in series '{series}'")]
    MissingDataPoint { x: f64, series: String },
    #[error("Failed to serialize curve: {0}")]
    Serde(#[from] serde_json::Error),
}
