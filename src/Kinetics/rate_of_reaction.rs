//! # Rate of Reaction of an Antacid Tablet
//!
//! Consecutive first-order reactions `A -> B -> C` (calcium carbonate dissolving and turning
//! into calcium chloride through an intermediate) have closed-form concentration profiles:
//! ```text
//! C_A(t) = A0·exp(-k1·t)
//! C_C(t) = A0·(1 + (k1·exp(-k2·t) - k2·exp(-k1·t)) / (k2 - k1))
//! C_B(t) = A0 - C_A(t) - C_C(t)
//! ```
//! For `k1 = k2 = k` the product profile has the limit `C_C(t) = A0·(1 - exp(-k·t)·(1 + k·t))`.
//!
//! Rate constants are evaluated from the tablet experiment parameters as `k = A^(-Ea/(R·T))`.
use crate::Equilibrium::TitrationCurve::LinearGraph;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RateError {
    #[error("Invalid rate constant {name} = {value}")]
    InvalidRateConstant { name: &'static str, value: f64 },
    #[error("Invalid initial concentration {0}")]
    InvalidConcentration(f64),
    #[error("Invalid time grid: end {end}, step {step}")]
    InvalidTimeGrid { end: f64, step: f64 },
}

/// parameters of one stage of the tablet experiment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateConstantParams {
    /// pre-exponential factor
    pub a: f64,
    /// activation energy
    pub ea: f64,
    /// gas constant of the experiment
    pub r: f64,
    /// temperature
    pub t: f64,
}

impl RateConstantParams {
    pub fn first_stage() -> Self {
        Self {
            a: 10.0,
            ea: 17.45,
            r: 287.05,
            t: 22.0,
        }
    }

    pub fn second_stage() -> Self {
        Self {
            a: 101.0,
            ..Self::first_stage()
        }
    }

    pub fn rate_constant(&self) -> f64 {
        self.a.powf(-self.ea / (self.r * self.t))
    }
}

/// A -> B -> C with first-order kinetics in both stages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsecutiveReaction {
    pub initial_concentration: f64,
    pub k1: f64,
    pub k2: f64,
}

impl Default for ConsecutiveReaction {
    fn default() -> Self {
        Self {
            initial_concentration: 0.6,
            k1: RateConstantParams::first_stage().rate_constant(),
            k2: RateConstantParams::second_stage().rate_constant(),
        }
    }
}

impl ConsecutiveReaction {
    pub fn new(initial_concentration: f64, k1: f64, k2: f64) -> Result<Self, RateError> {
        if !initial_concentration.is_finite() || initial_concentration < 0.0 {
            return Err(RateError::InvalidConcentration(initial_concentration));
        }
        for (name, value) in [("k1", k1), ("k2", k2)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RateError::InvalidRateConstant { name, value });
            }
        }
        Ok(Self {
            initial_concentration,
            k1,
            k2,
        })
    }

    pub fn from_params(
        initial_concentration: f64,
        first: &RateConstantParams,
        second: &RateConstantParams,
    ) -> Result<Self, RateError> {
        Self::new(
            initial_concentration,
            first.rate_constant(),
            second.rate_constant(),
        )
    }

    fn is_degenerate(&self) -> bool {
        (self.k2 - self.k1).abs() <= 1e-12 * self.k1.max(self.k2)
    }

    /// concentration of the reactant (calcium carbonate)
    pub fn reactant(&self, time: f64) -> f64 {
        self.initial_concentration * (-self.k1 * time).exp()
    }

    /// concentration of the final product (calcium chloride)
    pub fn product(&self, time: f64) -> f64 {
        let (k1, k2) = (self.k1, self.k2);
        if self.is_degenerate() {
            return self.initial_concentration * (1.0 - (-k1 * time).exp() * (1.0 + k1 * time));
        }
        self.initial_concentration
            * (1.0 + (k1 * (-k2 * time).exp() - k2 * (-k1 * time).exp()) / (k2 - k1))
    }

    pub fn intermediate(&self, time: f64) -> f64 {
        self.initial_concentration - self.reactant(time) - self.product(time)
    }

    /// time of the intermediate maximum
    pub fn intermediate_peak_time(&self) -> f64 {
        if self.is_degenerate() {
            return 1.0 / self.k1;
        }
        (self.k2 / self.k1).ln() / (self.k2 - self.k1)
    }

    /// reactant and product profiles on [0, end) with the given step
    pub fn profile(&self, end: f64, step: f64) -> Result<LinearGraph, RateError> {
        if !(end.is_finite() && step.is_finite() && end > 0.0 && step > 0.0) {
            return Err(RateError::InvalidTimeGrid { end, step });
        }
        let n = (end / step - 1e-9).ceil() as usize;
        info!(
            "consecutive reaction profile: k1 = {}, k2 = {}, {} time points",
            self.k1, self.k2, n
        );
        let mut graph = LinearGraph::new("time (s)", "concentration (mol/l)", "");
        for i in 0..n {
            let time = i as f64 * step;
            graph.add_data_point(
                time,
                self.reactant(time),
                "concentration of Calcium Carbonate",
            );
            graph.add_data_point(
                time,
                self.product(time),
                "concentration of Calcium Chloride",
            );
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rate_constants_of_tablet_experiment() {
        assert_relative_eq!(
            RateConstantParams::first_stage().rate_constant(),
            0.9936576528238034,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            RateConstantParams::second_stage().rate_constant(),
            0.987328384110901,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_profiles_at_known_time() {
        let reaction = ConsecutiveReaction::default();
        assert_relative_eq!(reaction.reactant(5.0), 0.004173025828812164, max_relative = 1e-9);
        assert_relative_eq!(reaction.product(5.0), 0.5747626321678787, max_relative = 1e-9);
        assert_relative_eq!(reaction.intermediate(5.0), 0.02106434200330909, max_relative = 1e-7);
    }

    #[test]
    fn test_boundaries_and_balance() {
        let reaction = ConsecutiveReaction::new(1.0, 0.5, 2.0).unwrap();
        assert_relative_eq!(reaction.reactant(0.0), 1.0);
        assert_relative_eq!(reaction.product(0.0), 0.0, epsilon = 1e-15);
        assert_relative_eq!(reaction.product(100.0), 1.0, epsilon = 1e-12);
        for i in 0..50 {
            let t = i as f64 * 0.3;
            let sum = reaction.reactant(t) + reaction.intermediate(t) + reaction.product(t);
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
            assert!(reaction.intermediate(t) >= -1e-15);
        }
        // the intermediate peaks where dB/dt = 0
        let peak = reaction.intermediate_peak_time();
        assert!(reaction.intermediate(peak) >= reaction.intermediate(peak - 0.01));
        assert!(reaction.intermediate(peak) >= reaction.intermediate(peak + 0.01));
    }

    #[test]
    fn test_equal_rate_constants_limit() {
        let equal = ConsecutiveReaction::new(1.0, 0.7, 0.7).unwrap();
        let close = ConsecutiveReaction::new(1.0, 0.7, 0.7 * (1.0 + 1e-6)).unwrap();
        for t in [0.0, 0.5, 1.0, 3.0, 10.0] {
            assert_relative_eq!(equal.product(t), close.product(t), epsilon = 1e-5);
        }
        assert_relative_eq!(equal.intermediate_peak_time(), 1.0 / 0.7);
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            ConsecutiveReaction::new(-1.0, 1.0, 1.0),
            Err(RateError::InvalidConcentration(-1.0))
        );
        assert!(ConsecutiveReaction::new(1.0, 0.0, 1.0).is_err());
        let reaction = ConsecutiveReaction::default();
        assert!(reaction.profile(60.0, 0.0).is_err());
        assert!(reaction.profile(-1.0, 0.1).is_err());
    }

    #[test]
    fn test_profile_table() {
        let graph = ConsecutiveReaction::default().profile(60.0, 0.5).unwrap();
        assert_eq!(graph.len(), 240);
        assert_eq!(graph.series_names().len(), 2);
        assert_relative_eq!(
            graph
                .find_y_value(0.0, "concentration of Calcium Carbonate")
                .unwrap(),
            0.6
        );
    }
}
