//! # Acid-Base Equilibrium Module
//!
//! Equilibrium of hydrochloric acid progressively neutralized by calcium carbonate
//! (the weak base of an antacid tablet) and the resulting pH curve.
//!
//! ## Structure
//! - `AcidBaseReactions` - species, equilibrium constants and the four equilibrium relations
//!   (acid dissociation, base dissociation, water auto-ionization, neutralization)
//! - `EquilibriumSolver` - damped and clamped fixed-point relaxation of the coupled relations
//! - `pH` - pH and pOH from the equilibrium concentrations
//! - `conservation` - conserved moieties of the network, used to check the mass balance
//! - `TitrationCurve` - sweep over initial base concentrations and curve collection
//!
//! # Examples
//! ```
//! use TitraKin::Equilibrium::EquilibriumSolver::EquilibriumSolver;
//! use TitraKin::Equilibrium::TitrationCurve::{TitrationSweep, run_sweep};
//! let solver = EquilibriumSolver::with_defaults();
//! let sweep = TitrationSweep { start: 0.0, end: 2.0, step: 0.5 };
//! let curves = run_sweep(&solver, &sweep).unwrap();
//! let ph_acid = curves.ph_graph.find_y_value(0.0, "pH").unwrap();
//! let ph_base = curves.ph_graph.find_y_value(1.5, "pH").unwrap();
//! assert!(ph_acid < ph_base);
//! ```
pub mod AcidBaseReactions;
pub mod EquilibriumSolver;
mod EquilibriumSolver_tests;
pub mod TitrationCurve;
pub mod conservation;
pub mod equilibrium_errors;
pub mod pH;
