//! # Acid-Base Reaction Network
//!
//! Static description of the network formed when calcium carbonate (the weak base of an
//! antacid tablet) is added to hydrochloric acid.
//!
//! ## Species
//! | Variant | Name |
//! |---------|------|
//! | `Acid` | Hydrochloric acid |
//! | `Base` | Calcium Carbonate |
//! | `Salt` | Calcium Chloride |
//! | `Hydronium` | Hydronium |
//! | `Hydroxide` | Hydroxide |
//! | `CalciumIons` | Calcium ions |
//!
//! ## Reactions
//! ```text
//! Acid          => H3O + Salt       [H3O][Salt] = K_ACID [Acid]
//! Base          => OH + Ca          [OH][Ca]    = K_BASE [Base]
//! (water)       => OH + H3O         [OH][H3O]   = KW
//! Acid + OH     => Salt             [Salt]      = K_ACID_BASE [Acid][OH],  K_ACID_BASE = K_ACID/KW
//! ```
//! Every equilibrium function substitutes `c_i + ν_i·x` into its mass-action law, which gives
//! a quadratic in the extent `x`, and returns the root closest to zero. That root is the
//! displacement that brings this one relation to equilibrium while all other concentrations
//! are held fixed.
use crate::Equilibrium::equilibrium_errors::EquilibriumError;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Acid,
    Base,
    Salt,
    Hydronium,
    Hydroxide,
    CalciumIons,
}

impl Species {
    pub const ALL: [Species; 6] = [
        Species::Acid,
        Species::Base,
        Species::Salt,
        Species::Hydronium,
        Species::Hydroxide,
        Species::CalciumIons,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Species::Acid => "Hydrochloric acid",
            Species::Base => "Calcium Carbonate",
            Species::Salt => "Calcium Chloride",
            Species::Hydronium => "Hydronium",
            Species::Hydroxide => "Hydroxide",
            Species::CalciumIons => "Calcium ions",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// direction in which a displacement is applied to a species
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Produced,
    Consumed,
}

impl Polarity {
    pub fn sign(&self) -> f64 {
        match self {
            Polarity::Produced => 1.0,
            Polarity::Consumed => -1.0,
        }
    }
}

/// equilibrium constants of the network. Immutable once the model is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumConstants {
    /// water auto-ionization constant
    pub kw: f64,
    /// dissociation constant of the acid
    pub k_acid: f64,
    /// dissociation constant of the base
    pub k_base: f64,
}

impl Default for EquilibriumConstants {
    fn default() -> Self {
        Self {
            kw: 1.0e-8,
            k_acid: 0.1 * 1.0e-2,
            k_base: 0.45,
        }
    }
}

impl EquilibriumConstants {
    pub fn new(kw: f64, k_acid: f64, k_base: f64) -> Result<Self, EquilibriumError> {
        let constants = Self { kw, k_acid, k_base };
        constants.validate()?;
        Ok(constants)
    }

    pub fn validate(&self) -> Result<(), EquilibriumError> {
        for (name, value) in [("KW", self.kw), ("K_ACID", self.k_acid), ("K_BASE", self.k_base)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EquilibriumError::InvalidConstant { name, value });
            }
        }
        Ok(())
    }

    /// equilibrium constant of the neutralization Acid + OH => Salt
    pub fn k_acid_base(&self) -> f64 {
        self.k_acid / self.kw
    }
}

/// concentration of every species, mol/L
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Concentrations(BTreeMap<Species, f64>);

impl Concentrations {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// missing species count as zero concentration
    pub fn get(&self, species: Species) -> f64 {
        self.0.get(&species).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, species: Species, value: f64) {
        self.0.insert(species, value);
    }

    pub fn add(&mut self, species: Species, delta: f64) {
        *self.0.entry(species).or_insert(0.0) += delta;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Species, &f64)> {
        self.0.iter()
    }

    pub fn min_value(&self) -> f64 {
        self.0.values().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn as_map(&self) -> &BTreeMap<Species, f64> {
        &self.0
    }
}

impl FromIterator<(Species, f64)> for Concentrations {
    fn from_iter<I: IntoIterator<Item = (Species, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Root of x² + b·x + c = 0 with the smallest magnitude, evaluated without cancellation.
fn smallest_root(reaction: &'static str, b: f64, c: f64) -> Result<f64, EquilibriumError> {
    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return Err(EquilibriumError::NegativeDiscriminant {
            reaction,
            value: discriminant,
        });
    }
    let q = -0.5 * (b + discriminant.sqrt().copysign(b));
    if q == 0.0 {
        return Ok(0.0);
    }
    let root = c / q;
    if !root.is_finite() {
        return Err(EquilibriumError::NonFiniteChange { reaction });
    }
    Ok(root)
}

/// a single equilibrium relation of the network
#[enum_dispatch]
pub trait ReactionEquation {
    fn name(&self) -> &'static str;
    /// species the displacement is applied to, with their polarity
    fn stoichiometry(&self) -> &'static [(Species, Polarity)];
    /// signed displacement that brings this relation to equilibrium
    fn required_change(
        &self,
        c: &Concentrations,
        k: &EquilibriumConstants,
    ) -> Result<f64, EquilibriumError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AcidDissociation;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BaseDissociation;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaterAutoIonization;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AcidBaseNeutralization;

impl ReactionEquation for AcidDissociation {
    fn name(&self) -> &'static str {
        "Hydrochloric Acid dissociation"
    }
    fn stoichiometry(&self) -> &'static [(Species, Polarity)] {
        &[
            (Species::Acid, Polarity::Consumed),
            (Species::Hydronium, Polarity::Produced),
            (Species::Salt, Polarity::Produced),
        ]
    }
    // (H + x)(S + x) = K_ACID (A - x)
    fn required_change(
        &self,
        c: &Concentrations,
        k: &EquilibriumConstants,
    ) -> Result<f64, EquilibriumError> {
        let h3o = c.get(Species::Hydronium);
        let salt = c.get(Species::Salt);
        let acid = c.get(Species::Acid);
        smallest_root(
            self.name(),
            h3o + salt + k.k_acid,
            h3o * salt - k.k_acid * acid,
        )
    }
}

impl ReactionEquation for BaseDissociation {
    fn name(&self) -> &'static str {
        "Tums dissociation"
    }
    fn stoichiometry(&self) -> &'static [(Species, Polarity)] {
        &[
            (Species::Base, Polarity::Consumed),
            (Species::Hydroxide, Polarity::Produced),
            (Species::CalciumIons, Polarity::Produced),
        ]
    }
    // (OH + x)(Ca + x) = K_BASE (B - x)
    fn required_change(
        &self,
        c: &Concentrations,
        k: &EquilibriumConstants,
    ) -> Result<f64, EquilibriumError> {
        let oh = c.get(Species::Hydroxide);
        let ions = c.get(Species::CalciumIons);
        let base = c.get(Species::Base);
        smallest_root(
            self.name(),
            oh + ions + k.k_base,
            ions * oh - k.k_base * base,
        )
    }
}

impl ReactionEquation for WaterAutoIonization {
    fn name(&self) -> &'static str {
        "Water auto-ionization"
    }
    fn stoichiometry(&self) -> &'static [(Species, Polarity)] {
        &[
            (Species::Hydroxide, Polarity::Produced),
            (Species::Hydronium, Polarity::Produced),
        ]
    }
    // (OH + x)(H + x) = KW; discriminant (OH - H)² + 4 KW is always positive
    fn required_change(
        &self,
        c: &Concentrations,
        k: &EquilibriumConstants,
    ) -> Result<f64, EquilibriumError> {
        let oh = c.get(Species::Hydroxide);
        let h3o = c.get(Species::Hydronium);
        smallest_root(self.name(), oh + h3o, oh * h3o - k.kw)
    }
}

impl ReactionEquation for AcidBaseNeutralization {
    fn name(&self) -> &'static str {
        "Acid Base Reaction"
    }
    fn stoichiometry(&self) -> &'static [(Species, Polarity)] {
        &[
            (Species::Acid, Polarity::Consumed),
            (Species::Hydroxide, Polarity::Consumed),
            (Species::Salt, Polarity::Produced),
        ]
    }
    // (S + x) = K_AB (A - x)(OH - x)  =>  x² - (A + OH + 1/K_AB) x + A·OH - S/K_AB = 0
    fn required_change(
        &self,
        c: &Concentrations,
        k: &EquilibriumConstants,
    ) -> Result<f64, EquilibriumError> {
        let oh = c.get(Species::Hydroxide);
        let acid = c.get(Species::Acid);
        let salt = c.get(Species::Salt);
        let k_dissociation = 1.0 / k.k_acid_base();
        smallest_root(
            self.name(),
            -(acid + oh + k_dissociation),
            acid * oh - k_dissociation * salt,
        )
    }
}

/// tagged variants of the four reactions, dispatched statically
#[enum_dispatch(ReactionEquation)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReactionKind {
    AcidDissociation(AcidDissociation),
    BaseDissociation(BaseDissociation),
    WaterAutoIonization(WaterAutoIonization),
    AcidBaseNeutralization(AcidBaseNeutralization),
}

impl ReactionKind {
    /// evaluation order used by the solver
    pub const ALL: [ReactionKind; 4] = [
        ReactionKind::AcidDissociation(AcidDissociation),
        ReactionKind::BaseDissociation(BaseDissociation),
        ReactionKind::WaterAutoIonization(WaterAutoIonization),
        ReactionKind::AcidBaseNeutralization(AcidBaseNeutralization),
    ];

    pub fn from_name(name: &str) -> Option<ReactionKind> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// species, constants, initial state and reactions of the antacid network
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionModel {
    pub constants: EquilibriumConstants,
    initial_concentrations: Concentrations,
    reactions: Vec<ReactionKind>,
}

impl Default for ReactionModel {
    fn default() -> Self {
        Self::new(EquilibriumConstants::default())
    }
}

impl ReactionModel {
    /// model with 1 mol/L of acid in neutral water
    pub fn new(constants: EquilibriumConstants) -> Self {
        let initial_concentrations = [
            (Species::Hydroxide, 1.0e-7),
            (Species::Salt, 0.0),
            (Species::Acid, 1.0),
            (Species::Hydronium, 1.0e-7),
            (Species::CalciumIons, 0.0),
        ]
        .into_iter()
        .collect();
        Self {
            constants,
            initial_concentrations,
            reactions: ReactionKind::ALL.to_vec(),
        }
    }

    /// replaces the initial concentrations. Base is ignored, it is supplied per run.
    pub fn with_initial_concentrations(
        mut self,
        initial: Concentrations,
    ) -> Result<Self, EquilibriumError> {
        let mut filtered = Concentrations::new();
        for (species, value) in initial.iter() {
            if *species == Species::Base {
                continue;
            }
            if !value.is_finite() || *value < 0.0 {
                return Err(EquilibriumError::InvalidSettings(format!(
                    "initial concentration of {} must be non-negative, got {}",
                    species, value
                )));
            }
            filtered.set(*species, *value);
        }
        self.initial_concentrations = filtered;
        Ok(self)
    }

    pub fn species(&self) -> &'static [Species] {
        &Species::ALL
    }

    /// initial concentrations of every species except Base
    pub fn initial_concentrations(&self) -> &Concentrations {
        &self.initial_concentrations
    }

    pub fn reactions(&self) -> &[ReactionKind] {
        &self.reactions
    }

    /// fresh state for one equilibrium run
    pub fn initial_state(&self, initial_base: f64) -> Concentrations {
        let mut state = self.initial_concentrations.clone();
        for species in Species::ALL {
            if species != Species::Base {
                state.set(species, self.initial_concentrations.get(species));
            }
        }
        state.set(Species::Base, initial_base);
        state
    }
}
