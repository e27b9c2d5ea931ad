//! # Titration Curves
//!
//! The sweep calls the equilibrium solver once per initial base concentration on the grid
//! `start, start + step, ...` below `end` and collects two curves:
//! - pH against the initial base concentration;
//! - cumulative change of every reaction against the initial base concentration
//!   (one series per reaction).
//!
//! Curves are stored column-wise (x, y, series) in a `LinearGraph`, which can be printed
//! as a table, exported to JSON or to CSV. Sweep points are independent of each other.
use crate::Equilibrium::EquilibriumSolver::{EquilibriumResult, EquilibriumSolver};
use crate::Equilibrium::equilibrium_errors::SweepError;
use log::{info, warn};
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// grid of initial base concentrations, half-open range [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TitrationSweep {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for TitrationSweep {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 2.0,
            step: 0.01,
        }
    }
}

impl TitrationSweep {
    pub fn validate(&self) -> Result<(), SweepError> {
        let valid = self.start.is_finite()
            && self.end.is_finite()
            && self.step.is_finite()
            && self.start >= 0.0
            && self.step > 0.0
            && self.end > self.start;
        if !valid {
            return Err(SweepError::InvalidRange {
                start: self.start,
                end: self.end,
                step: self.step,
            });
        }
        Ok(())
    }

    /// grid points; computed from the index so that rounding does not accumulate
    pub fn points(&self) -> Result<Vec<f64>, SweepError> {
        self.validate()?;
        let n = ((self.end - self.start) / self.step - 1e-9).ceil() as usize;
        Ok((0..n)
            .map(|i| self.start + i as f64 * self.step)
            .collect())
    }
}

/// long-format table of a curve family: one row per (x, y, series)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGraph {
    pub x_axis_name: String,
    pub y_axis_name: String,
    pub series_name: String,
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    pub series: Vec<String>,
}

impl LinearGraph {
    pub fn new(x_axis_name: &str, y_axis_name: &str, series_name: &str) -> Self {
        Self {
            x_axis_name: x_axis_name.to_string(),
            y_axis_name: y_axis_name.to_string(),
            series_name: series_name.to_string(),
            x_values: Vec::new(),
            y_values: Vec::new(),
            series: Vec::new(),
        }
    }

    pub fn add_data_point(&mut self, x_value: f64, y_value: f64, series: &str) {
        self.x_values.push(x_value);
        self.y_values.push(y_value);
        self.series.push(series.to_string());
    }

    pub fn add_data_for_each_series(&mut self, x_value: f64, series_with_data: &BTreeMap<String, f64>) {
        for (series, value) in series_with_data {
            self.add_data_point(x_value, *value, series);
        }
    }

    pub fn len(&self) -> usize {
        self.x_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }

    /// first y value stored for exactly this x in the given series
    pub fn find_y_value(&self, x_value: f64, series: &str) -> Result<f64, SweepError> {
        self.x_values
            .iter()
            .zip(self.y_values.iter())
            .zip(self.series.iter())
            .find(|((x, _), s)| **x == x_value && s.as_str() == series)
            .map(|((_, y), _)| *y)
            .ok_or_else(|| SweepError::MissingDataPoint {
                x: x_value,
                series: series.to_string(),
            })
    }

    /// distinct series names in order of first appearance
    pub fn series_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for s in &self.series {
            if !names.contains(s) {
                names.push(s.clone());
            }
        }
        names
    }

    pub fn points_of_series(&self, series: &str) -> Vec<(f64, f64)> {
        self.x_values
            .iter()
            .zip(self.y_values.iter())
            .zip(self.series.iter())
            .filter(|(_, s)| s.as_str() == series)
            .map(|((x, y), _)| (*x, *y))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, SweepError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SweepError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_csv(&self) -> String {
        let mut csv = format!(
            "\"{}\",\"{}\",\"{}\"\n",
            self.x_axis_name, self.y_axis_name, self.series_name
        );
        for i in 0..self.len() {
            csv.push_str(&format!(
                "{},{},\"{}\"\n",
                self.x_values[i], self.y_values[i], self.series[i]
            ));
        }
        csv
    }

    pub fn pretty_print(&self, title: Option<&str>) {
        if let Some(title) = title {
            println!("__________{}__________", title);
        }
        let mut table = Table::new();
        table.add_row(row![self.x_axis_name, self.y_axis_name, self.series_name]);
        for i in 0..self.len() {
            table.add_row(row![
                format!("{:.3}", self.x_values[i]),
                format!("{:.6e}", self.y_values[i]),
                self.series[i]
            ]);
        }
        table.printstd();
    }
}

/// pH curve and reaction-change curves of one sweep
#[derive(Debug, Clone)]
pub struct TitrationCurves {
    pub ph_graph: LinearGraph,
    pub change_graph: LinearGraph,
    pub results: Vec<EquilibriumResult>,
}

impl TitrationCurves {
    pub fn not_converged(&self) -> Vec<f64> {
        self.results
            .iter()
            .filter(|r| !r.converged)
            .map(|r| r.initial_base)
            .collect()
    }

    /// base concentration at which the pH first reaches `target`
    pub fn base_for_ph(&self, target: f64) -> Option<f64> {
        self.ph_graph
            .points_of_series("pH")
            .into_iter()
            .find(|(_, ph)| *ph >= target)
            .map(|(x, _)| x)
    }
}

pub fn run_sweep(
    solver: &EquilibriumSolver,
    sweep: &TitrationSweep,
) -> Result<TitrationCurves, SweepError> {
    let points = sweep.points()?;
    info!(
        "titration sweep: {} points from {} to {} (step {})",
        points.len(),
        sweep.start,
        sweep.end,
        sweep.step
    );
    let mut ph_graph = LinearGraph::new("Initial concentration of Base in Tums (mol/L)", "pH", "");
    let mut change_graph = LinearGraph::new(
        "Concentration of Base in Tums added (mol/L)",
        "Change in Concentration (mol/L)",
        "Reaction",
    );
    let mut results = Vec::with_capacity(points.len());
    for base in points {
        let result = solver
            .equilibrate(base)
            .map_err(|source| SweepError::Equilibrium { base, source })?;
        let ph = result
            .pH()
            .map_err(|source| SweepError::Equilibrium { base, source })?;
        ph_graph.add_data_point(base, ph, "pH");
        change_graph.add_data_for_each_series(base, &result.named_total_changes());
        results.push(result);
    }
    let curves = TitrationCurves {
        ph_graph,
        change_graph,
        results,
    };
    let not_converged = curves.not_converged();
    if !not_converged.is_empty() {
        warn!(
            "titration sweep: {} of {} points did not reach the change cutoff",
            not_converged.len(),
            curves.results.len()
        );
    }
    info!("titration sweep finished");
    Ok(curves)
}
