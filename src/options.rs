//! Formulation options

use serde::{Deserialize, Serialize};

use crate::error::FEAResult;

/// Tunables shared by every element formulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulationOptions {
    /// Drilling stiffness as a fraction of the largest diagonal stiffness term
    pub drilling_stiffness_ratio: f64,
    /// Lengths, areas and determinants below this are treated as zero
    pub geometry_tolerance: f64,
    /// Slack allowed when checking that an iso coordinate is inside its domain
    pub iso_tolerance: f64,
    /// Gauss points per sub-span when integrating flexibility along a bar
    pub bar_gauss_points: usize,
}

impl Default for FormulationOptions {
    fn default() -> Self {
        Self {
            drilling_stiffness_ratio: 1e-3,
            geometry_tolerance: 1e-10,
            iso_tolerance: 1e-9,
            bar_gauss_points: 12,
        }
    }
}

impl FormulationOptions {
    /// Load options from a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> FEAResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the drilling stiffness ratio
    pub fn with_drilling_ratio(mut self, ratio: f64) -> Self {
        self.drilling_stiffness_ratio = ratio;
        self
    }

    /// Set the geometry tolerance
    pub fn with_geometry_tolerance(mut self, tol: f64) -> Self {
        self.geometry_tolerance = tol;
        self
    }

    /// Set the iso coordinate tolerance
    pub fn with_iso_tolerance(mut self, tol: f64) -> Self {
        self.iso_tolerance = tol;
        self
    }

    /// Set the Gauss point count used along bars
    pub fn with_bar_gauss_points(mut self, points: usize) -> Self {
        self.bar_gauss_points = points;
        self
    }
}
