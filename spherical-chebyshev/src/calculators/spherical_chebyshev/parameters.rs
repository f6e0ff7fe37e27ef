use std::path::Path;

use crate::Error;
use crate::calculators::SpeciesTable;

fn default_nmax() -> usize { 5 }
fn default_lmax() -> usize { 6 }
fn default_rcut() -> f64 { 6.0 }

/// Parameters for the spherical Chebyshev descriptor.
///
/// Each atomic environment is expanded on `nmax + 1` Chebyshev polynomials in
/// the radial direction and complex spherical harmonics up to `lmax` in the
/// angular directions, and the expansion coefficients `C[n, l, m]` are then
/// reduced to the rotationally invariant power spectrum
///
/// `P[n, l] = 4π / (2l + 1) \sum_m |C[n, l, m]|^2`
///
/// When more than one atomic type is given, a second set of features (the
/// "spin" channel) is computed by weighting each neighbor with an integer
/// depending on its type.
///
/// These parameters can be stored as a flat JSON record, for example
/// `{"atom_types": ["H", "O"], "nmax": 2, "lmax": 2, "rcut": 4.0}`.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SphericalChebyshevParameters {
    /// Ordered list of atomic types labels. The order defines the type ids
    /// and the spin of each type.
    pub atom_types: Vec<String>,
    /// Maximal order of the Chebyshev polynomials in the radial basis
    #[serde(default = "default_nmax")]
    pub nmax: usize,
    /// Maximal angular degree of the spherical harmonics
    #[serde(default = "default_lmax")]
    pub lmax: usize,
    /// Spherical cutoff radius of the atomic environments
    #[serde(default = "default_rcut")]
    pub rcut: f64,
}

impl SphericalChebyshevParameters {
    /// Create parameters with the given atomic types and the default values
    /// for everything else
    pub fn with_types(atom_types: &[&str]) -> SphericalChebyshevParameters {
        SphericalChebyshevParameters {
            atom_types: atom_types.iter().map(|&label| label.to_owned()).collect(),
            nmax: default_nmax(),
            lmax: default_lmax(),
            rcut: default_rcut(),
        }
    }

    /// Check that these parameters are valid
    pub fn validate(&self) -> Result<(), Error> {
        SpeciesTable::new(&self.atom_types)?;

        if !(self.rcut.is_finite() && self.rcut > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "expected a positive and finite cutoff radius, got {}", self.rcut
            )));
        }

        return Ok(());
    }

    /// Does the descriptor include a spin channel for these parameters?
    pub fn has_spin_channel(&self) -> bool {
        self.atom_types.len() > 1
    }

    /// Get the number of features in each row of the descriptor,
    /// `(nmax + 1) * (lmax + 1)`, twice as much when there is a spin channel.
    pub fn features_count(&self) -> usize {
        let count = (self.nmax + 1) * (self.lmax + 1);
        if self.has_spin_channel() {
            2 * count
        } else {
            count
        }
    }

    /// Parse and validate parameters from a JSON string
    pub fn from_json(json: &str) -> Result<SphericalChebyshevParameters, Error> {
        let parameters: SphericalChebyshevParameters = serde_json::from_str(json)?;
        parameters.validate()?;
        return Ok(parameters);
    }

    /// Serialize these parameters to a JSON string
    pub fn to_json(&self) -> Result<String, Error> {
        return Ok(serde_json::to_string(self)?);
    }

    /// Load and validate parameters from the JSON file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<SphericalChebyshevParameters, Error> {
        let json = std::fs::read_to_string(path)?;
        return SphericalChebyshevParameters::from_json(&json);
    }

    /// Save these parameters as JSON in the file at `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        return Ok(());
    }
}
