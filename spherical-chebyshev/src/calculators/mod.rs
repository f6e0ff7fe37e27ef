//! Calculators turning atomic systems into descriptors.

mod species;
pub use self::species::SpeciesTable;

mod spherical_chebyshev;
pub use self::spherical_chebyshev::{SphericalChebyshev, SphericalChebyshevParameters};

#[cfg(test)]
pub(crate) mod tests_utils;

/// Options for a single calculation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculationOptions {
    /// Should we also compute the gradients of the descriptor with respect
    /// to atomic positions?
    pub gradients: bool,
}
