//! Atomic structures and neighbor lists.

use crate::{Error, Vector3D};

mod cell;
pub use self::cell::UnitCell;

mod neighbors;
pub use self::neighbors::{CellShift, CellPair, PairSearch, CellListSearch, BruteForceSearch};
pub use self::neighbors::{NeighborSearch, NeighborOptions, NeighborList};

mod simple_system;
pub use self::simple_system::SimpleSystem;

mod chemfiles;
pub use self::chemfiles::read_from_file;

#[cfg(test)]
pub(crate) mod test_utils;

/// A `System` deals with the storage of atoms and related information.
///
/// The neighbor list is not part of the system, and is instead computed and
/// cached by the calculators using it.
pub trait System: Send + Sync {
    /// Get the unit cell for this system, including the periodicity flags
    fn cell(&self) -> Result<UnitCell, Error>;

    /// Get the number of atoms in this system
    fn size(&self) -> Result<usize, Error>;

    /// Get the chemical species labels for all atoms in this system. The
    /// returned value must be a slice of length `self.size()`.
    fn species(&self) -> Result<&[String], Error>;

    /// Get the positions for all atoms in this system. The returned value must
    /// be a slice of length `self.size()` containing the Cartesian coordinates
    /// of all atoms in the system.
    fn positions(&self) -> Result<&[Vector3D], Error>;
}
