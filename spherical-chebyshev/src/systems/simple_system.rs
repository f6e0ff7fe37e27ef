use crate::Error;

use super::{UnitCell, System, Vector3D};

/// A simple implementation of `System` to use when no other is available
#[derive(Clone, Debug)]
pub struct SimpleSystem {
    cell: UnitCell,
    species: Vec<String>,
    positions: Vec<Vector3D>,
}

impl SimpleSystem {
    /// Create a new empty system with the given unit cell
    pub fn new(cell: UnitCell) -> SimpleSystem {
        SimpleSystem {
            cell: cell,
            species: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Add an atom with the given species and position to this system
    pub fn add_atom(&mut self, species: impl Into<String>, position: Vector3D) {
        self.species.push(species.into());
        self.positions.push(position);
    }

    /// Get mutable access to the positions of the atoms in this system
    pub fn positions_mut(&mut self) -> &mut [Vector3D] {
        return &mut self.positions;
    }

    /// Replace the unit cell of this system
    pub fn set_cell(&mut self, cell: UnitCell) {
        self.cell = cell;
    }
}

impl System for SimpleSystem {
    fn size(&self) -> Result<usize, Error> {
        Ok(self.species.len())
    }

    fn positions(&self) -> Result<&[Vector3D], Error> {
        Ok(&self.positions)
    }

    fn species(&self) -> Result<&[String], Error> {
        Ok(&self.species)
    }

    fn cell(&self) -> Result<UnitCell, Error> {
        Ok(self.cell)
    }
}

impl std::convert::TryFrom<&dyn System> for SimpleSystem {
    type Error = Error;

    fn try_from(system: &dyn System) -> Result<SimpleSystem, Error> {
        let mut new = SimpleSystem::new(system.cell()?);
        for (species, &position) in system.species()?.iter().zip(system.positions()?) {
            new.add_atom(species.clone(), position);
        }
        return Ok(new);
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;
    use super::*;

    #[test]
    fn add_atoms() {
        let mut system = SimpleSystem::new(UnitCell::cubic(10.0));
        system.add_atom("C", Vector3D::new(2.0, 3.0, 4.0));
        system.add_atom("H", Vector3D::new(1.0, 3.0, 4.0));
        system.add_atom(String::from("C"), Vector3D::new(5.0, 3.0, 4.0));

        assert_eq!(system.size().unwrap(), 3);
        assert_eq!(system.species.len(), 3);
        assert_eq!(system.positions.len(), 3);

        assert_eq!(system.species().unwrap(), &["C", "H", "C"]);
        assert_eq!(system.positions().unwrap(), &[
            Vector3D::new(2.0, 3.0, 4.0),
            Vector3D::new(1.0, 3.0, 4.0),
            Vector3D::new(5.0, 3.0, 4.0),
        ]);
    }

    #[test]
    fn copy_from_dyn() {
        let mut system = SimpleSystem::new(UnitCell::infinite());
        system.add_atom("O", Vector3D::new(0.0, 0.0, 0.0));
        system.add_atom("H", Vector3D::new(0.0, 0.8, 0.5));

        let copy = SimpleSystem::try_from(&system as &dyn System).unwrap();
        assert_eq!(copy.species().unwrap(), system.species().unwrap());
        assert_eq!(copy.positions().unwrap(), system.positions().unwrap());
        assert_eq!(copy.cell().unwrap(), UnitCell::infinite());

        system.positions_mut()[1][2] = 0.6;
        assert_eq!(system.positions().unwrap()[1], Vector3D::new(0.0, 0.8, 0.6));
    }
}
