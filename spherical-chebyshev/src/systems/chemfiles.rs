use std::path::Path;

use super::SimpleSystem;
use crate::Error;

#[cfg(feature = "chemfiles")]
impl From<chemfiles::Error> for Error {
    fn from(error: chemfiles::Error) -> Error {
        Error::Chemfiles(error.message)
    }
}

/// Read all structures in the file at the given `path` using
/// [chemfiles](https://chemfiles.org/), and convert them to `SimpleSystem`s.
/// The atomic types (usually the element symbols) are used as species labels.
///
/// This function can read all [formats supported by
/// chemfiles](https://chemfiles.org/chemfiles/latest/formats.html).
#[cfg(feature = "chemfiles")]
#[allow(clippy::needless_range_loop)]
pub fn read_from_file(path: impl AsRef<Path>) -> Result<Vec<SimpleSystem>, Error> {
    use crate::Matrix3;
    use crate::systems::UnitCell;

    let mut systems = Vec::new();

    let mut trajectory = chemfiles::Trajectory::open(path, 'r')?;
    let mut frame = chemfiles::Frame::new();

    for _ in 0..trajectory.nsteps() {
        trajectory.read(&mut frame)?;

        let positions = frame.positions();

        let cell = if frame.cell().shape() == chemfiles::CellShape::Infinite {
            UnitCell::infinite()
        } else {
            // transpose since chemfiles is using columns for the cell vectors and
            // we want rows as cell vectors
            UnitCell::new(Matrix3::from(frame.cell().matrix()).transposed(), [true; 3])?
        };
        let mut system = SimpleSystem::new(cell);
        for i in 0..frame.size() {
            let atom = frame.atom(i);
            system.add_atom(atom.atomic_type(), positions[i].into());
        }

        systems.push(system);
    }

    return Ok(systems);
}

/// Read all structures in the file at the given `path` using
/// [chemfiles](https://chemfiles.org/), and convert them to `SimpleSystem`s.
///
/// This function can read all [formats supported by
/// chemfiles](https://chemfiles.org/chemfiles/latest/formats.html).
#[cfg(not(feature = "chemfiles"))]
pub fn read_from_file(_: impl AsRef<Path>) -> Result<Vec<SimpleSystem>, Error> {
    Err(Error::Chemfiles(
        "read_from_file is only available with the chemfiles feature enabled".into()
    ))
}


#[cfg(all(test, not(feature = "chemfiles")))]
mod tests {
    use super::*;

    #[test]
    fn disabled() {
        let error = read_from_file("water.xyz").unwrap_err();
        assert_eq!(
            error.to_string(),
            "chemfiles error: read_from_file is only available with the chemfiles feature enabled"
        );
    }
}
