//! The `UnitCell` type represents the enclosing box of a simulated system,
//! with periodic boundary conditions along some (or all, or none) of the
//! cell vectors.
use std::f64;

use crate::{Error, Matrix3, Vector3D};

/// An `UnitCell` defines the system physical boundaries.
///
/// The cell is given by a matrix whose rows are the three cell vectors, and a
/// periodicity flag for each of these vectors. Vectors along non-periodic
/// directions are stored as given but otherwise ignored: geometric operations
/// use a complete basis where they are replaced by orthonormal directions
/// perpendicular to the periodic vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct UnitCell {
    /// Unit cell matrix, as given by the user
    matrix: Matrix3,
    /// Periodicity along each of the cell vectors
    periodic: [bool; 3],
    /// Periodic cell vectors, completed with orthonormal directions for the
    /// non-periodic axes. The rows of this matrix are always linearly
    /// independent.
    basis: Matrix3,
    /// Inverse of the transpose of `basis`
    inverse: Matrix3,
}

impl UnitCell {
    /// Create a new unit cell from the given `matrix` (rows are the cell
    /// vectors) and periodicity flags.
    ///
    /// The periodic vectors must be linearly independent, vectors along
    /// non-periodic directions can take any value (including zero).
    pub fn new(matrix: Matrix3, periodic: [bool; 3]) -> Result<UnitCell, Error> {
        let periodic_axes = (0..3).filter(|&i| periodic[i]).collect::<Vec<_>>();
        let vectors = periodic_axes.iter().map(|&i| matrix.row(i)).collect::<Vec<_>>();

        let independent = match vectors.len() {
            0 => true,
            1 => vectors[0].norm() > 1e-6,
            2 => (vectors[0] ^ vectors[1]).norm() > 1e-6,
            _ => matrix.determinant().abs() > 1e-6,
        };

        if !independent {
            return Err(Error::InvalidParameter(format!(
                "the periodic cell vectors are not linearly independent: {:?}",
                periodic_axes.iter().map(|&i| matrix[i]).collect::<Vec<_>>()
            )));
        }

        let complement = orthonormal_complement(&vectors);
        let mut basis = Matrix3::zero();
        let mut complement = complement.into_iter();
        for i in 0..3 {
            let vector = if periodic[i] {
                matrix.row(i)
            } else {
                complement.next().ok_or_else(|| Error::Internal(
                    "missing direction to complete the cell basis".into()
                ))?
            };
            basis[i] = vector.into();
        }

        // make sure the completed basis is right-handed, so the
        // orthonormal directions go in a consistent direction
        if basis.determinant() < 0.0 {
            for i in (0..3).rev() {
                if !periodic[i] {
                    for k in 0..3 {
                        basis[i][k] = -basis[i][k];
                    }
                    break;
                }
            }
        }

        return Ok(UnitCell {
            matrix: matrix,
            periodic: periodic,
            basis: basis,
            inverse: basis.transposed().inverse(),
        });
    }

    /// Create an infinite unit cell, without any periodic boundary
    pub fn infinite() -> UnitCell {
        UnitCell {
            matrix: Matrix3::zero(),
            periodic: [false; 3],
            basis: Matrix3::one(),
            inverse: Matrix3::one(),
        }
    }

    /// Create an orthorhombic unit cell, with side lengths `a, b, c` and
    /// periodic boundary conditions in all directions.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> UnitCell {
        assert!(a > 0.0 && b > 0.0 && c > 0.0, "Cell lengths must be positive");
        let matrix = Matrix3::new([
            [a, 0.0, 0.0],
            [0.0, b, 0.0],
            [0.0, 0.0, c]
        ]);
        UnitCell {
            matrix: matrix,
            periodic: [true; 3],
            basis: matrix,
            inverse: matrix.inverse(),
        }
    }

    /// Create a cubic unit cell, with side lengths `length, length, length`
    /// and periodic boundary conditions in all directions.
    pub fn cubic(length: f64) -> UnitCell {
        UnitCell::orthorhombic(length, length, length)
    }

    /// Create a fully periodic triclinic unit cell, with side lengths
    /// `a, b, c` and angles `alpha, beta, gamma` (in degrees).
    pub fn triclinic(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<UnitCell, Error> {
        if !(a > 0.0 && b > 0.0 && c > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "cell lengths must be positive, got {}, {} and {}", a, b, c
            )));
        }

        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();

        let b_x = b * cos_gamma;
        let b_y = b * sin_gamma;

        let c_x = c * cos_beta;
        let c_y = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c_z = f64::sqrt(c * c - c_y * c_y - c_x * c_x);

        let matrix = Matrix3::new([
            [a,   0.0, 0.0],
            [b_x, b_y, 0.0],
            [c_x, c_y, c_z],
        ]);
        return UnitCell::new(matrix, [true; 3]);
    }

    /// Get the matricial representation of the unit cell, as given on
    /// construction
    pub fn matrix(&self) -> Matrix3 {
        self.matrix
    }

    /// Get the periodicity flags for the three cell vectors
    pub fn periodic(&self) -> [bool; 3] {
        self.periodic
    }

    /// Check if this unit cell is infinite, *i.e.* if it does not have
    /// periodic boundary conditions in any direction.
    pub fn is_infinite(&self) -> bool {
        self.periodic == [false; 3]
    }

    /// Get the complete basis used for fractional coordinates, where
    /// non-periodic cell vectors are replaced by orthonormal directions.
    pub(crate) fn basis(&self) -> Matrix3 {
        self.basis
    }

    /// Get the distances between faces of the unit cell. Non-periodic
    /// directions have an infinite distance.
    pub fn distances_between_faces(&self) -> Vector3D {
        let (a, b, c) = (self.basis.row(0), self.basis.row(1), self.basis.row(2));
        // Plans normal vectors
        let na = (b ^ c).normalized();
        let nb = (c ^ a).normalized();
        let nc = (a ^ b).normalized();

        let distances = [f64::abs(na * a), f64::abs(nb * b), f64::abs(nc * c)];
        let mut result = Vector3D::zero();
        for i in 0..3 {
            result[i] = if self.periodic[i] { distances[i] } else { f64::INFINITY };
        }
        return result;
    }

    /// Wrap a vector in the unit cell along the periodic directions. For a
    /// cubic cell of side length `L`, this produce a vector with all
    /// components in `[0, L)`.
    pub fn wrap_vector(&self, vector: &mut Vector3D) {
        if self.is_infinite() {
            return;
        }

        let mut fractional = self.fractional(*vector);
        for i in 0..3 {
            if self.periodic[i] {
                fractional[i] -= f64::floor(fractional[i]);
            }
        }
        *vector = self.cartesian(fractional);
    }

    /// Get the fractional representation of the `vector` in this cell. Along
    /// non-periodic directions, this is the projection of the vector on the
    /// corresponding orthonormal direction.
    pub fn fractional(&self, vector: Vector3D) -> Vector3D {
        // this needs to use the inverse of the transpose of the matrix, since
        // we only have code to multiply a vector by a matrix on the left
        return self.inverse * vector;
    }

    /// Get the Cartesian representation of the `fractional` vector in this
    /// cell
    pub fn cartesian(&self, fractional: Vector3D) -> Vector3D {
        return self.basis.transposed() * fractional;
    }

    /// Get the Cartesian translation corresponding to the given integer
    /// `shift` of cell vectors
    pub fn shift_vector(&self, shift: [i32; 3]) -> Vector3D {
        let mut vector = Vector3D::zero();
        for i in 0..3 {
            if shift[i] != 0 {
                vector += shift[i] as f64 * self.matrix.row(i);
            }
        }
        return vector;
    }
}

/// Get orthonormal vectors spanning the space perpendicular to all the
/// (linearly independent) `vectors`
fn orthonormal_complement(vectors: &[Vector3D]) -> Vec<Vector3D> {
    match vectors.len() {
        0 => vec![
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(0.0, 1.0, 0.0),
            Vector3D::new(0.0, 0.0, 1.0),
        ],
        1 => {
            let direction = vectors[0].normalized();
            // use the Cartesian axis least aligned with the vector
            let mut axis = Vector3D::zero();
            let mut smallest = 0;
            for i in 1..3 {
                if direction[i].abs() < direction[smallest].abs() {
                    smallest = i;
                }
            }
            axis[smallest] = 1.0;

            let first = (direction ^ axis).normalized();
            let second = direction ^ first;
            vec![first, second]
        }
        2 => vec![(vectors[0] ^ vectors[1]).normalized()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64;

    use approx::{assert_ulps_eq, assert_relative_eq};

    #[test]
    #[should_panic(expected = "Cell lengths must be positive")]
    fn negative_cubic() {
        let _ = UnitCell::cubic(-4.0);
    }

    #[test]
    #[should_panic(expected = "Cell lengths must be positive")]
    fn negative_ortho() {
        let _ = UnitCell::orthorhombic(3.0, 0.0, -5.0);
    }

    #[test]
    fn negative_triclinic() {
        let error = UnitCell::triclinic(3.0, 0.0, -5.0, 90.0, 90.0, 90.0).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: cell lengths must be positive, got 3, 0 and -5");
    }

    #[test]
    fn infinite() {
        let cell = UnitCell::infinite();
        assert!(cell.is_infinite());
        assert_eq!(cell.periodic(), [false; 3]);
        assert_eq!(cell.matrix(), Matrix3::zero());

        let distances = cell.distances_between_faces();
        assert_eq!(distances, Vector3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY));

        let v = Vector3D::new(1.0, -15.5, 6.0);
        assert_eq!(cell.fractional(v), v);
        assert_eq!(cell.cartesian(v), v);
    }

    #[test]
    fn cubic() {
        let cell = UnitCell::cubic(3.0);
        assert!(!cell.is_infinite());
        assert_eq!(cell.periodic(), [true; 3]);
        assert_eq!(cell.matrix().row(0), Vector3D::new(3.0, 0.0, 0.0));
        assert_eq!(cell.distances_between_faces(), Vector3D::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn linearly_dependent() {
        let matrix = Matrix3::new([
            [3.0, 0.0, 0.0],
            [6.0, 0.0, 0.0],
            [0.0, 0.0, 5.0],
        ]);
        let error = UnitCell::new(matrix, [true, true, false]).unwrap_err();
        assert!(error.to_string().starts_with("invalid parameter: the periodic cell vectors are not linearly independent"));

        // fine as long as only one of the dependent vectors is periodic
        let cell = UnitCell::new(matrix, [true, false, true]).unwrap();
        assert_eq!(cell.periodic(), [true, false, true]);

        let error = UnitCell::new(Matrix3::zero(), [false, false, true]).unwrap_err();
        assert!(matches!(error, Error::InvalidParameter(_)));

        // no periodic axis, any matrix works
        let cell = UnitCell::new(Matrix3::zero(), [false; 3]).unwrap();
        assert!(cell.is_infinite());
    }

    #[test]
    fn partially_periodic() {
        let matrix = Matrix3::new([
            [4.0, 0.0, 0.0],
            [1.0, 5.0, 0.0],
            [0.0, 0.0, 0.0],
        ]);
        let cell = UnitCell::new(matrix, [true, true, false]).unwrap();

        let distances = cell.distances_between_faces();
        assert_relative_eq!(distances[0], 4.0 * 5.0 / f64::sqrt(26.0), max_relative = 1e-14);
        assert_ulps_eq!(distances[1], 5.0);
        assert_eq!(distances[2], f64::INFINITY);

        // the completed basis uses the normal to the periodic vectors
        let basis = cell.basis();
        assert_eq!(basis.row(2), Vector3D::new(0.0, 0.0, 1.0));

        let mut v = Vector3D::new(9.0, 11.0, -26.0);
        cell.wrap_vector(&mut v);
        // z is left untouched
        assert_ulps_eq!(v[2], -26.0);
        let fractional = cell.fractional(v);
        assert!(fractional[0] >= 0.0 && fractional[0] < 1.0);
        assert!(fractional[1] >= 0.0 && fractional[1] < 1.0);

        let matrix = Matrix3::new([
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 7.0],
        ]);
        let cell = UnitCell::new(matrix, [false, false, true]).unwrap();
        let distances = cell.distances_between_faces();
        assert_eq!(distances[0], f64::INFINITY);
        assert_eq!(distances[1], f64::INFINITY);
        assert_ulps_eq!(distances[2], 7.0);

        let basis = cell.basis();
        assert_relative_eq!(basis.row(0) * basis.row(2), 0.0);
        assert_relative_eq!(basis.row(1) * basis.row(2), 0.0);
        assert_relative_eq!(basis.row(0) * basis.row(1), 0.0);
        assert_relative_eq!(basis.row(0).norm(), 1.0);
        assert!(basis.determinant() > 0.0);
    }

    #[test]
    fn triclinic() {
        let cell = UnitCell::triclinic(3.0, 4.0, 5.0, 90.0, 80.0, 100.0).unwrap();
        assert_relative_eq!(
            cell.distances_between_faces(),
            Vector3D::new(2.908132319388713, 3.9373265973230853, 4.921658246653857),
            max_relative = 1e-12
        );
    }

    #[test]
    fn wrap_vector() {
        // Cubic unit cell
        let cell = UnitCell::cubic(10.0);
        let mut v = Vector3D::new(9.0, 18.0, -6.0);
        cell.wrap_vector(&mut v);
        assert_relative_eq!(v, Vector3D::new(9.0, 8.0, 4.0), epsilon = 1e-12);

        // Orthorhombic unit cell
        let cell = UnitCell::orthorhombic(3.0, 4.0, 5.0);
        let mut v = Vector3D::new(1.0, 1.5, 6.0);
        cell.wrap_vector(&mut v);
        assert_relative_eq!(v, Vector3D::new(1.0, 1.5, 1.0), epsilon = 1e-12);

        // Infinite unit cell
        let cell = UnitCell::infinite();
        let mut v = Vector3D::new(1.0, 1.5, 6.0);
        cell.wrap_vector(&mut v);
        assert_eq!(v, Vector3D::new(1.0, 1.5, 6.0));

        // Triclinic unit cell
        let cell = UnitCell::triclinic(3.0, 4.0, 5.0, 90.0, 90.0, 90.0).unwrap();
        let mut v = Vector3D::new(1.0, 1.5, 6.0);
        cell.wrap_vector(&mut v);
        assert_relative_eq!(v, Vector3D::new(1.0, 1.5, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn fractional_cartesian() {
        let cell = UnitCell::cubic(5.0);

        assert_relative_eq!(
            cell.fractional(Vector3D::new(0.0, 10.0, 4.0)),
            Vector3D::new(0.0, 2.0, 0.8),
            epsilon = 1e-14
        );
        assert_eq!(
            cell.cartesian(Vector3D::new(0.0, 2.0, 0.8)),
            Vector3D::new(0.0, 10.0, 4.0)
        );

        let cell = UnitCell::triclinic(5.0, 6.0, 3.6, 90.0, 53.0, 77.0).unwrap();
        let tests = vec![
            Vector3D::new(0.0, 10.0, 4.0),
            Vector3D::new(-5.0, 12.0, 4.9),
        ];

        for test in tests {
            let transformed = cell.cartesian(cell.fractional(test));
            assert_ulps_eq!(test, transformed, epsilon = 1e-14);
        }
    }

    #[test]
    fn shift_vector() {
        let cell = UnitCell::orthorhombic(3.0, 4.0, 5.0);
        assert_eq!(cell.shift_vector([1, -2, 0]), Vector3D::new(3.0, -8.0, 0.0));
        assert_eq!(cell.shift_vector([0, 0, 0]), Vector3D::zero());
    }
}
