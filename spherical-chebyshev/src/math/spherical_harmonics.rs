use std::f64;

use ndarray::ArrayView1;
use num_complex::Complex64;

use crate::Vector3D;
use super::factorial;

/// Array storing complex data for `0 <= l <= l_max`, `-l <= m <= l`. This
/// type implements `Index<[isize; 2]>` and `IndexMut<[isize; 2]>` to allow
/// writing code like
///
/// ```
/// # use num_complex::Complex64;
/// # use spherical_chebyshev::math::SphericalHarmonicsArray;
/// let mut array = SphericalHarmonicsArray::new(8);
/// array[[6, 3]] = Complex64::new(3.0, 1.0);
/// array[[6, -3]] = Complex64::new(-3.0, 1.0);
///
/// // this is an error |m| > l
/// // array[[6, 7]] = Complex64::new(1.0, 0.0);
///
/// // this is an error l > l_max
/// // array[[9, 7]] = Complex64::new(1.0, 0.0);
/// ```
#[derive(Clone, PartialEq)]
pub struct SphericalHarmonicsArray {
    max_angular: isize,
    data: Vec<Complex64>,
}

impl SphericalHarmonicsArray {
    /// Create a new `SphericalHarmonicsArray` with the given maximal angular
    /// degree, and all elements set to zero.
    pub fn new(max_angular: usize) -> SphericalHarmonicsArray {
        let size = (max_angular + 1) * (max_angular + 1);
        SphericalHarmonicsArray {
            max_angular: max_angular as isize,
            data: vec![Complex64::new(0.0, 0.0); size],
        }
    }

    /// Get the maximal angular degree stored in this array
    pub fn max_angular(&self) -> usize {
        self.max_angular as usize
    }

    #[inline]
    #[allow(clippy::suspicious_operation_groupings)]
    fn linear_index(&self, index: [isize; 2]) -> usize {
        let [l, m] = index;
        debug_assert!(l <= self.max_angular && -l <= m && m <= l);
        return (m + l + (l * l)) as usize;
    }

    /// Get the slice of the full array containing values for a given `l`. The
    /// size of the resulting view is `2 * l + 1`, and contains value for `m`
    /// from `-l` to `l` in order.
    #[inline]
    pub fn slice(&self, l: isize) -> ArrayView1<'_, Complex64> {
        let start = self.linear_index([l, -l]);
        let stop = self.linear_index([l, l]);
        return ArrayView1::from(&self.data[start..=stop]);
    }
}

impl std::ops::Index<[isize; 2]> for SphericalHarmonicsArray {
    type Output = Complex64;
    fn index(&self, index: [isize; 2]) -> &Complex64 {
        &self.data[self.linear_index(index)]
    }
}

impl std::ops::IndexMut<[isize; 2]> for SphericalHarmonicsArray {
    fn index_mut(&mut self, index: [isize; 2]) -> &mut Complex64 {
        let i = self.linear_index(index);
        &mut self.data[i]
    }
}

impl std::fmt::Debug for SphericalHarmonicsArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SphericalHarmonicsArray[")?;
        for l in 0..(self.max_angular + 1) {
            write!(f, "  l={: <4}", l)?;
            for m in -l..=l {
                let value = self[[l, m]];
                write!(f, " ({:+.6}{:+.6}i)", value.re, value.im)?;
            }
            writeln!(f)?;
        }
        write!(f, "]")?;
        Ok(())
    }
}

/// Normalization factor `sqrt((2l + 1) / 4π (l + m)! (l - m)!)` of the solid
/// harmonic `R_l^m`
fn normalization(l: usize, m: isize) -> f64 {
    let l_plus_m = (l as isize + m) as usize;
    let l_minus_m = (l as isize - m) as usize;
    let prefactor = (2 * l + 1) as f64 / (4.0 * f64::consts::PI);
    return f64::sqrt(prefactor * factorial(l_plus_m) * factorial(l_minus_m));
}

/// Scaled powers of the three Cartesian combinations entering the closed form
/// of the solid harmonics:
///
/// - `a[p] = (-(x + iy) / 2)^p / p!`
/// - `b[q] = ((x - iy) / 2)^q / q!`
/// - `c[s] = z^s / s!`
#[derive(Debug, Clone)]
struct CartesianPowers {
    a: Vec<Complex64>,
    b: Vec<Complex64>,
    c: Vec<f64>,
}

/// `∂a/∂y = ∂b/∂y = -i/2`
const MINUS_HALF_I: Complex64 = Complex64::new(0.0, -0.5);

impl CartesianPowers {
    fn new(max_angular: usize) -> CartesianPowers {
        CartesianPowers {
            a: vec![Complex64::new(0.0, 0.0); max_angular + 1],
            b: vec![Complex64::new(0.0, 0.0); max_angular + 1],
            c: vec![0.0; max_angular + 1],
        }
    }

    fn update(&mut self, x: Vector3D) {
        let a = Complex64::new(-0.5 * x[0], -0.5 * x[1]);
        let b = Complex64::new(0.5 * x[0], -0.5 * x[1]);
        let c = x[2];

        self.a[0] = Complex64::new(1.0, 0.0);
        self.b[0] = Complex64::new(1.0, 0.0);
        self.c[0] = 1.0;
        for k in 1..self.a.len() {
            let k_inv = 1.0 / k as f64;
            self.a[k] = self.a[k - 1] * a * k_inv;
            self.b[k] = self.b[k - 1] * b * k_inv;
            self.c[k] = self.c[k - 1] * c * k_inv;
        }
    }

    /// Range of `p` such that both `q = p - m` and `s = l - p - q` are
    /// non-negative
    #[inline]
    fn p_range(l: usize, m: isize) -> std::ops::RangeInclusive<isize> {
        let l = l as isize;
        return isize::max(0, m)..=((l + m) / 2);
    }

    /// Unnormalized solid harmonic `Σ_p a[p] b[q] c[s]`
    fn sum(&self, l: usize, m: isize) -> Complex64 {
        let mut sum = Complex64::new(0.0, 0.0);
        for p in CartesianPowers::p_range(l, m) {
            let q = (p - m) as usize;
            let s = l - p as usize - q;
            sum += self.a[p as usize] * self.b[q] * self.c[s];
        }
        return sum;
    }

    /// Cartesian gradient of `Σ_p a[p] b[q] c[s]`
    fn sum_gradient(&self, l: usize, m: isize) -> [Complex64; 3] {
        let mut gradient = [Complex64::new(0.0, 0.0); 3];
        for p in CartesianPowers::p_range(l, m) {
            let q = (p - m) as usize;
            let p = p as usize;
            let s = l - p - q;

            if p > 0 {
                let term = self.a[p - 1] * self.b[q] * self.c[s];
                gradient[0] -= 0.5 * term;
                gradient[1] += MINUS_HALF_I * term;
            }

            if q > 0 {
                let term = self.a[p] * self.b[q - 1] * self.c[s];
                gradient[0] += 0.5 * term;
                gradient[1] += MINUS_HALF_I * term;
            }

            if s > 0 {
                gradient[2] += self.a[p] * self.b[q] * self.c[s - 1];
            }
        }
        return gradient;
    }
}

fn check_indexes(l: usize, m: isize) {
    assert!(
        m.unsigned_abs() <= l,
        "invalid spherical harmonic order: |m| = {} is larger than l = {}", m.unsigned_abs(), l
    );
}

/// Evaluate the complex regular solid harmonic `R_l^m(x)` using its closed
/// form in Cartesian coordinates:
///
/// `R_l^m(x) = N_lm Σ_p (-(x + iy)/2)^p/p! ((x - iy)/2)^q/q! z^s/s!`
///
/// where the sum runs over all `p` such that `q = p - m >= 0` and
/// `s = l - p - q >= 0`, and `N_lm = sqrt((2l + 1) / 4π (l + m)! (l - m)!)`.
pub fn solid_harmonic(x: Vector3D, l: usize, m: isize) -> Complex64 {
    check_indexes(l, m);
    let mut powers = CartesianPowers::new(l);
    powers.update(x);
    return normalization(l, m) * powers.sum(l, m);
}

/// Evaluate the complex spherical harmonic `Y_l^m(x) = R_l^m(x) / |x|^l`. `x`
/// does not need to be normalized, but must be different from zero.
pub fn spherical_harmonic(x: Vector3D, l: usize, m: isize) -> Complex64 {
    check_indexes(l, m);
    let mut powers = CartesianPowers::new(l);
    powers.update(x);
    let r_inv_l = (1.0 / x.norm()).powi(l as i32);
    let scaled_normalization = normalization(l, m) * r_inv_l;
    return scaled_normalization * powers.sum(l, m);
}

/// Evaluate the gradient with respect to `x` of the spherical harmonic
/// `Y_l^m(x)`, as `[∂Y/∂x, ∂Y/∂y, ∂Y/∂z]`.
pub fn spherical_harmonic_gradient(x: Vector3D, l: usize, m: isize) -> [Complex64; 3] {
    check_indexes(l, m);
    let mut powers = CartesianPowers::new(l);
    powers.update(x);

    let r2 = x.norm2();
    let scaled_normalization = normalization(l, m) * (1.0 / r2.sqrt()).powi(l as i32);
    let value = scaled_normalization * powers.sum(l, m);
    let sum_gradient = powers.sum_gradient(l, m);

    let mut gradient = [Complex64::new(0.0, 0.0); 3];
    for d in 0..3 {
        gradient[d] = scaled_normalization * sum_gradient[d] - (l as f64 * x[d] / r2) * value;
    }
    return gradient;
}

/// Evaluate all solid harmonics `R_l^m(x)` for `l <= max_angular`
pub fn solid_harmonics_all(x: Vector3D, max_angular: usize) -> SphericalHarmonicsArray {
    let mut values = SphericalHarmonicsArray::new(max_angular);
    SphericalHarmonics::new(max_angular).compute_solid(x, &mut values);
    return values;
}

/// Evaluate all spherical harmonics `Y_l^m(x)` for `l <= max_angular`
pub fn spherical_harmonics_all(x: Vector3D, max_angular: usize) -> SphericalHarmonicsArray {
    let mut values = SphericalHarmonicsArray::new(max_angular);
    SphericalHarmonics::new(max_angular).compute(x, &mut values, None);
    return values;
}

/// Evaluate the gradients of all spherical harmonics `Y_l^m(x)` for
/// `l <= max_angular`, one array for each of the x/y/z directions
pub fn spherical_harmonics_gradient_all(x: Vector3D, max_angular: usize) -> [SphericalHarmonicsArray; 3] {
    let mut values = SphericalHarmonicsArray::new(max_angular);
    let mut gradients = [
        SphericalHarmonicsArray::new(max_angular),
        SphericalHarmonicsArray::new(max_angular),
        SphericalHarmonicsArray::new(max_angular),
    ];
    SphericalHarmonics::new(max_angular).compute(x, &mut values, Some(&mut gradients));
    return gradients;
}

/// Compute a full set of complex spherical harmonics at given positions,
/// re-using the scratch allocations between calls.
#[derive(Debug, Clone)]
pub struct SphericalHarmonics {
    max_angular: usize,
    /// `N_lm` factors, stored at the same linear index as the harmonics
    normalization: Vec<f64>,
    powers: CartesianPowers,
}

impl SphericalHarmonics {
    /// Build a new `SphericalHarmonics` calculator with the given `l_max`, and
    /// pre-compute all required normalization factors
    pub fn new(max_angular: usize) -> SphericalHarmonics {
        let mut normalization_factors = Vec::with_capacity((max_angular + 1) * (max_angular + 1));
        for l in 0..=max_angular {
            for m in -(l as isize)..=(l as isize) {
                normalization_factors.push(normalization(l, m));
            }
        }

        SphericalHarmonics {
            max_angular: max_angular,
            normalization: normalization_factors,
            powers: CartesianPowers::new(max_angular),
        }
    }

    /// Get the maximal angular degree of this calculator
    pub fn max_angular(&self) -> usize {
        self.max_angular
    }

    fn check_values_size(&self, values: &SphericalHarmonicsArray) {
        assert_eq!(
            values.max_angular(), self.max_angular,
            "wrong size for the values array, expected max_angular to be {}, got {}",
            self.max_angular, values.max_angular,
        );
    }

    /// Evaluate all solid harmonics at `x`, and store the results in `values`
    pub fn compute_solid(&mut self, x: Vector3D, values: &mut SphericalHarmonicsArray) {
        self.check_values_size(values);
        self.powers.update(x);

        let mut index = 0;
        for l in 0..=self.max_angular {
            for m in -(l as isize)..=(l as isize) {
                values.data[index] = self.normalization[index] * self.powers.sum(l, m);
                index += 1;
            }
        }
    }

    /// Evaluate all spherical harmonics for the vector `x`, and store the
    /// results in `values`. If `gradients` is `Some`, then this function also
    /// computes Cartesian gradients with respect to `x` and store them in
    /// `gradients`.
    ///
    /// `x` does not need to be normalized, but must not be the zero vector.
    #[time_graph::instrument(name = "SphericalHarmonics::compute")]
    pub fn compute(
        &mut self,
        x: Vector3D,
        values: &mut SphericalHarmonicsArray,
        mut gradients: Option<&mut [SphericalHarmonicsArray; 3]>
    ) {
        let r2 = x.norm2();
        assert!(r2 > 0.0, "spherical harmonics are not defined for the zero vector");
        self.check_values_size(values);
        if let Some(ref gradients) = gradients {
            for i in 0..3 {
                assert_eq!(
                    gradients[i].max_angular(), self.max_angular,
                    "wrong size for one gradient array, expected max_angular to be {}, got {}",
                    self.max_angular, gradients[i].max_angular,
                );
            }
        }

        self.powers.update(x);
        let r_inv = 1.0 / r2.sqrt();

        let mut index = 0;
        for l in 0..=self.max_angular {
            let r_inv_l = r_inv.powi(l as i32);
            for m in -(l as isize)..=(l as isize) {
                let scaled_normalization = self.normalization[index] * r_inv_l;
                let value = scaled_normalization * self.powers.sum(l, m);
                values.data[index] = value;

                if let Some(ref mut gradients) = gradients {
                    let sum_gradient = self.powers.sum_gradient(l, m);
                    for d in 0..3 {
                        gradients[d].data[index] = scaled_normalization * sum_gradient[d] - (l as f64 * x[d] / r2) * value;
                    }
                }

                index += 1;
            }
        }
    }
}

/// Store together the spherical harmonics implementation and cached allocation
/// for values/gradients.
#[derive(Debug, Clone)]
pub(crate) struct SphericalHarmonicsCache {
    /// Implementation of the spherical harmonics
    code: SphericalHarmonics,
    /// Cache for the spherical harmonics values
    pub(crate) values: SphericalHarmonicsArray,
    /// Cache for the spherical harmonics gradients (one value each for x/y/z)
    pub(crate) gradients: [SphericalHarmonicsArray; 3],
}

impl SphericalHarmonicsCache {
    /// Create a new `SphericalHarmonicsCache` for the given `max_angular` parameter
    pub(crate) fn new(max_angular: usize) -> SphericalHarmonicsCache {
        let code = SphericalHarmonics::new(max_angular);
        let values = SphericalHarmonicsArray::new(max_angular);
        let gradients = [
            SphericalHarmonicsArray::new(max_angular),
            SphericalHarmonicsArray::new(max_angular),
            SphericalHarmonicsArray::new(max_angular)
        ];

        return SphericalHarmonicsCache { code, values, gradients };
    }

    /// Run the calculation, the results are stored inside `self.values` and
    /// `self.gradients`
    pub(crate) fn compute(&mut self, x: Vector3D, gradient: bool) {
        if gradient {
            self.code.compute(x, &mut self.values, Some(&mut self.gradients));
        } else {
            self.code.compute(x, &mut self.values, None);
        }
    }
}
