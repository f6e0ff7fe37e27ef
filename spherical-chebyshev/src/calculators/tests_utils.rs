use ndarray::{Array1, s};

use approx::assert_relative_eq;

use crate::CalculationOptions;
use crate::systems::{System, SimpleSystem};

use super::SphericalChebyshev;

/// Check that analytical gradients agree with a finite difference calculation
/// of the gradients, moving each atom in each direction in turn.
#[allow(clippy::needless_pass_by_value)]
pub fn finite_differences(
    calculator: &mut SphericalChebyshev,
    mut system: SimpleSystem,
    max_relative: f64,
) {
    let options = CalculationOptions { gradients: true };
    let reference = calculator.compute(&system, options).unwrap();
    let gradients = reference.gradients.as_ref().unwrap();

    let n_atoms = system.size().unwrap();
    let n_features = calculator.features_count();

    let delta = 1e-6;
    for atom in 0..n_atoms {
        for spatial in 0..3 {
            system.positions_mut()[atom][spatial] += delta;
            let positive = calculator.evaluate(&system).unwrap();

            system.positions_mut()[atom][spatial] -= 2.0 * delta;
            let negative = calculator.evaluate(&system).unwrap();

            system.positions_mut()[atom][spatial] += delta;

            for center in 0..n_atoms {
                let mut finite_difference = positive.values.slice(s![center, ..]).to_owned();
                finite_difference -= &negative.values.slice(s![center, ..]);
                finite_difference /= 2.0 * delta;

                let gradient = match gradients.get(center, atom) {
                    Some(gradient) => gradient.slice(s![spatial, ..]).to_owned(),
                    None => Array1::zeros(n_features),
                };

                assert_relative_eq!(
                    finite_difference, gradient,
                    epsilon = 1e-6,
                    max_relative = max_relative,
                );
            }
        }
    }
}
