#![allow(clippy::excessive_precision)]
use std::f64;

/// Constant value for `2 * sqrt(e / pi)`
const TWO_SQRT_E_OVER_PI: f64 = 1.860382734205265717;

/// Polynomial coefficients for approximating the `gamma` function
const GAMMA_DK: &[f64] = &[
    2.48574089138753565546e-5,
    1.05142378581721974210,
    -3.45687097222016235469,
    4.51227709466894823700,
    -2.98285225323576655721,
    1.05639711577126713077,
    -1.95428773191645869583e-1,
    1.70970543404441224307e-2,
    -5.71926117404305781283e-4,
    4.63399473359905636708e-6,
    -2.71994908488607703910e-9,
];

/// Auxiliary variable when evaluating the `gamma` function
const GAMMA_R: f64 = 10.900511;

/// Computes the gamma function, with a relative accuracy around 1e-13.
/// The implementation is derived from "An Analysis of the Lanczos Gamma
/// Approximation", Glendon Ralph Pugh, 2004 p. 116.
///
/// This code was extracted from statrs, which is © 2016 Michael Ma, distributed
/// under MIT license. Cf <https://github.com/boxtown/statrs/blob/c5536a8c916852259832b2064a9b845b68751c8f/src/function/gamma.rs>
/// for the original code
pub fn gamma(x: f64) -> f64 {
    if x < 0.5 {
        let s = GAMMA_DK
            .iter()
            .enumerate()
            .skip(1)
            .fold(GAMMA_DK[0], |s, t| s + t.1 / (t.0 as f64 - x));

        f64::consts::PI
            / ((f64::consts::PI * x).sin()
                * s
                * TWO_SQRT_E_OVER_PI
                * ((0.5 - x + GAMMA_R) / f64::consts::E).powf(0.5 - x))
    } else {
        let s = GAMMA_DK
            .iter()
            .enumerate()
            .skip(1)
            .fold(GAMMA_DK[0], |s, t| s + t.1 / (x + t.0 as f64 - 1.0));

        s * TWO_SQRT_E_OVER_PI * ((x - 0.5 + GAMMA_R) / f64::consts::E).powf(x - 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn values() {
        assert!(gamma(f64::NAN).is_nan());
        assert_relative_eq!(gamma(-1.5), 2.363271801207354703064223311121526910396732608163182837618410, max_relative=1e-13);
        assert_relative_eq!(gamma(0.1), 9.513507698668731836292487177265402192550578626088377343050000, max_relative=1e-13);
        assert_relative_eq!(gamma(1.0), 1.0, max_relative=1e-13);
        assert_relative_eq!(gamma(1.5), 0.886226925452758013649083741670572591398774728061193564106903, max_relative=1e-13);
        assert_relative_eq!(gamma(5.0), 24.0, max_relative=1e-13);
        assert_relative_eq!(gamma(10.1), 454760.7514415859508673358368319076190405047458218916492282448, max_relative=1e-13);
        assert_relative_eq!(gamma(150.0 + 1.0e-12), 3.8089226376496421386707466577615064443807882167327097140e+260, max_relative=1e-12);
    }

    #[test]
    fn integers() {
        // gamma(n + 1) = n!
        let mut factorial = 1.0;
        for n in 1..30 {
            factorial *= n as f64;
            assert_relative_eq!(gamma(n as f64 + 1.0), factorial, max_relative=1e-12);
        }
    }
}
