use super::gamma;

/// Exact values of `n!` for `n <= 20`, all of them are exactly representable
/// as `f64`.
static FACTORIALS: [f64; 21] = [
    1.0,
    1.0,
    2.0,
    6.0,
    24.0,
    120.0,
    720.0,
    5040.0,
    40320.0,
    362880.0,
    3628800.0,
    39916800.0,
    479001600.0,
    6227020800.0,
    87178291200.0,
    1307674368000.0,
    20922789888000.0,
    355687428096000.0,
    6402373705728000.0,
    121645100408832000.0,
    2432902008176640000.0,
];

/// Compute `n!` as a floating point value. Values up to `20!` come from a
/// table, larger ones from `gamma(n + 1)`.
#[inline]
pub fn factorial(n: usize) -> f64 {
    if n < FACTORIALS.len() {
        FACTORIALS[n]
    } else {
        gamma(n as f64 + 1.0)
    }
}
