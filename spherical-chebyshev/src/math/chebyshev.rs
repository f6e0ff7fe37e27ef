/// Map `r` from `[r0, r1]` to `[-1, 1]`
#[inline]
fn remap(r: f64, r0: f64, r1: f64) -> f64 {
    (2.0 * r - r0 - r1) / (r1 - r0)
}

/// Evaluate the Chebyshev polynomials of the first kind `T_0 .. T_n` at
/// `x = (2r - r0 - r1) / (r1 - r0)`, storing the results in `values`. The
/// length of `values` defines `n + 1`.
pub fn chebyshev_into(r: f64, r0: f64, r1: f64, values: &mut [f64]) {
    if values.is_empty() {
        return;
    }

    let x = remap(r, r0, r1);
    values[0] = 1.0;
    if values.len() > 1 {
        values[1] = x;
    }

    for i in 2..values.len() {
        values[i] = 2.0 * x * values[i - 1] - values[i - 2];
    }
}

/// Evaluate the derivatives with respect to `r` of the Chebyshev polynomials
/// `T_0 .. T_n` at `x = (2r - r0 - r1) / (r1 - r0)`, storing the results in
/// `values`.
///
/// This uses `dT_i/dx = i U_{i-1}(x)`, where `U` are the Chebyshev polynomials
/// of the second kind, and the chain rule factor `dx/dr = 2 / (r1 - r0)`.
pub fn chebyshev_d1_into(r: f64, r0: f64, r1: f64, values: &mut [f64]) {
    if values.is_empty() {
        return;
    }

    let x = remap(r, r0, r1);
    let scale = 2.0 / (r1 - r0);

    values[0] = 0.0;

    // U_{i-2} and U_{i-1}
    let mut u_previous = 0.0;
    let mut u_current = 1.0;
    for i in 1..values.len() {
        values[i] = i as f64 * u_current * scale;

        let u_next = if i == 1 {
            2.0 * x
        } else {
            2.0 * x * u_current - u_previous
        };
        u_previous = u_current;
        u_current = u_next;
    }
}

/// Get the values of the Chebyshev polynomials `T_0 .. T_n` at
/// `x = (2r - r0 - r1) / (r1 - r0)`.
pub fn chebyshev(r: f64, r0: f64, r1: f64, n: usize) -> Vec<f64> {
    let mut values = vec![0.0; n + 1];
    chebyshev_into(r, r0, r1, &mut values);
    return values;
}

/// Get the derivatives with respect to `r` of the Chebyshev polynomials
/// `T_0 .. T_n`, see [`chebyshev_d1_into`].
pub fn chebyshev_d1(r: f64, r0: f64, r1: f64, n: usize) -> Vec<f64> {
    let mut values = vec![0.0; n + 1];
    chebyshev_d1_into(r, r0, r1, &mut values);
    return values;
}
