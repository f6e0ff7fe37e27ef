/// Evaluate the smooth polynomial cutoff function `f(d) = (1 - (d/rc)^2)^4`
/// and its derivative with respect to the distance `d`.
///
/// Returns `(value, derivative)`. Both vanish at `d = rc`, and the function
/// is only meaningful for `0 <= d <= rc`: distances at or beyond the cutoff
/// give `(0.0, 0.0)`.
#[inline]
pub fn polynomial_cutoff(distance: f64, cutoff: f64) -> (f64, f64) {
    if distance >= cutoff {
        return (0.0, 0.0);
    }

    let x = distance / cutoff;
    let one_minus_x2 = 1.0 - x * x;
    let cube = one_minus_x2 * one_minus_x2 * one_minus_x2;

    let value = cube * one_minus_x2;
    let derivative = -8.0 * x * cube / cutoff;
    return (value, derivative);
}
