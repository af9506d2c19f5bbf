//! Floor-division and floor-modulo helpers that reproduce Python's `%`/`//`
//! operators exactly, including their behavior against a negative modulus.
//!
//! Rust's `%` truncates toward zero and `rem_euclid` is always non-negative;
//! neither matches Python, whose `%` takes the sign of the divisor. `sub`'s
//! reduction against the negative modulus `MINVAL` depends on that distinction
//! (see `consts::MINVAL` and `cpu::alu`), so the reduction is implemented here
//! rather than via a standard library integer method.

/// Floor division: `a.div_euclid`-like, but rounding toward negative infinity
/// and matching Python's `//` for any sign combination of `a` and `b`.
pub fn floor_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Floor modulo: the result has the same sign as `m` (or is zero), matching
/// Python's `%`. Used for the `MAXVAL`/`MINVAL` reductions in `cpu::alu`.
pub fn py_mod(a: i128, m: i128) -> i128 {
    let r = a % m;
    if r != 0 && (r < 0) != (m < 0) {
        r + m
    } else {
        r
    }
}
