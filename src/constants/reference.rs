//! Exact and tabulated control-chart constants.
//!
//! Used to check the simulated estimates and to sanity-check downstream
//! limits. All tables are indexed by subgroup size n = 2..=10 (index 0 is
//! n = 2), as published in ASTM E2587.

use std::f64::consts::PI;

const D2: [f64; 9] = [1.128, 1.693, 2.059, 2.326, 2.534, 2.704, 2.847, 2.970, 3.078];
const D3: [f64; 9] = [0.0, 0.0, 0.0, 0.0, 0.0, 0.076, 0.136, 0.184, 0.223];
const D4: [f64; 9] = [3.267, 2.575, 2.282, 2.114, 2.004, 1.924, 1.864, 1.816, 1.777];
const A3: [f64; 9] = [2.659, 1.954, 1.628, 1.427, 1.287, 1.182, 1.099, 1.032, 0.975];
const B3: [f64; 9] = [0.0, 0.0, 0.0, 0.0, 0.030, 0.118, 0.185, 0.239, 0.284];
const B4: [f64; 9] = [3.267, 2.568, 2.266, 2.089, 1.970, 1.882, 1.815, 1.761, 1.716];
const C4: [f64; 9] = [
    0.7979, 0.8862, 0.9213, 0.9400, 0.9515, 0.9594, 0.9650, 0.9693, 0.9727,
];

/// Published factors for one subgroup size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabulatedFactors {
    pub n: usize,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub a3: f64,
    pub b3: f64,
    pub b4: f64,
    pub c4: f64,
}

/// Looks up the published factors for `n` in 2..=10.
pub fn tabulated(n: usize) -> Option<TabulatedFactors> {
    if !(2..=10).contains(&n) {
        return None;
    }
    let i = n - 2;
    Some(TabulatedFactors {
        n,
        d2: D2[i],
        d3: D3[i],
        d4: D4[i],
        a3: A3[i],
        b3: B3[i],
        b4: B4[i],
        c4: C4[i],
    })
}

/// Closed-form bias correction of the sample standard deviation:
///
/// ```text
/// c4(n) = sqrt(2 / (n - 1)) * Γ(n/2) / Γ((n - 1)/2)
/// ```
///
/// The gamma ratio r(n) = Γ(n/2)/Γ((n-1)/2) is built from r(2) = 1/sqrt(π)
/// with r(k+1) = (k - 1) / (2 r(k)), which avoids overflow for large n.
///
/// Returns `None` for `n < 2`.
///
/// ```
/// use u_spc::constants::c4;
///
/// assert!((c4(2).unwrap() - 0.7979).abs() < 1e-4);
/// assert!((c4(25).unwrap() - 0.9896).abs() < 1e-4);
/// assert!(c4(1).is_none());
/// ```
pub fn c4(n: usize) -> Option<f64> {
    if n < 2 {
        return None;
    }
    let mut ratio = 1.0 / PI.sqrt();
    for k in 2..n {
        ratio = (k as f64 - 1.0) / (2.0 * ratio);
    }
    Some((2.0 / (n as f64 - 1.0)).sqrt() * ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_form_matches_table() {
        for n in 2..=10 {
            let exact = c4(n).unwrap();
            let table = tabulated(n).unwrap().c4;
            assert!((exact - table).abs() < 1e-4, "n={n}: {exact} vs {table}");
        }
    }

    #[test]
    fn c4_approaches_one() {
        let mut prev = 0.0;
        for n in 2..200 {
            let v = c4(n).unwrap();
            assert!(v > prev && v < 1.0, "n={n}: {v}");
            prev = v;
        }
    }

    #[test]
    fn table_range_is_two_to_ten() {
        assert!(tabulated(1).is_none());
        assert!(tabulated(11).is_none());
        assert_eq!(tabulated(5).unwrap().d2, 2.326);
    }

    #[test]
    fn tabulated_a3_is_consistent_with_c4() {
        for n in 2..=10 {
            let t = tabulated(n).unwrap();
            let a3 = 3.0 / (t.c4 * (n as f64).sqrt());
            assert!((a3 - t.a3).abs() < 2e-3, "n={n}: {a3} vs {}", t.a3);
        }
    }
}
