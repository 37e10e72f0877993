//! Real roots of a polynomial via simultaneous Durand-Kerner iteration.
//!
//! Tolerance policy, all taken from [`crate::tolerance`]:
//! * a root estimate stops being updated once its correction falls below
//!   [`ROOT_CONVERGENCE_TOLERANCE`];
//! * at most [`ROOT_MAX_ITERATIONS`] rounds are run;
//! * estimates within [`ROOT_MULTIPLICITY_TOLERANCE`] of each other are one repeated root and are
//!   replaced by their mean, since the iteration only converges to about `sqrt(eps)` near
//!   multiple roots;
//! * a root is reported as real when `|im| <` [`ROOT_IMAGINARY_TOLERANCE`].

use log::trace;
use nalgebra::Complex;

use crate::tolerance::{
    ROOT_CONVERGENCE_TOLERANCE, ROOT_IMAGINARY_TOLERANCE, ROOT_MAX_ITERATIONS,
    ROOT_MULTIPLICITY_TOLERANCE,
};

/// Returns the real roots of the polynomial whose coefficients are given strongest term first,
/// i.e. `coeffs[0]*x^D + coeffs[1]*x^(D-1) + ... + coeffs[D]`.
///
/// Repeated roots are reported once. The order of the returned roots is unspecified.
///
/// # Panics
///
/// Panics if `coeffs` is empty or if the leading coefficient is zero. A constant polynomial
/// (`coeffs.len() == 1`) has no roots to find and yields an empty vector.
///
/// # Examples
///
/// ```
/// use pwpoly::roots::polyroots;
/// // x^2 - 3x + 2 = (x - 1)(x - 2)
/// let mut roots = polyroots(&[1., -3., 2.]);
/// roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
/// assert!((roots[0] - 1.).abs() < 1e-9 && (roots[1] - 2.).abs() < 1e-9);
/// ```
pub fn polyroots(coeffs: &[f64]) -> Vec<f64> {
    if coeffs.is_empty() {
        panic!("Cannot find roots of a polynomial without coefficients");
    }
    if coeffs[0] == 0. {
        panic!("Leading coefficient must be non-zero, got {:?}", coeffs);
    }

    let degree = coeffs.len() - 1;
    if degree == 0 {
        return Vec::new();
    }

    // monic form, leading 1 dropped
    let monic: Vec<Complex<f64>> = coeffs[1..]
        .iter()
        .map(|c| Complex::new(c / coeffs[0], 0.))
        .collect();

    let roots = durand_kerner(&monic);
    collapse_real(&roots)
}

fn durand_kerner(monic: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let degree = monic.len();

    // powers of a seed that is not a root of unity are pairwise distinct
    let seed = Complex::new(0.4, 0.9);
    let mut roots = Vec::with_capacity(degree);
    roots.push(Complex::new(1., 0.));
    for i in 1..degree {
        let next = roots[i - 1] * seed;
        roots.push(next);
    }
    let mut err = vec![1.0f64; degree];

    let mut converged = false;
    for _ in 0..ROOT_MAX_ITERATIONS {
        let mut changed = false;
        for i in 0..degree {
            if err[i] < ROOT_CONVERGENCE_TOLERANCE {
                continue;
            }
            changed = true;

            let mut x = roots[i] + monic[0];
            for c in &monic[1..] {
                x = roots[i] * x + *c;
            }
            for j in 0..degree {
                if i != j && roots[i] != roots[j] {
                    x /= roots[i] - roots[j];
                }
            }
            roots[i] -= x;
            err[i] = x.norm();
        }
        if !changed {
            converged = true;
            break;
        }
    }

    if !converged {
        trace!(
            "Durand-Kerner stopped after {} rounds with residual corrections {:?}",
            ROOT_MAX_ITERATIONS,
            err
        );
    }

    roots
}

/// Merges clustered estimates and keeps the ones with a negligible imaginary part.
fn collapse_real(roots: &[Complex<f64>]) -> Vec<f64> {
    let mut visited = vec![false; roots.len()];
    let mut real = Vec::with_capacity(roots.len());

    for i in 0..roots.len() {
        if visited[i] {
            continue;
        }
        let mut sum = roots[i];
        let mut n = 1;
        for j in (i + 1)..roots.len() {
            if !visited[j] && (roots[i] - roots[j]).norm() < ROOT_MULTIPLICITY_TOLERANCE {
                sum += roots[j];
                n += 1;
                visited[j] = true;
            }
        }
        let root = sum / n as f64;
        if root.im.abs() < ROOT_IMAGINARY_TOLERANCE {
            real.push(root.re);
        }
    }

    real
}
