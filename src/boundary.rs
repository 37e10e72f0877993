//! Closed-form polynomial coefficients from boundary conditions.
//!
//! Coefficient arrays in this module are ordered strongest term first, so a quintic is
//! `c[0]*t^5 + c[1]*t^4 + ... + c[5]`. Use [`quintic_polynomial`] / [`cubic_polynomial`] to get a
//! [`Polynomial`], which stores its coefficients weakest term first.

use crate::polynomial::Polynomial;
use crate::roots::polyroots;

/// Position, velocity and acceleration of one dof at one instant.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct State {
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
}

impl State {
    pub fn new(position: f64, velocity: f64, acceleration: f64) -> State {
        State {
            position,
            velocity,
            acceleration,
        }
    }
}

fn check_duration(t: f64) {
    if !(t > 0.) {
        panic!("Boundary coefficients need a positive duration, got {}", t);
    }
}

/// Returns the quintic `[a, b, c, d, e, f]` with `p(t) = at^5 + bt^4 + ct^3 + dt^2 + et + f` that
/// passes through `(x0, dx0, ddx0)` at 0 and `(x1, dx1, ddx1)` at `t`.
///
/// # Panics
///
/// Panics unless `t > 0`.
#[allow(clippy::too_many_arguments)]
pub fn quintic_coefficients(
    x0: f64,
    x1: f64,
    dx0: f64,
    dx1: f64,
    ddx0: f64,
    ddx1: f64,
    t: f64,
) -> [f64; 6] {
    check_duration(t);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    [
        (t2 * (ddx1 - ddx0) - 6.0 * t * (dx1 + dx0) + 12.0 * (x1 - x0)) / (2.0 * t5),
        (t2 * (3.0 * ddx0 - 2.0 * ddx1) + t * (16.0 * dx0 + 14.0 * dx1) + 30.0 * (x0 - x1))
            / (2.0 * t4),
        (t2 * (ddx1 - 3.0 * ddx0) - t * (12.0 * dx0 + 8.0 * dx1) + 20.0 * (x1 - x0)) / (2.0 * t3),
        0.5 * ddx0,
        dx0,
        x0,
    ]
}

/// Returns the cubic `[a, b, c, d]` with `p(t) = at^3 + bt^2 + ct + d` starting at
/// `(x0, dx0, ddx0)` and reaching acceleration `ddx1` at `t`.
///
/// The boundary conditions are assumed consistent. The leading coefficient comes from the
/// acceleration difference, which is the least affected by error accumulated in the position and
/// velocity terms, so `x1` and `dx1` are not used.
///
/// # Panics
///
/// Panics unless `t > 0`.
#[allow(clippy::too_many_arguments)]
pub fn cubic_coefficients(
    x0: f64,
    _x1: f64,
    dx0: f64,
    _dx1: f64,
    ddx0: f64,
    ddx1: f64,
    t: f64,
) -> [f64; 4] {
    check_duration(t);
    [(ddx1 - ddx0) / (6.0 * t), 0.5 * ddx0, dx0, x0]
}

/// Builds the quintic joining `start` at 0 and `end` at `t` as a [`Polynomial`].
pub fn quintic_polynomial(start: &State, end: &State, t: f64) -> Polynomial {
    let coeffs = quintic_coefficients(
        start.position,
        end.position,
        start.velocity,
        end.velocity,
        start.acceleration,
        end.acceleration,
        t,
    );
    Polynomial::from_strongest_first(&coeffs)
}

/// Builds the cubic leaving `start` at 0 with acceleration `end.acceleration` at `t`.
pub fn cubic_polynomial(start: &State, end: &State, t: f64) -> Polynomial {
    let coeffs = cubic_coefficients(
        start.position,
        end.position,
        start.velocity,
        end.velocity,
        start.acceleration,
        end.acceleration,
        t,
    );
    Polynomial::from_strongest_first(&coeffs)
}

/// Evaluates strongest-first coefficients at `t` with Horner's method.
pub fn evaluate(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().fold(0., |acc, c| acc * t + c)
}

/// Evaluates the `n`-th derivative of strongest-first coefficients at `t`.
pub fn evaluate_derivative(coeffs: &[f64], t: f64, n: usize) -> f64 {
    evaluate(&differentiate(coeffs, n), t)
}

/// Strongest-first coefficients of the `n`-th derivative.
fn differentiate(coeffs: &[f64], n: usize) -> Vec<f64> {
    let mut current = coeffs.to_vec();
    for _ in 0..n {
        let degree = current.len().saturating_sub(1);
        current = current
            .iter()
            .take(degree)
            .enumerate()
            .map(|(idx, c)| c * (degree - idx) as f64)
            .collect();
    }
    current
}

/// Returns the points at which the first derivative of the strongest-first polynomial vanishes,
/// in ascending order. Leading zero coefficients are ignored.
pub fn critical_points(coeffs: &[f64]) -> Vec<f64> {
    let derivative = differentiate(coeffs, 1);
    let first = match derivative.iter().position(|c| *c != 0.) {
        Some(first) => first,
        None => return Vec::new(),
    };
    let mut points = polyroots(&derivative[first..]);
    points.sort_by(|a, b| a.total_cmp(b));
    points
}
