//! Position, velocity, acceleration and jerk limit checks plus boundary-value checks for
//! polynomials, chunks and trajectories.
//!
//! Limits are checked at the ends of the range and at every extremum of the relevant derivative
//! inside it, so no sampling is involved. Violations are returned as [`CheckReturn`] values and
//! the offending point is kept in the checker for inspection.

use std::fmt;

use log::debug;

use crate::boundary::State;
use crate::chunk::Chunk;
use crate::polynomial::{Coordinate, Polynomial};
use crate::tolerance::POLYNOMIAL_EPSILON;
use crate::trajectory::Trajectory;

/// Outcome of a check. The discriminants are stable status codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CheckReturn {
    Normal = 0,
    /// an extremum or end value in the range is outside the position limits
    PositionLimitsViolation = 1,
    /// an extremum or end value in the range exceeds the velocity limit
    VelocityLimitsViolation = 2,
    /// an extremum or end value in the range exceeds the acceleration limit
    AccelerationLimitsViolation = 3,
    /// an extremum or end value in the range exceeds the jerk limit
    JerkLimitsViolation = 4,
    /// the upper end of the range is negative
    NegativeDuration = 5,
    /// an initial or final position differs from the expected one
    PositionDiscrepancy = 6,
    /// an initial or final velocity differs from the expected one
    VelocityDiscrepancy = 7,
    /// an initial or final acceleration differs from the expected one
    AccelerationDiscrepancy = 8,
    /// the range differs from the expected duration
    DurationDiscrepancy = 9,
}

impl CheckReturn {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_normal(self) -> bool {
        self == CheckReturn::Normal
    }

    /// Lower is reported first when several categories are violated
    fn precedence(self) -> u8 {
        match self {
            CheckReturn::NegativeDuration => 0,
            CheckReturn::PositionLimitsViolation => 1,
            CheckReturn::VelocityLimitsViolation => 2,
            CheckReturn::AccelerationLimitsViolation => 3,
            CheckReturn::JerkLimitsViolation => 4,
            CheckReturn::PositionDiscrepancy => 5,
            CheckReturn::VelocityDiscrepancy => 6,
            CheckReturn::AccelerationDiscrepancy => 7,
            CheckReturn::DurationDiscrepancy => 8,
            CheckReturn::Normal => 9,
        }
    }
}

impl fmt::Display for CheckReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckReturn::Normal => "normal",
            CheckReturn::PositionLimitsViolation => "position limits violation",
            CheckReturn::VelocityLimitsViolation => "velocity limits violation",
            CheckReturn::AccelerationLimitsViolation => "acceleration limits violation",
            CheckReturn::JerkLimitsViolation => "jerk limits violation",
            CheckReturn::NegativeDuration => "negative duration",
            CheckReturn::PositionDiscrepancy => "position discrepancy",
            CheckReturn::VelocityDiscrepancy => "velocity discrepancy",
            CheckReturn::AccelerationDiscrepancy => "acceleration discrepancy",
            CheckReturn::DurationDiscrepancy => "duration discrepancy",
        };
        write!(f, "{}", name)
    }
}

/// Limits of a single dof. `None` leaves that derivative unchecked.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct DofLimits {
    /// `(min, max)`
    pub position: Option<(f64, f64)>,
    pub velocity: Option<f64>,
    pub acceleration: Option<f64>,
    pub jerk: Option<f64>,
}

/// Per-dof limits. Velocity, acceleration and jerk limits are symmetric bounds.
///
/// # Examples
///
/// ```
/// use pwpoly::Limits;
/// let limits = Limits::new()
///     .with_position(&[-1., -2.], &[1., 2.])
///     .with_velocity(&[0.5, 0.5]);
/// assert_eq!(Some(0.5), limits.for_dof(1).velocity);
/// assert_eq!(None, limits.for_dof(1).jerk);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Limits {
    position: Option<(Vec<f64>, Vec<f64>)>,
    velocity: Option<Vec<f64>>,
    acceleration: Option<Vec<f64>>,
    jerk: Option<Vec<f64>>,
}

impl Limits {
    pub fn new() -> Limits {
        Limits::default()
    }

    pub fn with_position(mut self, min: &[f64], max: &[f64]) -> Limits {
        if min.len() != max.len() {
            panic!("Got {} lower but {} upper position limits", min.len(), max.len());
        }
        self.position = Some((min.to_vec(), max.to_vec()));
        self
    }

    pub fn with_velocity(mut self, vm: &[f64]) -> Limits {
        self.velocity = Some(vm.to_vec());
        self
    }

    pub fn with_acceleration(mut self, am: &[f64]) -> Limits {
        self.acceleration = Some(am.to_vec());
        self
    }

    pub fn with_jerk(mut self, jm: &[f64]) -> Limits {
        self.jerk = Some(jm.to_vec());
        self
    }

    /// Limits of dof `idof`
    pub fn for_dof(&self, idof: usize) -> DofLimits {
        DofLimits {
            position: self.position.as_ref().map(|(min, max)| (min[idof], max[idof])),
            velocity: self.velocity.as_ref().map(|vm| vm[idof]),
            acceleration: self.acceleration.as_ref().map(|am| am[idof]),
            jerk: self.jerk.as_ref().map(|jm| jm[idof]),
        }
    }

    fn len_matches(&self, ndof: usize) -> bool {
        self.position.as_ref().map_or(true, |(min, _)| min.len() == ndof)
            && self.velocity.as_ref().map_or(true, |v| v.len() == ndof)
            && self.acceleration.as_ref().map_or(true, |v| v.len() == ndof)
            && self.jerk.as_ref().map_or(true, |v| v.len() == ndof)
    }
}

/// Expected boundary values and duration of a single polynomial
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PolynomialExpectation {
    pub duration: f64,
    pub initial: State,
    pub terminal: State,
}

/// Expected boundary values of every dof and the duration of a chunk
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkExpectation {
    pub duration: f64,
    pub initial: Vec<State>,
    pub terminal: Vec<State>,
}

impl ChunkExpectation {
    fn for_dof(&self, idof: usize) -> PolynomialExpectation {
        PolynomialExpectation {
            duration: self.duration,
            initial: self.initial[idof],
            terminal: self.terminal[idof],
        }
    }
}

/// Where the last failed check went wrong
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CheckFailure {
    pub status: CheckReturn,
    /// time of the offending value, local to the chunk for limit checks and global for
    /// continuity checks
    pub point: f64,
    pub value: f64,
    pub dof: Option<usize>,
    pub chunk: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct PolynomialChecker {
    ndof: usize,
    last_failure: Option<CheckFailure>,
}

/// End values and in-range extrema of the `ideriv`-th derivative of `p` on `[0, t]`
fn critical_values(p: &Polynomial, t: f64, ideriv: usize) -> Vec<Coordinate> {
    let mut coords = vec![
        Coordinate::new(0., p.evaldn(0., ideriv)),
        Coordinate::new(t, p.evaldn(t, ideriv)),
    ];
    let extrema = if ideriv == 0 {
        p.get_extrema().to_vec()
    } else {
        p.find_all_local_extrema(ideriv)
    };
    coords.extend(
        extrema
            .into_iter()
            .filter(|c| c.point >= -POLYNOMIAL_EPSILON && c.point <= t + POLYNOMIAL_EPSILON),
    );
    coords
}

impl PolynomialChecker {
    pub fn new(ndof: usize) -> PolynomialChecker {
        PolynomialChecker {
            ndof,
            last_failure: None,
        }
    }

    pub fn ndof(&self) -> usize {
        self.ndof
    }

    /// Details of the most recent non-normal result, cleared by every new check
    pub fn last_failure(&self) -> Option<CheckFailure> {
        self.last_failure
    }

    fn fail(&mut self, status: CheckReturn, point: f64, value: f64) -> CheckReturn {
        debug!("Polynomial check failed: {} at t = {} (value {})", status, point, value);
        self.last_failure = Some(CheckFailure {
            status,
            point,
            value,
            dof: None,
            chunk: None,
        });
        status
    }

    /// Checks `p` on `[0, t]` against `limits`
    pub fn check_polynomial(&mut self, p: &Polynomial, t: f64, limits: &DofLimits) -> CheckReturn {
        self.last_failure = None;
        if t < -POLYNOMIAL_EPSILON {
            return self.fail(CheckReturn::NegativeDuration, t, t);
        }

        if let Some((xmin, xmax)) = limits.position {
            for c in critical_values(p, t, 0) {
                if c.value < xmin - POLYNOMIAL_EPSILON || c.value > xmax + POLYNOMIAL_EPSILON {
                    return self.fail(CheckReturn::PositionLimitsViolation, c.point, c.value);
                }
            }
        }

        let symmetric = [
            (1, limits.velocity, CheckReturn::VelocityLimitsViolation),
            (2, limits.acceleration, CheckReturn::AccelerationLimitsViolation),
            (3, limits.jerk, CheckReturn::JerkLimitsViolation),
        ];
        for (ideriv, bound, status) in symmetric {
            let Some(bound) = bound else {
                continue;
            };
            for c in critical_values(p, t, ideriv) {
                if c.value.abs() > bound + POLYNOMIAL_EPSILON {
                    return self.fail(status, c.point, c.value);
                }
            }
        }

        CheckReturn::Normal
    }

    /// Checks the boundary values of `p` on `[0, t]` and `t` itself against `expected`
    pub fn check_polynomial_values(
        &mut self,
        p: &Polynomial,
        t: f64,
        expected: &PolynomialExpectation,
    ) -> CheckReturn {
        self.last_failure = None;
        let (initial, terminal) = (expected.initial, expected.terminal);
        let categories = [
            (0, CheckReturn::PositionDiscrepancy, initial.position, terminal.position),
            (1, CheckReturn::VelocityDiscrepancy, initial.velocity, terminal.velocity),
            (2, CheckReturn::AccelerationDiscrepancy, initial.acceleration, terminal.acceleration),
        ];
        for (ideriv, status, initial, terminal) in categories {
            for (point, want) in [(0., initial), (t, terminal)] {
                let value = p.evaldn(point, ideriv);
                if (value - want).abs() > POLYNOMIAL_EPSILON {
                    return self.fail(status, point, value);
                }
            }
        }

        if (t - expected.duration).abs() > POLYNOMIAL_EPSILON {
            return self.fail(CheckReturn::DurationDiscrepancy, t, expected.duration);
        }
        CheckReturn::Normal
    }

    /// Runs [`check_polynomial`](Self::check_polynomial) and then
    /// [`check_polynomial_values`](Self::check_polynomial_values)
    pub fn check_polynomial_against(
        &mut self,
        p: &Polynomial,
        t: f64,
        limits: &DofLimits,
        expected: &PolynomialExpectation,
    ) -> CheckReturn {
        let ret = self.check_polynomial(p, t, limits);
        if !ret.is_normal() {
            return ret;
        }
        self.check_polynomial_values(p, t, expected)
    }

    /// Applies `check` to every dof of `chunk` and keeps the result of highest precedence
    fn check_each_dof<F>(&mut self, chunk: &Chunk, mut check: F) -> CheckReturn
    where
        F: FnMut(&mut PolynomialChecker, usize, &Polynomial) -> CheckReturn,
    {
        if chunk.dof() != self.ndof {
            panic!("Checker expects {} dofs but the chunk has {}", self.ndof, chunk.dof());
        }

        let mut worst: Option<CheckFailure> = None;
        for (idof, p) in chunk.polynomials().iter().enumerate() {
            let ret = check(self, idof, p);
            if ret.is_normal() {
                continue;
            }
            if worst.map_or(true, |w| ret.precedence() < w.status.precedence()) {
                let mut failure = self.last_failure.unwrap_or(CheckFailure {
                    status: ret,
                    point: 0.,
                    value: 0.,
                    dof: None,
                    chunk: None,
                });
                failure.dof = Some(idof);
                worst = Some(failure);
            }
        }

        self.last_failure = worst;
        match worst {
            Some(failure) => {
                debug!(
                    "Chunk check failed: {} on dof {:?} at t = {} (value {})",
                    failure.status, failure.dof, failure.point, failure.value
                );
                failure.status
            }
            None => CheckReturn::Normal,
        }
    }

    /// Checks every dof of `chunk` against `limits`
    ///
    /// # Panics
    ///
    /// Panics if the chunk or the limits do not have `ndof` dofs.
    pub fn check_chunk(&mut self, chunk: &Chunk, limits: &Limits) -> CheckReturn {
        if !limits.len_matches(self.ndof) {
            panic!("Limits do not cover {} dofs", self.ndof);
        }
        let duration = chunk.duration();
        self.check_each_dof(chunk, |checker, idof, p| {
            checker.check_polynomial(p, duration, &limits.for_dof(idof))
        })
    }

    /// Checks every dof of `chunk` against `limits` and then against the expected boundary
    /// values and duration
    pub fn check_chunk_against(
        &mut self,
        chunk: &Chunk,
        limits: &Limits,
        expected: &ChunkExpectation,
    ) -> CheckReturn {
        if !limits.len_matches(self.ndof) {
            panic!("Limits do not cover {} dofs", self.ndof);
        }
        if expected.initial.len() != self.ndof || expected.terminal.len() != self.ndof {
            panic!("Expected boundary values do not cover {} dofs", self.ndof);
        }
        let duration = chunk.duration();
        self.check_each_dof(chunk, |checker, idof, p| {
            let (dof_limits, dof_expected) = (limits.for_dof(idof), expected.for_dof(idof));
            checker.check_polynomial_against(p, duration, &dof_limits, &dof_expected)
        })
    }

    /// Runs [`check_chunk`](Self::check_chunk) and marks the chunk as checked when it passes
    pub fn certify_chunk(&mut self, chunk: &mut Chunk, limits: &Limits) -> CheckReturn {
        let ret = self.check_chunk(chunk, limits);
        chunk.set_constraint_checked(ret.is_normal());
        ret
    }

    /// Checks every chunk of `traj` against `limits`, then checks that position, velocity and
    /// acceleration are continuous at every internal chunk boundary.
    ///
    /// Every chunk is checked against `limits` regardless of its `constraint_checked` flag.
    pub fn check_piecewise_trajectory(
        &mut self,
        traj: &Trajectory,
        limits: &Limits,
    ) -> CheckReturn {
        self.last_failure = None;
        let chunks = traj.chunks();

        for (index, chunk) in chunks.iter().enumerate() {
            let ret = self.check_chunk(chunk, limits);
            if !ret.is_normal() {
                if let Some(failure) = self.last_failure.as_mut() {
                    failure.chunk = Some(index);
                }
                return ret;
            }
        }

        let categories = [
            CheckReturn::PositionDiscrepancy,
            CheckReturn::VelocityDiscrepancy,
            CheckReturn::AccelerationDiscrepancy,
        ];
        for index in 1..chunks.len() {
            let prev = &chunks[index - 1];
            let next = &chunks[index];
            let switch_time = traj.switch_times()[index];
            for (ideriv, status) in categories.into_iter().enumerate() {
                let outgoing = prev.evaldn(prev.duration(), ideriv);
                let incoming = next.evaldn(0., ideriv);
                for idof in 0..outgoing.len() {
                    if (outgoing[idof] - incoming[idof]).abs() > POLYNOMIAL_EPSILON {
                        let failure = CheckFailure {
                            status,
                            point: switch_time,
                            value: incoming[idof],
                            dof: Some(idof),
                            chunk: Some(index),
                        };
                        debug!(
                            "Trajectory is discontinuous at t = {}: {} on dof {} ({} -> {})",
                            switch_time, status, idof, outgoing[idof], incoming[idof]
                        );
                        self.last_failure = Some(failure);
                        return status;
                    }
                }
            }
        }

        CheckReturn::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::quintic_polynomial;
    use assert::close;

    fn velocity(vm: f64) -> DofLimits {
        DofLimits {
            velocity: Some(vm),
            ..Default::default()
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(0, CheckReturn::Normal.code());
        assert_eq!(1, CheckReturn::PositionLimitsViolation.code());
        assert_eq!(4, CheckReturn::JerkLimitsViolation.code());
        assert_eq!(5, CheckReturn::NegativeDuration.code());
        assert_eq!(9, CheckReturn::DurationDiscrepancy.code());
        assert_eq!("velocity discrepancy", CheckReturn::VelocityDiscrepancy.to_string());
    }

    #[test]
    fn precedence_order() {
        let order = [
            CheckReturn::NegativeDuration,
            CheckReturn::PositionLimitsViolation,
            CheckReturn::VelocityLimitsViolation,
            CheckReturn::AccelerationLimitsViolation,
            CheckReturn::JerkLimitsViolation,
            CheckReturn::PositionDiscrepancy,
            CheckReturn::VelocityDiscrepancy,
            CheckReturn::AccelerationDiscrepancy,
            CheckReturn::DurationDiscrepancy,
            CheckReturn::Normal,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].precedence() < pair[1].precedence());
        }
    }

    #[test]
    fn cubic_chunk_velocity_limit() {
        // x(t) = t^3 - 3t^2 + 2t on [0, 2], velocity 2 at both ends and -1 at t = 1
        let chunk = Chunk::new(2., vec![Polynomial::new(&[0., 2., -3., 1.])]);
        let mut checker = PolynomialChecker::new(1);

        let ret = checker.check_chunk(&chunk, &Limits::new().with_velocity(&[1.]));
        assert_eq!(CheckReturn::VelocityLimitsViolation, ret);
        let failure = checker.last_failure().unwrap();
        assert_eq!(Some(0), failure.dof);
        assert_eq!(0., failure.point);
        close(2., failure.value, 1e-12);

        let ret = checker.check_chunk(&chunk, &Limits::new().with_velocity(&[2.01]));
        assert_eq!(CheckReturn::Normal, ret);
        assert_eq!(None, checker.last_failure());
    }

    #[test]
    fn interior_velocity_extremum() {
        // x(t) = 2t^3 - 3t^2, velocity is 0 at both ends and -1.5 at t = 0.5
        let p = Polynomial::new(&[0., 0., -3., 2.]);
        let mut checker = PolynomialChecker::new(1);
        assert_eq!(
            CheckReturn::VelocityLimitsViolation,
            checker.check_polynomial(&p, 1., &velocity(1.))
        );
        let failure = checker.last_failure().unwrap();
        close(0.5, failure.point, 1e-9);
        close(-1.5, failure.value, 1e-9);

        assert_eq!(CheckReturn::Normal, checker.check_polynomial(&p, 1., &velocity(1.6)));
        // the extremum is outside a shorter range
        assert_eq!(CheckReturn::Normal, checker.check_polynomial(&p, 0.2, &velocity(1.)));
    }

    #[test]
    fn position_extrema_inside_range_only() {
        // extrema of t^3 - 3t^2 + 2t are +/-0.3849 at 0.4226 and 1.5774
        let p = Polynomial::new(&[0., 2., -3., 1.]);
        let mut checker = PolynomialChecker::new(1);
        let tight = DofLimits {
            position: Some((-0.3, 0.3)),
            ..Default::default()
        };
        assert_eq!(CheckReturn::PositionLimitsViolation, checker.check_polynomial(&p, 2., &tight));
        let failure = checker.last_failure().unwrap();
        close(1. - (1f64 / 3.).sqrt(), failure.point, 1e-9);
        close(2. / (3. * 3f64.sqrt()), failure.value, 1e-9);

        let loose = DofLimits {
            position: Some((-0.4, 0.4)),
            ..Default::default()
        };
        assert_eq!(CheckReturn::Normal, checker.check_polynomial(&p, 2., &loose));

        // p(0.3) = 0.357 and the first extremum lies beyond 0.3
        let short = DofLimits {
            position: Some((-0.36, 0.36)),
            ..Default::default()
        };
        assert_eq!(CheckReturn::Normal, checker.check_polynomial(&p, 0.3, &short));
    }

    #[test]
    fn acceleration_and_jerk_limits() {
        // p(t) = t^4 - 2t^3: acceleration 12t^2 - 12t reaches -3 at t = 0.5, jerk 24t - 12
        let p = Polynomial::new(&[0., 0., 0., -2., 1.]);
        let mut checker = PolynomialChecker::new(1);

        let limits = DofLimits {
            acceleration: Some(2.),
            ..Default::default()
        };
        assert_eq!(
            CheckReturn::AccelerationLimitsViolation,
            checker.check_polynomial(&p, 1., &limits)
        );
        let failure = checker.last_failure().unwrap();
        close(0.5, failure.point, 1e-9);
        close(-3., failure.value, 1e-9);

        let limits = DofLimits {
            acceleration: Some(3.5),
            jerk: Some(11.),
            ..Default::default()
        };
        assert_eq!(CheckReturn::JerkLimitsViolation, checker.check_polynomial(&p, 1., &limits));
        close(-12., checker.last_failure().unwrap().value, 1e-12);

        let limits = DofLimits {
            acceleration: Some(3.5),
            jerk: Some(12.),
            ..Default::default()
        };
        assert_eq!(CheckReturn::Normal, checker.check_polynomial(&p, 1., &limits));
    }

    #[test]
    fn position_precedes_velocity() {
        let p = Polynomial::new(&[0., 5.]);
        let mut checker = PolynomialChecker::new(1);
        let limits = DofLimits {
            position: Some((-1., 1.)),
            velocity: Some(1.),
            ..Default::default()
        };
        assert_eq!(CheckReturn::PositionLimitsViolation, checker.check_polynomial(&p, 1., &limits));
    }

    #[test]
    fn unchecked_without_limits() {
        let p = Polynomial::new(&[100., -50., 30., 20.]);
        let mut checker = PolynomialChecker::new(1);
        assert_eq!(CheckReturn::Normal, checker.check_polynomial(&p, 3., &DofLimits::default()));
    }

    #[test]
    fn negative_duration() {
        let p = Polynomial::new(&[0., 1.]);
        let mut checker = PolynomialChecker::new(1);
        assert_eq!(
            CheckReturn::NegativeDuration,
            checker.check_polynomial(&p, -0.5, &velocity(10.))
        );
    }

    #[test]
    fn terminal_values() {
        let start = State::new(0., 0., 0.);
        let end = State::new(1., 0.5, 0.);
        let p = quintic_polynomial(&start, &end, 2.);
        let mut checker = PolynomialChecker::new(1);
        let limits = DofLimits::default();

        let expected = PolynomialExpectation {
            duration: 2.,
            initial: start,
            terminal: end,
        };
        assert_eq!(
            CheckReturn::Normal,
            checker.check_polynomial_against(&p, 2., &limits, &expected)
        );

        let off = PolynomialExpectation {
            terminal: State::new(1.01, 0.5, 0.),
            ..expected
        };
        assert_eq!(
            CheckReturn::PositionDiscrepancy,
            checker.check_polynomial_against(&p, 2., &limits, &off)
        );
        assert_eq!(2., checker.last_failure().unwrap().point);

        let off = PolynomialExpectation {
            initial: State::new(0., 0.2, 0.),
            ..expected
        };
        assert_eq!(CheckReturn::VelocityDiscrepancy, checker.check_polynomial_values(&p, 2., &off));

        let off = PolynomialExpectation {
            terminal: State::new(1., 0.5, -1.),
            ..expected
        };
        assert_eq!(
            CheckReturn::AccelerationDiscrepancy,
            checker.check_polynomial_values(&p, 2., &off)
        );

        let off = PolynomialExpectation {
            duration: 2.5,
            ..expected
        };
        assert_eq!(CheckReturn::DurationDiscrepancy, checker.check_polynomial_values(&p, 2., &off));

        // limits come before discrepancies
        let strict = velocity(0.1);
        assert_eq!(
            CheckReturn::VelocityLimitsViolation,
            checker.check_polynomial_against(&p, 2., &strict, &off)
        );
    }

    #[test]
    fn chunk_reports_highest_precedence_across_dofs() {
        // dof 0 only breaks the acceleration limit, dof 1 breaks the velocity limit
        let chunk = Chunk::new(
            1.,
            vec![Polynomial::new(&[0., 0., 2.]), Polynomial::new(&[0., 3.])],
        );
        let mut checker = PolynomialChecker::new(2);
        let limits = Limits::new().with_velocity(&[5., 2.]).with_acceleration(&[1., 1.]);
        assert_eq!(CheckReturn::VelocityLimitsViolation, checker.check_chunk(&chunk, &limits));
        assert_eq!(Some(1), checker.last_failure().unwrap().dof);

        let limits = Limits::new().with_velocity(&[5., 5.]).with_acceleration(&[1., 1.]);
        assert_eq!(CheckReturn::AccelerationLimitsViolation, checker.check_chunk(&chunk, &limits));
        assert_eq!(Some(0), checker.last_failure().unwrap().dof);
    }

    #[test]
    fn chunk_against_expectation() {
        let start = vec![State::new(0., 0., 0.), State::new(1., 0., 0.)];
        let end = vec![State::new(1., 0., 0.), State::new(0., 0., 0.)];
        let chunk = Chunk::from_quintic_boundary(&start, &end, 1.);
        let mut checker = PolynomialChecker::new(2);
        let limits = Limits::new().with_velocity(&[2., 2.]);

        let mut expected = ChunkExpectation {
            duration: 1.,
            initial: start.clone(),
            terminal: end.clone(),
        };
        assert_eq!(CheckReturn::Normal, checker.check_chunk_against(&chunk, &limits, &expected));

        expected.terminal[1] = State::new(0.5, 0., 0.);
        assert_eq!(
            CheckReturn::PositionDiscrepancy,
            checker.check_chunk_against(&chunk, &limits, &expected)
        );
        assert_eq!(Some(1), checker.last_failure().unwrap().dof);

        expected.terminal = end;
        expected.duration = 2.;
        assert_eq!(
            CheckReturn::DurationDiscrepancy,
            checker.check_chunk_against(&chunk, &limits, &expected)
        );
    }

    #[test]
    #[should_panic]
    fn chunk_dof_mismatch() {
        let chunk = Chunk::constant(&[0., 0.], 1., 3);
        PolynomialChecker::new(3).check_chunk(&chunk, &Limits::new());
    }

    #[test]
    fn mismatched_splice_is_a_discrepancy() {
        // x = 1 + t ends at 2, the next chunk starts at 2.1
        let first = Chunk::new(1., vec![Polynomial::new(&[1., 1.])]);
        let second = Chunk::new(1., vec![Polynomial::new(&[2.1, 1.])]);
        let limits = Limits::new().with_position(&[0.], &[5.]).with_velocity(&[5.]);
        let mut checker = PolynomialChecker::new(1);

        assert_eq!(CheckReturn::Normal, checker.check_chunk(&first, &limits));
        assert_eq!(CheckReturn::Normal, checker.check_chunk(&second, &limits));

        let traj = Trajectory::new(vec![first, second]);
        assert_eq!(
            CheckReturn::PositionDiscrepancy,
            checker.check_piecewise_trajectory(&traj, &limits)
        );
        let failure = checker.last_failure().unwrap();
        assert_eq!(Some(1), failure.chunk);
        assert_eq!(Some(0), failure.dof);
        assert_eq!(1., failure.point);
        close(2.1, failure.value, 1e-12);
    }

    #[test]
    fn velocity_jump_is_a_discrepancy() {
        let first = Chunk::new(1., vec![Polynomial::new(&[0., 1.])]);
        let second = Chunk::new(1., vec![Polynomial::new(&[1., 2.])]);
        let traj = Trajectory::new(vec![first, second]);
        let mut checker = PolynomialChecker::new(1);
        assert_eq!(
            CheckReturn::VelocityDiscrepancy,
            checker.check_piecewise_trajectory(&traj, &Limits::new())
        );
    }

    #[test]
    fn continuous_trajectory_passes() {
        let states = [State::new(0., 0., 0.), State::new(1., 0.8, 0.), State::new(2., 0., 0.)];
        let chunks = vec![
            Chunk::from_quintic_boundary(&states[0..1], &states[1..2], 1.5),
            Chunk::from_quintic_boundary(&states[1..2], &states[2..3], 1.5),
        ];
        let traj = Trajectory::new(chunks);
        let mut checker = PolynomialChecker::new(1);
        let limits = Limits::new().with_position(&[-0.5], &[2.5]).with_velocity(&[3.]);
        assert_eq!(CheckReturn::Normal, checker.check_piecewise_trajectory(&traj, &limits));

        // a limit violation inside a chunk is reported with its chunk index
        let limits = Limits::new().with_velocity(&[0.5]);
        assert_eq!(
            CheckReturn::VelocityLimitsViolation,
            checker.check_piecewise_trajectory(&traj, &limits)
        );
        assert_eq!(Some(0), checker.last_failure().unwrap().chunk);
    }

    #[test]
    fn certified_chunks_are_checked_against_new_limits() {
        let mut chunk = Chunk::new(1., vec![Polynomial::new(&[0., 3.])]);
        let mut checker = PolynomialChecker::new(1);

        assert_eq!(
            CheckReturn::VelocityLimitsViolation,
            checker.certify_chunk(&mut chunk, &Limits::new().with_velocity(&[1.]))
        );
        assert!(!chunk.constraint_checked());

        let loose = Limits::new().with_velocity(&[4.]);
        assert_eq!(CheckReturn::Normal, checker.certify_chunk(&mut chunk, &loose));
        assert!(chunk.constraint_checked());

        // velocity 3 passes the limits it was certified with but not tighter ones
        let traj = Trajectory::new(vec![chunk.clone()]);
        assert_eq!(CheckReturn::Normal, checker.check_piecewise_trajectory(&traj, &loose));
        let tight = Limits::new().with_velocity(&[1.]);
        assert_eq!(
            CheckReturn::VelocityLimitsViolation,
            checker.check_piecewise_trajectory(&traj, &tight)
        );
        assert_eq!(Some(0), checker.last_failure().unwrap().chunk);
        assert!(traj.chunks()[0].constraint_checked());

        // any modification drops the certification
        chunk.update_initial_values(&[0.5]);
        assert!(!chunk.constraint_checked());
    }
}
