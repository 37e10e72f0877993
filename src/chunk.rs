use std::fmt;
use std::str::FromStr;

use crate::boundary::{quintic_polynomial, State};
use crate::error::{expect_end, next_token, PolyError, Result};
use crate::polynomial::Polynomial;
use crate::tolerance::POLYNOMIAL_EPSILON;

/// A vertical stack of polynomials, one per dof, all defined on `[0, duration]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    degree: usize,
    duration: f64,
    polynomials: Vec<Polynomial>,
    constraint_checked: bool,
}

impl Chunk {
    /// Returns a chunk of the given duration. Polynomials of lower degree are padded so that
    /// every dof shares the highest degree.
    ///
    /// # Examples
    ///
    /// ```
    /// use pwpoly::{Chunk, Polynomial};
    /// let polys = vec![Polynomial::new(&[0., 1.]), Polynomial::new(&[1., 0., 1.])];
    /// let chunk = Chunk::new(2., polys);
    /// assert_eq!(2, chunk.dof());
    /// assert_eq!(2, chunk.degree());
    /// assert_eq!(vec![2., 5.], chunk.eval(2.));
    /// ```
    pub fn new(duration: f64, polynomials: Vec<Polynomial>) -> Chunk {
        let mut chunk = Chunk {
            degree: 0,
            duration: 0.,
            polynomials: Vec::new(),
            constraint_checked: false,
        };
        chunk.initialize(duration, polynomials);
        chunk
    }

    /// Replaces the duration and polynomials of this chunk
    pub fn initialize(&mut self, duration: f64, polynomials: Vec<Polynomial>) {
        if duration < 0. {
            panic!("Chunk duration must not be negative, got {}", duration);
        }
        self.duration = duration;
        self.polynomials = polynomials;
        self.degree = self.polynomials.iter().map(|p| p.degree()).max().unwrap_or(0);
        let degree = self.degree;
        for p in self.polynomials.iter_mut() {
            p.pad_coefficients(degree);
        }
        self.constraint_checked = false;
    }

    /// Returns a chunk holding every dof still at `values` for `duration`
    pub fn constant(values: &[f64], duration: f64, degree: usize) -> Chunk {
        let mut chunk = Chunk::new(0., Vec::new());
        chunk.set_constant(values, duration, degree);
        chunk
    }

    /// Turns this chunk into an immobile segment of the given degree
    pub fn set_constant(&mut self, values: &[f64], duration: f64, degree: usize) {
        let polynomials = values
            .iter()
            .map(|x0| {
                let mut coeffs = vec![0.; degree + 1];
                coeffs[0] = *x0;
                Polynomial::new(&coeffs)
            })
            .collect();
        self.initialize(duration, polynomials);
    }

    /// Returns the quintic chunk taking each dof from `start[i]` to `end[i]` in `duration`
    ///
    /// # Panics
    ///
    /// Panics if `start` and `end` differ in length or if `duration` is not positive.
    pub fn from_quintic_boundary(start: &[State], end: &[State], duration: f64) -> Chunk {
        if start.len() != end.len() {
            panic!("Got {} initial states but {} final states", start.len(), end.len());
        }
        let polynomials = start
            .iter()
            .zip(end)
            .map(|(s, e)| quintic_polynomial(s, e, duration))
            .collect();
        Chunk::new(duration, polynomials)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn dof(&self) -> usize {
        self.polynomials.len()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn polynomials(&self) -> &[Polynomial] {
        &self.polynomials
    }

    pub fn polynomial(&self, idof: usize) -> &Polynomial {
        &self.polynomials[idof]
    }

    /// Whether the checker has certified this chunk since its last modification
    pub fn constraint_checked(&self) -> bool {
        self.constraint_checked
    }

    pub fn set_constraint_checked(&mut self, checked: bool) {
        self.constraint_checked = checked;
    }

    /// Raises every polynomial to `degree`
    pub fn pad_degree(&mut self, degree: usize) {
        if degree <= self.degree {
            return;
        }
        for p in self.polynomials.iter_mut() {
            p.pad_coefficients(degree);
        }
        self.degree = degree;
        self.constraint_checked = false;
    }

    /// Re-anchors every dof so that it starts exactly at `values`, keeping its shape
    pub fn update_initial_values(&mut self, values: &[f64]) {
        if values.len() != self.dof() {
            panic!("Got {} initial values for a chunk with {} dofs", values.len(), self.dof());
        }
        for (p, x0) in self.polynomials.iter_mut().zip(values) {
            p.update_initial_value(*x0);
        }
        self.constraint_checked = false;
    }

    /// Cuts this chunk at local time `t`. This chunk keeps `[0, t]` and the returned chunk holds
    /// `[t, duration]` re-based to start at 0.
    ///
    /// # Panics
    ///
    /// Panics if `t` lies outside `[0, duration]` by more than the polynomial tolerance.
    pub fn cut(&mut self, t: f64) -> Chunk {
        if t < -POLYNOMIAL_EPSILON || t > self.duration + POLYNOMIAL_EPSILON {
            panic!("Cannot cut a chunk of duration {} at t = {}", self.duration, t);
        }
        let t = t.clamp(0., self.duration);

        let remainder: Vec<Polynomial> =
            self.polynomials.iter().map(|p| p.taylor_expand(t)).collect();
        let rem = Chunk::new(self.duration - t, remainder);

        self.duration = t;
        self.constraint_checked = false;
        rem
    }

    /// Evaluates the `n`-th derivative of every dof at `t`
    pub fn evaldn(&self, t: f64, n: usize) -> Vec<f64> {
        self.polynomials.iter().map(|p| p.evaldn(t, n)).collect()
    }

    pub fn eval(&self, t: f64) -> Vec<f64> {
        self.polynomials.iter().map(|p| p.eval(t)).collect()
    }

    pub fn evald1(&self, t: f64) -> Vec<f64> {
        self.polynomials.iter().map(|p| p.evald1(t)).collect()
    }

    pub fn evald2(&self, t: f64) -> Vec<f64> {
        self.polynomials.iter().map(|p| p.evald2(t)).collect()
    }

    pub fn evald3(&self, t: f64) -> Vec<f64> {
        self.polynomials.iter().map(|p| p.evald3(t)).collect()
    }

    /// Writes the duration, the dof count and then each polynomial
    pub fn serialize<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "{} {}", self.duration, self.dof())?;
        for p in &self.polynomials {
            write!(out, " ")?;
            p.serialize(out)?;
        }
        Ok(())
    }

    pub fn deserialize<'a, I>(tokens: &mut I) -> Result<Chunk>
    where
        I: Iterator<Item = &'a str>,
    {
        let duration: f64 = next_token(tokens, "chunk duration")?;
        if !(duration >= 0.) {
            return Err(PolyError::InvalidToken {
                what: "chunk duration",
                token: duration.to_string(),
            });
        }
        let dof: usize = next_token(tokens, "chunk dof")?;
        let mut polynomials = Vec::new();
        for _ in 0..dof {
            polynomials.push(Polynomial::deserialize(tokens)?);
        }
        Ok(Chunk::new(duration, polynomials))
    }
}

impl FromStr for Chunk {
    type Err = PolyError;

    fn from_str(s: &str) -> Result<Chunk> {
        let mut tokens = s.split_whitespace();
        let chunk = Chunk::deserialize(&mut tokens)?;
        expect_end(&mut tokens)?;
        Ok(chunk)
    }
}
