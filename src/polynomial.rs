use std::cmp::Ordering;
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::error::{expect_end, next_token, PolyError, Result};
use crate::roots::polyroots;

/// A point on a function together with the function's value there
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Coordinate {
    pub point: f64,
    pub value: f64,
}

impl Coordinate {
    pub fn new(point: f64, value: f64) -> Coordinate {
        Coordinate { point, value }
    }
}

impl PartialOrd for Coordinate {
    /// Coordinates are ordered by `point` only.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.point.partial_cmp(&other.point)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate(point: {}, value: {})", self.point, self.value)
    }
}

/// A scalar polynomial p(t) = c0 + c1*t + ... + cn*t^n.
///
/// The coefficients of the first three derivatives and the local extrema of p are cached and
/// recomputed by every method that changes the coefficients, so reads never see stale values.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
    coeffs_d1: Vec<f64>,
    coeffs_d2: Vec<f64>,
    coeffs_d3: Vec<f64>,
    extrema: Vec<Coordinate>,
}

/// Coefficients of the derivative of a weakest-first coefficient vector
fn derivative_coeffs(coeffs: &[f64]) -> Vec<f64> {
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(idx, c)| c * idx as f64)
        .collect()
}

/// Horner evaluation of weakest-first coefficients; an empty vector is the zero function
fn horner(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0., |acc, c| acc * t + c)
}

impl Polynomial {
    /// Returns an initialized polynomial
    ///
    /// # Arguments
    ///
    /// `coeffs` - coefficients where index corresponds to power
    ///
    /// # Examples
    ///
    /// ```
    /// use pwpoly::Polynomial;
    /// // p(t) = 7 - 2t + 3t^2
    /// let poly = Polynomial::new(&[7., -2., 3.]);
    /// assert_eq!(2, poly.degree());
    /// ```
    pub fn new(coeffs: &[f64]) -> Polynomial {
        let mut poly = Polynomial {
            coeffs: Vec::new(),
            coeffs_d1: Vec::new(),
            coeffs_d2: Vec::new(),
            coeffs_d3: Vec::new(),
            extrema: Vec::new(),
        };
        poly.initialize(coeffs);
        poly
    }

    /// Returns a polynomial from coefficients ordered strongest term first
    pub fn from_strongest_first(coeffs: &[f64]) -> Polynomial {
        let reversed: Vec<f64> = coeffs.iter().rev().copied().collect();
        Polynomial::new(&reversed)
    }

    /// Replaces the coefficients and rebuilds every cache
    pub fn initialize(&mut self, coeffs: &[f64]) {
        if coeffs.is_empty() {
            panic!("Cannot initialize Polynomial with empty coefficients!");
        }
        self.coeffs = coeffs.to_vec();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.coeffs_d1 = derivative_coeffs(&self.coeffs);
        self.coeffs_d2 = derivative_coeffs(&self.coeffs_d1);
        self.coeffs_d3 = derivative_coeffs(&self.coeffs_d2);
        self.extrema = self.find_all_local_extrema(0);
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficients, weakest term first
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Local extrema of p on the whole real line, ascending by point
    pub fn get_extrema(&self) -> &[Coordinate] {
        &self.extrema
    }

    /// Appends zero coefficients so that the degree becomes `new_degree`. Does nothing if the
    /// polynomial already has that degree or higher.
    pub fn pad_coefficients(&mut self, new_degree: usize) {
        if new_degree <= self.degree() {
            return;
        }
        self.coeffs.resize(new_degree + 1, 0.);
        self.rebuild();
    }

    /// Replaces the constant term, shifting p without changing its shape.
    ///
    /// Extremum locations do not depend on the constant term, only their values are refreshed.
    pub fn update_initial_value(&mut self, c0: f64) {
        self.coeffs[0] = c0;
        // derivative caches do not see the constant term
        for idx in 0..self.extrema.len() {
            self.extrema[idx].value = horner(&self.coeffs, self.extrema[idx].point);
        }
    }

    /// Returns p(t)
    ///
    /// # Examples
    ///
    /// ```
    /// use pwpoly::Polynomial;
    /// // p(t) = 7 - 2t + 3t^2
    /// let poly = Polynomial::new(&[7., -2., 3.]);
    /// assert_eq!(8., poly.eval(1.));
    /// ```
    pub fn eval(&self, t: f64) -> f64 {
        horner(&self.coeffs, t)
    }

    /// Returns p'(t)
    pub fn evald1(&self, t: f64) -> f64 {
        horner(&self.coeffs_d1, t)
    }

    /// Returns p''(t)
    pub fn evald2(&self, t: f64) -> f64 {
        horner(&self.coeffs_d2, t)
    }

    /// Returns p'''(t)
    pub fn evald3(&self, t: f64) -> f64 {
        horner(&self.coeffs_d3, t)
    }

    /// Returns the `n`-th derivative of p at t, zero when `n` exceeds the degree
    pub fn evaldn(&self, t: f64, n: usize) -> f64 {
        match n {
            0 => self.eval(t),
            1 => self.evald1(t),
            2 => self.evald2(t),
            3 => self.evald3(t),
            _ if n > self.degree() => 0.,
            _ => {
                // coefficient of t^i in the n-th derivative is c[i+n] * (i+n)! / i!
                let dn: Vec<f64> = (0..=self.degree() - n)
                    .map(|i| {
                        let factor: f64 = ((i + 1)..=(i + n)).map(|k| k as f64).product();
                        self.coeffs[i + n] * factor
                    })
                    .collect();
                horner(&dn, t)
            }
        }
    }

    /// Returns the derivative of the polynomial
    ///
    /// # Examples
    ///
    /// ```
    /// use pwpoly::Polynomial;
    /// // p(t) = 7 - 2t + 3t^2
    /// let poly = Polynomial::new(&[7., -2., 3.]);
    /// // p'(t) = -2 + 6t
    /// let der = poly.differentiate();
    /// assert_eq!(&[-2., 6.], der.coeffs());
    /// ```
    pub fn differentiate(&self) -> Polynomial {
        // special case when we are down to a single coefficient
        if self.coeffs.len() == 1 {
            return Polynomial::new(&[0.]);
        }
        Polynomial::new(&self.coeffs_d1)
    }

    /// Returns the local extrema of the `ideriv`-th derivative of p, ascending by point.
    ///
    /// Each extremum is a real root of the `(ideriv + 1)`-th derivative paired with the value of
    /// the `ideriv`-th derivative there. Derivatives that are constant have none.
    pub fn find_all_local_extrema(&self, ideriv: usize) -> Vec<Coordinate> {
        if ideriv + 1 > self.degree() {
            return Vec::new();
        }

        let mut derivative = self.coeffs.clone();
        for _ in 0..=ideriv {
            derivative = derivative_coeffs(&derivative);
        }
        // drop vanishing leading terms, e.g. after padding
        while derivative.len() > 1 && derivative[derivative.len() - 1] == 0. {
            derivative.pop();
        }
        if derivative.len() <= 1 {
            return Vec::new();
        }

        let strongest_first: Vec<f64> = derivative.iter().rev().copied().collect();
        let mut coords: Vec<Coordinate> = polyroots(&strongest_first)
            .into_iter()
            .map(|point| Coordinate::new(point, self.evaldn(point, ideriv)))
            .collect();
        coords.sort_by(|a, b| a.point.total_cmp(&b.point));
        coords
    }

    /// Returns the Taylor expansion of p about `t`, i.e. q(s) = p(t + s).
    ///
    /// Coefficient k of q is the k-th derivative of p at t divided by k!.
    pub fn taylor_expand(&self, t: f64) -> Polynomial {
        let mut factorial = 1.;
        let coeffs: Vec<f64> = (0..=self.degree())
            .map(|k| {
                if k > 1 {
                    factorial *= k as f64;
                }
                self.evaldn(t, k) / factorial
            })
            .collect();
        Polynomial::new(&coeffs)
    }

    /// Returns the smallest `tdelta > 0` such that `p(tcur + tdelta) = p(tcur) + step`.
    ///
    /// `step` may be negative. Fails with [`PolyError::NoDiscretizedStep`] when p never reaches
    /// `p(tcur) + step` to the right of `tcur`.
    pub fn next_discretized_step(&self, step: f64, tcur: f64) -> Result<f64> {
        let mut shifted = self.taylor_expand(tcur).coeffs;
        shifted[0] = -step;
        while shifted.len() > 1 && shifted[shifted.len() - 1] == 0. {
            shifted.pop();
        }
        if shifted.len() == 1 {
            return Err(PolyError::NoDiscretizedStep { step, tcur });
        }

        let strongest_first: Vec<f64> = shifted.iter().rev().copied().collect();
        polyroots(&strongest_first)
            .into_iter()
            .filter(|root| *root > 0.)
            .min_by(|a, b| a.total_cmp(b))
            .ok_or(PolyError::NoDiscretizedStep { step, tcur })
    }

    /// Writes the degree followed by the coefficients, weakest term first
    pub fn serialize<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "{}", self.degree())?;
        for c in &self.coeffs {
            write!(out, " {}", c)?;
        }
        Ok(())
    }

    /// Reads a polynomial written by [`Polynomial::serialize`], rebuilding all caches
    pub fn deserialize<'a, I>(tokens: &mut I) -> Result<Polynomial>
    where
        I: Iterator<Item = &'a str>,
    {
        let degree: usize = next_token(tokens, "polynomial degree")?;
        // grown as tokens arrive, the degree is untrusted input
        let mut coeffs = Vec::new();
        for _ in 0..=degree {
            coeffs.push(next_token(tokens, "polynomial coefficient")?);
        }
        Ok(Polynomial::new(&coeffs))
    }
}

impl FromStr for Polynomial {
    type Err = PolyError;

    fn from_str(s: &str) -> Result<Polynomial> {
        let mut tokens = s.split_whitespace();
        let poly = Polynomial::deserialize(&mut tokens)?;
        expect_end(&mut tokens)?;
        Ok(poly)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut s = String::from("p(t) = ");
        for idx in 0..self.coeffs.len() {
            let coeff: String = match self.coeffs[idx]
                .partial_cmp(&0.0)
                .expect("Found a coefficient that is NaN!")
            {
                Ordering::Less => format!("- {}", -self.coeffs[idx]),
                Ordering::Greater => format!("+ {}", self.coeffs[idx]),
                Ordering::Equal => String::new(),
            };

            // zero terms are skipped
            if coeff.is_empty() {
                continue;
            }

            s.push_str(&coeff);

            if idx > 0 {
                let t = if idx > 1 { format!("t^{} ", idx) } else { String::from("t ") };
                s.push_str(&t);
            } else {
                s.push(' ');
            }
        }
        write!(f, "{}", s.trim())
    }
}
