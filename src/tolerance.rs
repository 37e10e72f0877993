//! Numeric tolerances shared by the root solver, the trajectory types and the checker.

/// Machine epsilon for `f64`.
pub const EPSILON: f64 = f64::EPSILON;

/// `sqrt(EPSILON)`, i.e. 2^-26.
pub const SQRT_EPSILON: f64 = 1.490_116_119_384_765_6e-8;

/// A root estimate has converged once its Durand-Kerner correction is smaller than this.
pub const ROOT_CONVERGENCE_TOLERANCE: f64 = 128.0 * EPSILON;

/// Root estimates closer than this are treated as one repeated root.
pub const ROOT_MULTIPLICITY_TOLERANCE: f64 = 8.0 * SQRT_EPSILON;

/// A root is real when the magnitude of its imaginary part is below this.
pub const ROOT_IMAGINARY_TOLERANCE: f64 = SQRT_EPSILON;

/// Upper bound on Durand-Kerner rounds.
pub const ROOT_MAX_ITERATIONS: usize = 110;

/// Slack used when comparing values against limits, boundary values against each other, and
/// times against a segment's range.
pub const POLYNOMIAL_EPSILON: f64 = 1e-10;
