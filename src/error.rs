use super::*;

/// Which acceptance rule a line search actually fired on. `BoundaryAccept` is
/// surfaced distinctly rather than folded into a generic success: when the
/// step ceiling is hit with a still-negative slope, nothing was verified
/// against the Wolfe conditions, and the outer optimizer may want to treat
/// that differently from a genuine convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptanceKind {
    /// Sufficient decrease and curvature both held exactly.
    Wolfe,
    /// The roundoff-robust substitute for sufficient decrease held.
    ApproximateWolfe,
    /// The caller-supplied initial guess (`mayterminate = true`) satisfied
    /// the acceptance test before any bracketing took place.
    ImmediateAccept,
    /// `alpha == alpha_max` with `phi'(alpha) < 0`: the feasible region ended
    /// before a Wolfe point was found.
    BoundaryAccept,
    /// Secant refinement stalled on a provably flat region of `phi`.
    Flat,
}

/// A successful line search outcome: the accepted step together with the
/// rule that accepted it.
#[derive(Debug, Clone, Copy)]
pub struct LineSearchStep<T: Real> {
    pub alpha: T,
    pub outcome: AcceptanceKind,
}

impl<T: Real> LineSearchStep<T> {
    pub fn new(alpha: T, outcome: AcceptanceKind) -> Self {
        LineSearchStep { alpha, outcome }
    }
}

/// Failure taxonomy for a line search call. Every variant is fatal to that
/// one call; the outer optimizer decides whether to restart, perturb the
/// direction, or abort. `MaxIterations` and `NonFiniteExhausted` still carry
/// the best step found so the caller can choose to take it anyway.
#[derive(thiserror::Error, Debug, Clone, Copy)]
pub enum LineSearchError<T: Real> {
    #[error("search direction is not a descent direction: phi'(0) = {dphi0:?} (must be < 0)")]
    NonDescent { dphi0: T },

    #[error("bracket lost its descent invariant: phi'(a) = {slope_a:?}, phi'(b) = {slope_b:?}")]
    BracketNonDescent { slope_a: T, slope_b: T },

    #[error("phi(0) = {phi0:?} or phi'(0) = {dphi0:?} is not finite")]
    NonFiniteInitial { phi0: T, dphi0: T },

    #[error("objective stayed non-finite after {attempts} shrinkage steps; returning alpha = {alpha:?}")]
    NonFiniteExhausted { attempts: usize, alpha: T },

    #[error("line search did not converge in {max_iter} iterations; returning alpha = {alpha:?}")]
    MaxIterations { max_iter: usize, alpha: T },
}

impl<T: Real> LineSearchError<T> {
    /// The best step the search had in hand when it failed, for callers that
    /// prefer to take a suboptimal step over aborting the outer iteration.
    pub fn tentative_alpha(&self) -> T {
        match *self {
            LineSearchError::NonDescent { .. } | LineSearchError::BracketNonDescent { .. } => T::zero(),
            LineSearchError::NonFiniteInitial { .. } => T::zero(),
            LineSearchError::NonFiniteExhausted { alpha, .. } => alpha,
            LineSearchError::MaxIterations { alpha, .. } => alpha,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy)]
pub enum ConfigError<T: Real> {
    #[error("delta must lie in (0, 1), got {0:?}")]
    InvalidDelta(T),
    #[error("sigma must lie in [delta, 1), got delta={delta:?}, sigma={sigma:?}")]
    InvalidSigma { delta: T, sigma: T },
    #[error("rho must be > 1, got {0:?}")]
    InvalidRho(T),
    #[error("gamma must lie in (0, 1), got {0:?}")]
    InvalidGamma(T),
    #[error("epsilon must be >= 0, got {0:?}")]
    InvalidEpsilon(T),
    #[error("alpha_max must be > 0, got {0:?}")]
    InvalidAlphaMax(T),
}
