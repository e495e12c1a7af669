use super::*;

pub mod backtracking;
pub use backtracking::*;

pub mod hagerzhang;
pub use hagerzhang::*;

pub mod morethuente;
pub use morethuente::*;

pub mod strongwolfe;
pub use strongwolfe::*;

pub mod static_ls;
pub use static_ls::*;

/// Common contract every line search in this crate satisfies: given the ray
/// `x + alpha * s` (through the fused oracle closure), an initial trial
/// `alpha`, `phi(0)`, `phi'(0)`, and whether the caller's guess may
/// short-circuit acceptance, produce an accepted step or a diagnosed failure.
///
/// `Static` is the only implementor that never fails and never probes the
/// oracle at all; every other implementor treats a non-finite probe as a
/// signal to shrink `alpha` and try again rather than propagate `NaN`.
pub trait LineSearch<T: Real> {
    fn search<O>(
        &self,
        x: &DVector<T>,
        s: &DVector<T>,
        x_new: &mut DVector<T>,
        oracle: &O,
        alpha_init: T,
        phi0: T,
        dphi0: T,
        mayterminate: bool,
    ) -> Result<LineSearchStep<T>, LineSearchError<T>>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>;
}

/// Sufficient-decrease (Armijo) half of the Wolfe conditions:
/// `phi(alpha) <= phi(0) + c1 * alpha * phi'(0)`.
pub trait SufficientDecreaseCondition<T: Real> {
    fn c1(&self) -> T;

    fn sufficient_decrease(&self, phi0: T, dphi0: T, alpha: T, phi_alpha: T) -> bool {
        phi_alpha <= phi0 + self.c1() * alpha * dphi0
    }
}

/// Curvature half of the (strong) Wolfe conditions.
pub trait CurvatureCondition<T: Real> {
    fn c2(&self) -> T;

    fn curvature(&self, dphi0: T, dphi_alpha: T) -> bool {
        dphi_alpha >= self.c2() * dphi0
    }

    fn strong_curvature(&self, dphi0: T, dphi_alpha: T) -> bool {
        num_traits::Float::abs(dphi_alpha) <= -self.c2() * dphi0
    }
}

/// Checks both Wolfe conditions (sufficient decrease + curvature) for types
/// that already know their `c1`/`c2`.
pub trait WolfeConditions<T: Real>: SufficientDecreaseCondition<T> + CurvatureCondition<T> {
    fn wolfe(&self, phi0: T, dphi0: T, alpha: T, phi_alpha: T, dphi_alpha: T) -> bool {
        self.sufficient_decrease(phi0, dphi0, alpha, phi_alpha) && self.curvature(dphi0, dphi_alpha)
    }

    fn strong_wolfe(&self, phi0: T, dphi0: T, alpha: T, phi_alpha: T, dphi_alpha: T) -> bool {
        self.sufficient_decrease(phi0, dphi0, alpha, phi_alpha) && self.strong_curvature(dphi0, dphi_alpha)
    }
}

impl<T: Real, L: SufficientDecreaseCondition<T> + CurvatureCondition<T>> WolfeConditions<T> for L {}
