use super::*;

pub mod hagerzhang;
pub use hagerzhang::*;

pub mod static_is;
pub use static_is::*;

pub mod previous;
pub use previous::*;

pub mod quadratic;
pub use quadratic::*;

pub mod constant_change;
pub use constant_change::*;

/// The first trial `alpha` an estimator hands to a line search, plus whether
/// that guess is trustworthy enough to be checked for immediate acceptance
/// (see `LineSearch::search`'s `mayterminate` parameter).
#[derive(Debug, Clone, Copy)]
pub struct InitialGuess<T: Real> {
    pub alpha: T,
    pub mayterminate: bool,
}

impl<T: Real> InitialGuess<T> {
    pub fn new(alpha: T, mayterminate: bool) -> Self {
        InitialGuess { alpha, mayterminate }
    }
}

/// Produces the first trial step for an outer iteration from the current
/// `OuterState`. Implementors may probe the objective (`oracle`) and may
/// write into `state.x_new`, but must never mutate `state.x` or `state.s`.
pub trait InitialStep<T: Real> {
    fn estimate<O>(&self, state: &mut OuterState<T>, oracle: &O, phi0: T, dphi0: T) -> InitialGuess<T>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>;
}

fn inf_norm<T: Real>(v: &DVector<T>) -> T {
    v.iter().fold(T::zero(), |acc, x| num_traits::Float::max(acc, num_traits::Float::abs(*x)))
}
