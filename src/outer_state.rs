use super::*;

/// Caller-owned state threaded between outer iterations. A line search never
/// constructs one of these; the outer optimizer owns it and passes the
/// relevant fields into `is()`/`ls()` each iteration. Kept here, rather than
/// folded into the line searches themselves, because `mayterminate` and
/// `alpha` cross the boundary between the initial-step estimator and the
/// line search and must not become hidden state on either side.
#[derive(Debug, Clone)]
pub struct OuterState<T: Real> {
    /// Current iterate.
    pub x: DVector<T>,
    /// Search direction; must satisfy `<grad f(x), s> < 0`.
    pub s: DVector<T>,
    /// Scratch buffer for line-search trial points. Same length as `x`.
    pub x_new: DVector<T>,
    /// Step chosen on the previous outer iteration. `None` before the first.
    pub alpha: Option<T>,
    /// Objective value one outer iteration back. `None` before the first.
    pub f_x_previous: Option<T>,
    /// Set by the initial-step estimator when its guess is a quadratic-fit
    /// minimum eligible for immediate Wolfe acceptance.
    pub mayterminate: bool,
}

impl<T: Real> OuterState<T> {
    pub fn new(x: DVector<T>, s: DVector<T>) -> Self {
        let x_new = x.clone();
        OuterState {
            x,
            s,
            x_new,
            alpha: None,
            f_x_previous: None,
            mayterminate: false,
        }
    }

    pub fn is_first_iteration(&self) -> bool {
        self.alpha.is_none()
    }
}
