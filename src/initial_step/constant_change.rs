// Scales the previous outer step so that the *predicted* change in f
// (the linear model phi(0) + phi'(0)*alpha) matches a fixed target
// magnitude, rather than reusing alpha_prev verbatim.
use super::*;

#[derive(Debug, Clone, Copy, derive_getters::Getters)]
pub struct InitialConstantChange<T: Real> {
    target_delta: T,
    alpha0: T,
}

impl<T: Real> Default for InitialConstantChange<T> {
    fn default() -> Self {
        InitialConstantChange { target_delta: cst(1.0), alpha0: cst(1.0) }
    }
}

impl<T: Real> InitialConstantChange<T> {
    pub fn new(target_delta: T) -> Self {
        InitialConstantChange { target_delta, alpha0: cst(1.0) }
    }
}

impl<T: Real> InitialStep<T> for InitialConstantChange<T> {
    fn estimate<O>(&self, state: &mut OuterState<T>, _oracle: &O, _phi0: T, dphi0: T) -> InitialGuess<T>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        let alpha_prev = state.alpha.unwrap_or(self.alpha0);
        if dphi0 == T::zero() || !dphi0.is_finite() {
            return InitialGuess::new(alpha_prev, false);
        }
        let predicted_prev = num_traits::Float::abs(dphi0 * alpha_prev);
        let alpha = if predicted_prev > T::zero() { alpha_prev * self.target_delta / predicted_prev } else { alpha_prev };
        InitialGuess::new(alpha, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_step_to_hit_target_predicted_decrease() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> { (x.norm_squared(), 2.0 * x).into() };
        let mut state = OuterState::new(DVector::from(vec![0.0]), DVector::from(vec![1.0]));
        state.alpha = Some(2.0);
        let estimator = InitialConstantChange::new(0.5);
        let dphi0 = -1.0;
        let guess = estimator.estimate(&mut state, &f_and_g, 0.0, dphi0);
        assert!((dphi0 * guess.alpha).abs() - 0.5 < 1e-12);
    }
}
