use super::*;

/// Reuses the previous outer step, clipped to `[alpha_min, alpha_max]`. Falls
/// back to `alpha0` on the first outer iteration, when no previous step
/// exists yet.
#[derive(Debug, Clone, Copy, derive_getters::Getters)]
pub struct InitialPrevious<T: Real> {
    alpha_min: T,
    alpha_max: T,
    alpha0: T,
}

impl<T: Real> Default for InitialPrevious<T> {
    fn default() -> Self {
        InitialPrevious { alpha_min: T::min_positive_value(), alpha_max: T::infinity(), alpha0: cst(1.0) }
    }
}

impl<T: Real> InitialPrevious<T> {
    pub fn with_bounds(mut self, alpha_min: T, alpha_max: T) -> Self {
        self.alpha_min = alpha_min;
        self.alpha_max = alpha_max;
        self
    }
}

impl<T: Real> InitialStep<T> for InitialPrevious<T> {
    fn estimate<O>(&self, state: &mut OuterState<T>, _oracle: &O, _phi0: T, _dphi0: T) -> InitialGuess<T>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        let alpha = state.alpha.unwrap_or(self.alpha0);
        let clipped = num_traits::Float::min(num_traits::Float::max(alpha, self.alpha_min), self.alpha_max);
        InitialGuess::new(clipped, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clips_previous_step_into_bounds() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> { (x.norm_squared(), 2.0 * x).into() };
        let mut state = OuterState::new(DVector::from(vec![0.0]), DVector::from(vec![1.0]));
        state.alpha = Some(100.0);
        let estimator = InitialPrevious::default().with_bounds(1e-8, 10.0);
        let guess = estimator.estimate(&mut state, &f_and_g, 0.0, -1.0);
        assert_eq!(guess.alpha, 10.0);
    }

    #[test]
    fn falls_back_to_alpha0_on_first_iteration() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> { (x.norm_squared(), 2.0 * x).into() };
        let mut state = OuterState::new(DVector::from(vec![0.0]), DVector::from(vec![1.0]));
        let estimator = InitialPrevious::default();
        let guess = estimator.estimate(&mut state, &f_and_g, 0.0, -1.0);
        assert_eq!(guess.alpha, 1.0);
    }
}
