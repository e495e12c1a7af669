use super::*;

/// Always returns the same fixed step, ignoring outer-state history entirely.
#[derive(Debug, Clone, Copy, derive_getters::Getters)]
pub struct InitialStatic<T: Real> {
    alpha: T,
}

impl<T: Real> InitialStatic<T> {
    pub fn new(alpha: T) -> Self {
        InitialStatic { alpha }
    }
}

impl<T: Real> InitialStep<T> for InitialStatic<T> {
    fn estimate<O>(&self, _state: &mut OuterState<T>, _oracle: &O, _phi0: T, _dphi0: T) -> InitialGuess<T>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        InitialGuess::new(self.alpha, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_ignores_outer_state() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> { (x.norm_squared(), 2.0 * x).into() };
        let mut state = OuterState::new(DVector::from(vec![0.0]), DVector::from(vec![1.0]));
        state.alpha = Some(42.0);
        let estimator = InitialStatic::new(0.75);
        let guess = estimator.estimate(&mut state, &f_and_g, 0.0, -1.0);
        assert_eq!(guess.alpha, 0.75);
    }
}
