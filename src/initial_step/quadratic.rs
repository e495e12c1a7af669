// Classical quadratic-interpolation initial guess (Nocedal & Wright,
// Numerical Optimization, 2nd ed., section 3.5): fit a parabola through the
// previous and current objective values along the ray and take its minimizer
// as the next trial step.
use super::*;

#[derive(Debug, Clone, Copy, derive_getters::Getters)]
pub struct InitialQuadratic<T: Real> {
    alpha0: T,
}

impl<T: Real> Default for InitialQuadratic<T> {
    fn default() -> Self {
        InitialQuadratic { alpha0: cst(1.0) }
    }
}

impl<T: Real> InitialStep<T> for InitialQuadratic<T> {
    fn estimate<O>(&self, state: &mut OuterState<T>, _oracle: &O, phi0: T, dphi0: T) -> InitialGuess<T>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        let alpha = match state.f_x_previous {
            Some(f_prev) if f_prev.is_finite() && dphi0 != T::zero() => {
                let raw = cst::<T>(2.0) * (phi0 - f_prev) / dphi0;
                if raw.is_finite() && raw > T::zero() {
                    num_traits::Float::min(raw, self.alpha0)
                } else {
                    self.alpha0
                }
            }
            _ => self.alpha0,
        };
        InitialGuess::new(alpha, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_without_previous_value() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> { (x.norm_squared(), 2.0 * x).into() };
        let mut state = OuterState::new(DVector::from(vec![0.0]), DVector::from(vec![1.0]));
        let estimator = InitialQuadratic::default();
        let guess = estimator.estimate(&mut state, &f_and_g, 4.0, -4.0);
        assert_eq!(guess.alpha, 1.0);
    }

    #[test]
    fn interpolates_with_previous_value() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> { (x.norm_squared(), 2.0 * x).into() };
        let mut state = OuterState::new(DVector::from(vec![2.0]), DVector::from(vec![-1.0]));
        state.f_x_previous = Some(10.0);
        let estimator = InitialQuadratic::default();
        let guess = estimator.estimate(&mut state, &f_and_g, 4.0, -4.0);
        assert!(guess.alpha > 0.0 && guess.alpha <= 1.0);
    }
}
