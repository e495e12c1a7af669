// Companion initial-step estimator from Hager & Zhang, section 4 of the
// paper cited in `super::hagerzhang`. Produces a convex-quadratic-fit guess
// on every outer iteration after the first.
use super::*;

#[derive(Debug, Clone, Copy, derive_getters::Getters)]
pub struct InitialHagerZhang<T: Real> {
    psi0: T,
    psi1: T,
    psi2: T,
    psi3: T,
    alpha_max: T,
    alpha0: T,
}

impl<T: Real> Default for InitialHagerZhang<T> {
    fn default() -> Self {
        InitialHagerZhang {
            psi0: cst(0.01),
            psi1: cst(0.2),
            psi2: cst(2.0),
            psi3: cst(0.1),
            alpha_max: T::infinity(),
            alpha0: cst(1.0),
        }
    }
}

impl<T: Real> InitialHagerZhang<T> {
    pub fn with_alpha_max(mut self, alpha_max: T) -> Self {
        self.alpha_max = alpha_max;
        self
    }
}

impl<T: Real> InitialStep<T> for InitialHagerZhang<T> {
    fn estimate<O>(&self, state: &mut OuterState<T>, oracle: &O, phi0: T, dphi0: T) -> InitialGuess<T>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        if state.is_first_iteration() {
            // I0
            let eval = oracle(&state.x);
            let x_inf = inf_norm(&state.x);
            let g_inf = inf_norm(eval.g());
            let alpha = if x_inf != T::zero() && g_inf != T::zero() {
                self.psi0 * x_inf / g_inf
            } else if *eval.f() != T::zero() {
                self.psi0 * eval.f().abs() / eval.g().norm()
            } else {
                self.alpha0
            };
            return InitialGuess::new(alpha, false);
        }

        // I1-I2
        let alpha_prev = state.alpha.unwrap_or(self.alpha0);
        let iterfinitemax = iterfinitemax::<T>();
        let mut ray = Ray::new(&state.x, &state.s, &mut state.x_new, oracle);

        let mut test_alpha = num_traits::Float::min(self.psi1 * alpha_prev, self.alpha_max);
        let mut phi_test = ray.value(test_alpha);
        let mut tries = 0usize;
        while !phi_test.is_finite() && tries < iterfinitemax {
            test_alpha = test_alpha * self.psi3;
            phi_test = ray.value(test_alpha);
            tries += 1;
        }
        if !phi_test.is_finite() {
            return InitialGuess::new(T::zero(), true);
        }

        let a_coef = (phi_test - phi0 - dphi0 * test_alpha) / (test_alpha * test_alpha);
        if a_coef.is_finite() && a_coef > T::zero() && phi_test <= phi0 {
            let unclipped = -dphi0 / (cst::<T>(2.0) * a_coef);
            let alpha = num_traits::Float::min(unclipped, self.alpha_max);
            let mayterminate = unclipped < self.alpha_max;
            return InitialGuess::new(alpha, mayterminate);
        }

        let alpha = if phi_test > phi0 { test_alpha } else { num_traits::Float::min(self.psi2 * alpha_prev, self.alpha_max) };
        InitialGuess::new(alpha, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_iteration_uses_psi0_scaling() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> { (1.0, DVector::from(vec![0.5, 0.0])).into() };
        let mut state = OuterState::new(DVector::from(vec![0.0, 0.0]), DVector::from(vec![-1.0, 0.0]));
        let estimator = InitialHagerZhang::default();
        let guess = estimator.estimate(&mut state, &f_and_g, 1.0, -0.5);
        assert!((guess.alpha - 0.02).abs() < 1e-12, "alpha = {}", guess.alpha);
        assert!(!guess.mayterminate);
    }

    #[test]
    fn subsequent_iteration_fits_convex_quadratic() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> {
            let f = (x[0] - 1.0).powi(2);
            let g = DVector::from(vec![2.0 * (x[0] - 1.0)]);
            (f, g).into()
        };
        let mut state = OuterState::new(DVector::from(vec![0.0]), DVector::from(vec![1.0]));
        state.alpha = Some(1.0);
        let estimator = InitialHagerZhang::default();
        let phi0 = 1.0;
        let dphi0 = -2.0;
        let guess = estimator.estimate(&mut state, &f_and_g, phi0, dphi0);
        assert!(guess.alpha > 0.0 && guess.alpha.is_finite());
    }
}
