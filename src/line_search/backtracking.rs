// Inexact line search described in chapter 9.2 of Boyd's convex optimization book,
// adapted to the shared `LineSearch<T>` contract: shrink the trial step by a constant
// factor until the Armijo sufficient-decrease condition holds.
use super::*;

#[derive(Debug, Clone, Copy, derive_getters::Getters)]
pub struct BackTracking<T: Real> {
    c1: T,  // Armijo sensitivity, recommended: [0.01, 0.3]
    tau: T, // contraction factor, recommended: [0.1, 0.8]
    alpha_init: T,
}

impl<T: Real> Default for BackTracking<T> {
    fn default() -> Self {
        BackTracking {
            c1: cst(1e-4),
            tau: cst(0.5),
            alpha_init: cst(1.0),
        }
    }
}

impl<T: Real> BackTracking<T> {
    pub fn new(c1: T, tau: T) -> Self {
        BackTracking { c1, tau, ..Default::default() }
    }

    pub fn with_alpha_init(mut self, alpha_init: T) -> Self {
        self.alpha_init = alpha_init;
        self
    }
}

impl<T: Real> SufficientDecreaseCondition<T> for BackTracking<T> {
    fn c1(&self) -> T {
        self.c1
    }
}

impl<T: Real> LineSearch<T> for BackTracking<T> {
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
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        if !phi0.is_finite() || !dphi0.is_finite() {
            return Err(LineSearchError::NonFiniteInitial { phi0, dphi0 });
        }
        if dphi0 >= T::zero() {
            return Err(LineSearchError::NonDescent { dphi0 });
        }

        let mut ray = Ray::new(x, s, x_new, oracle);
        let mut alpha = if alpha_init > T::zero() { alpha_init } else { self.alpha_init };

        if mayterminate {
            let phi_a = ray.value(alpha);
            if phi_a.is_finite() && self.sufficient_decrease(phi0, dphi0, alpha, phi_a) {
                return Ok(LineSearchStep::new(alpha, AcceptanceKind::ImmediateAccept));
            }
        }

        for _ in 0..50 {
            let phi_a = ray.value(alpha);

            if !phi_a.is_finite() {
                warn!(target: "backtracking", "phi({alpha:?}) not finite, shrinking by tau");
                alpha = alpha * self.tau;
                continue;
            }

            if self.sufficient_decrease(phi0, dphi0, alpha, phi_a) {
                return Ok(LineSearchStep::new(alpha, AcceptanceKind::Wolfe));
            }

            alpha = alpha * self.tau;
        }

        warn!(target: "backtracking", "max iterations reached, returning alpha = {alpha:?}");
        Err(LineSearchError::MaxIterations { max_iter: 50, alpha })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backtracking_descends_on_quadratic() {
        let gamma = 90.0_f64;
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> {
            let f = 0.5 * (x[0].powi(2) + gamma * x[1].powi(2));
            let g = DVector::from(vec![x[0], gamma * x[1]]);
            (f, g).into()
        };
        let backtracking = BackTracking::new(1e-4, 0.5);
        let mut iterate = DVector::from(vec![180.0, 152.0]);
        let mut x_new = iterate.clone();
        let tol = 1e-10;

        for _ in 0..1000 {
            let eval = f_and_g(&iterate);
            if eval.g().dot(eval.g()) < tol {
                break;
            }
            let direction = -eval.g();
            let step = backtracking
                .search(&iterate, &direction, &mut x_new, &f_and_g, 1.0, *eval.f(), eval.g().dot(&direction), false)
                .unwrap();
            iterate += step.alpha * &direction;
        }
        assert!(iterate[0].abs() < 1e-5);
        assert!(iterate[1].abs() < 1e-5);
    }

    #[test]
    fn backtracking_rejects_non_descent_direction() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> { (x.norm_squared(), 2.0 * x).into() };
        let backtracking = BackTracking::default();
        let x = DVector::from(vec![1.0, 1.0]);
        let s = DVector::from(vec![1.0, 1.0]); // ascent direction
        let mut x_new = x.clone();
        let err = backtracking
            .search(&x, &s, &mut x_new, &f_and_g, 1.0, 2.0, 4.0, false)
            .unwrap_err();
        assert!(matches!(err, LineSearchError::NonDescent { .. }));
    }
}
