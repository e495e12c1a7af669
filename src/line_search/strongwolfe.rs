// Classical Nocedal & Wright Algorithm 3.5/3.6 (bracket, then zoom) for the
// strong Wolfe conditions, adapted to this crate's `LineSearch<T>` contract.
use super::*;

#[derive(Debug, Clone, Copy, derive_getters::Getters)]
pub struct StrongWolfe<T: Real> {
    c1: T,
    c2: T,
    alpha_max: T,
    max_iter: usize,
    max_zoom_iter: usize,
}

impl<T: Real> Default for StrongWolfe<T> {
    fn default() -> Self {
        StrongWolfe {
            c1: cst(1e-4),
            c2: cst(0.9),
            alpha_max: cst(65536.0),
            max_iter: 25,
            max_zoom_iter: 25,
        }
    }
}

impl<T: Real> StrongWolfe<T> {
    pub fn with_alpha_max(mut self, alpha_max: T) -> Self {
        self.alpha_max = alpha_max;
        self
    }
}

impl<T: Real> SufficientDecreaseCondition<T> for StrongWolfe<T> {
    fn c1(&self) -> T {
        self.c1
    }
}
impl<T: Real> CurvatureCondition<T> for StrongWolfe<T> {
    fn c2(&self) -> T {
        self.c2
    }
}

impl<T: Real> StrongWolfe<T> {
    /// Bisects towards the point known to satisfy the sufficient-decrease
    /// bound, refining until the strong curvature condition holds too.
    #[allow(clippy::too_many_arguments)]
    fn zoom<O>(
        &self,
        ray: &mut Ray<T, O>,
        phi0: T,
        dphi0: T,
        mut alpha_lo: T,
        mut phi_lo: T,
        mut alpha_hi: T,
    ) -> Result<LineSearchStep<T>, LineSearchError<T>>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        for _ in 0..self.max_zoom_iter {
            let alpha = cst::<T>(0.5) * (alpha_lo + alpha_hi);
            let eval = ray.value_and_slope(alpha);

            if !eval.is_finite() || !self.sufficient_decrease(phi0, dphi0, alpha, *eval.f()) || *eval.f() >= phi_lo {
                alpha_hi = alpha;
                continue;
            }

            if self.strong_curvature(dphi0, *eval.g()) {
                return Ok(LineSearchStep::new(alpha, AcceptanceKind::Wolfe));
            }

            if *eval.g() * (alpha_hi - alpha_lo) >= T::zero() {
                alpha_hi = alpha_lo;
            }
            alpha_lo = alpha;
            phi_lo = *eval.f();
        }
        Err(LineSearchError::MaxIterations { max_iter: self.max_zoom_iter, alpha: alpha_lo })
    }
}

impl<T: Real> LineSearch<T> for StrongWolfe<T> {
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

        if mayterminate {
            let eval = ray.value_and_slope(alpha_init);
            if eval.is_finite() && self.strong_wolfe(phi0, dphi0, alpha_init, *eval.f(), *eval.g()) {
                return Ok(LineSearchStep::new(alpha_init, AcceptanceKind::ImmediateAccept));
            }
        }

        let mut alpha_prev = T::zero();
        let mut phi_prev = phi0;
        let mut alpha = if alpha_init > T::zero() { alpha_init } else { T::one() };

        for i in 0..self.max_iter {
            let eval = ray.value_and_slope(alpha);

            if !eval.is_finite() || (!self.sufficient_decrease(phi0, dphi0, alpha, *eval.f()) && i > 0) || (*eval.f() >= phi_prev && i > 0) {
                return self.zoom(&mut ray, phi0, dphi0, alpha_prev, phi_prev, alpha);
            }

            if self.strong_curvature(dphi0, *eval.g()) {
                return Ok(LineSearchStep::new(alpha, AcceptanceKind::Wolfe));
            }

            if *eval.g() >= T::zero() {
                return self.zoom(&mut ray, phi0, dphi0, alpha, *eval.f(), alpha_prev);
            }

            alpha_prev = alpha;
            phi_prev = *eval.f();
            alpha = num_traits::Float::min(cst::<T>(2.0) * alpha, self.alpha_max);
            if alpha == alpha_prev {
                return Ok(LineSearchStep::new(alpha, AcceptanceKind::BoundaryAccept));
            }
        }
        Err(LineSearchError::MaxIterations { max_iter: self.max_iter, alpha })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strongwolfe_converges_on_quadratic() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> {
            let f = (x[0] - 1.0).powi(2);
            let g = DVector::from(vec![2.0 * (x[0] - 1.0)]);
            (f, g).into()
        };
        let ls = StrongWolfe::default();
        let x = DVector::from(vec![0.0]);
        let s = DVector::from(vec![1.0]);
        let mut x_new = x.clone();
        let eval0 = f_and_g(&x);
        let dphi0 = eval0.g().dot(&s);
        let step = ls.search(&x, &s, &mut x_new, &f_and_g, 0.5, *eval0.f(), dphi0, false).unwrap();
        assert!((step.alpha - 1.0).abs() < 1e-6);
    }
}
