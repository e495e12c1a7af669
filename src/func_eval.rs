use super::*;

/// Function evaluation structure for the outer, multivariate objective. Builder pattern.
#[derive(derive_getters::Getters, Debug, Clone)]
pub struct FuncEvalMultivariate<T: Real> {
    f: T,
    g: DVector<T>,
    hessian: Option<DMatrix<T>>,
}

impl<T: Real> FuncEvalMultivariate<T> {
    pub fn new(f: T, g: DVector<T>) -> Self {
        FuncEvalMultivariate { f, g, hessian: None }
    }
    pub fn with_hessian(mut self, hessian: DMatrix<T>) -> Self {
        self.hessian = Some(hessian);
        self
    }
}

impl<T: Real> From<(T, DVector<T>)> for FuncEvalMultivariate<T> {
    fn from(value: (T, DVector<T>)) -> Self {
        let (f, g) = value;
        FuncEvalMultivariate::new(f, g)
    }
}

/// Evaluation of the univariate restriction `phi(alpha) = f(x + alpha * s)` along a
/// fixed ray. `g` here is the *directional derivative* `<grad f(x + alpha * s), s>`,
/// i.e. `phi'(alpha)`, not the multivariate gradient.
#[derive(derive_getters::Getters, Debug, Clone, Copy)]
pub struct FuncEvalUnivariate<T: Real> {
    f: T,
    g: T,
}

impl<T: Real> FuncEvalUnivariate<T> {
    pub fn new(f: T, g: T) -> Self {
        FuncEvalUnivariate { f, g }
    }

    pub fn is_finite(&self) -> bool {
        self.f.is_finite() && self.g.is_finite()
    }
}

impl<T: Real> From<(T, T)> for FuncEvalUnivariate<T> {
    fn from(value: (T, T)) -> Self {
        let (f, g) = value;
        FuncEvalUnivariate::new(f, g)
    }
}

/// Restricts a multivariate objective to the ray `x + alpha * s`, writing the
/// trial point into a caller-owned scratch buffer rather than allocating one
/// per probe. A line search owns a `Ray` for the duration of a single call and
/// may probe it any number of times; `x` and `s` are never mutated.
///
/// `oracle` is a fused `(f, grad f)` evaluator, matching the calling
/// convention used throughout this crate's solvers: one call produces both
/// the value and the gradient, so `value_and_slope` costs exactly one
/// objective evaluation and `value`/`slope` alone also cost one (the unused
/// half of the pair is simply discarded).
pub struct Ray<'a, T: Real, O>
where
    O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
{
    x: &'a DVector<T>,
    s: &'a DVector<T>,
    x_new: &'a mut DVector<T>,
    oracle: &'a O,
}

impl<'a, T: Real, O> Ray<'a, T, O>
where
    O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
{
    pub fn new(x: &'a DVector<T>, s: &'a DVector<T>, x_new: &'a mut DVector<T>, oracle: &'a O) -> Self {
        Ray { x, s, x_new, oracle }
    }

    fn step(&mut self, alpha: T) -> FuncEvalMultivariate<T> {
        self.x_new.copy_from(self.x);
        self.x_new.axpy(alpha, self.s, T::one());
        (self.oracle)(self.x_new)
    }

    pub fn value(&mut self, alpha: T) -> T {
        *self.step(alpha).f()
    }

    pub fn slope(&mut self, alpha: T) -> T {
        let eval = self.step(alpha);
        eval.g().dot(self.s)
    }

    pub fn value_and_slope(&mut self, alpha: T) -> FuncEvalUnivariate<T> {
        let eval = self.step(alpha);
        let slope = eval.g().dot(self.s);
        FuncEvalUnivariate::new(*eval.f(), slope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_evaluates_quadratic_restriction() {
        let x = DVector::from_vec(vec![0.0, 0.0]);
        let s = DVector::from_vec(vec![1.0, 0.0]);
        let mut x_new = x.clone();
        let oracle = |p: &DVector<f64>| -> FuncEvalMultivariate<f64> {
            let f = (p[0] - 1.0).powi(2) + p[1].powi(2);
            let g = DVector::from_vec(vec![2.0 * (p[0] - 1.0), 2.0 * p[1]]);
            (f, g).into()
        };
        let mut ray = Ray::new(&x, &s, &mut x_new, &oracle);
        let phi0 = ray.value_and_slope(0.0);
        assert!((phi0.f() - 1.0).abs() < 1e-12);
        assert!((phi0.g() - (-2.0)).abs() < 1e-12);
        let phi1 = ray.value_and_slope(1.0);
        assert!(phi1.f().abs() < 1e-12);
        assert!(phi1.g().abs() < 1e-12);
    }

    #[test]
    fn ray_does_not_mutate_x_or_s() {
        let x = DVector::from_vec(vec![3.0, 4.0]);
        let s = DVector::from_vec(vec![1.0, 1.0]);
        let x_before = x.clone();
        let s_before = s.clone();
        let mut x_new = x.clone();
        let oracle = |p: &DVector<f64>| -> FuncEvalMultivariate<f64> { (p.norm_squared(), p.clone()).into() };
        let mut ray = Ray::new(&x, &s, &mut x_new, &oracle);
        ray.value_and_slope(2.0);
        assert_eq!(x, x_before);
        assert_eq!(s, s_before);
    }
}
