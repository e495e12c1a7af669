use super::*;

/// Returns the supplied step unchanged, without ever probing the oracle.
/// Useful for fixed-step gradient descent or when the outer optimizer has
/// already computed a trustworthy step (e.g. a quasi-Newton unit step).
#[derive(Debug, Default, Clone, Copy)]
pub struct Static;

impl<T: Real> LineSearch<T> for Static {
    fn search<O>(
        &self,
        _x: &DVector<T>,
        _s: &DVector<T>,
        _x_new: &mut DVector<T>,
        _oracle: &O,
        alpha_init: T,
        _phi0: T,
        _dphi0: T,
        _mayterminate: bool,
    ) -> Result<LineSearchStep<T>, LineSearchError<T>>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        Ok(LineSearchStep::new(alpha_init, AcceptanceKind::ImmediateAccept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_returns_input_unchanged() {
        let ls = Static;
        let x = DVector::from_vec(vec![0.0, 0.0]);
        let s = DVector::from_vec(vec![1.0, 0.0]);
        let mut x_new = x.clone();
        let oracle = |p: &DVector<f64>| -> FuncEvalMultivariate<f64> { (p.norm_squared(), p.clone()).into() };
        let step = ls.search(&x, &s, &mut x_new, &oracle, 0.37, 0.0, -1.0, false).unwrap();
        assert_eq!(step.alpha, 0.37);
    }
}
