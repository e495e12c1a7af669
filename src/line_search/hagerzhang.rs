// Hager-Zhang line search.
//
// William W. Hager and Hongchao Zhang, "A new conjugate gradient method with
// guaranteed descent and an efficient line search", SIAM J. Optim. 16(1),
// 2006, 170-192. DOI: 10.1137/030601880.
//
// Bracket-and-refine procedure over a growing history of (alpha, phi, phi')
// probes, alternating double-secant steps with bisection, accepting either
// the classical or the approximate Wolfe conditions.
use super::*;

#[derive(Debug, Clone, Copy)]
struct Probe<T: Real> {
    alpha: T,
    value: T,
    slope: T,
}

/// Every `(alpha, phi(alpha), phi'(alpha))` probed during one call, plus the
/// two active bracket indices. Scoped to a single `HagerZhang::search` call
/// and discarded on return; capacity is bounded by `linesearch_max +
/// iterfinitemax + 5` so a call never grows unboundedly (see the resource
/// model in the crate docs).
struct BracketHistory<T: Real> {
    probes: Vec<Probe<T>>,
    ia: usize,
    ib: usize,
}

impl<T: Real> BracketHistory<T> {
    fn new(capacity: usize, phi0: T, dphi0: T) -> Self {
        let mut probes = Vec::with_capacity(capacity);
        probes.push(Probe { alpha: T::zero(), value: phi0, slope: dphi0 });
        BracketHistory { probes, ia: 0, ib: 0 }
    }

    fn push(&mut self, alpha: T, value: T, slope: T) -> usize {
        self.probes.push(Probe { alpha, value, slope });
        self.probes.len() - 1
    }

    fn get(&self, i: usize) -> Probe<T> {
        self.probes[i]
    }
}

enum BracketOutcome<T: Real> {
    Bracketed(usize, usize),
    Accept(T, AcceptanceKind),
}

enum SecantOutcome<T: Real> {
    Bracket(usize, usize),
    Accept(T, AcceptanceKind),
}

#[derive(Debug, Clone, Copy, derive_getters::Getters)]
pub struct HagerZhang<T: Real> {
    delta: T,
    sigma: T,
    alpha_max: T,
    rho: T,
    epsilon: T,
    gamma: T,
    psi3: T,
    linesearch_max: usize,
}

impl<T: Real> Default for HagerZhang<T> {
    fn default() -> Self {
        HagerZhang {
            delta: cst(0.1),
            sigma: cst(0.9),
            alpha_max: T::infinity(),
            rho: cst(5.0),
            epsilon: cst(1e-6),
            gamma: cst(0.66),
            psi3: cst(0.1),
            linesearch_max: 50,
        }
    }
}

impl<T: Real> HagerZhang<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delta(mut self, delta: T) -> Result<Self, ConfigError<T>> {
        if delta <= T::zero() || delta >= T::one() {
            return Err(ConfigError::InvalidDelta(delta));
        }
        self.delta = delta;
        Ok(self)
    }

    pub fn with_sigma(mut self, sigma: T) -> Result<Self, ConfigError<T>> {
        if sigma < self.delta || sigma >= T::one() {
            return Err(ConfigError::InvalidSigma { delta: self.delta, sigma });
        }
        self.sigma = sigma;
        Ok(self)
    }

    pub fn with_alpha_max(mut self, alpha_max: T) -> Result<Self, ConfigError<T>> {
        if alpha_max <= T::zero() {
            return Err(ConfigError::InvalidAlphaMax(alpha_max));
        }
        self.alpha_max = alpha_max;
        Ok(self)
    }

    pub fn with_rho(mut self, rho: T) -> Result<Self, ConfigError<T>> {
        if rho <= T::one() {
            return Err(ConfigError::InvalidRho(rho));
        }
        self.rho = rho;
        Ok(self)
    }

    pub fn with_gamma(mut self, gamma: T) -> Result<Self, ConfigError<T>> {
        if gamma <= T::zero() || gamma >= T::one() {
            return Err(ConfigError::InvalidGamma(gamma));
        }
        self.gamma = gamma;
        Ok(self)
    }

    pub fn with_epsilon(mut self, epsilon: T) -> Result<Self, ConfigError<T>> {
        if epsilon < T::zero() {
            return Err(ConfigError::InvalidEpsilon(epsilon));
        }
        self.epsilon = epsilon;
        Ok(self)
    }

    pub fn with_linesearch_max(mut self, linesearch_max: usize) -> Self {
        self.linesearch_max = linesearch_max;
        self
    }

    fn phi_lim(&self, phi0: T) -> T {
        phi0 + self.epsilon * num_traits::Float::abs(phi0)
    }

    /// `W(c, phi_c, phi'_c)`: the classical or approximate Wolfe test.
    fn wolfe_kind(&self, phi0: T, dphi0: T, alpha: T, phi_lim: T, eval: FuncEvalUnivariate<T>) -> Option<AcceptanceKind> {
        let phi_a = *eval.f();
        let dphi_a = *eval.g();

        let wolfe = self.delta * dphi0 >= (phi_a - phi0) / alpha && dphi_a >= self.sigma * dphi0;
        if wolfe {
            return Some(AcceptanceKind::Wolfe);
        }

        let two = cst::<T>(2.0);
        let approx_wolfe = (two * self.delta - T::one()) * dphi0 >= dphi_a && dphi_a >= self.sigma * dphi0 && phi_a <= phi_lim;
        if approx_wolfe {
            return Some(AcceptanceKind::ApproximateWolfe);
        }

        None
    }

    fn secant(a: Probe<T>, b: Probe<T>) -> T {
        (a.alpha * b.slope - b.alpha * a.slope) / (b.slope - a.slope)
    }

    /// HZ stage U3, theta = 1/2. Given `[ia, ib]` with `slope(ia) < 0`,
    /// `value(ia) <= phi_lim`, `slope(ib) < 0` but `value(ib) > phi_lim`,
    /// bisect until the upper endpoint turns (`slope(mid) >= 0`) or the
    /// bracket has shrunk past floating point resolution.
    fn bisect<O>(&self, ray: &mut Ray<T, O>, hist: &mut BracketHistory<T>, mut ia: usize, mut ib: usize, phi_lim: T) -> (usize, usize)
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        for _ in 0..256 {
            let a = hist.get(ia);
            let b = hist.get(ib);
            if b.alpha - a.alpha <= self.epsilon * num_traits::Float::abs(b.alpha) {
                return (ia, ib);
            }
            let mid = cst::<T>(0.5) * (a.alpha + b.alpha);
            let eval = ray.value_and_slope(mid);
            if !eval.is_finite() {
                return (ia, ib);
            }
            let id = hist.push(mid, *eval.f(), *eval.g());
            if *eval.g() >= T::zero() {
                return (ia, id);
            } else if *eval.f() <= phi_lim {
                ia = id;
            } else {
                ib = id;
            }
        }
        (ia, ib)
    }

    /// HZ stages U0-U3: fold a new candidate `ic` into the bracket.
    fn update<O>(&self, ray: &mut Ray<T, O>, hist: &mut BracketHistory<T>, ia: usize, ib: usize, ic: usize, phi_lim: T) -> (usize, usize)
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        let a = hist.get(ia);
        let b = hist.get(ib);
        let c = hist.get(ic);

        if c.alpha <= a.alpha || c.alpha >= b.alpha {
            return (ia, ib); // U0
        }
        if c.slope >= T::zero() {
            return (ia, ic); // U1
        }
        if c.value <= phi_lim {
            return (ic, ib); // U2
        }
        self.bisect(ray, hist, ia, ic, phi_lim) // U3
    }

    /// HZ stages S1-S4: the double-secant step.
    fn secant2<O>(&self, ray: &mut Ray<T, O>, hist: &mut BracketHistory<T>, ia: usize, ib: usize, phi0: T, dphi0: T, phi_lim: T) -> SecantOutcome<T>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        let a = hist.get(ia);
        let b = hist.get(ib);

        let c_alpha = Self::secant(a, b);
        let eval_c = ray.value_and_slope(c_alpha);
        if !eval_c.is_finite() {
            return SecantOutcome::Bracket(ia, ib);
        }
        if let Some(kind) = self.wolfe_kind(phi0, dphi0, c_alpha, phi_lim, eval_c) {
            return SecantOutcome::Accept(c_alpha, kind);
        }

        let ic = hist.push(c_alpha, *eval_c.f(), *eval_c.g());
        let (mut aa, mut bb) = self.update(ray, hist, ia, ib, ic, phi_lim);

        let replaced_b = hist.get(bb).alpha == c_alpha;
        let replaced_a = hist.get(aa).alpha == c_alpha;

        if replaced_b || replaced_a {
            let c_bar_alpha = if replaced_b { Self::secant(b, hist.get(bb)) } else { Self::secant(a, hist.get(aa)) };
            let aa_alpha = hist.get(aa).alpha;
            let bb_alpha = hist.get(bb).alpha;

            if c_bar_alpha > aa_alpha && c_bar_alpha < bb_alpha {
                let eval_cb = ray.value_and_slope(c_bar_alpha);
                if eval_cb.is_finite() {
                    if let Some(kind) = self.wolfe_kind(phi0, dphi0, c_bar_alpha, phi_lim, eval_cb) {
                        return SecantOutcome::Accept(c_bar_alpha, kind);
                    }
                    let icb = hist.push(c_bar_alpha, *eval_cb.f(), *eval_cb.g());
                    let (aa2, bb2) = self.update(ray, hist, aa, bb, icb, phi_lim);
                    aa = aa2;
                    bb = bb2;
                }
            }
        }

        SecantOutcome::Bracket(aa, bb)
    }

    /// HZ stages B0-B3: grow the trial step geometrically until the slope
    /// turns non-negative or the reference height `phi_lim` is exceeded.
    fn bracket<O>(&self, ray: &mut Ray<T, O>, hist: &mut BracketHistory<T>, phi_lim: T, mut last: usize) -> Result<BracketOutcome<T>, LineSearchError<T>>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        let iterfinitemax = iterfinitemax::<T>();
        let mut alpha_max = self.alpha_max;

        for _ in 0..self.linesearch_max {
            let cur = hist.get(last);

            if cur.slope >= T::zero() {
                let mut ia = 0usize;
                for i in (0..last).rev() {
                    if hist.get(i).value <= phi_lim {
                        ia = i;
                        break;
                    }
                }
                return Ok(BracketOutcome::Bracketed(ia, last));
            }

            if cur.value > phi_lim {
                let (ia, ib) = self.bisect(ray, hist, last - 1, last, phi_lim);
                return Ok(BracketOutcome::Bracketed(ia, ib));
            }

            // still descending below the reference height: grow the trial step
            let cold = cur.alpha;
            let mut c_new = if self.rho * cold > alpha_max { alpha_max } else { self.rho * cold };
            if c_new == cold || next_float(cold) >= alpha_max {
                return Ok(BracketOutcome::Accept(cold, AcceptanceKind::BoundaryAccept));
            }

            let mut eval_new = ray.value_and_slope(c_new);
            if !eval_new.is_finite() {
                let lo = cold;
                let mut hi = c_new;
                let mut tries = 0usize;
                while !eval_new.is_finite() && tries < iterfinitemax {
                    hi = cst::<T>(0.5) * (lo + hi);
                    alpha_max = num_traits::Float::min(hi, alpha_max);
                    eval_new = ray.value_and_slope(hi);
                    tries += 1;
                }
                if !eval_new.is_finite() {
                    return Err(LineSearchError::NonFiniteExhausted { attempts: tries, alpha: cold });
                }
                c_new = hi;
            }

            if c_new == alpha_max && *eval_new.g() < T::zero() {
                return Ok(BracketOutcome::Accept(c_new, AcceptanceKind::BoundaryAccept));
            }

            // growing the step by rho left the value unchanged to fp resolution:
            // phi is flat here, further growth cannot find a steeper bracket
            if next_float(*eval_new.f()) >= cur.value && next_float(cur.value) >= *eval_new.f() {
                return Ok(BracketOutcome::Accept(cold, AcceptanceKind::Flat));
            }

            last = hist.push(c_new, *eval_new.f(), *eval_new.g());
        }

        Err(LineSearchError::MaxIterations { max_iter: self.linesearch_max, alpha: hist.get(last).alpha })
    }
}

impl<T: Real> SufficientDecreaseCondition<T> for HagerZhang<T> {
    fn c1(&self) -> T {
        self.delta
    }
}
impl<T: Real> CurvatureCondition<T> for HagerZhang<T> {
    fn c2(&self) -> T {
        self.sigma
    }
}

impl<T: Real> LineSearch<T> for HagerZhang<T> {
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

        let phi_lim = self.phi_lim(phi0);
        let iterfinitemax = iterfinitemax::<T>();
        let mut ray = Ray::new(x, s, x_new, oracle);
        let mut mayterminate = mayterminate;
        let mut c = if alpha_init > T::zero() && alpha_init.is_finite() { alpha_init } else { T::one() };

        // (a) finite-value rescue
        let mut eval_c = ray.value_and_slope(c);
        if !eval_c.is_finite() {
            mayterminate = false;
            let mut tries = 0usize;
            while !eval_c.is_finite() && tries < iterfinitemax {
                c = c * self.psi3;
                eval_c = ray.value_and_slope(c);
                tries += 1;
            }
            if !eval_c.is_finite() {
                warn!(target: "hagerzhang", "objective stayed non-finite after {tries} shrinkage attempts, returning alpha = 0");
                return Ok(LineSearchStep::new(T::zero(), AcceptanceKind::BoundaryAccept));
            }
        }

        // (b) initial fast-accept: a quadratic-fit guess may short-circuit bracketing
        if mayterminate {
            if let Some(kind) = self.wolfe_kind(phi0, dphi0, c, phi_lim, eval_c) {
                return Ok(LineSearchStep::new(c, kind));
            }
        }

        // (c) bracket construction
        let capacity = self.linesearch_max + iterfinitemax + 5;
        let mut hist = BracketHistory::new(capacity, phi0, dphi0);
        let last = hist.push(c, *eval_c.f(), *eval_c.g());

        let (mut ia, mut ib) = match self.bracket(&mut ray, &mut hist, phi_lim, last)? {
            BracketOutcome::Bracketed(ia, ib) => (ia, ib),
            BracketOutcome::Accept(alpha, kind) => return Ok(LineSearchStep::new(alpha, kind)),
        };
        if hist.get(ia).slope >= T::zero() {
            return Err(LineSearchError::BracketNonDescent { slope_a: hist.get(ia).slope, slope_b: hist.get(ib).slope });
        }

        // (d) refinement
        for _ in 0..self.linesearch_max {
            let a = hist.get(ia);
            let b = hist.get(ib);
            if b.alpha - a.alpha <= self.epsilon * num_traits::Float::abs(b.alpha) {
                return Ok(LineSearchStep::new(a.alpha, AcceptanceKind::Flat));
            }

            match self.secant2(&mut ray, &mut hist, ia, ib, phi0, dphi0, phi_lim) {
                SecantOutcome::Accept(alpha, kind) => return Ok(LineSearchStep::new(alpha, kind)),
                SecantOutcome::Bracket(na, nb) => {
                    let aa = hist.get(na);
                    let bb = hist.get(nb);

                    if bb.alpha - aa.alpha < self.gamma * (b.alpha - a.alpha) {
                        // secant made good progress: flat-region guard before adopting it
                        if next_float(a.value) >= b.value && next_float(aa.value) >= bb.value {
                            return Ok(LineSearchStep::new(aa.alpha, AcceptanceKind::Flat));
                        }
                        ia = na;
                        ib = nb;
                    } else {
                        // secant stalled: bisect the midpoint in directly
                        let mid = cst::<T>(0.5) * (aa.alpha + bb.alpha);
                        let eval_mid = ray.value_and_slope(mid);
                        if !eval_mid.is_finite() {
                            ia = na;
                            ib = nb;
                            continue;
                        }
                        if let Some(kind) = self.wolfe_kind(phi0, dphi0, mid, phi_lim, eval_mid) {
                            return Ok(LineSearchStep::new(mid, kind));
                        }
                        let imid = hist.push(mid, *eval_mid.f(), *eval_mid.g());
                        let (na2, nb2) = self.update(&mut ray, &mut hist, na, nb, imid, phi_lim);
                        ia = na2;
                        ib = nb2;
                    }
                }
            }
        }

        Err(LineSearchError::MaxIterations { max_iter: self.linesearch_max, alpha: hist.get(ib).alpha })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic(minimizer: f64) -> impl Fn(&DVector<f64>) -> FuncEvalMultivariate<f64> {
        move |x: &DVector<f64>| -> FuncEvalMultivariate<f64> {
            let f = (x[0] - minimizer).powi(2);
            let g = DVector::from(vec![2.0 * (x[0] - minimizer)]);
            (f, g).into()
        }
    }

    #[test]
    fn hagerzhang_converges_on_unit_quadratic() {
        let f_and_g = quadratic(1.0);
        let ls = HagerZhang::default();
        let x = DVector::from(vec![0.0]);
        let s = DVector::from(vec![1.0]);
        let mut x_new = x.clone();
        let eval0 = f_and_g(&x);
        let dphi0 = eval0.g().dot(&s);
        let step = ls.search(&x, &s, &mut x_new, &f_and_g, 0.5, *eval0.f(), dphi0, false).unwrap();
        assert!((step.alpha - 1.0).abs() < 1e-6, "alpha = {}", step.alpha);
    }

    #[test]
    fn hagerzhang_accepts_within_wolfe_conditions() {
        let f_and_g = quadratic(0.1);
        let ls = HagerZhang::default();
        let x = DVector::from(vec![0.0]);
        let s = DVector::from(vec![1.0]);
        let mut x_new = x.clone();
        let eval0 = f_and_g(&x);
        let dphi0 = eval0.g().dot(&s);
        let step = ls.search(&x, &s, &mut x_new, &f_and_g, 1.0, *eval0.f(), dphi0, false).unwrap();

        let eval_alpha = f_and_g(&(&x + step.alpha * &s));
        let dphi_alpha = eval_alpha.g().dot(&s);
        let wolfe = ls.delta() * dphi0 >= (eval_alpha.f() - eval0.f()) / step.alpha && dphi_alpha >= ls.sigma() * dphi0;
        let approx_wolfe = (2.0 * ls.delta() - 1.0) * dphi0 >= dphi_alpha
            && dphi_alpha >= ls.sigma() * dphi0
            && *eval_alpha.f() <= eval0.f() + ls.epsilon() * num_traits::Float::abs(*eval0.f());
        assert!(wolfe || approx_wolfe);
    }

    #[test]
    fn hagerzhang_rejects_non_descent_direction() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> { (x.norm_squared(), 2.0 * x).into() };
        let ls = HagerZhang::default();
        let x = DVector::from(vec![1.0]);
        let s = DVector::from(vec![1.0]); // ascent
        let mut x_new = x.clone();
        let err = ls.search(&x, &s, &mut x_new, &f_and_g, 1.0, 1.0, 2.0, false).unwrap_err();
        assert!(matches!(err, LineSearchError::NonDescent { .. }));
    }

    #[test]
    fn hagerzhang_brackets_past_shallow_minimizer_without_spurious_error() {
        // c lands just past the minimizer: slope(c) >= 0 but value(c) <= phi_lim,
        // so the same probe cannot serve as both bracket endpoints.
        let f_and_g = quadratic(1.0);
        let ls = HagerZhang::default();
        let x = DVector::from(vec![0.0]);
        let s = DVector::from(vec![1.0]);
        let mut x_new = x.clone();
        let eval0 = f_and_g(&x);
        let dphi0 = eval0.g().dot(&s);
        let step = ls.search(&x, &s, &mut x_new, &f_and_g, 1.5, *eval0.f(), dphi0, false).unwrap();
        assert!((step.alpha - 1.0).abs() < 1e-6, "alpha = {}", step.alpha);
    }

    #[test]
    fn hagerzhang_respects_alpha_max() {
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> {
            let f = -x[0]; // unbounded below in the descent direction
            let g = DVector::from(vec![-1.0]);
            (f, g).into()
        };
        let ls = HagerZhang::default().with_alpha_max(2.0).unwrap();
        let x = DVector::from(vec![0.0]);
        let s = DVector::from(vec![1.0]);
        let mut x_new = x.clone();
        let step = ls.search(&x, &s, &mut x_new, &f_and_g, 0.5, 0.0, -1.0, false).unwrap();
        assert!(step.alpha <= 2.0 + 1e-9);
        assert_eq!(step.outcome, AcceptanceKind::BoundaryAccept);
    }

    #[test]
    fn hagerzhang_idempotent_on_identical_inputs() {
        let f_and_g = quadratic(1.0);
        let ls = HagerZhang::default();
        let x = DVector::from(vec![0.0]);
        let s = DVector::from(vec![1.0]);
        let eval0 = f_and_g(&x);
        let dphi0 = eval0.g().dot(&s);

        let mut x_new_1 = x.clone();
        let step1 = ls.search(&x, &s, &mut x_new_1, &f_and_g, 0.5, *eval0.f(), dphi0, false).unwrap();
        let mut x_new_2 = x.clone();
        let step2 = ls.search(&x, &s, &mut x_new_2, &f_and_g, 0.5, *eval0.f(), dphi0, false).unwrap();
        assert_eq!(step1.alpha, step2.alpha);
    }

    #[test]
    fn hagerzhang_flat_region_does_not_exhaust_max_iterations() {
        let f_and_g = |_x: &DVector<f64>| -> FuncEvalMultivariate<f64> { (1.0, DVector::from(vec![-1e-12])).into() };
        let ls = HagerZhang::default();
        let x = DVector::from(vec![0.0]);
        let s = DVector::from(vec![1.0]);
        let mut x_new = x.clone();
        let result = ls.search(&x, &s, &mut x_new, &f_and_g, 0.5, 1.0, -1e-12, false);
        assert!(result.is_ok());
    }
}
