// Implementation from https://www.ii.uib.no/~lennart/drgrad/More1994.pdf (More, Thuente 1994)
// and https://bayanbox.ir/view/1460469776013846613/Sun-Yuan-Optimization-theory.pdf (Sun, Yuan 2006).
//
// Maintains a bracketing interval refined by safeguarded cubic/quadratic
// interpolation; accepts on the strong Wolfe conditions.
use super::*;

#[derive(Debug, Clone, Copy, derive_getters::Getters)]
pub struct MoreThuente<T: Real> {
    c1: T, // mu (armijo sensitivity)
    c2: T, // eta (curvature sensitivity)
    delta_min: T,
    delta: T,
    delta_max: T,
}

impl<T: Real> Default for MoreThuente<T> {
    fn default() -> Self {
        MoreThuente {
            c1: cst(1e-4),
            c2: cst(0.9),
            delta_min: cst(0.583_333_33),
            delta: cst(0.66),
            delta_max: cst(1.1),
        }
    }
}

impl<T: Real> MoreThuente<T> {
    pub fn with_deltas(mut self, delta_min: T, delta: T, delta_max: T) -> Self {
        self.delta_min = delta_min;
        self.delta = delta;
        self.delta_max = delta_max;
        self
    }
    pub fn with_c1(mut self, c1: T) -> Self {
        assert!(c1 > T::zero(), "c1 must be positive");
        assert!(c1 < self.c2, "c1 must be less than c2");
        self.c1 = c1;
        self
    }
    pub fn with_c2(mut self, c2: T) -> Self {
        assert!(c2 > T::zero(), "c2 must be positive");
        assert!(c2 < T::one(), "c2 must be less than 1");
        assert!(c2 > self.c1, "c2 must be greater than c1");
        self.c2 = c2;
        self
    }

    fn update_interval(f_tl: T, f_t: T, g_t: T, tl: &mut T, t: T, tu: &mut T) -> bool {
        // case U1 in Update Algorithm / case a in Modified Update Algorithm
        if f_t > f_tl {
            *tu = t;
            false
        }
        // case U2 / b
        else if g_t * (*tl - t) > T::zero() {
            *tl = t;
            false
        }
        // case U3 / c
        else if g_t * (*tl - t) < T::zero() {
            *tu = *tl;
            *tl = t;
            false
        } else {
            // interval converged to a point
            true
        }
    }

    fn cubic_minimizer(ta: T, tb: T, f_ta: T, f_tb: T, g_ta: T, g_tb: T) -> T {
        // Equation 2.4.51/2.4.56 [Sun, Yuan 2006]
        let three = cst::<T>(3.0);
        let two = cst::<T>(2.0);
        let s = three * (f_tb - f_ta) / (tb - ta);
        let z = s - g_ta - g_tb;
        let w = num_traits::Float::sqrt(z * z - g_ta * g_tb);
        ta + ((tb - ta) * ((w - g_ta - z) / (g_tb - g_ta + two * w)))
    }

    fn quadratic_minimizer_1(ta: T, tb: T, f_ta: T, f_tb: T, g_ta: T) -> T {
        // Equation 2.4.2 [Sun, Yuan 2006]
        let half = cst::<T>(0.5);
        let lin_int = (f_ta - f_tb) / (ta - tb);
        ta - half * ((ta - tb) * g_ta / (g_ta - lin_int))
    }

    fn quadratic_minimizer_2(ta: T, tb: T, g_ta: T, g_tb: T) -> T {
        // Equation 2.4.5 [Sun, Yuan 2006]
        ta - g_ta * ((ta - tb) / (g_ta - g_tb))
    }

    fn psi(&self, phi0: FuncEvalUnivariate<T>, phi_t: FuncEvalUnivariate<T>, t: T) -> FuncEvalUnivariate<T> {
        let image = *phi_t.f() - *phi0.f() - self.c1 * t * *phi0.g();
        let derivative = *phi_t.g() - self.c1 * *phi0.g();
        FuncEvalUnivariate::new(image, derivative)
    }
}

impl<T: Real> SufficientDecreaseCondition<T> for MoreThuente<T> {
    fn c1(&self) -> T {
        self.c1
    }
}
impl<T: Real> CurvatureCondition<T> for MoreThuente<T> {
    fn c2(&self) -> T {
        self.c2
    }
}

impl<T: Real> LineSearch<T> for MoreThuente<T> {
    fn search<O>(
        &self,
        x: &DVector<T>,
        s: &DVector<T>,
        x_new: &mut DVector<T>,
        oracle: &O,
        alpha_init: T,
        phi0_val: T,
        dphi0_val: T,
        mayterminate: bool,
    ) -> Result<LineSearchStep<T>, LineSearchError<T>>
    where
        O: Fn(&DVector<T>) -> FuncEvalMultivariate<T>,
    {
        if !phi0_val.is_finite() || !dphi0_val.is_finite() {
            return Err(LineSearchError::NonFiniteInitial { phi0: phi0_val, dphi0: dphi0_val });
        }
        if dphi0_val >= T::zero() {
            return Err(LineSearchError::NonDescent { dphi0: dphi0_val });
        }

        let phi0 = FuncEvalUnivariate::new(phi0_val, dphi0_val);
        let mut ray = Ray::new(x, s, x_new, oracle);

        let mut use_modified_updating = false;
        let mut interval_converged = false;

        let mut t = if alpha_init > T::zero() { alpha_init } else { T::one() };
        let mut tl = T::zero();
        let mut tu = T::infinity();
        let max_iter = 50usize;

        if mayterminate {
            let phi_t = ray.value_and_slope(t);
            if phi_t.is_finite() && self.strong_wolfe(*phi0.f(), *phi0.g(), t, *phi_t.f(), *phi_t.g()) {
                return Ok(LineSearchStep::new(t, AcceptanceKind::ImmediateAccept));
            }
        }

        for _i in 0..max_iter {
            let phi_t = ray.value_and_slope(t);

            if self.strong_wolfe(*phi0.f(), *phi0.g(), t, *phi_t.f(), *phi_t.g()) {
                return Ok(LineSearchStep::new(t, AcceptanceKind::Wolfe));
            } else if interval_converged {
                return Ok(LineSearchStep::new(t, AcceptanceKind::Flat));
            } else if t == tl || t == tu {
                return Ok(LineSearchStep::new(t, AcceptanceKind::BoundaryAccept));
            }

            let psi_t = self.psi(phi0, phi_t, t);

            if !use_modified_updating && *psi_t.f() <= T::zero() && *phi_t.g() > T::zero() {
                // once the condition triggers, the paper never goes back to unmodified updating
                use_modified_updating = true;
            }

            let phi_tl = ray.value_and_slope(tl);

            let (f_tl, g_tl, f_t, g_t) = if use_modified_updating {
                (*phi_tl.f(), *phi_tl.g(), *phi_t.f(), *phi_t.g())
            } else {
                let psi_tl = self.psi(phi0, phi_tl, tl);
                (*psi_tl.f(), *psi_tl.g(), *psi_t.f(), *psi_t.g())
            };

            // trial value selection (section 4 of the paper)
            if f_t > f_tl {
                // case 1
                let tc = Self::cubic_minimizer(tl, t, f_tl, f_t, g_tl, g_t);
                let tq = Self::quadratic_minimizer_1(tl, t, f_tl, f_t, g_tl);
                if num_traits::Float::abs(tc - tl) < num_traits::Float::abs(tq - tl) {
                    t = tc;
                } else {
                    t = cst::<T>(0.5) * (tq + tc);
                }
            } else if g_t * g_tl < T::zero() {
                // case 2
                let tc = Self::cubic_minimizer(tl, t, f_tl, f_t, g_tl, g_t);
                let ts = Self::quadratic_minimizer_2(tl, t, g_tl, g_t);
                t = if num_traits::Float::abs(tc - t) >= num_traits::Float::abs(ts - t) { tc } else { ts };
            } else if num_traits::Float::abs(g_t) <= num_traits::Float::abs(g_tl) {
                // case 3
                let tc = Self::cubic_minimizer(tl, t, f_tl, f_t, g_tl, g_t);
                let ts = Self::quadratic_minimizer_2(tl, t, g_tl, g_t);
                let t_plus = if num_traits::Float::abs(tc - t) < num_traits::Float::abs(ts - t) { tc } else { ts };
                t = if t > tl { num_traits::Float::min(t_plus, t + self.delta * (tu - t)) } else { num_traits::Float::max(t_plus, t + self.delta * (tu - t)) };
            } else {
                // case 4
                let phi_tu = ray.value_and_slope(tu);
                let (f_tu, g_tu) = if use_modified_updating {
                    (*phi_tu.f(), *phi_tu.g())
                } else {
                    let psi_tu = self.psi(phi0, phi_tu, tu);
                    (*psi_tu.f(), *psi_tu.g())
                };
                t = Self::cubic_minimizer(tu, t, f_t, f_tu, g_t, g_tu);
            }

            if !t.is_finite() {
                return Err(LineSearchError::NonFiniteExhausted { attempts: 0, alpha: tl });
            }

            // clamp into the current interval (tu may still be +infinity early on)
            t = if tu.is_finite() { num_traits::Float::min(num_traits::Float::max(t, tl), tu) } else { num_traits::Float::max(t, tl) };

            interval_converged = Self::update_interval(f_tl, f_t, g_t, &mut tl, t, &mut tu);
        }

        Err(LineSearchError::MaxIterations { max_iter, alpha: t })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn morethuente_converges_on_quadratic() {
        let gamma = 90.0_f64;
        let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> {
            let f = 0.5 * (x[0].powi(2) + gamma * x[1].powi(2));
            let g = DVector::from(vec![x[0], gamma * x[1]]);
            (f, g).into()
        };
        let ls = MoreThuente::default();
        let mut iterate = DVector::from(vec![180.0, 152.0]);
        let mut x_new = iterate.clone();
        let tol = 1e-10;

        for _ in 0..10000 {
            let eval = f_and_g(&iterate);
            if eval.g().dot(eval.g()) < tol {
                break;
            }
            let direction = -eval.g();
            let dphi0 = eval.g().dot(&direction);
            let step = ls.search(&iterate, &direction, &mut x_new, &f_and_g, 1.0, *eval.f(), dphi0, false).unwrap();
            iterate += step.alpha * &direction;
        }
        assert!(iterate.norm() < 1e-4);
    }
}
