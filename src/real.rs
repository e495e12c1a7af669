use super::*;

/// Scalar domain shared by every line search in this crate.
///
/// `nalgebra::RealField` gives us the vector arithmetic (`DVector<T>` addition,
/// scaling, dot products); `num_traits::Float` gives us the machine constants
/// (`epsilon`, `infinity`, `nan`) the Hager-Zhang bracket arithmetic depends on.
/// f32 and f64 satisfy both out of the box, so callers never have to implement
/// this themselves.
pub trait Real: nalgebra::RealField + num_traits::Float + Copy {}
impl<T> Real for T where T: nalgebra::RealField + num_traits::Float + Copy {}

/// Lifts an `f64` literal into the scalar domain. Mirrors the
/// `ArgminFloat::from_f64` convenience used throughout the argmin line search
/// implementations, minus the trait indirection.
pub fn cst<T: Real>(x: f64) -> T {
    T::from(x).unwrap_or_else(|| panic!("constant {x} is not representable in this scalar type"))
}

/// Smallest representable step away from `x` in the direction of growing
/// magnitude. `f64`/`f32` only stabilized `next_up` recently, so we
/// approximate it the way generic numeric code has to: one ULP, estimated
/// from machine epsilon scaled by the operand's own magnitude.
pub fn next_float<T: Real>(x: T) -> T {
    let scale = if x == T::zero() {
        T::min_positive_value()
    } else {
        num_traits::Float::abs(x) * T::epsilon()
    };
    x + num_traits::Float::max(scale, T::min_positive_value())
}

/// `ceil(-log2(machine epsilon))`: the number of halvings needed to exhaust a
/// scalar's floating point resolution. Used to bound the finite-value rescue
/// loops in [`crate::HagerZhang`] and [`crate::InitialHagerZhang`].
pub fn iterfinitemax<T: Real>() -> usize {
    let eps = T::epsilon().to_f64().unwrap_or(f64::EPSILON);
    (-eps.log2()).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_float_moves_forward() {
        let x = 1.0_f64;
        assert!(next_float(x) > x);
    }

    #[test]
    fn next_float_handles_zero() {
        assert!(next_float(0.0_f64) > 0.0);
    }

    #[test]
    fn iterfinitemax_matches_f64_epsilon() {
        // 2^-52 is f64's epsilon, so -log2(eps) == 52, ceil is a no-op.
        assert_eq!(iterfinitemax::<f64>(), 52);
    }
}
