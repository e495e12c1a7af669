// Runs every line search in this crate on the same quadratic restriction and
// prints the accepted step and acceptance rule for each, to make the
// differences between the acceptance strategies visible at a glance.
use hagerzhang_linesearch::{BackTracking, FuncEvalMultivariate, HagerZhang, LineSearch, MoreThuente, StrongWolfe};
use nalgebra::DVector;

fn main() {
    let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> {
        let f = (x[0] - 1.0).powi(2) + (x[1] - 2.0).powi(2);
        let g = DVector::from(vec![2.0 * (x[0] - 1.0), 2.0 * (x[1] - 2.0)]);
        FuncEvalMultivariate::new(f, g)
    };

    let x = DVector::from(vec![0.0, 0.0]);
    let s = DVector::from(vec![1.0, 2.0]);
    let eval0 = f_and_g(&x);
    let dphi0 = eval0.g().dot(&s);

    macro_rules! run {
        ($name:literal, $ls:expr) => {{
            let mut x_new = x.clone();
            let step = $ls.search(&x, &s, &mut x_new, &f_and_g, 1.0, *eval0.f(), dphi0, false).expect("line search failed");
            println!("{:<12} alpha = {:.6}  outcome = {:?}", $name, step.alpha, step.outcome);
        }};
    }

    run!("BackTracking", BackTracking::default());
    run!("MoreThuente", MoreThuente::default());
    run!("StrongWolfe", StrongWolfe::default());
    run!("HagerZhang", HagerZhang::default());
}
