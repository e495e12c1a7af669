// Minimal steepest-descent loop driving the Hager-Zhang line search
// directly, with no surrounding solver framework: the outer loop, the
// initial-step estimator, and the line search are all visible here.
use hagerzhang_linesearch::{FuncEvalMultivariate, HagerZhang, InitialHagerZhang, InitialStep, LineSearch, OuterState, Tracer};
use nalgebra::{DMatrix, DVector};

fn main() {
    std::env::set_var("RUST_LOG", "info");
    let _guards = Tracer::default().with_stdout_layer(None).build();

    let matrix = DMatrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, 90.0]);
    let f_and_g = |x: &DVector<f64>| -> FuncEvalMultivariate<f64> {
        let f = x.dot(&(&matrix * x));
        let g = 2.0 * &matrix * x;
        FuncEvalMultivariate::new(f, g)
    };

    let line_search = HagerZhang::default();
    let initial_step = InitialHagerZhang::default();
    let mut state = OuterState::new(DVector::from(vec![180.0, 152.0]), DVector::zeros(2));

    let tol = 1e-10;
    for iteration in 0..200 {
        let eval = f_and_g(&state.x);
        if eval.g().dot(eval.g()) < tol {
            println!("converged after {iteration} iterations: x = {:?}", state.x);
            return;
        }
        state.s = -eval.g().clone();
        let dphi0 = eval.g().dot(&state.s);

        let guess = initial_step.estimate(&mut state, &f_and_g, *eval.f(), dphi0);
        let step = line_search
            .search(&state.x, &state.s, &mut state.x_new, &f_and_g, guess.alpha, *eval.f(), dphi0, guess.mayterminate)
            .expect("line search failed to converge");

        state.f_x_previous = Some(*eval.f());
        state.x = &state.x + step.alpha * &state.s;
        state.alpha = Some(step.alpha);
    }

    println!("did not converge within the iteration budget; x = {:?}", state.x);
}
