use nalgebra::{DMatrix, DVector};

use tracing::warn;
#[cfg(feature = "std")]
use tracing_appender::non_blocking::WorkerGuard;
#[cfg(feature = "std")]
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

pub mod real;
pub use real::*;

pub mod error;
pub use error::*;

pub mod func_eval;
pub use func_eval::*;

pub mod outer_state;
pub use outer_state::*;

pub mod line_search;
pub use line_search::*;

pub mod initial_step;
pub use initial_step::*;

#[cfg(feature = "std")]
pub mod tracer;
#[cfg(feature = "std")]
pub use tracer::*;
