use pretty_env_logger;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn setup_pretty_env_logger_default() {
    INIT.call_once(|| {
        pretty_env_logger::init();
    });
}

pub use layers::{LayerLabel, LayerStack, RockLayer};
pub use model::{evaluate, evaluate_wedge_model, ErrorKind, WedgeModel, WedgeModelError};
pub use model::{WedgeModelParams, WedgeModelParamsBuilder};
pub use tuning::{TuningResult, TuningWindow};
pub mod axes;
pub mod config;
pub mod impedance;
pub mod layers;
pub mod model;
pub mod reflectivity;
pub mod stratigraphy;
pub mod synthesis;
pub mod tuning;
pub mod wavelet;
