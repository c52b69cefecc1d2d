// wedge-model/src/model/mod.rs

mod errors;
mod params;
mod wedge_model;

pub use errors::{ErrorKind, ExportError, WedgeModelError};
pub use params::{WedgeModelParams, WedgeModelParamsBuilder, WedgeModelParamsBuilderError};
pub use wedge_model::{evaluate, evaluate_wedge_model, WedgeModel};
