// wedge-model/src/model/params.rs

use crate::layers::RockLayer;
use crate::stratigraphy::DEFAULT_TOP_TIME;
use crate::synthesis::ConvolutionMethod;
use crate::tuning::{TuningWindow, DEFAULT_TUNING_HALF_WIDTH};
use crate::wavelet::DEFAULT_WAVELET_LENGTH;
use derive_builder::Builder;

/// Every input of one wedge-model evaluation.
///
/// Only the three rock layers are mandatory on the builder; the remaining
/// fields default to a 25 Hz wavelet over a 200 m wedge sampled by 500
/// traces, 0.5 s at 1 ms, with the wedge top at 0.2 s and a ±20 ms tuning
/// window.
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(derive(Debug))]
pub struct WedgeModelParams {
    pub upper: RockLayer,
    pub wedge: RockLayer,
    pub lower: RockLayer,
    #[builder(default = "25.")]
    pub frequency_hz: f64,
    #[builder(default = "200.")]
    pub max_thickness_m: f64,
    #[builder(default = "500")]
    pub num_traces: usize,
    #[builder(default = "0.5")]
    pub tmax: f64,
    #[builder(default = "0.001")]
    pub dt: f64,
    #[builder(default = "DEFAULT_TOP_TIME")]
    pub top_time_s: f64,
    /// Half width of the symmetric window around `top_time_s`.
    #[builder(default = "DEFAULT_TUNING_HALF_WIDTH")]
    pub tuning_window_s: f64,
    /// Replaces the symmetric window when set.
    #[builder(default, setter(strip_option))]
    pub tuning_window: Option<TuningWindow>,
    #[builder(default = "DEFAULT_WAVELET_LENGTH")]
    pub wavelet_length_s: f64,
    #[builder(default)]
    pub convolution: ConvolutionMethod,
}

impl WedgeModelParams {
    pub fn window(&self) -> Result<TuningWindow, crate::tuning::TuningError> {
        match self.tuning_window {
            Some(window) => Ok(window),
            None => TuningWindow::around(self.top_time_s, self.tuning_window_s),
        }
    }
}
