use crate::layers::RockLayer;
use crate::model::{WedgeModelParams, WedgeModelParamsBuilder, WedgeModelParamsBuilderError};
use crate::stratigraphy::DEFAULT_TOP_TIME;
use crate::synthesis::ConvolutionMethod;
use crate::tuning::{TuningError, TuningWindow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayersConfig {
    pub upper: RockLayer,
    pub wedge: RockLayer,
    pub lower: RockLayer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveletConfig {
    pub frequency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    pub max_thickness: f64,
    pub num_traces: usize,
    pub tmax: f64,
    pub dt: f64,
    #[serde(default = "default_top_time")]
    pub top_time: f64,
}

fn default_top_time() -> f64 {
    DEFAULT_TOP_TIME
}

/// Either a half width around the top horizon or explicit bounds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TuningConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

impl TuningConfig {
    fn explicit_window(&self) -> Result<Option<TuningWindow>, ConfigError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok(Some(TuningWindow::new(start, end)?)),
            (None, None) => Ok(None),
            _ => Err(ConfigError::IncompleteTuningWindow),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default)]
    pub method: ConvolutionMethod,
}

/// Complete wedge model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub layers: LayersConfig,
    pub wavelet: WaveletConfig,
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub tuning: TuningConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        content.parse()
    }

    /// Parameter values are checked when the model is evaluated; this only
    /// resolves the file layout into a parameter set.
    pub fn to_params(&self) -> Result<WedgeModelParams, ConfigError> {
        let mut builder = WedgeModelParamsBuilder::default();
        builder
            .upper(self.layers.upper)
            .wedge(self.layers.wedge)
            .lower(self.layers.lower)
            .frequency_hz(self.wavelet.frequency)
            .max_thickness_m(self.geometry.max_thickness)
            .num_traces(self.geometry.num_traces)
            .tmax(self.geometry.tmax)
            .dt(self.geometry.dt)
            .top_time_s(self.geometry.top_time)
            .convolution(self.synthesis.method);
        if let Some(length) = self.wavelet.length {
            builder.wavelet_length_s(length);
        }
        if let Some(half_width) = self.tuning.half_width {
            builder.tuning_window_s(half_width);
        }
        if let Some(window) = self.tuning.explicit_window()? {
            builder.tuning_window(window);
        }
        Ok(builder.build()?)
    }

    /// Human-readable configuration summary.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "=== Wedge Model Configuration ===".to_string(),
            format!("Upper: {}", self.layers.upper),
            format!("Wedge: {}", self.layers.wedge),
            format!("Lower: {}", self.layers.lower),
            format!("Wavelet: {} Hz", self.wavelet.frequency),
            format!(
                "Geometry: {} m over {} traces, tmax={} s, dt={} s, top={} s",
                self.geometry.max_thickness,
                self.geometry.num_traces,
                self.geometry.tmax,
                self.geometry.dt,
                self.geometry.top_time
            ),
        ];
        match (self.tuning.start, self.tuning.end, self.tuning.half_width) {
            (Some(start), Some(end), _) => lines.push(format!("Tuning window: [{}, {}] s", start, end)),
            (_, _, Some(half_width)) => lines.push(format!("Tuning window: ±{} s", half_width)),
            _ => {}
        }
        lines.push(format!("Convolution: {}", self.synthesis.method));
        lines.join("\n")
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("tuning window needs both start and end")]
    IncompleteTuningWindow,
    #[error(transparent)]
    TuningError(#[from] TuningError),
    #[error(transparent)]
    WedgeModelParamsBuilderError(#[from] WedgeModelParamsBuilderError),
}
