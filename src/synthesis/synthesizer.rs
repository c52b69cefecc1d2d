// wedge-model/src/synthesis/synthesizer.rs

use super::direct::DirectConvolver;
use super::fft::FftConvolver;
use super::traits::Convolver;
use crate::reflectivity::ReflectivityGrid;
use crate::wavelet::RickerWavelet;
use humantime::format_duration;
use log::{debug, info, trace};
use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

/// Cells (traces × samples) from which `Auto` switches to the FFT path.
pub const FFT_CELL_THRESHOLD: usize = 1_000_000;
/// Kernels shorter than this always convolve directly under `Auto`.
pub const FFT_MIN_KERNEL_LEN: usize = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvolutionMethod {
    Direct,
    Fft,
    #[default]
    Auto,
}

impl ConvolutionMethod {
    /// Resolves `Auto` for a given problem size.
    pub fn resolve(&self, ntraces: usize, nsamples: usize, kernel_len: usize) -> Self {
        match self {
            ConvolutionMethod::Auto => {
                if ntraces * nsamples >= FFT_CELL_THRESHOLD && kernel_len >= FFT_MIN_KERNEL_LEN {
                    ConvolutionMethod::Fft
                } else {
                    ConvolutionMethod::Direct
                }
            }
            other => *other,
        }
    }
}

impl fmt::Display for ConvolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConvolutionMethod::Direct => "direct",
            ConvolutionMethod::Fft => "fft",
            ConvolutionMethod::Auto => "auto",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ConvolutionMethod {
    type Err = SynthesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(ConvolutionMethod::Direct),
            "fft" => Ok(ConvolutionMethod::Fft),
            "auto" => Ok(ConvolutionMethod::Auto),
            _ => Err(SynthesisError::UnknownMethod(s.to_string())),
        }
    }
}

/// Synthetic seismic response, `(time samples - 1, traces)`.
#[derive(Clone, Debug)]
pub struct Seismogram {
    amplitudes: Array2<f64>,
}

impl Seismogram {
    pub fn amplitudes(&self) -> &Array2<f64> {
        &self.amplitudes
    }

    pub fn trace(&self, index: usize) -> ArrayView1<'_, f64> {
        self.amplitudes.index_axis(Axis(1), index)
    }

    pub fn nsamples(&self) -> usize {
        self.amplitudes.nrows()
    }

    pub fn ntraces(&self) -> usize {
        self.amplitudes.ncols()
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.amplitudes
    }
}

impl From<Array2<f64>> for Seismogram {
    fn from(amplitudes: Array2<f64>) -> Self {
        Self { amplitudes }
    }
}

pub struct SeismogramSynthesizer<'a> {
    wavelet: &'a RickerWavelet,
    method: ConvolutionMethod,
}

impl<'a> SeismogramSynthesizer<'a> {
    pub fn new(wavelet: &'a RickerWavelet) -> Self {
        Self {
            wavelet,
            method: ConvolutionMethod::default(),
        }
    }

    pub fn method(&mut self, method: ConvolutionMethod) -> &mut Self {
        self.method = method;
        self
    }

    pub fn synthesize(&self, reflectivity: &ReflectivityGrid) -> Result<Seismogram, SynthesisError> {
        let rc = reflectivity.values();
        let (nsamples, ntraces) = rc.dim();
        let kernel = self.wavelet.samples().to_vec();
        if kernel.len() % 2 == 0 {
            return Err(SynthesisError::EvenKernel(kernel.len()));
        }
        let method = self.method.resolve(ntraces, nsamples, kernel.len());
        info!(
            "Convolving {} traces of {} samples with a {}-sample wavelet ({})",
            ntraces,
            nsamples,
            kernel.len(),
            method
        );
        let now = Instant::now();
        let convolver: Box<dyn Convolver> = match method {
            ConvolutionMethod::Fft => Box::new(FftConvolver::new(&kernel, nsamples)),
            _ => Box::new(DirectConvolver::new(&kernel)),
        };
        let amplitudes = Self::convolve_traces(convolver.as_ref(), rc);
        if let Some(((k, i), value)) = amplitudes.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(SynthesisError::NonFiniteAmplitude(k, i, *value));
        }
        debug!(
            "Took {} to synthesize seismogram.",
            format_duration(now.elapsed())
        );
        Ok(Seismogram { amplitudes })
    }

    /// Every trace is convolved on its own, so the parallel result equals
    /// the sequential one sample for sample.
    pub fn convolve_traces(convolver: &dyn Convolver, rc: &Array2<f64>) -> Array2<f64> {
        let mut amplitudes = Array2::<f64>::zeros(rc.dim());
        Zip::from(amplitudes.columns_mut())
            .and(rc.columns())
            .par_for_each(|mut out, trace| {
                let convolved = convolver.convolve_same(&trace.to_vec());
                trace!("Convolved trace via {}", convolver.name());
                out.assign(&Array1::from(convolved));
            });
        amplitudes
    }

    /// Sequential reference of [`Self::convolve_traces`].
    pub fn convolve_traces_serial(convolver: &dyn Convolver, rc: &Array2<f64>) -> Array2<f64> {
        let mut amplitudes = Array2::<f64>::zeros(rc.dim());
        for (mut out, trace) in amplitudes.columns_mut().into_iter().zip(rc.columns()) {
            out.assign(&Array1::from(convolver.convolve_same(&trace.to_vec())));
        }
        amplitudes
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SynthesisError {
    #[error("wavelet must have an odd number of samples to be centred, but has {0}")]
    EvenKernel(usize),
    #[error("seismogram amplitude at sample {0}, trace {1} is {2}")]
    NonFiniteAmplitude(usize, usize, f64),
    #[error("unknown convolution method '{0}', expected one of: direct, fft, auto")]
    UnknownMethod(String),
}
