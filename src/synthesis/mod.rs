// wedge-model/src/synthesis/mod.rs

pub use direct::DirectConvolver;
pub use fft::FftConvolver;
pub use synthesizer::{ConvolutionMethod, Seismogram, SeismogramSynthesizer, SynthesisError};
pub use traits::Convolver;

pub mod direct;
pub mod fft;
pub mod synthesizer;
pub mod traits;
