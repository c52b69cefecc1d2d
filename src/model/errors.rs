// wedge-model/src/model/errors.rs

use super::params::WedgeModelParamsBuilderError;
use crate::axes::AxisError;
use crate::layers::LayerError;
use crate::reflectivity::ReflectivityError;
use crate::stratigraphy::StratigraphyError;
use crate::synthesis::SynthesisError;
use crate::tuning::TuningError;
use crate::wavelet::RickerWaveletBuilderError;
use thiserror::Error;

/// Coarse classification of a failed evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input was out of range; the message names the field.
    InvalidParameter,
    /// A division by zero or a NaN/Inf would have reached the output.
    NumericDegenerate,
}

#[derive(Error, Debug)]
pub enum WedgeModelError {
    #[error(transparent)]
    WedgeModelParamsBuilderError(#[from] WedgeModelParamsBuilderError),
    #[error(transparent)]
    LayerError(#[from] LayerError),
    #[error(transparent)]
    AxisError(#[from] AxisError),
    #[error(transparent)]
    RickerWaveletBuilderError(#[from] RickerWaveletBuilderError),
    #[error(transparent)]
    StratigraphyError(#[from] StratigraphyError),
    #[error(transparent)]
    ReflectivityError(#[from] ReflectivityError),
    #[error(transparent)]
    SynthesisError(#[from] SynthesisError),
    #[error(transparent)]
    TuningError(#[from] TuningError),
}

impl WedgeModelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WedgeModelError::ReflectivityError(ReflectivityError::DegenerateImpedanceSum(..))
            | WedgeModelError::SynthesisError(SynthesisError::NonFiniteAmplitude(..))
            | WedgeModelError::TuningError(TuningError::NanAmplitude(_))
            | WedgeModelError::TuningError(TuningError::MinMaxError(_)) => {
                ErrorKind::NumericDegenerate
            }
            _ => ErrorKind::InvalidParameter,
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impedance::ImpedanceGrid;
    use crate::reflectivity::ReflectivitySolver;
    use crate::tuning::TuningExtractor;
    use ndarray::{array, Array1};

    #[test]
    fn test_zero_impedance_sum_is_numeric_degenerate() {
        let z = ImpedanceGrid::from(array![[1., 0.], [1., 0.]]);
        let err: WedgeModelError = ReflectivitySolver::solve(&z).unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::NumericDegenerate);
    }

    #[test]
    fn test_nan_amplitude_is_numeric_degenerate() {
        let curve = Array1::from(vec![0.2, f64::NAN]);
        let err: WedgeModelError = TuningExtractor::first_argmax(&curve).unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::NumericDegenerate);
    }

    #[test]
    fn test_non_finite_synthesis_is_numeric_degenerate() {
        let err = WedgeModelError::from(SynthesisError::NonFiniteAmplitude(3, 1, f64::INFINITY));
        assert_eq!(err.kind(), ErrorKind::NumericDegenerate);
    }

    #[test]
    fn test_validation_errors_are_invalid_parameter() {
        let err = WedgeModelError::from(AxisError::InvalidDt(0.));
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        let err = WedgeModelError::from(TuningError::WindowBetweenSamples(0.1, 0.1));
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}
