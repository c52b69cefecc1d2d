use libm::exp;
use ndarray::Array1;
use std::f64::consts::PI;
use thiserror::Error;

pub const DEFAULT_WAVELET_LENGTH: f64 = 0.128;

/// Zero-phase Ricker pulse sampled symmetrically about t = 0.
///
/// The sample count is always odd, so the centre sample sits on t = 0 and
/// carries the peak value 1.0.
#[derive(Clone, Debug)]
pub struct RickerWavelet {
    samples: Array1<f64>,
    frequency: f64,
    dt: f64,
}

impl RickerWavelet {
    pub fn samples(&self) -> &Array1<f64> {
        &self.samples
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn center_index(&self) -> usize {
        self.samples.len() / 2
    }

    /// Time of every sample relative to the peak.
    pub fn times(&self) -> Array1<f64> {
        let half = self.center_index() as f64;
        Array1::from_shape_fn(self.len(), |j| (j as f64 - half) * self.dt)
    }

    pub fn amplitude_at(frequency: f64, t: f64) -> f64 {
        let arg = (PI * frequency * t).powi(2);
        (1. - 2. * arg) * exp(-arg)
    }
}

#[derive(Default)]
pub struct RickerWaveletBuilder {
    frequency: Option<f64>,
    dt: Option<f64>,
    length: Option<f64>,
}

impl RickerWaveletBuilder {
    pub fn build(&self) -> Result<RickerWavelet, RickerWaveletBuilderError> {
        let frequency = self.frequency.ok_or_else(|| {
            RickerWaveletBuilderError::UninitializedFieldError("frequency".to_string())
        })?;
        Self::validate_frequency(&frequency)?;
        let dt = self
            .dt
            .ok_or_else(|| RickerWaveletBuilderError::UninitializedFieldError("dt".to_string()))?;
        Self::validate_dt(&dt)?;
        let length = self.length.unwrap_or(DEFAULT_WAVELET_LENGTH);
        Self::validate_length(&length, &dt)?;
        let half = (length / (2. * dt)).round() as usize;
        let samples = Array1::from_shape_fn(2 * half + 1, |j| {
            let t = (j as f64 - half as f64) * dt;
            RickerWavelet::amplitude_at(frequency, t)
        });
        log::debug!(
            "Ricker wavelet: f={} Hz, dt={} s, {} samples",
            frequency,
            dt,
            samples.len()
        );
        Ok(RickerWavelet {
            samples,
            frequency,
            dt,
        })
    }

    fn validate_frequency(frequency: &f64) -> Result<(), RickerWaveletBuilderError> {
        if !(frequency.is_finite() && *frequency > 0.) {
            return Err(RickerWaveletBuilderError::InvalidFrequency(*frequency));
        }
        Ok(())
    }

    fn validate_dt(dt: &f64) -> Result<(), RickerWaveletBuilderError> {
        if !(dt.is_finite() && *dt > 0.) {
            return Err(RickerWaveletBuilderError::InvalidDt(*dt));
        }
        Ok(())
    }

    fn validate_length(length: &f64, dt: &f64) -> Result<(), RickerWaveletBuilderError> {
        if !(length.is_finite() && *length >= *dt) {
            return Err(RickerWaveletBuilderError::InvalidLength(*length, *dt));
        }
        Ok(())
    }

    pub fn frequency(&mut self, frequency: f64) -> &mut Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn dt(&mut self, dt: f64) -> &mut Self {
        self.dt = Some(dt);
        self
    }

    pub fn length(&mut self, length: f64) -> &mut Self {
        self.length = Some(length);
        self
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RickerWaveletBuilderError {
    #[error("Unitialized field on RickerWaveletBuilder: {0}")]
    UninitializedFieldError(String),
    #[error("wavelet frequency must be positive and finite, but got {0}")]
    InvalidFrequency(f64),
    #[error("wavelet dt must be positive and finite, but got {0}")]
    InvalidDt(f64),
    #[error("wavelet length must be finite and at least dt ({1}), but got {0}")]
    InvalidLength(f64, f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wavelet(frequency: f64) -> RickerWavelet {
        RickerWaveletBuilder::default()
            .frequency(frequency)
            .dt(0.001)
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_support_is_odd_and_fixed() {
        assert_eq!(wavelet(25.).len(), 129);
        assert_eq!(wavelet(60.).len(), 129);
        let short = RickerWaveletBuilder::default()
            .frequency(25.)
            .dt(0.002)
            .length(0.064)
            .build()
            .unwrap();
        assert_eq!(short.len(), 33);
    }

    #[test]
    fn test_symmetric_with_peak_at_center() {
        let w = wavelet(25.);
        let s = w.samples();
        let n = s.len();
        for i in 0..n {
            assert_eq!(s[i], s[n - 1 - i]);
        }
        let center = w.center_index();
        assert_eq!(center, 64);
        assert_eq!(s[center], 1.0);
        assert!(s.iter().all(|&v| v <= s[center]));
        assert_eq!(w.times()[center], 0.);
    }

    #[test]
    fn test_zero_crossings_move_inward_with_frequency() {
        // First zero crossing of a Ricker is at t = 1 / (pi * f * sqrt(2)).
        let first_negative = |w: &RickerWavelet| {
            let c = w.center_index();
            (c..w.len()).find(|&j| w.samples()[j] < 0.).unwrap() - c
        };
        let low = wavelet(15.);
        let high = wavelet(40.);
        assert!(first_negative(&high) < first_negative(&low));
    }

    #[test]
    fn test_invalid_inputs_fail_fast() {
        let err = RickerWaveletBuilder::default()
            .frequency(0.)
            .dt(0.001)
            .build()
            .unwrap_err();
        assert_eq!(err, RickerWaveletBuilderError::InvalidFrequency(0.));

        let err = RickerWaveletBuilder::default()
            .frequency(25.)
            .dt(-0.001)
            .build()
            .unwrap_err();
        assert_eq!(err, RickerWaveletBuilderError::InvalidDt(-0.001));

        let err = RickerWaveletBuilder::default().dt(0.001).build().unwrap_err();
        assert_eq!(
            err,
            RickerWaveletBuilderError::UninitializedFieldError("frequency".to_string())
        );
    }
}
