use crate::axes::{ThicknessAxis, TimeAxis};
use crate::synthesis::Seismogram;
use log::{debug, info};
use ndarray::{s, Array1};
use ndarray_stats::errors::MinMaxError;
use ndarray_stats::QuantileExt;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_TUNING_HALF_WIDTH: f64 = 0.02;

/// Time interval, in seconds, scanned for the top-horizon amplitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TuningWindow {
    pub start_s: f64,
    pub end_s: f64,
}

impl TuningWindow {
    pub fn new(start_s: f64, end_s: f64) -> Result<Self, TuningError> {
        if !(start_s.is_finite() && end_s.is_finite() && start_s < end_s) {
            return Err(TuningError::InvalidWindow(start_s, end_s));
        }
        Ok(Self { start_s, end_s })
    }

    /// `[center - half_width, center + half_width]`.
    pub fn around(center: f64, half_width: f64) -> Result<Self, TuningError> {
        if !(half_width.is_finite() && half_width > 0.) {
            return Err(TuningError::InvalidHalfWidth(half_width));
        }
        Self::new(center - half_width, center + half_width)
    }
}

impl fmt::Display for TuningWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4} s, {:.4} s]", self.start_s, self.end_s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TuningResult {
    pub thickness_at_peak: f64,
    pub peak_amplitude: f64,
    pub curve_index: usize,
}

impl fmt::Display for TuningResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tuning thickness: {:.1} m (trace {}, peak amplitude {:.5})",
            self.thickness_at_peak, self.curve_index, self.peak_amplitude
        )
    }
}

pub struct TuningExtractor<'a> {
    time_axis: &'a TimeAxis,
    thickness_axis: &'a ThicknessAxis,
    window: TuningWindow,
}

impl<'a> TuningExtractor<'a> {
    pub fn new(time_axis: &'a TimeAxis, thickness_axis: &'a ThicknessAxis, window: TuningWindow) -> Self {
        Self {
            time_axis,
            thickness_axis,
            window,
        }
    }

    /// Inclusive range of the samples lying inside the window, clamped to
    /// the seismogram rows.
    pub fn window_indices(&self, nrows: usize) -> Result<(usize, usize), TuningError> {
        if nrows == 0 {
            return Err(TuningError::EmptySeismogram);
        }
        let last = nrows as isize - 1;
        let start = self.time_axis.ceil_index(self.window.start_s);
        let end = self.time_axis.floor_index(self.window.end_s);
        if end < 0 || start > last {
            return Err(TuningError::WindowOutsideTimeAxis(
                self.window.start_s,
                self.window.end_s,
                last as f64 * self.time_axis.dt(),
            ));
        }
        if start > end {
            return Err(TuningError::WindowBetweenSamples(
                self.window.start_s,
                self.window.end_s,
            ));
        }
        Ok((start.clamp(0, last) as usize, end.clamp(0, last) as usize))
    }

    /// Peak absolute amplitude per trace inside the window.
    pub fn curve(&self, seismogram: &Seismogram) -> Result<Array1<f64>, TuningError> {
        if seismogram.ntraces() != self.thickness_axis.len() {
            return Err(TuningError::TraceCountMismatch(
                seismogram.ntraces(),
                self.thickness_axis.len(),
            ));
        }
        let (start, end) = self.window_indices(seismogram.nsamples())?;
        debug!("Tuning window samples {}..={}", start, end);
        let amplitudes = seismogram.amplitudes();
        let peaks = (0..seismogram.ntraces())
            .into_par_iter()
            .map(|i| {
                let window = amplitudes.slice(s![start..=end, i]).mapv(f64::abs);
                window.max().map(|peak| *peak)
            })
            .collect::<Result<Vec<f64>, MinMaxError>>()?;
        Ok(Array1::from_vec(peaks))
    }

    pub fn extract(&self, seismogram: &Seismogram) -> Result<(Array1<f64>, TuningResult), TuningError> {
        let curve = self.curve(seismogram)?;
        let curve_index = Self::first_argmax(&curve)?;
        let result = TuningResult {
            thickness_at_peak: self.thickness_axis.thicknesses()[curve_index],
            peak_amplitude: curve[curve_index],
            curve_index,
        };
        info!("{}", result);
        Ok((curve, result))
    }

    /// Index of the maximum, earliest index on ties.
    pub fn first_argmax(curve: &Array1<f64>) -> Result<usize, TuningError> {
        let mut best: Option<usize> = None;
        for (i, &value) in curve.iter().enumerate() {
            if value.is_nan() {
                return Err(TuningError::NanAmplitude(i));
            }
            match best {
                Some(b) if value <= curve[b] => {}
                _ => best = Some(i),
            }
        }
        best.ok_or(TuningError::EmptySeismogram)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum TuningError {
    #[error("tuning window half width must be positive and finite, but got {0}")]
    InvalidHalfWidth(f64),
    #[error("tuning window must satisfy start < end, but got [{0}, {1}]")]
    InvalidWindow(f64, f64),
    #[error("tuning window [{0}, {1}] lies outside the time axis [0, {2}]")]
    WindowOutsideTimeAxis(f64, f64, f64),
    #[error("tuning window [{0}, {1}] contains no time sample")]
    WindowBetweenSamples(f64, f64),
    #[error("seismogram has {0} traces but the thickness axis has {1}")]
    TraceCountMismatch(usize, usize),
    #[error("seismogram has no samples")]
    EmptySeismogram,
    #[error("tuning amplitude of trace {0} is NaN")]
    NanAmplitude(usize),
    #[error(transparent)]
    MinMaxError(#[from] MinMaxError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn axes() -> (TimeAxis, ThicknessAxis) {
        (
            TimeAxis::new(0.011, 0.001).unwrap(),
            ThicknessAxis::new(30., 4).unwrap(),
        )
    }

    fn seismogram() -> Seismogram {
        // 10 samples x 4 traces
        let mut a = Array2::<f64>::zeros((10, 4));
        a[[5, 0]] = 0.2;
        a[[4, 1]] = -0.5;
        a[[6, 2]] = 0.5;
        a[[9, 3]] = 0.9;
        Seismogram::from(a)
    }

    #[test]
    fn test_curve_and_first_occurrence_tie_break() {
        let (time_axis, thickness_axis) = axes();
        let window = TuningWindow::around(0.005, 0.002).unwrap();
        let extractor = TuningExtractor::new(&time_axis, &thickness_axis, window);
        let (curve, result) = extractor.extract(&seismogram()).unwrap();
        assert_eq!(curve.to_vec(), vec![0.2, 0.5, 0.5, 0.]);
        assert_eq!(result.curve_index, 1);
        assert_eq!(result.thickness_at_peak, 20.);
        assert_eq!(result.peak_amplitude, 0.5);
    }

    #[test]
    fn test_window_clamps_to_rows() {
        let (time_axis, thickness_axis) = axes();
        let window = TuningWindow::new(-0.003, 0.05).unwrap();
        let extractor = TuningExtractor::new(&time_axis, &thickness_axis, window);
        assert_eq!(extractor.window_indices(10).unwrap(), (0, 9));
        let (_, result) = extractor.extract(&seismogram()).unwrap();
        assert_eq!(result.curve_index, 3);
    }

    #[test]
    fn test_window_outside_axis_is_rejected() {
        let (time_axis, thickness_axis) = axes();
        let window = TuningWindow::new(0.02, 0.03).unwrap();
        let extractor = TuningExtractor::new(&time_axis, &thickness_axis, window);
        assert!(matches!(
            extractor.extract(&seismogram()).unwrap_err(),
            TuningError::WindowOutsideTimeAxis(..)
        ));
        let window = TuningWindow::new(-0.03, -0.02).unwrap();
        let extractor = TuningExtractor::new(&time_axis, &thickness_axis, window);
        assert!(extractor.window_indices(10).is_err());
    }

    #[test]
    fn test_off_grid_start_excludes_earlier_sample() {
        let time_axis = TimeAxis::new(0.5, 0.001).unwrap();
        let thickness_axis = ThicknessAxis::new(10., 2).unwrap();
        let mut a = Array2::<f64>::zeros((499, 2));
        a[[180, 0]] = 0.9;
        a[[181, 1]] = 0.4;
        let window = TuningWindow::new(0.1805, 0.22).unwrap();
        let extractor = TuningExtractor::new(&time_axis, &thickness_axis, window);
        assert_eq!(extractor.window_indices(499).unwrap(), (181, 220));
        let (curve, result) = extractor.extract(&Seismogram::from(a)).unwrap();
        assert_eq!(curve.to_vec(), vec![0., 0.4]);
        assert_eq!(result.curve_index, 1);
    }

    #[test]
    fn test_window_between_samples_is_rejected() {
        let (time_axis, thickness_axis) = axes();
        let window = TuningWindow::new(0.0052, 0.0058).unwrap();
        let extractor = TuningExtractor::new(&time_axis, &thickness_axis, window);
        assert_eq!(
            extractor.window_indices(10).unwrap_err(),
            TuningError::WindowBetweenSamples(0.0052, 0.0058)
        );
    }

    #[test]
    fn test_invalid_windows() {
        assert_eq!(
            TuningWindow::around(0.2, 0.).unwrap_err(),
            TuningError::InvalidHalfWidth(0.)
        );
        assert_eq!(
            TuningWindow::new(0.25, 0.18).unwrap_err(),
            TuningError::InvalidWindow(0.25, 0.18)
        );
    }

    #[test]
    fn test_nan_is_reported() {
        let curve = Array1::from(vec![0.1, f64::NAN, 0.3]);
        assert_eq!(
            TuningExtractor::first_argmax(&curve).unwrap_err(),
            TuningError::NanAmplitude(1)
        );
    }

    #[test]
    fn test_trace_count_mismatch() {
        let time_axis = TimeAxis::new(0.011, 0.001).unwrap();
        let thickness_axis = ThicknessAxis::new(30., 3).unwrap();
        let window = TuningWindow::around(0.005, 0.002).unwrap();
        let extractor = TuningExtractor::new(&time_axis, &thickness_axis, window);
        assert_eq!(
            extractor.extract(&seismogram()).unwrap_err(),
            TuningError::TraceCountMismatch(4, 3)
        );
    }
}
