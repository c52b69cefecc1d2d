use ndarray::{Array, Array1};
use thiserror::Error;

/// Absolute tolerance, in samples, applied to a `t / dt` ratio before it is
/// rounded to an index, so that e.g. 0.5 / 0.001 yields 500 samples and
/// not 501.
pub(crate) const SAMPLE_EPS: f64 = 1e-9;

/// Uniformly sampled two-way time, starting at 0.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeAxis {
    times: Array1<f64>,
    dt: f64,
    tmax: f64,
}

impl TimeAxis {
    /// Samples `k * dt` for `k = 0..ceil(tmax / dt)`.
    pub fn new(tmax: f64, dt: f64) -> Result<Self, AxisError> {
        if !(dt.is_finite() && dt > 0.) {
            return Err(AxisError::InvalidDt(dt));
        }
        if !(tmax.is_finite() && tmax > dt) {
            return Err(AxisError::InvalidTmax(tmax, dt));
        }
        let nsamples = (tmax / dt - SAMPLE_EPS).ceil() as usize;
        let times = Array1::from_shape_fn(nsamples, |k| k as f64 * dt);
        Ok(Self { times, dt, tmax })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    /// Exclusive end of the axis.
    pub fn tmax(&self) -> f64 {
        self.tmax
    }

    pub fn last(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Index of the last sample at or before `t`, without clamping.
    pub fn floor_index(&self, t: f64) -> isize {
        (t / self.dt + SAMPLE_EPS).floor() as isize
    }

    /// Index of the first sample at or after `t`, without clamping.
    pub fn ceil_index(&self, t: f64) -> isize {
        (t / self.dt - SAMPLE_EPS).ceil() as isize
    }
}

/// Wedge thickness per trace, from the maximum down to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct ThicknessAxis {
    thicknesses: Array1<f64>,
}

impl ThicknessAxis {
    pub fn new(max_thickness: f64, num_traces: usize) -> Result<Self, AxisError> {
        if !(max_thickness.is_finite() && max_thickness > 0.) {
            return Err(AxisError::InvalidMaxThickness(max_thickness));
        }
        if num_traces < 2 {
            return Err(AxisError::InvalidNumTraces(num_traces));
        }
        let mut thicknesses = Array::linspace(max_thickness, 0., num_traces);
        // linspace accumulates rounding error; the last trace is the pinch-out.
        thicknesses[num_traces - 1] = 0.;
        Ok(Self { thicknesses })
    }

    pub fn len(&self) -> usize {
        self.thicknesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thicknesses.is_empty()
    }

    pub fn thicknesses(&self) -> &Array1<f64> {
        &self.thicknesses
    }

    pub fn max_thickness(&self) -> f64 {
        self.thicknesses[0]
    }

    /// Spacing between neighbouring traces.
    pub fn step(&self) -> f64 {
        self.max_thickness() / (self.len() - 1) as f64
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum AxisError {
    #[error("dt must be positive and finite, but got {0}")]
    InvalidDt(f64),
    #[error("tmax must be finite and larger than dt ({1}), but got {0}")]
    InvalidTmax(f64, f64),
    #[error("max_thickness must be positive and finite, but got {0}")]
    InvalidMaxThickness(f64),
    #[error("num_traces must be >= 2, but got {0}")]
    InvalidNumTraces(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_axis_matches_half_open_range() {
        let axis = TimeAxis::new(0.5, 0.001).unwrap();
        assert_eq!(axis.len(), 500);
        assert_eq!(axis.tmax(), 0.5);
        assert_eq!(axis.times()[0], 0.);
        assert!((axis.last() - 0.499).abs() < 1e-12);
        assert!(axis.times().windows(2).into_iter().all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_time_axis_non_integer_ratio_rounds_up() {
        let axis = TimeAxis::new(0.0105, 0.002).unwrap();
        assert_eq!(axis.len(), 6);
    }

    #[test]
    fn test_time_axis_rejects_bad_steps() {
        assert_eq!(TimeAxis::new(0.5, 0.).unwrap_err(), AxisError::InvalidDt(0.));
        assert_eq!(
            TimeAxis::new(0.001, 0.001).unwrap_err(),
            AxisError::InvalidTmax(0.001, 0.001)
        );
    }

    #[test]
    fn test_floor_index_tolerates_representation_error() {
        let axis = TimeAxis::new(0.5, 0.001).unwrap();
        assert_eq!(axis.floor_index(0.18), 180);
        assert_eq!(axis.floor_index(0.22), 220);
        assert_eq!(axis.floor_index(-0.01), -10);
        assert_eq!(axis.ceil_index(0.18), 180);
        assert_eq!(axis.ceil_index(0.1805), 181);
        assert_eq!(axis.floor_index(0.1805), 180);
    }

    #[test]
    fn test_thickness_axis_endpoints_and_order() {
        let axis = ThicknessAxis::new(200., 500).unwrap();
        let th = axis.thicknesses();
        assert_eq!(axis.len(), 500);
        assert_eq!(th[0], 200.);
        assert_eq!(th[499], 0.);
        assert!(th.windows(2).into_iter().all(|w| w[0] >= w[1]));
        assert!((axis.step() - 200. / 499.).abs() < 1e-12);
    }

    #[test]
    fn test_thickness_axis_needs_two_traces() {
        assert_eq!(
            ThicknessAxis::new(10., 1).unwrap_err(),
            AxisError::InvalidNumTraces(1)
        );
        assert_eq!(
            ThicknessAxis::new(0., 10).unwrap_err(),
            AxisError::InvalidMaxThickness(0.)
        );
    }
}
