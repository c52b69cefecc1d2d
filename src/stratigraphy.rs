use crate::axes::{ThicknessAxis, TimeAxis};
use crate::layers::LayerLabel;
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use std::time::Instant;
use thiserror::Error;

pub const DEFAULT_TOP_TIME: f64 = 0.2;

/// Layer label of every (time sample, trace) cell of the wedge model.
#[derive(Clone, Debug)]
pub struct StratigraphyGrid {
    labels: Array2<LayerLabel>,
    top_time: f64,
    base_times: Array1<f64>,
}

impl StratigraphyGrid {
    /// `(time samples, traces)` labels.
    pub fn labels(&self) -> &Array2<LayerLabel> {
        &self.labels
    }

    pub fn top_time(&self) -> f64 {
        self.top_time
    }

    /// Two-way time of the wedge base, one per trace.
    pub fn base_times(&self) -> &Array1<f64> {
        &self.base_times
    }

    pub fn ntraces(&self) -> usize {
        self.labels.ncols()
    }

    pub fn nsamples(&self) -> usize {
        self.labels.nrows()
    }

    pub fn trace(&self, index: usize) -> ArrayView1<'_, LayerLabel> {
        self.labels.index_axis(Axis(1), index)
    }
}

#[derive(Default)]
pub struct StratigraphyBuilder<'a> {
    time_axis: Option<&'a TimeAxis>,
    thickness_axis: Option<&'a ThicknessAxis>,
    wedge_velocity: Option<f64>,
    top_time: Option<f64>,
}

impl<'a> StratigraphyBuilder<'a> {
    pub fn build(&self) -> Result<StratigraphyGrid, StratigraphyError> {
        let time_axis = self
            .time_axis
            .ok_or_else(|| StratigraphyError::UninitializedFieldError("time_axis".to_string()))?;
        let thickness_axis = self.thickness_axis.ok_or_else(|| {
            StratigraphyError::UninitializedFieldError("thickness_axis".to_string())
        })?;
        let wedge_velocity = self.wedge_velocity.ok_or_else(|| {
            StratigraphyError::UninitializedFieldError("wedge_velocity".to_string())
        })?;
        Self::validate_wedge_velocity(&wedge_velocity)?;
        let top_time = self.top_time.unwrap_or(DEFAULT_TOP_TIME);
        Self::validate_top_time(&top_time, time_axis)?;

        info!(
            "Building stratigraphy for {} samples x {} traces",
            time_axis.len(),
            thickness_axis.len()
        );
        let start = Instant::now();

        let base_times = Self::base_times(thickness_axis, &wedge_velocity, &top_time);
        let times = time_axis.times();
        let labels = Array2::from_shape_fn((times.len(), base_times.len()), |(k, i)| {
            Self::classify(times[k], top_time, base_times[i])
        });

        debug!("Stratigraphy built in {:?}", start.elapsed());
        Ok(StratigraphyGrid {
            labels,
            top_time,
            base_times,
        })
    }

    /// Base of the wedge in two-way time: the top plus the vertical travel
    /// through the wedge and back at the wedge velocity.
    fn base_times(thickness_axis: &ThicknessAxis, wedge_velocity: &f64, top_time: &f64) -> Array1<f64> {
        thickness_axis
            .thicknesses()
            .mapv(|thickness| top_time + 2. * thickness / wedge_velocity)
    }

    fn classify(t: f64, top_time: f64, base_time: f64) -> LayerLabel {
        if t <= top_time {
            LayerLabel::Upper
        } else if t < base_time {
            LayerLabel::Wedge
        } else {
            LayerLabel::Lower
        }
    }

    fn validate_wedge_velocity(wedge_velocity: &f64) -> Result<(), StratigraphyError> {
        if !(wedge_velocity.is_finite() && *wedge_velocity > 0.) {
            return Err(StratigraphyError::InvalidWedgeVelocity(*wedge_velocity));
        }
        Ok(())
    }

    fn validate_top_time(top_time: &f64, time_axis: &TimeAxis) -> Result<(), StratigraphyError> {
        if !(top_time.is_finite() && *top_time > 0. && *top_time < time_axis.tmax()) {
            return Err(StratigraphyError::InvalidTopTime(*top_time, time_axis.tmax()));
        }
        Ok(())
    }

    pub fn time_axis(&mut self, time_axis: &'a TimeAxis) -> &mut Self {
        self.time_axis = Some(time_axis);
        self
    }

    pub fn thickness_axis(&mut self, thickness_axis: &'a ThicknessAxis) -> &mut Self {
        self.thickness_axis = Some(thickness_axis);
        self
    }

    pub fn wedge_velocity(&mut self, wedge_velocity: f64) -> &mut Self {
        self.wedge_velocity = Some(wedge_velocity);
        self
    }

    pub fn top_time(&mut self, top_time: f64) -> &mut Self {
        self.top_time = Some(top_time);
        self
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum StratigraphyError {
    #[error("Unitialized field on StratigraphyBuilder: {0}")]
    UninitializedFieldError(String),
    #[error("wedge velocity must be positive and finite, but got {0}")]
    InvalidWedgeVelocity(f64),
    #[error("top_time must lie strictly inside (0, tmax = {1}), but got {0}")]
    InvalidTopTime(f64, f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(max_thickness: f64, num_traces: usize) -> StratigraphyGrid {
        let time_axis = TimeAxis::new(0.5, 0.001).unwrap();
        let thickness_axis = ThicknessAxis::new(max_thickness, num_traces).unwrap();
        StratigraphyBuilder::default()
            .time_axis(&time_axis)
            .thickness_axis(&thickness_axis)
            .wedge_velocity(4556.)
            .top_time(0.2)
            .build()
            .unwrap()
    }

    #[test]
    fn test_shape_follows_axes() {
        let g = grid(200., 50);
        assert_eq!(g.labels().dim(), (500, 50));
    }

    #[test]
    fn test_labels_follow_horizons() {
        let g = grid(200., 50);
        let base = g.base_times()[0];
        assert!((base - (0.2 + 400. / 4556.)).abs() < 1e-12);
        let thickest = g.trace(0);
        assert_eq!(thickest[0], LayerLabel::Upper);
        assert_eq!(thickest[200], LayerLabel::Upper);
        assert_eq!(thickest[201], LayerLabel::Wedge);
        assert_eq!(thickest[287], LayerLabel::Wedge);
        assert_eq!(thickest[288], LayerLabel::Lower);
        assert_eq!(thickest[499], LayerLabel::Lower);
    }

    #[test]
    fn test_pinch_out_has_no_wedge() {
        let g = grid(200., 50);
        let last = g.trace(49);
        assert_eq!(g.base_times()[49], g.top_time());
        assert!(last.iter().all(|&label| label != LayerLabel::Wedge));
        assert_eq!(last[200], LayerLabel::Upper);
        assert_eq!(last[201], LayerLabel::Lower);
    }

    #[test]
    fn test_base_time_grows_with_thickness() {
        let g = grid(200., 50);
        // Thickness descends along the traces, so base times descend too.
        assert!(g
            .base_times()
            .windows(2)
            .into_iter()
            .all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_invalid_velocity_and_top_time() {
        let time_axis = TimeAxis::new(0.5, 0.001).unwrap();
        let thickness_axis = ThicknessAxis::new(100., 10).unwrap();
        let mut builder = StratigraphyBuilder::default();
        builder
            .time_axis(&time_axis)
            .thickness_axis(&thickness_axis)
            .wedge_velocity(0.);
        assert_eq!(
            builder.build().unwrap_err(),
            StratigraphyError::InvalidWedgeVelocity(0.)
        );
        builder.wedge_velocity(3000.).top_time(0.6);
        assert!(matches!(
            builder.build().unwrap_err(),
            StratigraphyError::InvalidTopTime(_, _)
        ));
        builder.top_time(0.5);
        assert_eq!(
            builder.build().unwrap_err(),
            StratigraphyError::InvalidTopTime(0.5, 0.5)
        );
    }

    #[test]
    fn test_top_time_after_last_sample_is_accepted() {
        let time_axis = TimeAxis::new(0.5, 0.001).unwrap();
        let thickness_axis = ThicknessAxis::new(100., 10).unwrap();
        let g = StratigraphyBuilder::default()
            .time_axis(&time_axis)
            .thickness_axis(&thickness_axis)
            .wedge_velocity(4556.)
            .top_time(0.4995)
            .build()
            .unwrap();
        assert!(0.4995 > time_axis.last());
        assert!(g.labels().iter().all(|&label| label == LayerLabel::Upper));
    }
}
