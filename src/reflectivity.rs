use crate::impedance::ImpedanceGrid;
use log::debug;
use ndarray::{s, Array2, Zip};
use thiserror::Error;

/// Normal-incidence reflection coefficients between adjacent time samples.
///
/// Row `k` holds the coefficient of the interface between samples `k` and
/// `k + 1`, so the grid has one row fewer than the impedance grid.
#[derive(Clone, Debug)]
pub struct ReflectivityGrid {
    values: Array2<f64>,
}

impl ReflectivityGrid {
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.values
    }
}

impl From<Array2<f64>> for ReflectivityGrid {
    fn from(values: Array2<f64>) -> Self {
        Self { values }
    }
}

pub struct ReflectivitySolver;

impl ReflectivitySolver {
    pub fn solve(impedance: &ImpedanceGrid) -> Result<ReflectivityGrid, ReflectivityError> {
        let z = impedance.values();
        if z.nrows() < 2 {
            return Err(ReflectivityError::TooFewSamples(z.nrows()));
        }
        Self::check_impedance_sums(impedance)?;
        let above = z.slice(s![..-1, ..]);
        let below = z.slice(s![1.., ..]);
        let values = Zip::from(&above)
            .and(&below)
            .par_map_collect(|&z0, &z1| (z1 - z0) / (z1 + z0));
        debug!("Reflectivity grid {:?}", values.dim());
        Ok(ReflectivityGrid { values })
    }

    /// Validated layers never produce a zero or negative impedance sum; an
    /// unvalidated grid that does is reported rather than divided through.
    fn check_impedance_sums(impedance: &ImpedanceGrid) -> Result<(), ReflectivityError> {
        let z = impedance.values();
        for k in 0..z.nrows() - 1 {
            for i in 0..z.ncols() {
                let sum = z[[k, i]] + z[[k + 1, i]];
                if !(sum.is_finite() && sum > 0.) {
                    return Err(ReflectivityError::DegenerateImpedanceSum(k, i, sum));
                }
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ReflectivityError {
    #[error("impedance grid needs at least 2 time samples, but got {0}")]
    TooFewSamples(usize),
    #[error("impedance sum at sample {0}, trace {1} is {2}; reflection coefficient undefined")]
    DegenerateImpedanceSum(usize, usize, f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_coefficients_from_adjacent_samples() {
        let z = ImpedanceGrid::from(array![[10., 20.], [10., 20.], [30., 10.]]);
        let rc = ReflectivitySolver::solve(&z).unwrap();
        assert_eq!(rc.values().dim(), (2, 2));
        assert_eq!(rc.values()[[0, 0]], 0.);
        assert_eq!(rc.values()[[0, 1]], 0.);
        assert_eq!(rc.values()[[1, 0]], 0.5);
        assert!((rc.values()[[1, 1]] + 1. / 3.).abs() < 1e-15);
    }

    #[test]
    fn test_zero_sum_is_degenerate() {
        let z = ImpedanceGrid::from(array![[1., 0.], [1., 0.]]);
        assert_eq!(
            ReflectivitySolver::solve(&z).unwrap_err(),
            ReflectivityError::DegenerateImpedanceSum(0, 1, 0.)
        );
    }

    #[test]
    fn test_single_sample_is_rejected() {
        let z = ImpedanceGrid::from(array![[1., 2.]]);
        assert_eq!(
            ReflectivitySolver::solve(&z).unwrap_err(),
            ReflectivityError::TooFewSamples(1)
        );
    }
}
