// wedge-model/src/model/wedge_model.rs

use super::errors::{ExportError, WedgeModelError};
use super::params::{WedgeModelParams, WedgeModelParamsBuilder};
use crate::axes::{ThicknessAxis, TimeAxis};
use crate::impedance::{ImpedanceGrid, ImpedanceModel};
use crate::layers::{LayerStack, RockLayer};
use crate::reflectivity::{ReflectivityGrid, ReflectivitySolver};
use crate::stratigraphy::{StratigraphyBuilder, StratigraphyGrid};
use crate::synthesis::{Seismogram, SeismogramSynthesizer};
use crate::tuning::{TuningExtractor, TuningResult, TuningWindow};
use crate::wavelet::{RickerWavelet, RickerWaveletBuilder};
use humantime::format_duration;
use log::{debug, info};
use ndarray::Array1;
use std::fmt;
use std::path::Path;
use std::time::Instant;

/// Everything one evaluation produces. Nothing here is shared with a later
/// evaluation; re-running with new inputs builds a fresh model.
#[derive(Clone, Debug)]
pub struct WedgeModel {
    pub time_axis: TimeAxis,
    pub thickness_axis: ThicknessAxis,
    pub wavelet: RickerWavelet,
    pub stratigraphy: StratigraphyGrid,
    pub impedance: ImpedanceGrid,
    pub reflectivity: ReflectivityGrid,
    pub seismogram: Seismogram,
    pub tuning_window: TuningWindow,
    pub tuning_curve: Array1<f64>,
    pub tuning_result: TuningResult,
}

impl WedgeModel {
    /// `trace,thickness_m,amplitude`, one row per trace.
    pub fn write_tuning_curve_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["trace", "thickness_m", "amplitude"])?;
        for (i, (thickness, amplitude)) in self
            .thickness_axis
            .thicknesses()
            .iter()
            .zip(self.tuning_curve.iter())
            .enumerate()
        {
            writer.write_record(&[i.to_string(), thickness.to_string(), amplitude.to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// One row per seismogram sample: `time_s` then one column per trace.
    pub fn write_seismogram_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_path(path)?;
        let mut header = Vec::with_capacity(self.seismogram.ntraces() + 1);
        header.push("time_s".to_string());
        header.extend((0..self.seismogram.ntraces()).map(|i| format!("trace_{}", i)));
        writer.write_record(&header)?;
        for (row, t) in self
            .seismogram
            .amplitudes()
            .rows()
            .into_iter()
            .zip(self.time_axis.times().iter())
        {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(t.to_string());
            record.extend(row.iter().map(|v| v.to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for WedgeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Wedge model: {} traces x {} samples, dt={} s",
            self.seismogram.ntraces(),
            self.seismogram.nsamples(),
            self.time_axis.dt()
        )?;
        writeln!(
            f,
            "Wavelet: {} Hz Ricker, {} samples",
            self.wavelet.frequency(),
            self.wavelet.len()
        )?;
        writeln!(f, "Tuning window: {}", self.tuning_window)?;
        write!(f, "{}", self.tuning_result)
    }
}

/// Runs the whole pipeline for one parameter set.
pub fn evaluate(params: &WedgeModelParams) -> Result<WedgeModel, WedgeModelError> {
    info!("Begin wedge model evaluation");
    let now = Instant::now();

    let layers = LayerStack::new(params.upper, params.wedge, params.lower)?;
    debug!(
        "Layers: upper {}, wedge {}, lower {}",
        layers.upper(),
        layers.wedge(),
        layers.lower()
    );
    let time_axis = TimeAxis::new(params.tmax, params.dt)?;
    let thickness_axis = ThicknessAxis::new(params.max_thickness_m, params.num_traces)?;
    let wavelet = RickerWaveletBuilder::default()
        .frequency(params.frequency_hz)
        .dt(params.dt)
        .length(params.wavelet_length_s)
        .build()?;
    let tuning_window = params.window()?;

    let stratigraphy = StratigraphyBuilder::default()
        .time_axis(&time_axis)
        .thickness_axis(&thickness_axis)
        .wedge_velocity(layers.wedge().velocity)
        .top_time(params.top_time_s)
        .build()?;

    let extractor = TuningExtractor::new(&time_axis, &thickness_axis, tuning_window);
    // Reject a window off the time axis before paying for the convolution.
    extractor.window_indices(time_axis.len() - 1)?;

    let impedance = ImpedanceModel::new(&layers).compute(&stratigraphy);
    let reflectivity = ReflectivitySolver::solve(&impedance)?;
    let seismogram = SeismogramSynthesizer::new(&wavelet)
        .method(params.convolution)
        .synthesize(&reflectivity)?;
    let (tuning_curve, tuning_result) = extractor.extract(&seismogram)?;

    info!(
        "Wedge model evaluated in {}",
        format_duration(now.elapsed())
    );
    Ok(WedgeModel {
        time_axis,
        thickness_axis,
        wavelet,
        stratigraphy,
        impedance,
        reflectivity,
        seismogram,
        tuning_window,
        tuning_curve,
        tuning_result,
    })
}

/// Positional form of [`evaluate`], with the wavelet length, explicit
/// window and convolution method left at their defaults.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_wedge_model(
    upper: RockLayer,
    wedge: RockLayer,
    lower: RockLayer,
    frequency_hz: f64,
    max_thickness_m: f64,
    num_traces: usize,
    tmax: f64,
    dt: f64,
    top_time_s: f64,
    tuning_window_s: f64,
) -> Result<WedgeModel, WedgeModelError> {
    let params = WedgeModelParamsBuilder::default()
        .upper(upper)
        .wedge(wedge)
        .lower(lower)
        .frequency_hz(frequency_hz)
        .max_thickness_m(max_thickness_m)
        .num_traces(num_traces)
        .tmax(tmax)
        .dt(dt)
        .top_time_s(top_time_s)
        .tuning_window_s(tuning_window_s)
        .build()?;
    evaluate(&params)
}

impl WedgeModelParams {
    pub fn evaluate(&self) -> Result<WedgeModel, WedgeModelError> {
        evaluate(self)
    }
}
