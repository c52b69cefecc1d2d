use super::traits::Convolver;
use rustfft::{num_complex::Complex64, Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Frequency-domain convolution for a fixed signal length.
///
/// The kernel spectrum and both FFT plans are computed once and shared by
/// every trace; each call allocates its own buffer and scratch, so one
/// instance can serve all rayon workers.
pub struct FftConvolver {
    kernel_len: usize,
    signal_len: usize,
    size: usize,
    kernel_spectrum: Vec<Complex64>,
    fft_forward: Arc<dyn Fft<f64>>,
    fft_inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for FftConvolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftConvolver")
            .field("kernel_len", &self.kernel_len)
            .field("signal_len", &self.signal_len)
            .field("size", &self.size)
            .finish()
    }
}

impl FftConvolver {
    pub fn new(kernel: &[f64], signal_len: usize) -> Self {
        let kernel_len = kernel.len();
        let size = (signal_len + kernel_len).saturating_sub(1).max(1).next_power_of_two();
        let mut planner = FftPlanner::new();
        let fft_forward = planner.plan_fft_forward(size);
        let fft_inverse = planner.plan_fft_inverse(size);

        let mut kernel_spectrum = vec![Complex64::new(0., 0.); size];
        for (slot, &tap) in kernel_spectrum.iter_mut().zip(kernel.iter()) {
            *slot = Complex64::new(tap, 0.);
        }
        fft_forward.process(&mut kernel_spectrum);

        Self {
            kernel_len,
            signal_len,
            size,
            kernel_spectrum,
            fft_forward,
            fft_inverse,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn signal_len(&self) -> usize {
        self.signal_len
    }
}

impl Convolver for FftConvolver {
    fn kernel_len(&self) -> usize {
        self.kernel_len
    }

    fn convolve_same(&self, signal: &[f64]) -> Vec<f64> {
        debug_assert_eq!(signal.len(), self.signal_len, "planned for another signal length");
        let mut buffer = vec![Complex64::new(0., 0.); self.size];
        for (slot, &sample) in buffer.iter_mut().zip(signal.iter()) {
            *slot = Complex64::new(sample, 0.);
        }
        let mut scratch =
            vec![Complex64::new(0., 0.); self.fft_forward.get_inplace_scratch_len()];
        self.fft_forward.process_with_scratch(&mut buffer, &mut scratch);
        for (value, kernel) in buffer.iter_mut().zip(self.kernel_spectrum.iter()) {
            *value = *value * *kernel;
        }
        let mut scratch =
            vec![Complex64::new(0., 0.); self.fft_inverse.get_inplace_scratch_len()];
        self.fft_inverse.process_with_scratch(&mut buffer, &mut scratch);

        let scale = 1. / self.size as f64;
        let offset = self.center_offset();
        buffer[offset..offset + signal.len()]
            .iter()
            .map(|value| value.re * scale)
            .collect()
    }

    fn name(&self) -> &'static str {
        "fft"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::direct::DirectConvolver;

    fn kernel() -> Vec<f64> {
        (0..31)
            .map(|j| {
                let t = (j as f64 - 15.) * 0.002;
                let arg = (std::f64::consts::PI * 30. * t).powi(2);
                (1. - 2. * arg) * (-arg).exp()
            })
            .collect()
    }

    #[test]
    fn test_matches_direct_convolution() {
        let kernel = kernel();
        let signal: Vec<f64> = (0..200)
            .map(|i| if i % 37 == 0 { 0.1 * (i as f64).sin() } else { 0. })
            .collect();
        let direct = DirectConvolver::new(&kernel).convolve_same(&signal);
        let fft = FftConvolver::new(&kernel, signal.len()).convolve_same(&signal);
        assert_eq!(direct.len(), fft.len());
        for (a, b) in direct.iter().zip(fft.iter()) {
            assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_padded_to_power_of_two() {
        let conv = FftConvolver::new(&kernel(), 499);
        assert_eq!(conv.size(), 1024);
        assert_eq!(conv.signal_len(), 499);
    }
}
