use super::traits::Convolver;

/// Time-domain convolution, O(N·M) per trace.
#[derive(Clone, Debug)]
pub struct DirectConvolver {
    kernel: Vec<f64>,
}

impl DirectConvolver {
    pub fn new(kernel: &[f64]) -> Self {
        Self {
            kernel: kernel.to_vec(),
        }
    }
}

impl Convolver for DirectConvolver {
    fn kernel_len(&self) -> usize {
        self.kernel.len()
    }

    fn convolve_same(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        let m = self.kernel.len();
        let offset = self.center_offset();
        let mut out = vec![0.; n];
        for (k, value) in out.iter_mut().enumerate() {
            // full[j] = sum_i signal[i] * kernel[j - i], with j = k + offset
            let j = k + offset;
            let i_min = (j + 1).saturating_sub(m);
            let i_max = j.min(n - 1);
            let mut acc = 0.;
            for i in i_min..=i_max {
                acc += signal[i] * self.kernel[j - i];
            }
            *value = acc;
        }
        out
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}
