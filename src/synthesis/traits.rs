/// A "same"-length convolution of one trace with a fixed odd-length kernel.
///
/// Output sample `k` is sample `k + (M - 1) / 2` of the full linear
/// convolution, so a spike at `k` yields the kernel centred on `k`.
/// Implementations must be shareable across rayon workers.
pub trait Convolver: Send + Sync {
    fn kernel_len(&self) -> usize;

    fn convolve_same(&self, signal: &[f64]) -> Vec<f64>;

    fn name(&self) -> &'static str;

    /// Offset of the centred window inside the full convolution.
    fn center_offset(&self) -> usize {
        (self.kernel_len() - 1) / 2
    }
}
