/// Acquisition: tune a sample source, capture, and estimate line power.
///
/// ```text
///   SampleSource ──configure/read──▶ samples
///        │
///        ▼
///   FFT (first fft_size samples) ─▶ PowerSpectrum (shifted, absolute Hz)
///        │
///        ▼
///   signal bin @ center, mean noise ─▶ Acquisition
/// ```

pub mod pipeline;
pub mod source;

pub use pipeline::{acquire, compute_power_spectrum, reduce_noise, Acquisition, PowerSpectrum};
pub use source::{SampleSource, SyntheticSource};

#[cfg(feature = "rtlsdr")]
pub use source::RtlSdrSource;
