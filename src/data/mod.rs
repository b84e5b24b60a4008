/// Data layer: spectrum type and text loading.
///
/// Architecture:
/// ```text
///  two-column .txt  (header + "freq  intensity" rows)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Spectrum
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Spectrum  │  frequency: Vec<f64>, intensity: Vec<f64>
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
