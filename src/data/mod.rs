/// Data layer: core types, weights files, and host CSV glue.
///
/// Architecture:
/// ```text
///  weights.txt                 data.csv (host only)
///       │                           │
///       ▼                           ▼
///   ┌──────────┐              ┌──────────┐
///   │ weights  │  Vec<f64>    │  loader  │  parse → Dataset
///   └──────────┘              └──────────┘
///       │                           │
///       └───────────┬───────────────┘
///                   ▼
///            ┌─────────────┐
///            │   model     │  Schema + Vec<Row>
///            └─────────────┘
/// ```

pub mod loader;
pub mod model;
pub mod weights;
