//! Top-level facade crate for metricscope.
//!
//! Re-exports the data model and the export/query layer so users can depend on a single crate.

pub mod core {
    pub use metricscope_core::*;
}

pub mod export {
    pub use metricscope_export::*;
}
