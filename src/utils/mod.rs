//! Utility helpers: math extensions, logging and per-frame statistics.

pub mod logging;
pub mod math;
pub mod profiling;

pub use profiling::LightsFrameStats;
