use log::{log_enabled, warn, Level};
use std::time::Instant;

use crate::config::CAPACITY_WARNING_RATIO;

/// Simple scoped timer for profiling per-frame sections at trace level.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Option<Instant>,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        let start = log_enabled!(Level::Trace).then(Instant::now);
        Self { label, start }
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        if let Some(start) = self.start {
            log::trace!("{} took {} µs", self.label, start.elapsed().as_micros());
        }
    }
}

/// Warns when a fixed-size buffer is close to full.
pub fn warn_if_near_capacity(label: &str, used: usize, capacity: usize) -> bool {
    let near = capacity > 0 && used as f32 >= capacity as f32 * CAPACITY_WARNING_RATIO;
    if near {
        warn!("{label}: {used} of {capacity} entries used");
    }
    near
}
