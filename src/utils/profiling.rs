/// Counters gathered while one frame's light data is built.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LightsFrameStats {
    pub uniform_lights: usize,
    pub cone_lights: usize,
    pub local_lights: usize,

    pub collision_queries: usize,
    pub sphere_tests: usize,
    pub empty_ranges: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub combination_entries: usize,
    pub distinct_combinations: usize,
}

impl LightsFrameStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Share of non-empty queries answered from the combination cache.
    pub fn hit_ratio(&self) -> f32 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            return 0.0;
        }
        self.cache_hits as f32 / lookups as f32
    }

    pub fn report(&self, frame_index: u64) {
        if self.collision_queries == 0 && self.local_lights + self.cone_lights == 0 {
            return;
        }

        log::debug!(
            "frame {frame_index}: lights uniform={} cone={} local={}",
            self.uniform_lights,
            self.cone_lights,
            self.local_lights
        );
        log::debug!(
            "frame {frame_index}: {} queries, {} sphere tests, {} empty",
            self.collision_queries,
            self.sphere_tests,
            self.empty_ranges
        );
        log::debug!(
            "frame {frame_index}: {} hits / {} misses ({:.1}%), {} sets in {} index entries",
            self.cache_hits,
            self.cache_misses,
            self.hit_ratio() * 100.0,
            self.distinct_combinations,
            self.combination_entries
        );
    }
}
