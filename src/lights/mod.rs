//! Per-instance light clustering.
//!
//! [`Lights`] owns the light entity ids (persisting across frames) and the
//! per-frame light data: packed parameters, broad-phase spheres and the shared,
//! deduplicated light index array. Every frame follows the same sequence:
//!
//! 1. [`Lights::prepare_new_frame`] drops the previous frame's data.
//! 2. [`Lights::add_lights`] registers the visible lights.
//! 3. [`Lights::create_lights_cones_range`] and
//!    [`Lights::create_collided_lights_range`] (once per instance) hand out
//!    ranges into the shared index array.
//! 4. An external writer copies [`Lights::frame_output`] into GPU memory.
//!
//! Misuse of that sequence is a programming error and panics.

pub mod combinations;
pub mod entities;
pub mod types;

pub use combinations::{CombinationCache, Interned};
pub use entities::{LightEntities, LightId};
pub use types::{LightInfo, LightParameters, LightType, LightsIndicesRange};

use glam::{Mat4, Vec3};

use crate::{
    config::LightsConfig,
    error::Result,
    geometry::{Paralgram, Sphere},
    utils::{
        logging::{warn_if_near_capacity, ScopedTimer},
        profiling::LightsFrameStats,
    },
};

/// Local light sphere tagged with its slot in the parameter array.
#[derive(Debug, Clone, Copy)]
struct LightSphere {
    light_offset: u16,
    sphere: Sphere,
}

/// Light data of one finished frame, ready for the buffer writer.
#[derive(Debug, Clone, Copy)]
pub struct LightsFrameView<'a> {
    pub frame_index: u64,
    /// Slot of the host-visible ring buffer this frame belongs to.
    pub ring_slot: usize,
    pub parameters: &'a [LightParameters],
    pub combinations: &'a [u16],
    pub uniform_luminance: Vec3,
}

impl<'a> LightsFrameView<'a> {
    pub fn parameter_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.parameters)
    }

    pub fn combination_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.combinations)
    }
}

/// Light entities plus the per-frame clustering state.
pub struct Lights {
    config: LightsConfig,
    entities: LightEntities,
    frame_index: Option<u64>,
    parameters: Vec<LightParameters>,
    spheres: Vec<LightSphere>,
    cone_indices: Vec<u16>,
    combinations: CombinationCache,
    uniform_luminance: Vec3,
    collided: Vec<u16>,
    stats: LightsFrameStats,
}

impl Default for Lights {
    fn default() -> Self {
        Self::with_valid_config(LightsConfig::default())
    }
}

impl Lights {
    pub fn new(config: LightsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: LightsConfig) -> Self {
        log::info!(
            "light clustering: {} lights, {} combination entries, {} frames in flight",
            config.max_lights,
            config.max_light_combinations_size,
            config.frames_in_flight
        );
        Self {
            config,
            entities: LightEntities::new(config.max_lights),
            frame_index: None,
            parameters: Vec::with_capacity(config.max_lights),
            spheres: Vec::with_capacity(config.max_lights),
            cone_indices: Vec::new(),
            combinations: CombinationCache::new(config.max_light_combinations_size),
            uniform_luminance: Vec3::ZERO,
            collided: Vec::new(),
            stats: LightsFrameStats::default(),
        }
    }

    pub fn config(&self) -> &LightsConfig {
        &self.config
    }

    pub fn add_light_entity(&mut self) -> LightId {
        let id = self.entities.add();
        log::trace!("added light entity {id:?}");
        id
    }

    /// Releases a light id for reuse.
    ///
    /// The caller guarantees that no frame still in flight references the
    /// light; this is not tracked here.
    pub fn remove_light_entity_safe(&mut self, id: LightId) {
        self.entities.remove(id);
        log::trace!("removed light entity {id:?}");
    }

    pub fn is_light_entity_live(&self, id: LightId) -> bool {
        self.entities.is_live(id)
    }

    pub fn light_entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Starts a frame: every per-frame container is emptied.
    pub fn prepare_new_frame(&mut self, frame_index: u64) {
        if let Some(previous) = self.frame_index {
            self.stats.report(previous);
            warn_if_near_capacity(
                "light combinations",
                self.combinations.len(),
                self.combinations.capacity(),
            );
        }

        self.parameters.clear();
        self.spheres.clear();
        self.cone_indices.clear();
        self.combinations.clear();
        self.uniform_luminance = Vec3::ZERO;
        self.stats.reset();
        self.frame_index = Some(frame_index);
    }

    /// Registers this frame's lights.
    ///
    /// Uniform lights only add to the ambient luminance. Every other light gets
    /// a slot in the parameter array, written back to
    /// [`LightInfo::light_offset`]; local lights also get a broad-phase sphere
    /// around the translation of `model_matrices[matrices_offset]`.
    ///
    /// # Panics
    /// Before [`Lights::prepare_new_frame`], for lights whose entity is not
    /// live, past `max_lights`, or when a local light's matrix is missing.
    pub fn add_lights(&mut self, light_infos: &mut [LightInfo], model_matrices: &[Mat4]) {
        self.assert_frame_prepared("add_lights");
        let _timer = ScopedTimer::new("add_lights");

        for info in light_infos.iter_mut() {
            assert!(
                self.entities.is_index_live(info.light_index),
                "light index {} is not a live light entity",
                info.light_index
            );

            if info.light_type == LightType::Uniform {
                self.uniform_luminance += info.luminance;
                info.light_offset = None;
                self.stats.uniform_lights += 1;
                continue;
            }

            assert!(
                self.parameters.len() < self.config.max_lights,
                "more than {} lights added in one frame",
                self.config.max_lights
            );
            let light_offset = self.parameters.len() as u16;
            self.parameters.push(LightParameters::from_info(info));
            info.light_offset = Some(light_offset);

            if !info.light_type.is_local() {
                self.cone_indices.push(light_offset);
                self.stats.cone_lights += 1;
                continue;
            }

            let matrix = match model_matrices.get(info.matrices_offset as usize) {
                Some(matrix) => matrix,
                None => panic!(
                    "light {} references model matrix {} of {}",
                    info.light_index,
                    info.matrices_offset,
                    model_matrices.len()
                ),
            };
            let radius = info.influence_radius();
            if !radius.is_finite() || radius < 0.0 {
                log::warn!(
                    "light {} has invalid influence radius {radius}",
                    info.light_index
                );
            }
            self.spheres.push(LightSphere {
                light_offset,
                sphere: Sphere::new(matrix.w_axis.truncate(), radius),
            });
            self.stats.local_lights += 1;
        }
    }

    /// Range holding every cone light, shared by all instances.
    pub fn create_lights_cones_range(&mut self) -> LightsIndicesRange {
        self.assert_frame_prepared("create_lights_cones_range");
        self.intern(false)
    }

    /// Range of the local lights whose sphere touches `paralgram`.
    ///
    /// Lights are listed in the order they were added, so equal light sets
    /// map to the same range without growing the index array.
    pub fn create_collided_lights_range(&mut self, paralgram: &Paralgram) -> LightsIndicesRange {
        self.assert_frame_prepared("create_collided_lights_range");
        self.stats.collision_queries += 1;
        self.stats.sphere_tests += self.spheres.len();

        self.collided.clear();
        for light in &self.spheres {
            if light.sphere.intersects_paralgram(paralgram) {
                self.collided.push(light.light_offset);
            }
        }

        if self.collided.is_empty() {
            self.stats.empty_ranges += 1;
            return LightsIndicesRange::EMPTY;
        }
        self.intern(true)
    }

    fn intern(&mut self, collided: bool) -> LightsIndicesRange {
        let set = if collided {
            &self.collided
        } else {
            &self.cone_indices
        };
        if set.is_empty() {
            return LightsIndicesRange::EMPTY;
        }

        let interned = self.combinations.intern(set);
        let range = interned.range();
        match interned {
            Interned::Cached(_) => {
                self.stats.cache_hits += 1;
                log::trace!("light combination {set:?} reused at {range:?}");
            }
            Interned::Appended(_) => {
                self.stats.cache_misses += 1;
                self.stats.combination_entries = self.combinations.len();
                self.stats.distinct_combinations = self.combinations.combination_count();
                log::trace!("new light combination {set:?} at {range:?}");
            }
        }
        range
    }

    pub fn parameters(&self) -> &[LightParameters] {
        &self.parameters
    }

    pub fn combinations(&self) -> &[u16] {
        self.combinations.indices()
    }

    pub fn uniform_luminance(&self) -> Vec3 {
        self.uniform_luminance
    }

    pub fn frame_index(&self) -> Option<u64> {
        self.frame_index
    }

    pub fn stats(&self) -> &LightsFrameStats {
        &self.stats
    }

    /// Everything the buffer writer copies for the current frame.
    pub fn frame_output(&self) -> LightsFrameView<'_> {
        let frame_index = self.assert_frame_prepared("frame_output");
        LightsFrameView {
            frame_index,
            ring_slot: (frame_index % self.config.frames_in_flight as u64) as usize,
            parameters: &self.parameters,
            combinations: self.combinations.indices(),
            uniform_luminance: self.uniform_luminance,
        }
    }

    fn assert_frame_prepared(&self, operation: &str) -> u64 {
        match self.frame_index {
            Some(frame_index) => frame_index,
            None => panic!("{operation} called before prepare_new_frame"),
        }
    }
}
