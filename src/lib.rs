//! Light Cluster – spatial culling and light clustering for real-time renderers.
//!
//! Every test is an exact convex-shape intersection on [`Paralgram`]s
//! (oriented parallelepipeds): box-vs-box through the separating axis
//! theorem, sphere-vs-box for light volumes and plane-vs-box for view
//! frustums. On top of that, [`Lights`] collides each drawable instance with
//! the frame's local lights and interns the resulting light index sets into
//! one bounded, deduplicated index array shared by all instances.

pub mod config;
pub mod culling;
pub mod error;
pub mod geometry;
pub mod lights;
pub mod utils;

pub use glam::{Mat4, Vec3};

pub use config::LightsConfig;
pub use culling::{FrustumCulling, Plane};
pub use error::ClusterError;
pub use geometry::{Aabb, Obb, Paralgram, SideDirections, Sphere};
pub use lights::{
    LightId, LightInfo, LightParameters, LightType, Lights, LightsFrameView, LightsIndicesRange,
};
pub use utils::LightsFrameStats;
