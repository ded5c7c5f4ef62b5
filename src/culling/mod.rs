//! Visibility culling of instance bounding volumes.

pub mod frustum;

pub use frustum::{FrustumCulling, Plane, FRUSTUM_PLANE_COUNT};
