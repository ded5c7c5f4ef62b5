//! Convex bounding volumes: oriented parallelepipeds, oriented boxes and spheres.

pub mod obb;
pub mod paralgram;
pub mod sphere;

pub use obb::{Aabb, Obb};
pub use paralgram::{Paralgram, SideDirections};
pub use sphere::Sphere;
