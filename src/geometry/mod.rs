mod aabb;
mod ray;
mod triangle;

pub use aabb::Aabb;
pub use ray::{HitRecord, Ray};
pub use triangle::{intersect_triangle, triangle_aabb, Triangle, Vertex};
