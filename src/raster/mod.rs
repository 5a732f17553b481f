pub(crate) mod ops;
/// Uniform scaling and letterbox fitting.
pub mod resample;
/// Bounded reusable RGBA surfaces.
pub mod surface_pool;
