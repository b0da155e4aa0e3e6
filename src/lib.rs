//! Noisefield library - deterministic lane-parallel procedural noise
//!
//! Hash-driven lattice and Voronoi noise evaluated in fixed 4-wide lanes,
//! composed at configuration time from interchangeable lattice policies and
//! gradient/Voronoi strategies. Drives surface displacement and coloring in
//! real-time visualizations; the rendering, scheduling and shape-generation
//! layers live outside this crate and only see position slices in and float
//! slices out.

pub mod batch;
pub mod gradient;
pub mod hash;
pub mod lattice;
pub mod noise;
pub mod params;
pub mod voronoi;

pub use batch::{NoiseField, PositionBatch};
pub use params::{Domain, Settings};
