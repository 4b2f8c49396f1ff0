// meridian_core/src/lib.rs

//! Pure algorithms for the meridian driving simulator.
//!
//! This crate holds everything that can be computed without a runtime:
//! planar geometry, the centreline/Frenet machinery, the vehicle dynamics
//! models, the 2D LiDAR model, the obstacle model and the message structs
//! exchanged between simulation nodes. The scheduling runtime lives in the
//! sibling `meridian_sim` crate.

pub mod centerline;
pub mod geometry;
pub mod messages;
pub mod models;
pub mod obstacle;
pub mod prelude;
pub mod types;
