// meridian_core/src/models/perception/mod.rs

//! Perception sensor models.

pub mod lidar_2d;

pub use lidar_2d::Lidar2dModel;
