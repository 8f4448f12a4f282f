//! Scene model and collection.
//!
//! Responsibilities:
//! - describe shape/light entities, the camera and render toggles
//! - provide an explicit registry the frame driver queries (no global scans)
//! - project live entities into GPU records in evaluation order

mod camera;
mod collect;
mod color;
mod config;
mod light;
mod registry;
mod shape;
mod transform;

pub use camera::{Camera, CameraFrame};
pub use collect::{collect_lights, collect_shapes, light_record, shape_record};
pub use color::Color;
pub use config::RenderConfig;
pub use light::{LightEntity, LightKind};
pub use registry::{EntityId, SceneProvider, SceneRegistry};
pub use shape::{CombineMode, FRACTAL_POWER_RANGE, Material, ShapeEntity, ShapeKind};
pub use transform::{DEG_TO_RAD, Transform};
