//! SDF raymarching engine.
//!
//! Collects scene shapes and lights each frame, packs them into the kernel's
//! record layout, dispatches the raymarch compute kernel and composites the
//! result onto the displayed frame. Also owns the platform + GPU runtime the
//! viewer runs on.

pub mod core;
pub mod device;
pub mod error;
pub mod layout;
pub mod logging;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;

pub use error::{RenderError, RenderResult};
