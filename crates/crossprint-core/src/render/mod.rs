//! Frame scheduling and scene composition.
//!
//! The compositor turns [`AppState`](crate::state::AppState) into a
//! toolkit-independent [`Scene`]; front ends only translate scene primitives
//! into their own painter calls.

mod compose;
mod scene;
mod scheduler;

pub use compose::Compositor;
pub use scene::{colors, ImageLayer, LayerKey, Overlay, Scene};
pub use scheduler::{RenderScheduler, RepaintSink};
