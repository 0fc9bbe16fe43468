pub mod config;
pub mod document;
pub mod geometry;
pub mod handles;
pub mod hit;
pub mod history;
pub mod id;
pub mod model;
pub mod registry;
pub mod resize;
pub mod rng;
pub mod scene;
pub mod store;
pub mod text;
pub mod viewport;

pub use config::EditorConfig;
pub use document::{Document, DocumentError};
pub use handles::{ResizeHandle, SelectionFrame};
pub use history::{History, HistoryAction, HistoryEntry};
pub use id::ShapeId;
pub use model::*;
pub use registry::{ShapeBehavior, ShapeRegistry};
pub use scene::Scene;
pub use store::{ListenerId, Store, StoreChange};
pub use text::{EstimateMeasure, TextLayout, TextMeasure};
pub use viewport::Viewport;

// Re-export kurbo so downstream crates agree on the geometry types.
pub use kurbo;
