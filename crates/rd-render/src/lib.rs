pub mod cache;
pub mod freehand;
pub mod overlay;
pub mod paint;
pub mod pipeline;
pub mod rough;
pub mod scheduler;
pub mod theme;

pub use cache::{CacheStats, DragCache};
pub use overlay::{Label, OverlayItem};
pub use paint::{CustomPainter, ImageRun, PaintContext, PainterRegistry, Run, TextRun};
pub use pipeline::{RenderPipeline, RenderStats, Transient};
pub use scheduler::{DirtyLayers, FrameScheduler, Layer};
pub use theme::{Theme, ThemeTokens};

// Re-export the Vello scene type so hosts submit the layers without a direct dependency
pub use vello::Scene;
