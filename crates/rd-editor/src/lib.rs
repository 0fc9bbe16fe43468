pub mod editor;
pub mod gesture;
pub mod input;
pub mod manager;
pub mod shortcuts;
pub mod state;
pub mod tools;

pub use editor::Editor;
pub use gesture::{GestureTracker, GestureUpdate};
pub use input::{KeyEvent, Modifiers, PointerButton, PointerInput, PointerKind, WheelInput};
pub use manager::ToolManager;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use state::{TextEditRegion, TextEditSession, ToolPhase, ToolState};
pub use tools::{Cursor, Tool, ToolEventContext, ToolKind, ToolRequest, ToolResult};

// Re-export the lower layers so hosts don't need a direct dependency.
pub use rd_core;
pub use rd_render;
