//! Frame scheduling for the two render layers.
//!
//! Store listeners and tools mark layers dirty from inside `&self`
//! callbacks, so the flags are `Cell`s and the scheduler is shared behind an
//! `Rc`. The host owns the actual frame callback: `request` tells it whether
//! a new one must be scheduled, and `take_frame` consumes the dirty state
//! when the callback fires. Any number of requests between two frames
//! coalesce into one paint.

use std::cell::Cell;

/// Which layer a repaint request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Background, grid and committed shapes.
    Static,
    /// Previews, dragged shapes, selection chrome and overlays.
    Interactive,
}

/// Layers to repaint in the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyLayers {
    pub static_layer: bool,
    pub interactive: bool,
}

impl DirtyLayers {
    pub fn any(&self) -> bool {
        self.static_layer || self.interactive
    }
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    static_dirty: Cell<bool>,
    interactive_dirty: Cell<bool>,
    frame_pending: Cell<bool>,
    dragging: Cell<bool>,
    /// A static repaint was requested mid-drag.
    deferred_static: Cell<bool>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `layer` dirty. Returns `true` when the host has to schedule a
    /// frame callback; `false` if one is already pending or the request was
    /// deferred until the current drag ends.
    pub fn request(&self, layer: Layer) -> bool {
        match layer {
            Layer::Static if self.dragging.get() => {
                self.deferred_static.set(true);
                return false;
            }
            Layer::Static => self.static_dirty.set(true),
            Layer::Interactive => self.interactive_dirty.set(true),
        }
        self.schedule()
    }

    /// Mark both layers dirty (resize, theme change, document load).
    pub fn mark_all(&self) -> bool {
        self.static_dirty.set(true);
        self.interactive_dirty.set(true);
        self.deferred_static.set(false);
        self.schedule()
    }

    fn schedule(&self) -> bool {
        if self.frame_pending.get() {
            return false;
        }
        self.frame_pending.set(true);
        true
    }

    /// Enter or leave drag mode. Leaving flushes any deferred static repaint
    /// and returns whether a frame must be scheduled for it.
    pub fn set_dragging(&self, dragging: bool) -> bool {
        let was = self.dragging.replace(dragging);
        if was && !dragging && self.deferred_static.replace(false) {
            log::trace!("scheduler: flushing deferred static repaint");
            return self.request(Layer::Static);
        }
        false
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending.get()
    }

    /// Consume the dirty flags for the frame being painted now.
    pub fn take_frame(&self) -> DirtyLayers {
        self.frame_pending.set(false);
        DirtyLayers {
            static_layer: self.static_dirty.replace(false),
            interactive: self.interactive_dirty.replace(false),
        }
    }
}
