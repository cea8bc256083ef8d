//! Gesture controller for the editor canvas.
//!
//! Three interactions share one pointer channel: dragging a palette entry in
//! to create a field, dragging a field to reorder it, and dragging a handle to
//! resize the selected field. A typed [`DragPayload`] tells the first two
//! apart. Resizing holds the pointer directly and excludes dragging.

pub mod handles;
pub mod resize;

pub use handles::{
    Corner, Edge, HANDLE_HIT_TOLERANCE, HANDLE_SIZE, Handle, ResizeHandle, handles_for, hit_test_handles,
};
pub use resize::{MIN_RESIZE_HEIGHT, MIN_RESIZE_WIDTH, ResizeLimits, ResizeSession, resized_size};

use crate::schema::{FieldId, FieldType};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gesture precondition failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GestureError {
    #[error("A drag is already in progress")]
    DragInProgress,
    #[error("A resize is already in progress")]
    ResizeInProgress,
    #[error("Field is not selected: {0}")]
    NotSelected(FieldId),
    #[error("Field not found: {0}")]
    FieldNotFound(FieldId),
    #[error("Invalid drag payload: {0}")]
    InvalidPayload(String),
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event routed to the controller while it holds the capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
    /// The platform aborted the pointer sequence.
    Cancel,
}

/// What a drag carries, tagged so create and reorder cannot be confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragPayload {
    /// A palette entry: drop appends a new field of this type.
    Create {
        #[serde(rename = "fieldType")]
        field_type: FieldType,
    },
    /// An existing field: drop moves it to the hovered position.
    Reorder {
        #[serde(rename = "sourceIndex")]
        source_index: usize,
    },
}

impl DragPayload {
    /// Encode for a text data-transfer channel.
    pub fn encode(&self) -> Result<String, GestureError> {
        serde_json::to_string(self).map_err(|e| GestureError::InvalidPayload(e.to_string()))
    }

    /// Decode from a text data-transfer channel.
    /// Foreign or malformed data yields `None`.
    pub fn decode(data: &str) -> Option<Self> {
        serde_json::from_str(data).ok()
    }
}

/// Result of a completed drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Append a new field of this type.
    Create(FieldType),
    /// Move the field at `from` to `to`.
    Reorder { from: usize, to: usize },
}

/// What a routed pointer event did.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// No gesture wanted the event.
    Ignored,
    /// Resize preview changed.
    Preview(Size),
    /// Resize released. The session holds the final preview.
    ResizeEnded(ResizeSession),
    /// The active gesture was abandoned.
    Cancelled,
}

/// Current gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        payload: DragPayload,
        hover: Option<usize>,
    },
    Resizing(ResizeSession),
}

/// Owns the active gesture for one editor instance.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    state: GestureState,
    limits: ResizeLimits,
}

impl GestureController {
    /// Create an idle controller.
    pub fn new(limits: ResizeLimits) -> Self {
        Self {
            state: GestureState::Idle,
            limits,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, GestureState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, GestureState::Resizing(_))
    }

    /// Check if pointer events should be routed here.
    pub fn captures_pointer(&self) -> bool {
        !self.is_idle()
    }

    /// Start a drag with the given payload.
    pub fn begin_drag(&mut self, payload: DragPayload) -> Result<(), GestureError> {
        match self.state {
            GestureState::Idle => {
                log::debug!("Drag started: {:?}", payload);
                self.state = GestureState::Dragging { payload, hover: None };
                Ok(())
            }
            GestureState::Dragging { .. } => Err(GestureError::DragInProgress),
            GestureState::Resizing(_) => Err(GestureError::ResizeInProgress),
        }
    }

    /// Start dragging a palette entry.
    pub fn begin_palette_drag(&mut self, field_type: FieldType) -> Result<(), GestureError> {
        self.begin_drag(DragPayload::Create { field_type })
    }

    /// Start dragging the field at `source_index`.
    pub fn begin_field_drag(&mut self, source_index: usize) -> Result<(), GestureError> {
        self.begin_drag(DragPayload::Reorder { source_index })
    }

    /// Record the position currently hovered by a drag.
    pub fn drag_over(&mut self, index: usize) {
        if let GestureState::Dragging { hover, .. } = &mut self.state {
            *hover = Some(index);
        }
    }

    /// The hovered drop position, if dragging.
    pub fn hover_target(&self) -> Option<usize> {
        match self.state {
            GestureState::Dragging { hover, .. } => hover,
            _ => None,
        }
    }

    /// Finish a drag. `target` overrides the last hovered position.
    ///
    /// A reorder onto its own position, or with no position at all, yields
    /// nothing. The controller is idle afterwards in every case.
    pub fn drop(&mut self, target: Option<usize>) -> Option<DropOutcome> {
        let GestureState::Dragging { payload, hover } = self.state else {
            return None;
        };
        self.state = GestureState::Idle;
        let outcome = Self::resolve(payload, target.or(hover));
        log::debug!("Drop: {:?}", outcome);
        outcome
    }

    /// Finish a drag using a payload read back from the data-transfer channel.
    ///
    /// Used when the drop site only sees the encoded payload. Undecodable data
    /// cancels the gesture.
    pub fn drop_encoded(&mut self, data: &str, target: Option<usize>) -> Option<DropOutcome> {
        let hover = self.hover_target();
        self.cancel();
        match DragPayload::decode(data) {
            Some(payload) => Self::resolve(payload, target.or(hover)),
            None => {
                log::debug!("Ignored drop with foreign payload");
                None
            }
        }
    }

    fn resolve(payload: DragPayload, target: Option<usize>) -> Option<DropOutcome> {
        match payload {
            DragPayload::Create { field_type } => Some(DropOutcome::Create(field_type)),
            DragPayload::Reorder { source_index } => match target {
                Some(to) if to != source_index => Some(DropOutcome::Reorder { from: source_index, to }),
                _ => None,
            },
        }
    }

    /// Abandon any active gesture and release the pointer.
    pub fn cancel(&mut self) -> bool {
        let was_active = !self.is_idle();
        if was_active {
            log::debug!("Gesture cancelled");
        }
        self.state = GestureState::Idle;
        was_active
    }

    /// Press on a resize handle of `field_id`.
    pub fn begin_resize(
        &mut self,
        field_id: FieldId,
        handle: ResizeHandle,
        rendered_size: Size,
        pointer: Point,
    ) -> Result<(), GestureError> {
        match self.state {
            GestureState::Idle => {
                log::debug!("Resize started on {} via {:?}", field_id, handle);
                self.state = GestureState::Resizing(ResizeSession::new(
                    field_id,
                    handle,
                    rendered_size,
                    pointer,
                    self.limits,
                ));
                Ok(())
            }
            GestureState::Dragging { .. } => Err(GestureError::DragInProgress),
            GestureState::Resizing(_) => Err(GestureError::ResizeInProgress),
        }
    }

    /// Track the pointer during a resize. Returns the preview size.
    pub fn resize_move(&mut self, pointer: Point) -> Option<Size> {
        match &mut self.state {
            GestureState::Resizing(session) => Some(session.update(pointer)),
            _ => None,
        }
    }

    /// The live resize preview, if resizing.
    pub fn preview(&self) -> Option<(&str, Size)> {
        match &self.state {
            GestureState::Resizing(session) => Some((session.field_id.as_str(), session.current_size)),
            _ => None,
        }
    }

    /// Release a resize and hand back the finished session.
    pub fn end_resize(&mut self) -> Option<ResizeSession> {
        match std::mem::take(&mut self.state) {
            GestureState::Resizing(session) => {
                log::debug!("Resize ended at {:?}", session.current_size);
                Some(session)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Route a pointer event. Only resizes consume raw pointer events.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        if !self.is_resizing() {
            return match event {
                PointerEvent::Cancel if self.cancel() => PointerOutcome::Cancelled,
                _ => PointerOutcome::Ignored,
            };
        }
        match event {
            PointerEvent::Move { position } => match self.resize_move(position) {
                Some(size) => PointerOutcome::Preview(size),
                None => PointerOutcome::Ignored,
            },
            PointerEvent::Up { position, .. } => {
                self.resize_move(position);
                match self.end_resize() {
                    Some(session) => PointerOutcome::ResizeEnded(session),
                    None => PointerOutcome::Ignored,
                }
            }
            PointerEvent::Cancel => {
                self.cancel();
                PointerOutcome::Cancelled
            }
            PointerEvent::Down { .. } => PointerOutcome::Ignored,
        }
    }
}
