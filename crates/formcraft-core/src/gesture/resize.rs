//! Resize math for field handles.
//!
//! A resize snapshots the field's rendered size and the pointer position on
//! press. Every move derives the new size from those originals, so the result
//! depends only on the total pointer delta and never accumulates drift.

use super::handles::{Edge, ResizeHandle};
use crate::schema::{FieldId, FieldWidth};
use kurbo::{Point, Size, Vec2};

/// Minimum rendered width of a field, in pixels.
pub const MIN_RESIZE_WIDTH: f64 = 100.0;
/// Minimum rendered height of a field, in pixels.
pub const MIN_RESIZE_HEIGHT: f64 = 40.0;

/// Size floor applied while resizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeLimits {
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self {
            min_width: MIN_RESIZE_WIDTH,
            min_height: MIN_RESIZE_HEIGHT,
        }
    }
}

/// Compute the size produced by dragging `handle` by `delta` from `start`.
///
/// Edge handles change only their own axis. Corner handles follow whichever
/// axis moved further and derive the other one from the starting aspect
/// ratio.
pub fn resized_size(start: Size, handle: ResizeHandle, delta: Vec2, limits: ResizeLimits) -> Size {
    match handle {
        ResizeHandle::Edge(edge) => {
            let (mut width, mut height) = (start.width, start.height);
            match edge {
                Edge::Right => width = (start.width + delta.x).max(limits.min_width),
                Edge::Left => width = (start.width - delta.x).max(limits.min_width),
                Edge::Bottom => height = (start.height + delta.y).max(limits.min_height),
                Edge::Top => height = (start.height - delta.y).max(limits.min_height),
            }
            Size::new(width, height)
        }
        ResizeHandle::Corner(corner) => {
            let aspect = aspect_ratio(start);
            let grow_x = delta.x * corner.x_sign();
            let grow_y = delta.y * corner.y_sign();

            let (mut width, mut height) = if delta.x.abs() >= delta.y.abs() {
                let width = start.width + grow_x;
                (width, width / aspect)
            } else {
                let height = start.height + grow_y;
                (height * aspect, height)
            };

            if width < limits.min_width {
                width = limits.min_width;
                height = width / aspect;
            }
            if height < limits.min_height {
                height = limits.min_height;
                width = height * aspect;
            }
            Size::new(width, height)
        }
    }
}

/// Width over height, guarding degenerate sizes.
pub fn aspect_ratio(size: Size) -> f64 {
    size.width.max(1.0) / size.height.max(1.0)
}

/// State of an in-progress resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    /// The field being resized.
    pub field_id: FieldId,
    /// The handle being dragged.
    pub handle: ResizeHandle,
    /// Pointer position on press.
    pub start_pointer: Point,
    /// Rendered size on press.
    pub start_size: Size,
    /// Live preview size.
    pub current_size: Size,
    limits: ResizeLimits,
}

impl ResizeSession {
    /// Start a resize from the field's rendered size and the press position.
    pub fn new(
        field_id: FieldId,
        handle: ResizeHandle,
        start_size: Size,
        start_pointer: Point,
        limits: ResizeLimits,
    ) -> Self {
        Self {
            field_id,
            handle,
            start_pointer,
            start_size,
            current_size: start_size,
            limits,
        }
    }

    /// Pointer delta since press.
    pub fn delta(&self, pointer: Point) -> Vec2 {
        pointer - self.start_pointer
    }

    /// Track the pointer and return the new preview size.
    pub fn update(&mut self, pointer: Point) -> Size {
        self.current_size = resized_size(self.start_size, self.handle, self.delta(pointer), self.limits);
        self.current_size
    }

    /// Check if the preview differs from the starting size.
    pub fn changed(&self) -> bool {
        (self.current_size.width - self.start_size.width).abs() > 0.1
            || (self.current_size.height - self.start_size.height).abs() > 0.1
    }

    /// Final width as a percentage of the parent container.
    pub fn width_percent(&self, container_width: f64) -> Option<FieldWidth> {
        FieldWidth::from_pixels(self.current_size.width, container_width)
    }
}
