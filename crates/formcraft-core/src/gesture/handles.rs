//! Resize handle definitions.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Sign applied to a horizontal pointer delta to grow the width.
    pub fn x_sign(self) -> f64 {
        match self {
            Corner::TopLeft | Corner::BottomLeft => -1.0,
            Corner::TopRight | Corner::BottomRight => 1.0,
        }
    }

    /// Sign applied to a vertical pointer delta to grow the height.
    pub fn y_sign(self) -> f64 {
        match self {
            Corner::TopLeft | Corner::TopRight => -1.0,
            Corner::BottomLeft | Corner::BottomRight => 1.0,
        }
    }
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// One of the eight resize handles around a selected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    /// Corner handle: resizes both axes, keeping the aspect ratio.
    Corner(Corner),
    /// Edge midpoint handle: resizes a single axis.
    Edge(Edge),
}

impl ResizeHandle {
    /// All handles, corners first.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Corner(Corner::TopLeft),
        ResizeHandle::Corner(Corner::TopRight),
        ResizeHandle::Corner(Corner::BottomLeft),
        ResizeHandle::Corner(Corner::BottomRight),
        ResizeHandle::Edge(Edge::Top),
        ResizeHandle::Edge(Edge::Right),
        ResizeHandle::Edge(Edge::Bottom),
        ResizeHandle::Edge(Edge::Left),
    ];

    /// Check if this is a corner handle.
    pub fn is_corner(self) -> bool {
        matches!(self, ResizeHandle::Corner(_))
    }

    /// CSS cursor shown while hovering this handle.
    pub fn cursor(self) -> &'static str {
        match self {
            ResizeHandle::Corner(Corner::TopLeft | Corner::BottomRight) => "nwse-resize",
            ResizeHandle::Corner(Corner::TopRight | Corner::BottomLeft) => "nesw-resize",
            ResizeHandle::Edge(Edge::Top | Edge::Bottom) => "ns-resize",
            ResizeHandle::Edge(Edge::Left | Edge::Right) => "ew-resize",
        }
    }

    /// Position of this handle on a bounding rectangle.
    pub fn position(self, bounds: Rect) -> Point {
        let center = bounds.center();
        match self {
            ResizeHandle::Corner(Corner::TopLeft) => Point::new(bounds.x0, bounds.y0),
            ResizeHandle::Corner(Corner::TopRight) => Point::new(bounds.x1, bounds.y0),
            ResizeHandle::Corner(Corner::BottomLeft) => Point::new(bounds.x0, bounds.y1),
            ResizeHandle::Corner(Corner::BottomRight) => Point::new(bounds.x1, bounds.y1),
            ResizeHandle::Edge(Edge::Top) => Point::new(center.x, bounds.y0),
            ResizeHandle::Edge(Edge::Right) => Point::new(bounds.x1, center.y),
            ResizeHandle::Edge(Edge::Bottom) => Point::new(center.x, bounds.y1),
            ResizeHandle::Edge(Edge::Left) => Point::new(bounds.x0, center.y),
        }
    }
}

/// A positioned handle.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: ResizeHandle,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: ResizeHandle) -> Self {
        Self { position, kind }
    }

    /// Check if a point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The eight handles for a field's rendered bounds.
pub fn handles_for(bounds: Rect) -> Vec<Handle> {
    ResizeHandle::ALL
        .into_iter()
        .map(|kind| Handle::new(kind.position(bounds), kind))
        .collect()
}

/// Find which handle (if any) is hit at the given point.
/// Corners win over edges when both are within tolerance.
pub fn hit_test_handles(bounds: Rect, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    handles_for(bounds)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_handles() {
        let handles = handles_for(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(handles.len(), 8);
        assert_eq!(handles.iter().filter(|h| h.kind.is_corner()).count(), 4);
    }

    #[test]
    fn test_handle_positions() {
        let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(
            ResizeHandle::Edge(Edge::Right).position(bounds),
            Point::new(200.0, 50.0)
        );
        assert_eq!(
            ResizeHandle::Corner(Corner::BottomLeft).position(bounds),
            Point::new(0.0, 100.0)
        );
    }

    #[test]
    fn test_hit_test() {
        let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(
            hit_test_handles(bounds, Point::new(198.0, 2.0), HANDLE_HIT_TOLERANCE),
            Some(ResizeHandle::Corner(Corner::TopRight))
        );
        assert_eq!(
            hit_test_handles(bounds, Point::new(100.0, 101.0), HANDLE_HIT_TOLERANCE),
            Some(ResizeHandle::Edge(Edge::Bottom))
        );
        assert_eq!(
            hit_test_handles(bounds, Point::new(100.0, 50.0), HANDLE_HIT_TOLERANCE),
            None
        );
    }

    #[test]
    fn test_cursor() {
        assert_eq!(ResizeHandle::Edge(Edge::Left).cursor(), "ew-resize");
        assert_eq!(ResizeHandle::Corner(Corner::TopLeft).cursor(), "nwse-resize");
    }
}
