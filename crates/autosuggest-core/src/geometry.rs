//! Geometry types read back from the host layout engine.
//!
//! The widget never computes layout itself. These types carry what the
//! document reports (bounding boxes, viewport metrics) into the positioner.

/// A point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

/// A width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };
}

/// A rectangle defined by origin and size, in viewport coordinates unless
/// stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from origin and size.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Empty rectangle at origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    /// Left edge x coordinate.
    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Top edge y coordinate.
    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Right edge x coordinate.
    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge y coordinate.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Offset the rectangle by the given amount.
    #[inline]
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            origin: Point {
                x: self.origin.x + dx,
                y: self.origin.y + dy,
            },
            size: self.size,
        }
    }
}

/// Window and root-element metrics needed to convert viewport coordinates
/// into document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// `window.innerWidth`.
    pub inner_width: f32,
    /// `window.innerHeight`.
    pub inner_height: f32,
    /// Horizontal page scroll (`window.pageXOffset`).
    pub scroll_x: f32,
    /// Vertical page scroll (`window.pageYOffset`).
    pub scroll_y: f32,
    /// Left border width of the document root (`clientLeft`).
    pub client_left: f32,
    /// Top border width of the document root (`clientTop`).
    pub client_top: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            inner_width: 1024.0,
            inner_height: 768.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            client_left: 0.0,
            client_top: 0.0,
        }
    }
}

impl Viewport {
    /// Convert a viewport-relative rectangle into document coordinates.
    pub fn to_document(&self, rect: Rect) -> Rect {
        rect.offset(
            self.scroll_x - self.client_left,
            self.scroll_y - self.client_top,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 30.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 50.0);
    }

    #[test]
    fn test_viewport_to_document() {
        let viewport = Viewport {
            scroll_x: 5.0,
            scroll_y: 300.0,
            client_left: 1.0,
            client_top: 2.0,
            ..Viewport::default()
        };
        let rect = viewport.to_document(Rect::new(10.0, 20.0, 100.0, 30.0));
        assert_eq!(rect.left(), 14.0);
        assert_eq!(rect.top(), 318.0);
        assert_eq!(rect.size, Size::new(100.0, 30.0));
    }
}
