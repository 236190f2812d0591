#![forbid(unsafe_code)]

//! Geometric primitives and element handles.

/// Opaque handle for one page element, issued by the host.
///
/// Handles are stable for the element's lifetime; the core never interprets
/// the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Raw handle value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for ElementId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// A rectangle in CSS pixels.
///
/// Whether the origin is the viewport or the document depends on the caller;
/// [`crate::scroll::SectionDescriptor`] always uses document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge (alias for y).
    #[inline]
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Left edge (alias for x).
    #[inline]
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Translate vertically, e.g. viewport → document coordinates.
    #[inline]
    #[must_use]
    pub fn offset_y(self, dy: f64) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }

    /// Larger of width and height.
    #[inline]
    #[must_use]
    pub fn max_side(&self) -> f64 {
        self.width.max(self.height)
    }
}
