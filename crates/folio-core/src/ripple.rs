#![forbid(unsafe_code)]

//! Button ripple geometry.

use crate::geometry::Rect;

/// Class applied to the transient ripple element.
pub const RIPPLE_CLASS: &str = "ripple-effect";

/// Size and position of a ripple inside its button, in button-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    /// Square ripple as large as the button's longer side, centred on the
    /// click. `button` and the click point share viewport coordinates.
    #[must_use]
    pub fn from_click(button: Rect, client_x: f64, client_y: f64) -> Self {
        let size = button.max_side();
        Self {
            size,
            left: client_x - button.left() - size / 2.0,
            top: client_y - button.top() - size / 2.0,
        }
    }

    /// Inline style properties to apply.
    #[must_use]
    pub fn style(&self) -> [(&'static str, String); 4] {
        [
            ("width", format!("{}px", self.size)),
            ("height", format!("{}px", self.size)),
            ("left", format!("{}px", self.left)),
            ("top", format!("{}px", self.top)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centred_on_click() {
        let g = RippleGeometry::from_click(Rect::new(100.0, 50.0, 120.0, 40.0), 160.0, 70.0);
        assert_eq!(
            g,
            RippleGeometry {
                size: 120.0,
                left: 0.0,
                top: -40.0
            }
        );
    }

    #[test]
    fn style_uses_pixels() {
        let g = RippleGeometry {
            size: 80.0,
            left: 4.5,
            top: -2.0,
        };
        let style = g.style();
        assert_eq!(style[0], ("width", "80px".to_string()));
        assert_eq!(style[2], ("left", "4.5px".to_string()));
        assert_eq!(style[3], ("top", "-2px".to_string()));
    }
}
