use serde::{Deserialize, Serialize};

use crate::geom::Rect;

/// The browsing viewport: window size, scroll offsets and scrollbar gutters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Window inner width, including any vertical scrollbar.
    pub inner_width: f64,
    /// Window inner height, including any horizontal scrollbar.
    pub inner_height: f64,
    /// Horizontal page scroll.
    pub scroll_x: f64,
    /// Vertical page scroll.
    pub scroll_y: f64,
    /// Width taken by a vertical scrollbar.
    pub scrollbar_width: f64,
    /// Height taken by a horizontal scrollbar.
    pub scrollbar_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            inner_width: 1024.0,
            inner_height: 768.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            scrollbar_width: 0.0,
            scrollbar_height: 0.0,
        }
    }
}

impl Viewport {
    /// A viewport of the given size with no scroll and no scrollbars.
    pub fn new(inner_width: f64, inner_height: f64) -> Self {
        Self {
            inner_width,
            inner_height,
            ..Self::default()
        }
    }

    /// The rect of a fixed element filling the viewport: the window minus the
    /// scrollbar gutters. This is the authoritative client area.
    pub fn usable(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            (self.inner_width - self.scrollbar_width).max(0.0),
            (self.inner_height - self.scrollbar_height).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usable_area_excludes_gutters() {
        let vp = Viewport {
            scrollbar_width: 15.0,
            ..Viewport::new(800.0, 600.0)
        };
        assert_eq!(vp.usable(), Rect::new(0.0, 0.0, 785.0, 600.0));
    }
}
