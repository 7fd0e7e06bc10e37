//! Scroll coordination for the suggestion list.

/// Receives scroll offsets computed by the surface.
///
/// Implemented by the embedding UI's scrollable container.
pub trait ScrollHandle: Send {
    fn scroll_to(&mut self, offset: f32);
}

impl<F> ScrollHandle for F
where
    F: FnMut(f32) + Send,
{
    fn scroll_to(&mut self, offset: f32) {
        self(offset)
    }
}

/// Visible window over a list of fixed-height rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    offset: f32,
    height: f32,
    row_height: f32,
}

impl Viewport {
    pub fn new(height: f32, row_height: f32) -> Self {
        Self {
            offset: 0.0,
            height,
            row_height,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Container was resized.
    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    /// Back to the top, for a fresh list.
    pub fn reset(&mut self) {
        self.offset = 0.0;
    }

    /// Whether the whole row is inside the visible region.
    pub fn is_fully_visible(&self, index: usize) -> bool {
        let (top, bottom) = self.row_bounds(index);
        top >= self.offset && bottom <= self.offset + self.height
    }

    /// Scroll the minimum distance that shows the row entirely.
    ///
    /// Returns the new offset, or `None` when the row was already fully
    /// visible. Rows taller than the viewport are aligned to the top.
    pub fn scroll_into_view(&mut self, index: usize) -> Option<f32> {
        let (top, bottom) = self.row_bounds(index);

        let target = if top < self.offset || self.row_height >= self.height {
            top
        } else if bottom > self.offset + self.height {
            bottom - self.height
        } else {
            return None;
        };

        if target == self.offset {
            return None;
        }
        self.offset = target;
        Some(target)
    }

    fn row_bounds(&self, index: usize) -> (f32, f32) {
        let top = index as f32 * self.row_height;
        (top, top + self.row_height)
    }
}

impl Default for Viewport {
    /// Eight 40px rows.
    fn default() -> Self {
        Self::new(320.0, 40.0)
    }
}
