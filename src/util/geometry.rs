//! Shared 2-D geometry primitives.

/// An axis-aligned rectangle in compositor-global coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the point lies inside the rectangle (right/bottom exclusive).
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && py >= self.y
            && px < self.x + self.width as i32
            && py < self.y + self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point() {
        let r = Rect::new(10, 20, 100, 50);
        assert!(r.contains_point(10, 20));
        assert!(r.contains_point(109, 69));
        assert!(!r.contains_point(110, 20));
        assert!(!r.contains_point(10, 70));
        assert!(!r.contains_point(9, 20));
    }
}
