use core::fmt;

use serde::{Deserialize, Serialize};

/// Size of an output or mode in pixels
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub height: u32,
    pub width: u32,
}

impl Size {
    /// Creates a new size
    pub fn new(width: u32, height: u32) -> Self {
        Self { height, width }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Top-left corner of an output in the virtual desktop
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a position
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// kscreen-doctor expects `<x>,<y>`
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_the_tool_expects() {
        assert_eq!(Size::new(2560, 1440).to_string(), "2560x1440");
        assert_eq!(Position::new(-1920, 0).to_string(), "-1920,0");
    }

    #[test]
    fn size_serializes_height_first() {
        let json = serde_json::to_string(&Size::new(1920, 1080)).unwrap();
        assert_eq!(json, r#"{"height":1080,"width":1920}"#);
    }
}
