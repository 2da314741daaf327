//! Level configuration: board dimensions and image sources per level.

/// The first playable level.
pub const FIRST_LEVEL: u32 = 1;

/// Levels that get the larger 4x4 board; everything else is 3x3.
pub const HARD_LEVELS: [u32; 5] = [5, 10, 15, 20, 25];

/// Resolved configuration for one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSpec {
    pub index: u32,
    pub rows: usize,
    pub cols: usize,
    /// Asset path of the source image, without extension.
    pub image_path: String,
}

/// Board dimensions for a level: (rows, cols).
pub fn dimensions(level: u32) -> (usize, usize) {
    if HARD_LEVELS.contains(&level) {
        (4, 4)
    } else {
        (3, 3)
    }
}

/// Asset path of a level's source image.
pub fn image_path(level: u32) -> String {
    format!("levels/level_{level}")
}

pub fn spec(level: u32) -> LevelSpec {
    let (rows, cols) = dimensions(level);
    LevelSpec {
        index: level,
        rows,
        cols,
        image_path: image_path(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_levels_are_4x4() {
        for level in HARD_LEVELS {
            assert_eq!(dimensions(level), (4, 4));
        }
        assert_eq!(dimensions(1), (3, 3));
        assert_eq!(dimensions(26), (3, 3));
    }

    #[test]
    fn test_spec_carries_the_image_path() {
        let spec = spec(5);
        assert_eq!(spec.rows * spec.cols, 16);
        assert_eq!(spec.image_path, "levels/level_5");
    }
}
