//! Bundled levels

/// Default stage: brick columns, a concrete core and the walled base
pub const LEVEL_1: &str = include_str!("../data/level1.txt");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{Cell, Field};

    fn clear_2x2(field: &Field, (col, row): (i32, i32)) -> bool {
        (col - 1..=col).all(|c| (row - 1..=row).all(|r| field.cell(c, r) == Cell::Free))
    }

    #[test]
    fn test_level_1_loads() {
        let field = Field::load(LEVEL_1, FIELD_ORIGIN).expect("bundled level is valid");
        assert_eq!(field.width(), FIELD_WIDTH);
        assert_eq!(field.height(), FIELD_HEIGHT);
    }

    #[test]
    fn test_spawn_areas_are_clear() {
        let field = Field::load(LEVEL_1, FIELD_ORIGIN).expect("level");
        for corner in ENEMY_SPAWN_CORNERS {
            assert!(clear_2x2(&field, corner), "enemy spawn {:?}", corner);
        }
        assert!(clear_2x2(&field, FRIEND_SPAWN_CORNER));
    }

    #[test]
    fn test_base_is_walled() {
        let field = Field::load(LEVEL_1, FIELD_ORIGIN).expect("level");
        let (col, row) = BASE_CELL;
        assert!(clear_2x2(&field, (col + 1, row + 1)));
        for c in col - 1..=col + 2 {
            assert_eq!(field.cell(c, row - 1), Cell::Brick);
        }
        for r in row..=row + 1 {
            assert_eq!(field.cell(col - 1, r), Cell::Brick);
            assert_eq!(field.cell(col + 2, r), Cell::Brick);
        }
    }
}
