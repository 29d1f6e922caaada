pub mod check_info;
pub mod move_buffer;
pub mod move_gen;
pub mod move_info;
pub mod precomputed;


/// Compass deltas over the little-endian rank-file square layout
/// (A1 = 0, H8 = 63). North adds a rank, east adds a file.
pub struct Direction;

impl Direction {
    pub const NORTH: i8 = 8;
    pub const SOUTH: i8 = -8;
    pub const EAST: i8 = 1;
    pub const WEST: i8 = -1;
    pub const NORTHEAST: i8 = 9;
    pub const NORTHWEST: i8 = 7;
    pub const SOUTHEAST: i8 = -7;
    pub const SOUTHWEST: i8 = -9;

    pub const ORTHO: [i8; 4] = [Self::NORTH, Self::SOUTH, Self::EAST, Self::WEST];
    pub const DIAG: [i8; 4] = [
        Self::NORTHEAST,
        Self::NORTHWEST,
        Self::SOUTHEAST,
        Self::SOUTHWEST,
    ];
    pub const ALL: [i8; 8] = [
        Self::NORTH,
        Self::SOUTH,
        Self::EAST,
        Self::WEST,
        Self::NORTHEAST,
        Self::NORTHWEST,
        Self::SOUTHEAST,
        Self::SOUTHWEST,
    ];

    /// Step direction from one square toward another, or 0 when the two
    /// squares share no rank, file or diagonal.
    pub const fn get_dir(from: usize, to: usize) -> i8 {
        if from == to {
            return 0;
        }
        let dr = (to / 8) as i8 - (from / 8) as i8;
        let df = (to % 8) as i8 - (from % 8) as i8;
        if dr == 0 {
            return if df > 0 { Self::EAST } else { Self::WEST };
        }
        if df == 0 {
            return if dr > 0 { Self::NORTH } else { Self::SOUTH };
        }
        if dr == df {
            return if dr > 0 {
                Self::NORTHEAST
            } else {
                Self::SOUTHWEST
            };
        }
        if dr == -df {
            return if dr > 0 {
                Self::NORTHWEST
            } else {
                Self::SOUTHEAST
            };
        }
        0
    }
}

#[cfg(test)]
mod direction_tests {
    use super::Direction;
    use std::str::FromStr;

    use crate::board::components::Square;

    fn dir(a: &str, b: &str) -> i8 {
        let a = Square::from_str(a).unwrap();
        let b = Square::from_str(b).unwrap();
        Direction::get_dir(a.index(), b.index())
    }

    #[test]
    fn test_get_dir_on_lines() {
        assert_eq!(dir("E4", "E8"), Direction::NORTH);
        assert_eq!(dir("E4", "E1"), Direction::SOUTH);
        assert_eq!(dir("E4", "H4"), Direction::EAST);
        assert_eq!(dir("E4", "A4"), Direction::WEST);
        assert_eq!(dir("E4", "H7"), Direction::NORTHEAST);
        assert_eq!(dir("E4", "A8"), Direction::NORTHWEST);
        assert_eq!(dir("E4", "H1"), Direction::SOUTHEAST);
        assert_eq!(dir("E4", "B1"), Direction::SOUTHWEST);
    }

    #[test]
    fn test_get_dir_off_lines() {
        assert_eq!(dir("E4", "E4"), 0);
        assert_eq!(dir("E4", "F6"), 0, "knight hop is not a line");
        assert_eq!(dir("A1", "B3"), 0);
    }
}
