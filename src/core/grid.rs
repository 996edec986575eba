//! Compass directions on a rectangular grid.
//!
//! `x` grows to the right and `y` grows downwards, matching the orientation of
//! the ASCII puzzle maps.

/// One of the four compass directions.
///
/// The index order (east, south, west, north) is load-bearing: it is the order
/// successors are generated in and the order facing directions are encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    East,
    South,
    West,
    North,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::East, Dir::South, Dir::West, Dir::North];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Dir::East => 0,
            Dir::South => 1,
            Dir::West => 2,
            Dir::North => 3,
        }
    }

    #[inline]
    pub fn from_index(i: usize) -> Dir {
        Dir::ALL[i & 3]
    }

    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::East => (1, 0),
            Dir::South => (0, 1),
            Dir::West => (-1, 0),
            Dir::North => (0, -1),
        }
    }

    /// Quarter turn clockwise (in screen coordinates).
    #[inline]
    pub fn cw(self) -> Dir {
        Dir::from_index(self.index() + 1)
    }

    /// Quarter turn counterclockwise.
    #[inline]
    pub fn ccw(self) -> Dir {
        Dir::from_index(self.index() + 3)
    }

    #[inline]
    pub fn opposite(self) -> Dir {
        Dir::from_index(self.index() + 2)
    }
}

/// Bounds-checked neighbor arithmetic over a `width` x `height` grid stored
/// row-major.
#[inline]
pub fn step(width: usize, height: usize, idx: usize, dir: Dir) -> Option<usize> {
    let x = (idx % width) as i32;
    let y = (idx / width) as i32;
    let (dx, dy) = dir.delta();
    let (nx, ny) = (x + dx, y + dy);
    if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
        None
    } else {
        Some(ny as usize * width + nx as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_and_opposites() {
        assert_eq!(Dir::East.cw(), Dir::South);
        assert_eq!(Dir::East.ccw(), Dir::North);
        assert_eq!(Dir::South.opposite(), Dir::North);
        for d in Dir::ALL {
            assert_eq!(Dir::from_index(d.index()), d);
            assert_eq!(d.cw().ccw(), d);
        }
    }

    #[test]
    fn step_stays_in_bounds() {
        // 3x2 grid, top-left corner.
        assert_eq!(step(3, 2, 0, Dir::West), None);
        assert_eq!(step(3, 2, 0, Dir::North), None);
        assert_eq!(step(3, 2, 0, Dir::East), Some(1));
        assert_eq!(step(3, 2, 0, Dir::South), Some(3));
        // bottom-right corner.
        assert_eq!(step(3, 2, 5, Dir::East), None);
        assert_eq!(step(3, 2, 5, Dir::South), None);
    }
}
