//! The eight-compass action set.

/// One of the eight unit moves available to an agent.
///
/// The order of [`Dir::ALL`] is canonical: cardinals first, then
/// diagonals. First-minimum tie-breaks and uniform index draws are
/// defined against this ordering, so it must not be rearranged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    /// Row − 1.
    North,
    /// Row + 1.
    South,
    /// Column − 1.
    West,
    /// Column + 1.
    East,
    /// Row − 1, column + 1.
    NorthEast,
    /// Row + 1, column + 1.
    SouthEast,
    /// Row + 1, column − 1.
    SouthWest,
    /// Row − 1, column − 1.
    NorthWest,
}

impl Dir {
    /// All eight moves in canonical order.
    pub const ALL: [Dir; 8] = [
        Dir::North,
        Dir::South,
        Dir::West,
        Dir::East,
        Dir::NorthEast,
        Dir::SouthEast,
        Dir::SouthWest,
        Dir::NorthWest,
    ];

    /// The four cardinal moves, for edge-only movement.
    pub const CARDINAL: [Dir; 4] = [Dir::North, Dir::South, Dir::West, Dir::East];

    /// `(row_offset, col_offset)` for this move.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Dir::North => (-1, 0),
            Dir::South => (1, 0),
            Dir::West => (0, -1),
            Dir::East => (0, 1),
            Dir::NorthEast => (-1, 1),
            Dir::SouthEast => (1, 1),
            Dir::SouthWest => (1, -1),
            Dir::NorthWest => (-1, -1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_offsets_are_distinct_unit_moves() {
        let offsets: HashSet<(i32, i32)> = Dir::ALL.iter().map(|d| d.offset()).collect();
        assert_eq!(offsets.len(), 8);
        for (dx, dy) in offsets {
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
            assert!((dx, dy) != (0, 0));
        }
    }

    #[test]
    fn cardinals_prefix_the_canonical_order() {
        assert_eq!(&Dir::ALL[..4], &Dir::CARDINAL[..]);
        for d in Dir::CARDINAL {
            let (dx, dy) = d.offset();
            assert_eq!(dx.abs() + dy.abs(), 1, "{d:?} is not axis-aligned");
        }
    }

    #[test]
    fn canonical_order_is_stable() {
        let expected = [
            (-1, 0),
            (1, 0),
            (0, -1),
            (0, 1),
            (-1, 1),
            (1, 1),
            (1, -1),
            (-1, -1),
        ];
        let actual: Vec<(i32, i32)> = Dir::ALL.iter().map(|d| d.offset()).collect();
        assert_eq!(actual, expected);
    }
}
