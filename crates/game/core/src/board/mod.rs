//! Static board geometry.
//!
//! The board is parsed once from the character-grid map input and never
//! changes afterwards. Creatures are not obstacles here; they only matter
//! to specific move-legality checks in the planner.
mod routing;

use std::collections::HashSet;

use arrayvec::ArrayVec;

use crate::state::Position;

pub use routing::RoutingTable;

/// Errors raised while parsing the map block.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("map input contains no rows")]
    EmptyMap,

    #[error("map row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// The four cardinal steps, enumerated in a fixed order so every adjacency
/// scan in the crate visits neighbors identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardinalDirection {
    East,
    West,
    South,
    North,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::East,
        CardinalDirection::West,
        CardinalDirection::South,
        CardinalDirection::North,
    ];

    /// Step delta; `y` grows downward, so South is `(0, 1)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
            CardinalDirection::South => (0, 1),
            CardinalDirection::North => (0, -1),
        }
    }
}

/// Immutable cell classification for the whole map.
///
/// `#` is a wall, `w` a creature spawner, `U` a shelter; every other
/// character is a plain walkable cell. Walls are never part of the
/// adjacency graph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    width: u32,
    height: u32,
    walkable: HashSet<Position>,
    walls: HashSet<Position>,
    spawners: HashSet<Position>,
    shelters: HashSet<Position>,
}

impl Board {
    /// Parses the map rows as received in the setup input.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, BoardError> {
        let first = rows.first().ok_or(BoardError::EmptyMap)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(BoardError::EmptyMap);
        }

        let mut board = Self {
            width: width as u32,
            height: rows.len() as u32,
            walkable: HashSet::new(),
            walls: HashSet::new(),
            spawners: HashSet::new(),
            shelters: HashSet::new(),
        };

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(BoardError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, cell) in row.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);
                match cell {
                    '#' => {
                        board.walls.insert(position);
                    }
                    'w' => {
                        board.spawners.insert(position);
                        board.walkable.insert(position);
                    }
                    'U' => {
                        board.shelters.insert(position);
                        board.walkable.insert(position);
                    }
                    _ => {
                        board.walkable.insert(position);
                    }
                }
            }
        }

        Ok(board)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_walkable(&self, position: Position) -> bool {
        self.walkable.contains(&position)
    }

    #[inline]
    pub fn is_shelter(&self, position: Position) -> bool {
        self.shelters.contains(&position)
    }

    #[inline]
    pub fn is_spawner(&self, position: Position) -> bool {
        self.spawners.contains(&position)
    }

    /// All walkable cells, in unspecified order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.walkable.iter().copied()
    }

    /// Walkable 4-neighbors of `origin`, in [`CardinalDirection::ALL`] order.
    ///
    /// `origin` itself is never included, whether or not it is walkable.
    pub fn adjacent(&self, origin: Position) -> ArrayVec<Position, 4> {
        let mut cells = ArrayVec::new();
        for direction in CardinalDirection::ALL {
            let (dx, dy) = direction.delta();
            let cell = Position::new(origin.x + dx, origin.y + dy);
            if self.is_walkable(cell) {
                cells.push(cell);
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Board {
        Board::parse(&["#####", "#...#", "#.#U#", "#w..#", "#####"]).unwrap()
    }

    #[test]
    fn parse_classifies_cells() {
        let board = room();
        assert_eq!(board.width(), 5);
        assert_eq!(board.height(), 5);
        assert!(board.is_walkable(Position::new(1, 1)));
        assert!(!board.is_walkable(Position::new(0, 0)));
        assert!(!board.is_walkable(Position::new(2, 2)));
        assert!(board.is_shelter(Position::new(3, 2)));
        assert!(board.is_spawner(Position::new(1, 3)));
        // Spawners and shelters are walkable.
        assert!(board.is_walkable(Position::new(3, 2)));
        assert!(board.is_walkable(Position::new(1, 3)));
    }

    #[test]
    fn adjacency_excludes_walls_and_origin() {
        let board = room();
        let cells = board.adjacent(Position::new(1, 1));
        assert_eq!(cells.as_slice(), &[Position::new(2, 1), Position::new(1, 2)]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = Board::parse(&["###", "##"]).unwrap_err();
        assert_eq!(
            error,
            BoardError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn empty_map_is_rejected() {
        let rows: [&str; 0] = [];
        assert_eq!(Board::parse(&rows).unwrap_err(), BoardError::EmptyMap);
    }
}
