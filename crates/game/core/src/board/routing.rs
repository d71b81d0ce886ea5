//! Precomputed all-pairs routing over the walkable graph.
//!
//! Built once at startup; immutable for the lifetime of a game. Creatures
//! never appear here, so a routed step can still be vetoed by a dynamic
//! legality check at the call site.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::Board;
use crate::state::Position;

/// Unit edge cost. The expansion is written as a priority-queue relaxation
/// rather than a plain BFS so weighted edges keep the same shape.
const STEP_COST: u32 = 1;

/// Per-source shortest-path data for every walkable cell:
/// distances, collapsed next hops, and fixed-radius neighborhoods.
///
/// Every lookup is guarded; a missing entry means the pair is unreachable.
#[derive(Clone, Debug, Default)]
pub struct RoutingTable {
    distance: HashMap<Position, HashMap<Position, u32>>,
    next_hop: HashMap<Position, HashMap<Position, Position>>,
    near2: HashMap<Position, HashSet<Position>>,
    near5: HashMap<Position, HashSet<Position>>,
}

impl RoutingTable {
    /// Radius of the small neighborhood (heal auras, grouping checks).
    pub const NEAR_RADIUS: u32 = 2;
    /// Radius of the large neighborhood.
    pub const FAR_RADIUS: u32 = 5;

    /// Runs the single-source computation from every walkable cell.
    ///
    /// O(V·(V+E)) overall; acceptable because maps are tens of cells. Keep
    /// this bound in mind before pointing it at a larger grid.
    pub fn build(board: &Board) -> Self {
        let mut table = Self::default();

        for source in board.walkable_cells() {
            let (distance, predecessor) = shortest_paths(board, source);

            let mut hops = HashMap::with_capacity(distance.len());
            for &target in distance.keys() {
                hops.insert(target, collapse_next_hop(source, target, &predecessor));
            }

            table
                .near2
                .insert(source, expand_neighborhood(board, source, Self::NEAR_RADIUS));
            table
                .near5
                .insert(source, expand_neighborhood(board, source, Self::FAR_RADIUS));
            table.distance.insert(source, distance);
            table.next_hop.insert(source, hops);
        }

        table
    }

    /// Minimum hop count from `from` to `to`, or `None` if unreachable.
    pub fn distance(&self, from: Position, to: Position) -> Option<u32> {
        self.distance.get(&from)?.get(&to).copied()
    }

    /// The cell adjacent to `from` on a shortest path toward `to`.
    ///
    /// `next_hop(s, s)` is `s` itself.
    pub fn next_hop(&self, from: Position, to: Position) -> Option<Position> {
        self.next_hop.get(&from)?.get(&to).copied()
    }

    /// Cells within [`Self::NEAR_RADIUS`] graph hops of `center`, including
    /// `center` itself.
    pub fn neighborhood2(&self, center: Position) -> Option<&HashSet<Position>> {
        self.near2.get(&center)
    }

    /// Cells within [`Self::FAR_RADIUS`] graph hops of `center`.
    pub fn neighborhood5(&self, center: Position) -> Option<&HashSet<Position>> {
        self.near5.get(&center)
    }

    /// True if `cell` lies in the radius-2 neighborhood of `center`.
    pub fn in_neighborhood2(&self, center: Position, cell: Position) -> bool {
        self.near2
            .get(&center)
            .is_some_and(|cells| cells.contains(&cell))
    }

    /// The straight row-or-column visibility test used by slashers.
    ///
    /// A cell is in line of sight when the shortest-path distance equals
    /// one of the axis deltas, i.e. the path runs unobstructed along one
    /// axis. This is the historical approximation, preserved exactly: some
    /// diagonal offsets where a detour happens to match an axis delta are
    /// misclassified as visible.
    pub fn line_of_sight(&self, from: Position, to: Position) -> bool {
        let Some(distance) = self.distance(from, to) else {
            return false;
        };
        distance == from.x.abs_diff(to.x) || distance == from.y.abs_diff(to.y)
    }
}

/// Uniform-cost expansion from `source`. Returns the distance map and the
/// predecessor of every reached cell. Neighbor order and the (distance,
/// position) heap key make predecessor assignment deterministic.
fn shortest_paths(
    board: &Board,
    source: Position,
) -> (HashMap<Position, u32>, HashMap<Position, Position>) {
    let mut distance = HashMap::new();
    let mut predecessor = HashMap::new();
    let mut queue = BinaryHeap::new();

    distance.insert(source, 0);
    queue.push(Reverse((0, source)));

    while let Some(Reverse((cost, cell))) = queue.pop() {
        if distance.get(&cell).is_some_and(|&best| cost > best) {
            continue;
        }

        for neighbor in board.adjacent(cell) {
            let next = cost + STEP_COST;
            if distance.get(&neighbor).is_none_or(|&best| next < best) {
                distance.insert(neighbor, next);
                predecessor.insert(neighbor, cell);
                queue.push(Reverse((next, neighbor)));
            }
        }
    }

    (distance, predecessor)
}

/// Walks the predecessor chain back from `target` until the cell adjacent
/// to `source` on the shortest path is found.
fn collapse_next_hop(
    source: Position,
    target: Position,
    predecessor: &HashMap<Position, Position>,
) -> Position {
    let mut hop = target;
    while let Some(&previous) = predecessor.get(&hop) {
        if previous == source {
            return hop;
        }
        hop = previous;
    }
    // target == source: the only reachable cell with no predecessor.
    hop
}

/// Repeated 1-hop frontier expansion: all cells within `radius` graph hops
/// of `origin`, origin included.
fn expand_neighborhood(board: &Board, origin: Position, radius: u32) -> HashSet<Position> {
    let mut cells = HashSet::from([origin]);
    let mut visited = HashSet::new();

    for _ in 0..radius {
        let frontier: Vec<Position> = cells.difference(&visited).copied().collect();
        for cell in frontier {
            cells.extend(board.adjacent(cell));
            visited.insert(cell);
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor_board() -> Board {
        // A ring corridor around a central block.
        Board::parse(&["#####", "#...#", "#.#.#", "#...#", "#####"]).unwrap()
    }

    /// Brute-force BFS used as the ground truth for distances.
    fn bfs_distance(board: &Board, from: Position, to: Position) -> Option<u32> {
        let mut seen = HashSet::from([from]);
        let mut frontier = vec![from];
        let mut hops = 0;
        while !frontier.is_empty() {
            if frontier.contains(&to) {
                return Some(hops);
            }
            let mut next = Vec::new();
            for cell in frontier {
                for neighbor in board.adjacent(cell) {
                    if seen.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            frontier = next;
            hops += 1;
        }
        None
    }

    #[test]
    fn distances_match_brute_force_bfs() {
        let board = corridor_board();
        let table = RoutingTable::build(&board);

        for from in board.walkable_cells() {
            for to in board.walkable_cells() {
                assert_eq!(
                    table.distance(from, to),
                    bfs_distance(&board, from, to),
                    "distance mismatch for {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn next_hop_walks_reach_the_target_in_distance_steps() {
        let board = corridor_board();
        let table = RoutingTable::build(&board);

        for from in board.walkable_cells() {
            for to in board.walkable_cells() {
                let expected = table.distance(from, to).unwrap();
                let mut cell = from;
                let mut steps = 0;
                while cell != to {
                    cell = table.next_hop(cell, to).unwrap();
                    steps += 1;
                    assert!(steps <= expected, "overlong walk for {from} -> {to}");
                }
                assert_eq!(steps, expected);
            }
        }
    }

    #[test]
    fn next_hop_to_self_is_identity() {
        let board = corridor_board();
        let table = RoutingTable::build(&board);
        let cell = Position::new(1, 1);
        assert_eq!(table.next_hop(cell, cell), Some(cell));
    }

    #[test]
    fn unreachable_cells_have_no_entries() {
        // Two rooms separated by a wall.
        let board = Board::parse(&["#####", "#.#.#", "#####"]).unwrap();
        let table = RoutingTable::build(&board);
        let left = Position::new(1, 1);
        let right = Position::new(3, 1);
        assert_eq!(table.distance(left, right), None);
        assert_eq!(table.next_hop(left, right), None);
    }

    #[test]
    fn neighborhoods_grow_by_graph_hops() {
        let board = corridor_board();
        let table = RoutingTable::build(&board);
        let corner = Position::new(1, 1);

        let near = table.neighborhood2(corner).unwrap();
        assert!(near.contains(&corner));
        assert!(near.contains(&Position::new(3, 1)));
        assert!(!near.contains(&Position::new(3, 3)));

        // The whole ring is within five hops.
        let far = table.neighborhood5(corner).unwrap();
        assert_eq!(far.len(), board.walkable_cells().count());
    }

    #[test]
    fn line_of_sight_requires_a_clear_axis() {
        let board = corridor_board();
        let table = RoutingTable::build(&board);

        // Same row, no wall between.
        assert!(table.line_of_sight(Position::new(1, 1), Position::new(3, 1)));
        // Diagonal across the central block: distance 4, deltas 2 and 2.
        assert!(!table.line_of_sight(Position::new(1, 1), Position::new(3, 3)));
        // Adjacent cells are always in sight.
        assert!(table.line_of_sight(Position::new(1, 1), Position::new(2, 1)));
        // A cell sees itself (distance 0 equals both deltas).
        assert!(table.line_of_sight(Position::new(1, 1), Position::new(1, 1)));
    }
}
