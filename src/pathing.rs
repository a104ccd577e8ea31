use crate::cells::Cartesian2DCoordinate;
use crate::grid::Maze;
use crate::utils;
use crate::utils::FnvHashMap;

/// Breadth first distances from a root cell to everything reachable through
/// the link graph. Transient data: compute, query, throw away. Mutating the
/// maze afterwards does not update an already built `Distances`.
#[derive(Debug, Clone)]
pub struct Distances {
    root: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// Flood the maze from `root`. Returns None when the root is not a valid
    /// cell of this maze.
    ///
    /// Every step costs one, so a cell's first visit already carries its
    /// shortest distance and the distances map doubles as the visited set.
    pub fn new(maze: &Maze, root: Cartesian2DCoordinate) -> Option<Distances> {
        maze.cell_at(root.x as isize, root.y as isize)?;

        let mut distances = utils::fnv_hashmap(maze.size());
        distances.insert(root, 0);
        let mut max_distance = 0;

        let mut frontier = vec![root];
        let mut distance = 0u32;
        while !frontier.is_empty() {
            distance += 1;
            let mut new_frontier = Vec::new();

            for coord in frontier {
                for &(_, linked) in maze.linked_cells(coord).iter() {
                    if !distances.contains_key(&linked) {
                        distances.insert(linked, distance);
                        max_distance = distance;
                        new_frontier.push(linked);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            root,
            distances,
            max_distance,
        })
    }

    #[inline]
    pub fn root(&self) -> Cartesian2DCoordinate {
        self.root
    }

    /// Longest shortest-path distance seen from the root.
    #[inline]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// Hops from the root to `coord`, or None when the cell was never
    /// reached. Unreachable cells cannot arise from the generators in this
    /// crate, but the query tolerates them all the same.
    #[inline]
    pub fn distance_to(&self, coord: Cartesian2DCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }
}

/// Mark the path from `start` back to `end` with each cell's remaining hop
/// count.
///
/// Distances are computed rooted at `end`, then the walk repeatedly labels
/// the current cell and steps to its first linked neighbour (compass
/// enumeration order) that is strictly closer to `end`. In a perfect maze
/// that traces exactly the unique path and stops on `end` itself, whose
/// label is 0.
///
/// Returns the distances used for the walk so callers can keep querying
/// them, or None when either endpoint is not a valid cell.
pub fn mark_path(
    maze: &mut Maze,
    start: Cartesian2DCoordinate,
    end: Cartesian2DCoordinate,
) -> Option<Distances> {
    let distances = Distances::new(maze, end)?;
    maze.cell_at(start.x as isize, start.y as isize)?;

    let mut current = Some(start);
    while let Some(coord) = current {
        let steps_left = match distances.distance_to(coord) {
            Some(distance) => distance,
            None => break,
        };
        maze.set_mark(coord, &steps_left.to_string());

        current = maze
            .linked_cells(coord)
            .iter()
            .find(|&&(_, neighbour)| {
                distances
                    .distance_to(neighbour)
                    .map_or(false, |distance| distance < steps_left)
            })
            .map(|&(_, neighbour)| neighbour);
    }

    Some(distances)
}
