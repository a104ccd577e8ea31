use rand::Rng;
use smallvec::SmallVec;

use crate::cells::Direction;
use crate::grid::Maze;
use crate::utils;

/// Apply the binary tree maze generation algorithm to a grid.
///
/// Visits every cell in row major order and carves a passage towards East or
/// South, picked uniformly among whichever of the two stay in bounds. Cells
/// on the last row can only go East, cells on the last column only South, and
/// the final cell carves nothing at all - it is linked to purely by its
/// predecessors. The fixed direction pair is what makes the result a perfect
/// maze, and it gives the characteristic long corridors along the bottom row
/// and the right column.
pub fn binary_tree<R: Rng>(maze: &mut Maze, rng: &mut R) {
    for coord in maze.iter() {
        let options: SmallVec<[Direction; 2]> = [Direction::East, Direction::South]
            .iter()
            .cloned()
            .filter(|&direction| maze.neighbour_at(coord, direction).is_some())
            .collect();

        if !options.is_empty() {
            let direction = options[rng.gen::<usize>() % options.len()];
            maze.link(coord, direction);
        }
    }
}

/// Apply the sidewinder maze generation algorithm to a grid.
///
/// Works through the rows top to bottom, keeping a "run" of cells carved
/// eastwards so far. For each cell a coin decides whether to extend the run
/// with another East passage or to close it out: pick one member of the run
/// uniformly, carve South from it, and start a new run. The last row has no
/// South available, so there the East passage is forced, leaving one long
/// corridor along the bottom. Every closed out run carries exactly one South
/// passage to the row below, which is what keeps the maze perfect.
pub fn sidewinder<R: Rng>(maze: &mut Maze, rng: &mut R) {
    let max_y = maze.max_y();

    for row in maze.iter_row() {
        let mut run = Vec::new();

        for coord in row {
            let on_last_row = coord.y == max_y;
            if !on_last_row {
                run.push(coord);
            }

            let can_go_east = maze.neighbour_at(coord, Direction::East).is_some();
            if can_go_east && (on_last_row || rng.gen::<bool>()) {
                maze.link(coord, Direction::East);
                continue;
            }

            if !run.is_empty() {
                let member = utils::pick_one(&mut run, rng)
                    .expect("a non-empty run always yields a member");
                maze.link(member, Direction::South);
                run.clear();
            }
        }
    }
}
