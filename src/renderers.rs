use std::fmt;

use crate::cells::{Cell, Direction};
use crate::grid::Maze;

/// Box drawing glyph for every combination of wall stubs around an
/// intersection, indexed by the North=1/East=2/South=4/West=8 bitmask.
/// Process wide constant data; index 0 (no walls at all) is a blank.
pub const WALL_GLYPHS: [char; 16] = [
    ' ', // ....
    '╵', // N...
    '╶', // .E..
    '└', // NE..
    '╷', // ..S.
    '│', // N.S.
    '┌', // .ES.
    '├', // NES.
    '╴', // ...W
    '┘', // N..W
    '─', // .E.W
    '┴', // NE.W
    '┐', // ..SW
    '┤', // N.SW
    '┬', // .ESW
    '┼', // NESW
];

/// Glyph for the wall stubs around one intersection.
pub fn wall_glyph(north: bool, east: bool, south: bool, west: bool) -> char {
    let mask = (north as usize)
        | ((east as usize) << 1)
        | ((south as usize) << 2)
        | ((west as usize) << 3);
    WALL_GLYPHS[mask]
}

const WALL_EW_RUN: &str = "───";
const OPEN_RUN: &str = "   ";
const NO_MARK: &str = "  ";

/// Render the maze as box drawing text, one glyph per wall intersection and
/// a filler line of wall stubs and cell marks below each cell row.
///
/// Rather than drawing each cell's own walls, every one of the
/// (width+1) x (height+1) intersections inspects its four diagonal
/// neighbour cells and grows a stub towards any side where a present
/// neighbour reports "not linked" across that edge. Open passages then show
/// up as gaps in the wall lines, including the one sided openings carved by
/// exits. The rightmost filler column carries only the border joiner and no
/// mark slot.
pub fn render_text(maze: &Maze) -> String {
    let max_x = maze.max_x() as isize;
    let max_y = maze.max_y() as isize;
    let mut output = String::new();

    for y in 0..=(max_y + 1) {
        let mut row = String::new();
        let mut filler = String::new();

        for x in 0..=(max_x + 1) {
            let ne = maze.cell_at(x, y - 1);
            let se = maze.cell_at(x, y);
            let sw = maze.cell_at(x - 1, y);
            let nw = maze.cell_at(x - 1, y - 1);

            let unlinked = |cell: Option<&Cell>, direction: Direction| {
                cell.map_or(false, |c| !c.is_linked(direction))
            };
            let north = unlinked(ne, Direction::West) || unlinked(nw, Direction::East);
            let east = unlinked(se, Direction::North) || unlinked(ne, Direction::South);
            let south = unlinked(se, Direction::West) || unlinked(sw, Direction::East);
            let west = unlinked(sw, Direction::North) || unlinked(nw, Direction::South);

            row.push(wall_glyph(north, east, south, west));

            if x > max_x {
                filler.push(wall_glyph(south, false, south, false));
            } else {
                row.push_str(if east { WALL_EW_RUN } else { OPEN_RUN });
                filler.push(wall_glyph(south, false, south, false));
                match se.and_then(|cell| cell.mark()) {
                    Some(mark) => filler.push_str(mark),
                    None => filler.push_str(NO_MARK),
                }
                filler.push(' ');
            }
        }

        output.push_str(&row);
        output.push('\n');
        if y <= max_y {
            output.push_str(&filler);
            output.push('\n');
        }
    }

    output
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&render_text(self))
    }
}
