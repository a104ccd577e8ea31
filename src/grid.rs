use error_chain::bail;
use itertools::Itertools;
use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, Cell, Direction, COMPASS};
use crate::errors::*;
use crate::units::{Height, Width};
use crate::utils;

pub type NeighbourSmallVec = SmallVec<[(Direction, Cartesian2DCoordinate); 4]>;

/// A rectangular maze: a width x height arena of cells whose link bits form
/// the passage graph.
///
/// Interior links are kept symmetric by `link`; the only one-sided links are
/// the boundary openings carved by `add_exits`.
#[derive(Debug)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// Create a maze with every wall closed and no marks.
    pub fn new(width: Width, height: Height) -> Result<Maze> {
        let Width(width) = width;
        let Height(height) = height;

        if width == 0 || height == 0 {
            bail!(ErrorKind::InvalidConfiguration(format!(
                "maze dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let too_wide = width > ::std::u32::MAX as usize || height > ::std::u32::MAX as usize;
        let cells_count = match width.checked_mul(height) {
            Some(count) if !too_wide => count,
            _ => bail!(ErrorKind::InvalidConfiguration(format!(
                "maze dimensions {}x{} do not fit the coordinate space",
                width, height
            ))),
        };

        Ok(Maze {
            width,
            height,
            cells: vec![Cell::new(); cells_count],
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn max_x(&self) -> u32 {
        (self.width - 1) as u32
    }

    #[inline]
    pub fn max_y(&self) -> u32 {
        (self.height - 1) as u32
    }

    /// Bounds checked cell lookup. Out of range coordinates, including
    /// negative ones, are an ordinary absent result rather than an error:
    /// neighbour computation and the renderer probe past the rim freely.
    pub fn cell_at(&self, x: isize, y: isize) -> Option<&Cell> {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            None
        } else {
            Some(&self.cells[y as usize * self.width + x as usize])
        }
    }

    fn index_of(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if (coord.x as usize) < self.width && (coord.y as usize) < self.height {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    /// The coordinate one step from `coord`, or None when that step leaves
    /// the grid.
    pub fn neighbour_at(
        &self,
        coord: Cartesian2DCoordinate,
        direction: Direction,
    ) -> Option<Cartesian2DCoordinate> {
        let (dx, dy) = direction.offset();
        let x = coord.x as isize + dx;
        let y = coord.y as isize + dy;
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            None
        } else {
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        }
    }

    /// In-bounds neighbours of a cell, in compass enumeration order.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> NeighbourSmallVec {
        COMPASS
            .iter()
            .filter_map(|&direction| {
                self.neighbour_at(coord, direction)
                    .map(|neighbour| (direction, neighbour))
            })
            .collect()
    }

    /// The subset of `neighbours` the cell has carved a passage towards,
    /// compass order preserved.
    pub fn linked_cells(&self, coord: Cartesian2DCoordinate) -> NeighbourSmallVec {
        self.neighbours(coord)
            .iter()
            .cloned()
            .filter(|&(direction, _)| self.is_linked(coord, direction))
            .collect()
    }

    pub fn is_linked(&self, coord: Cartesian2DCoordinate, direction: Direction) -> bool {
        self.index_of(coord)
            .map_or(false, |index| self.cells[index].is_linked(direction))
    }

    /// Open a passage from `coord` towards `direction`.
    ///
    /// When the target lands in the grid the opposite bit on the neighbour is
    /// set as well, keeping interior links symmetric. A target outside the
    /// grid leaves a one-sided bit: an opening to the outside world.
    ///
    /// Panics if `coord` itself is outside the grid.
    pub fn link(&mut self, coord: Cartesian2DCoordinate, direction: Direction) {
        let index = self
            .index_of(coord)
            .expect("link source coordinate outside the grid");
        self.cells[index].set_link(direction);

        if let Some(neighbour) = self.neighbour_at(coord, direction) {
            let neighbour_index = neighbour.y as usize * self.width + neighbour.x as usize;
            self.cells[neighbour_index].set_link(direction.opposite());
        }
    }

    /// Label a cell for rendering. Unknown coordinates are ignored.
    pub fn set_mark(&mut self, coord: Cartesian2DCoordinate, label: &str) {
        if let Some(index) = self.index_of(coord) {
            self.cells[index].set_mark(label);
        }
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cartesian2DCoordinate {
        let index = rng.gen::<usize>() % self.size();
        self.coordinate_of_index(index)
    }

    /// Every cell on the outer rim, each exactly once. Corner cells appear a
    /// single time even though two outward directions apply to them.
    pub fn edge_cells(&self) -> Vec<Cartesian2DCoordinate> {
        let mut cells = Vec::new();
        for y in 0..self.height as u32 {
            if y == 0 || y == self.max_y() {
                for x in 0..self.width as u32 {
                    cells.push(Cartesian2DCoordinate::new(x, y));
                }
            } else {
                cells.push(Cartesian2DCoordinate::new(0, y));
                if self.max_x() > 0 {
                    cells.push(Cartesian2DCoordinate::new(self.max_x(), y));
                }
            }
        }
        cells
    }

    /// Carve `count` openings to the outside world through distinct boundary
    /// cells, chosen without replacement. A corner links out through one of
    /// its two boundary sides, picked uniformly, so corners are slightly
    /// under-weighted compared to treating each side as its own candidate.
    ///
    /// Returns the carved cells in carve order. Asking for more exits than
    /// there are boundary cells fails without touching any link state.
    pub fn add_exits<R: Rng>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Cartesian2DCoordinate>> {
        let mut edges = self.edge_cells();
        if count > edges.len() {
            bail!(ErrorKind::InvalidConfiguration(format!(
                "cannot carve {} exits, the boundary only has {} cells",
                count,
                edges.len()
            )));
        }

        let mut exits = Vec::with_capacity(count);
        for _ in 0..count {
            let coord = utils::pick_one(&mut edges, rng)
                .expect("boundary cells cannot run out before the requested exit count");

            let mut outward: SmallVec<[Direction; 2]> = SmallVec::new();
            if coord.y == 0 {
                outward.push(Direction::North);
            }
            if coord.y == self.max_y() {
                outward.push(Direction::South);
            }
            if coord.x == 0 {
                outward.push(Direction::West);
            }
            if coord.x == self.max_x() {
                outward.push(Direction::East);
            }

            let direction = outward[rng.gen::<usize>() % outward.len()];
            self.link(coord, direction);
            exits.push(coord);
        }

        Ok(exits)
    }

    /// Number of passages: interior passages counted once (from their
    /// west/north side), boundary openings counted once each.
    pub fn links_count(&self) -> usize {
        let mut count = 0;
        for coord in self.iter() {
            for &direction in &COMPASS {
                if !self.is_linked(coord, direction) {
                    continue;
                }
                match self.neighbour_at(coord, direction) {
                    Some(_) => {
                        if direction == Direction::East || direction == Direction::South {
                            count += 1;
                        }
                    }
                    None => count += 1,
                }
            }
        }
        count
    }

    /// The link bitmask of every cell as a space separated grid, one text
    /// line per cell row. An alternate serialization used for diagnostics.
    pub fn as_number_grid(&self) -> String {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.numeric_value().to_string())
                    .join(" ")
            })
            .join("\n")
    }

    /// Row major iterator over every cell coordinate. The iterator holds no
    /// borrow of the maze, so callers are free to mutate links mid-walk.
    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            row_width: self.width,
            cells_count: self.size(),
        }
    }

    /// Iterator over rows of cell coordinates, top row first.
    pub fn iter_row(&self) -> RowIter {
        RowIter {
            current_row: 0,
            row_width: self.width,
            rows_count: self.height,
        }
    }

    fn coordinate_of_index(&self, index: usize) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new((index % self.width) as u32, (index / self.width) as u32)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    row_width: usize,
    cells_count: usize,
}

impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let index = self.current_cell_number;
            self.current_cell_number += 1;
            Some(Cartesian2DCoordinate::new(
                (index % self.row_width) as u32,
                (index / self.row_width) as u32,
            ))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

impl<'a> IntoIterator for &'a Maze {
    type Item = Cartesian2DCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    current_row: usize,
    row_width: usize,
    rows_count: usize,
}

impl Iterator for RowIter {
    type Item = Vec<Cartesian2DCoordinate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row < self.rows_count {
            let y = self.current_row as u32;
            self.current_row += 1;
            Some(
                (0..self.row_width as u32)
                    .map(|x| Cartesian2DCoordinate::new(x, y))
                    .collect(),
            )
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows_count - self.current_row;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for RowIter {} // default impl using size_hint()

#[cfg(test)]
mod tests {

    use super::*;
    use crate::utils::rng_from_seed;

    fn small_maze(w: usize, h: usize) -> Maze {
        Maze::new(Width(w), Height(h)).expect("valid maze dimensions")
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        for &(w, h) in &[(0, 5), (5, 0), (0, 0)] {
            let result = Maze::new(Width(w), Height(h));
            match result {
                Err(Error(ErrorKind::InvalidConfiguration(_), _)) => {}
                other => panic!("expected InvalidConfiguration, got {:?}", other),
            }
        }
    }

    #[test]
    fn cell_lookup_bounds() {
        let m = small_maze(3, 2);
        assert!(m.cell_at(0, 0).is_some());
        assert!(m.cell_at(2, 1).is_some());
        assert!(m.cell_at(-1, 0).is_none());
        assert!(m.cell_at(0, -1).is_none());
        assert!(m.cell_at(3, 0).is_none());
        assert!(m.cell_at(0, 2).is_none());
    }

    #[test]
    fn neighbour_cells() {
        let m = small_maze(3, 3);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        let check = |coord, expected: &[(Direction, Cartesian2DCoordinate)]| {
            assert_eq!(&*m.neighbours(coord), expected);
        };

        // corners
        check(gc(0, 0), &[(Direction::East, gc(1, 0)), (Direction::South, gc(0, 1))]);
        check(gc(2, 0), &[(Direction::South, gc(2, 1)), (Direction::West, gc(1, 0))]);
        check(gc(0, 2), &[(Direction::North, gc(0, 1)), (Direction::East, gc(1, 2))]);
        check(gc(2, 2), &[(Direction::North, gc(2, 1)), (Direction::West, gc(1, 2))]);

        // a side and the centre, compass order throughout
        check(
            gc(1, 0),
            &[
                (Direction::East, gc(2, 0)),
                (Direction::South, gc(1, 1)),
                (Direction::West, gc(0, 0)),
            ],
        );
        check(
            gc(1, 1),
            &[
                (Direction::North, gc(1, 0)),
                (Direction::East, gc(2, 1)),
                (Direction::South, gc(1, 2)),
                (Direction::West, gc(0, 1)),
            ],
        );
    }

    #[test]
    fn neighbour_at_grid_edge() {
        let m = small_maze(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let check = |coord, direction, expected| {
            assert_eq!(m.neighbour_at(coord, direction), expected);
        };

        check(gc(0, 0), Direction::North, None);
        check(gc(0, 0), Direction::West, None);
        check(gc(0, 0), Direction::East, Some(gc(1, 0)));
        check(gc(0, 0), Direction::South, Some(gc(0, 1)));

        check(gc(1, 1), Direction::South, None);
        check(gc(1, 1), Direction::East, None);
        check(gc(1, 1), Direction::North, Some(gc(1, 0)));
        check(gc(1, 1), Direction::West, Some(gc(0, 1)));
    }

    #[test]
    fn linking_cells_is_symmetric() {
        let mut m = small_maze(4, 4);
        let a = Cartesian2DCoordinate::new(0, 1);
        let b = Cartesian2DCoordinate::new(0, 2);
        let c = Cartesian2DCoordinate::new(0, 3);

        assert!(!m.is_linked(a, Direction::South));
        assert!(m.linked_cells(a).is_empty());

        m.link(a, Direction::South);
        assert!(m.is_linked(a, Direction::South));
        assert!(m.is_linked(b, Direction::North));
        assert_eq!(&*m.linked_cells(a), &[(Direction::South, b)]);
        assert_eq!(&*m.linked_cells(b), &[(Direction::North, a)]);

        m.link(b, Direction::South);
        assert_eq!(
            &*m.linked_cells(b),
            &[(Direction::North, a), (Direction::South, c)]
        );
        assert_eq!(&*m.linked_cells(c), &[(Direction::North, b)]);
        assert_eq!(m.links_count(), 2);
    }

    #[test]
    fn boundary_link_is_one_sided() {
        let mut m = small_maze(2, 2);
        let origin = Cartesian2DCoordinate::new(0, 0);

        m.link(origin, Direction::West);
        assert!(m.is_linked(origin, Direction::West));
        // no neighbour gained a bit and linked_cells shows no partner
        assert!(m.linked_cells(origin).is_empty());
        assert_eq!(m.cell_at(0, 0).unwrap().numeric_value(), 8);
        assert_eq!(m.links_count(), 1);
    }

    #[test]
    fn number_grid() {
        let mut m = small_maze(2, 2);
        m.link(Cartesian2DCoordinate::new(0, 0), Direction::East);
        assert_eq!(m.as_number_grid(), "2 8\n0 0");

        m.link(Cartesian2DCoordinate::new(0, 0), Direction::South);
        assert_eq!(m.as_number_grid(), "6 8\n1 0");
    }

    #[test]
    fn edge_cells_cover_the_rim_once() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        let mut rim = small_maze(3, 3).edge_cells();
        rim.sort();
        assert_eq!(
            rim,
            vec![
                gc(0, 0),
                gc(0, 1),
                gc(0, 2),
                gc(1, 0),
                gc(1, 2),
                gc(2, 0),
                gc(2, 1),
                gc(2, 2),
            ]
        );

        // degenerate strips are all rim
        assert_eq!(small_maze(1, 3).edge_cells().len(), 3);
        assert_eq!(small_maze(4, 1).edge_cells().len(), 4);
        assert_eq!(small_maze(1, 1).edge_cells(), vec![gc(0, 0)]);
    }

    #[test]
    fn too_many_exits_fail_without_mutation() {
        let mut m = small_maze(2, 2);
        let mut rng = rng_from_seed(7);
        let before = m.as_number_grid();

        let result = m.add_exits(5, &mut rng);
        match result {
            Err(Error(ErrorKind::InvalidConfiguration(_), _)) => {}
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
        assert_eq!(m.as_number_grid(), before);
    }

    #[test]
    fn exits_open_the_boundary() {
        let mut m = small_maze(3, 3);
        let mut rng = rng_from_seed(11);

        let exits = m.add_exits(2, &mut rng).expect("2 exits fit a 3x3 rim");
        assert_eq!(exits.len(), 2);
        assert_ne!(exits[0], exits[1]);

        for &coord in &exits {
            assert!(
                coord.x == 0 || coord.x == m.max_x() || coord.y == 0 || coord.y == m.max_y(),
                "exit {} is not on the rim",
                coord
            );
            let one_sided = COMPASS.iter().any(|&direction| {
                m.is_linked(coord, direction) && m.neighbour_at(coord, direction).is_none()
            });
            assert!(one_sided, "exit {} has no outward opening", coord);
        }
        // nothing but the two openings was carved
        assert_eq!(m.links_count(), 2);
    }

    #[test]
    fn carving_the_whole_rim_uses_every_boundary_cell() {
        let mut m = small_maze(3, 3);
        let mut rng = rng_from_seed(13);
        let mut exits = m.add_exits(8, &mut rng).expect("the 3x3 rim has 8 cells");
        exits.sort();
        let mut rim = m.edge_cells();
        rim.sort();
        assert_eq!(exits, rim);
    }

    #[test]
    fn random_cell_in_bounds() {
        let m = small_maze(4, 3);
        let mut rng = rng_from_seed(23);
        for _ in 0..1000 {
            let coord = m.random_cell(&mut rng);
            assert!(coord.x <= m.max_x());
            assert!(coord.y <= m.max_y());
        }
    }

    #[test]
    fn cell_iter_row_major() {
        let m = small_maze(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(
            m.iter().collect::<Vec<Cartesian2DCoordinate>>(),
            &[gc(0, 0), gc(1, 0), gc(0, 1), gc(1, 1)]
        );
        // borrowing the maze iterates the same way
        let via_ref: Vec<Cartesian2DCoordinate> = (&m).into_iter().collect();
        assert_eq!(via_ref, m.iter().collect::<Vec<Cartesian2DCoordinate>>());
    }

    #[test]
    fn row_iter_top_first() {
        let m = small_maze(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(
            m.iter_row().collect::<Vec<Vec<Cartesian2DCoordinate>>>(),
            &[&[gc(0, 0), gc(1, 0)], &[gc(0, 1), gc(1, 1)]]
        );
    }

    #[test]
    fn maze_extents() {
        let m = small_maze(5, 4);
        assert_eq!(m.size(), 20);
        assert_eq!(m.max_x(), 4);
        assert_eq!(m.max_y(), 3);
    }
}
