use error_chain::bail;
use rand::XorShiftRng;

use crate::cells::Cartesian2DCoordinate;
use crate::errors::*;
use crate::generators;
use crate::grid::Maze;
use crate::pathing::{self, Distances};
use crate::renderers;
use crate::units::{Height, Width};
use crate::utils;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GenerationAlgorithm {
    BinaryTree,
    Sidewinder,
}

/// Everything that determines a woven maze. The engine is a pure function of
/// this value: same spec and same seed, same maze and same text.
#[derive(Clone, Debug)]
pub struct MazeSpec {
    pub width: Width,
    pub height: Height,
    pub algorithm: GenerationAlgorithm,
    /// Boundary openings to carve, the first two of which get the marked
    /// path between them.
    pub exit_count: usize,
    /// Seed for the random generator. Left unset, a weak random seed is
    /// taken and the result is not reproducible.
    pub seed: Option<u64>,
}

impl MazeSpec {
    pub fn new(width: Width, height: Height, algorithm: GenerationAlgorithm) -> MazeSpec {
        MazeSpec {
            width,
            height,
            algorithm,
            exit_count: 2,
            seed: None,
        }
    }

    /// Reject specs that could never produce a valid maze, before any grid
    /// work happens.
    fn validate(&self) -> Result<()> {
        let Width(width) = self.width;
        let Height(height) = self.height;

        if width == 0 || height == 0 {
            bail!(ErrorKind::InvalidConfiguration(format!(
                "maze dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let boundary_cells = if width == 1 || height == 1 {
            width * height
        } else {
            2 * (width + height) - 4
        };
        if self.exit_count > boundary_cells {
            bail!(ErrorKind::InvalidConfiguration(format!(
                "{} exits requested but the boundary only has {} cells",
                self.exit_count, boundary_cells
            )));
        }
        Ok(())
    }

    fn rng(&self) -> XorShiftRng {
        match self.seed {
            Some(seed) => utils::rng_from_seed(seed),
            None => rand::weak_rng(),
        }
    }
}

/// A maze woven from a `MazeSpec`: the grid itself, the exits in carve
/// order, and - when two exits exist - the path distances rooted at the
/// second exit, with the path from the first exit marked on the grid.
#[derive(Debug)]
pub struct GeneratedMaze {
    maze: Maze,
    exits: Vec<Cartesian2DCoordinate>,
    distances: Option<Distances>,
}

impl GeneratedMaze {
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn exits(&self) -> &[Cartesian2DCoordinate] {
        &self.exits
    }

    /// Hops from `coord` to the path root (the second exit). None when no
    /// path was traced or the cell is unreachable.
    pub fn distance_to(&self, coord: Cartesian2DCoordinate) -> Option<u32> {
        self.distances
            .as_ref()
            .and_then(|distances| distances.distance_to(coord))
    }

    /// The rendered box drawing text, newline terminated rows.
    pub fn text(&self) -> String {
        renderers::render_text(&self.maze)
    }
}

/// Weave a maze: generate the spanning tree, carve the boundary exits, and
/// mark the path between the first two exits.
pub fn generate(spec: &MazeSpec) -> Result<GeneratedMaze> {
    spec.validate()?;
    let mut rng = spec.rng();

    let mut maze = Maze::new(spec.width, spec.height)?;
    match spec.algorithm {
        GenerationAlgorithm::BinaryTree => generators::binary_tree(&mut maze, &mut rng),
        GenerationAlgorithm::Sidewinder => generators::sidewinder(&mut maze, &mut rng),
    }

    let exits = maze.add_exits(spec.exit_count, &mut rng)?;

    let distances = if exits.len() >= 2 {
        pathing::mark_path(&mut maze, exits[0], exits[1])
    } else {
        None
    };

    Ok(GeneratedMaze {
        maze,
        exits,
        distances,
    })
}
