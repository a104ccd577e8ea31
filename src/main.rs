use docopt::Docopt;
use mazery::{
    engine::{self, GenerationAlgorithm, MazeSpec},
    units::{Height, Width},
};
use serde_derive::Deserialize;
use std::{fs::File, io, io::prelude::*};

const USAGE: &str = "Mazery

Usage:
    mazery_driver -h | --help
    mazery_driver render (binary|sidewinder) [--grid-width=<w>] [--grid-height=<h>] [--exits=<n>] [--seed=<n>] [--text-out=<path>] [--show-numbers]

Options:
    -h --help           Show this screen.
    --grid-width=<w>    The grid width in a w*h grid [default: 8].
    --grid-height=<h>   The grid height in a w*h grid [default: 8].
    --exits=<n>         How many boundary openings to carve [default: 2].
    --seed=<n>          Seed for the random generator, for reproducible mazes.
    --text-out=<path>   Write the rendered maze to a file instead of stdout.
    --show-numbers      Also print each cell's link bitmask as a number grid.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_render: bool,
    cmd_binary: bool,
    cmd_sidewinder: bool,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_exits: usize,
    flag_seed: Option<u64>,
    flag_text_out: String,
    flag_show_numbers: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {
        links {
            Engine(::mazery::errors::Error, ::mazery::errors::ErrorKind);
        }
        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let algorithm = algorithm_from_args(&args);

    let mut spec = MazeSpec::new(
        Width(args.flag_grid_width),
        Height(args.flag_grid_height),
        algorithm,
    );
    spec.exit_count = args.flag_exits;
    spec.seed = args.flag_seed;

    let woven = engine::generate(&spec)?;
    let text = woven.text();

    if args.flag_text_out.is_empty() {
        print!("{}", text);
    } else {
        write_text_to_file(&text, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    if args.flag_show_numbers {
        println!("{}", woven.maze().as_number_grid());
    }

    Ok(())
}

fn algorithm_from_args(args: &MazeArgs) -> GenerationAlgorithm {
    if args.cmd_render && args.cmd_binary {
        GenerationAlgorithm::BinaryTree
    } else if args.cmd_sidewinder {
        GenerationAlgorithm::Sidewinder
    } else {
        // docopt guarantees one of the two commands was given
        GenerationAlgorithm::Sidewinder
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
