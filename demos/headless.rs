//! Headless demo: scatter random obstacles, run the search to completion,
//! and print the explored board with the reconstructed path.
//!
//! Run with `RUST_LOG=debug` for the engine's progress messages. Exits
//! non-zero when no path exists.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use stepfind_core::Point;
use stepfind_paths::{Astar, Board, SearchSet, StepResult, reconstruct};

const WIDTH: i32 = 24;
const HEIGHT: i32 = 12;
const OBSTACLE_CHANCE: f64 = 0.25;

fn main() {
    env_logger::init();

    let mut rng = SmallRng::from_os_rng();
    let mut board = Board::new(WIDTH, HEIGHT);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let p = Point::new(x, y);
            if p == board.start() || p == board.end() {
                continue;
            }
            if rng.random_bool(OBSTACLE_CHANCE) {
                board.set_obstacle(p, true).ok();
            }
        }
    }

    let mut search = Astar::begin(&mut board);
    let mut steps = 0usize;
    let result = loop {
        match search.step(&mut board) {
            StepResult::Expanded(_) => steps += 1,
            terminal => break terminal,
        }
    };

    match result {
        StepResult::GoalReached => {
            let path = reconstruct(&board, board.end());
            log::info!("path found: {} cells after {steps} expansions", path.len());
            print_board(&board, &path);
        }
        _ => {
            log::info!("no path after {steps} expansions");
            print_board(&board, &[]);
            std::process::exit(1);
        }
    }
}

fn print_board(board: &Board, path: &[Point]) {
    for y in 0..board.height() {
        let mut line = String::with_capacity(board.width() as usize);
        for x in 0..board.width() {
            line.push(glyph(board, path, Point::new(x, y)));
        }
        println!("{line}");
    }
}

fn glyph(board: &Board, path: &[Point], p: Point) -> char {
    if p == board.start() {
        return 'S';
    }
    if p == board.end() {
        return 'E';
    }
    if path.contains(&p) {
        return 'o';
    }
    match board.tile(p) {
        Ok(t) if t.obstacle => '#',
        Ok(t) => match t.set {
            Some(SearchSet::Closed) => 'x',
            Some(SearchSet::Open) => '+',
            None => '.',
        },
        Err(_) => ' ',
    }
}
