//! Rules for the three chapter puzzles. Each puzzle is self-contained; the
//! only thing it hands back to the session is "solved".

use crate::audio::Cue;
use rand::prelude::*;
use std::time::Duration;

/// Pause between a puzzle being solved and the completion callback.
pub const SOLVED_HOLD: Duration = Duration::from_millis(1500);

// ---------------- Chapter 1: sequence riddle ----------------

/// Visible terms; the player supplies the next one.
pub const SEQUENCE: [u32; 6] = [1, 1, 2, 3, 5, 8];

/// How long the "wrong number" message stays up.
pub const RIDDLE_ERROR_HOLD: Duration = Duration::from_millis(2000);

pub fn check_sequence_answer(answer: &str) -> bool {
    answer.trim() == "13" || answer.to_lowercase().contains("thirteen")
}

// ---------------- Chapter 2: maze ----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Path,
    Wall,
    Start,
    Goal,
}

pub const MAZE_SIZE: usize = 7;

const P: Cell = Cell::Path;
const W: Cell = Cell::Wall;

pub const MAZE_LAYOUT: [[Cell; MAZE_SIZE]; MAZE_SIZE] = [
    [Cell::Start, P, W, P, P, W, P],
    [W, P, W, P, W, W, P],
    [P, P, P, P, P, P, P],
    [P, W, W, W, W, W, P],
    [P, P, P, W, P, P, P],
    [W, W, P, W, P, W, W],
    [P, P, P, P, P, P, Cell::Goal],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Blocked,
    OutOfBounds,
    ReachedGoal,
    /// The maze is already solved; input is ignored.
    Finished,
}

impl MoveOutcome {
    pub fn cue(self) -> Option<Cue> {
        match self {
            MoveOutcome::Moved => Some(Cue::Step),
            MoveOutcome::Blocked | MoveOutcome::OutOfBounds => Some(Cue::Error),
            MoveOutcome::ReachedGoal => Some(Cue::Success),
            MoveOutcome::Finished => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Maze {
    pub player: (usize, usize),
    complete: bool,
}

impl Default for Maze {
    fn default() -> Self {
        Self::new()
    }
}

impl Maze {
    pub fn new() -> Self {
        Self {
            player: (0, 0),
            complete: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn cell(x: usize, y: usize) -> Cell {
        MAZE_LAYOUT[y][x]
    }

    pub fn step(&mut self, dir: Direction) -> MoveOutcome {
        if self.complete {
            return MoveOutcome::Finished;
        }
        let (dx, dy) = dir.delta();
        let nx = self.player.0 as i32 + dx;
        let ny = self.player.1 as i32 + dy;
        if nx < 0 || ny < 0 || nx >= MAZE_SIZE as i32 || ny >= MAZE_SIZE as i32 {
            return MoveOutcome::OutOfBounds;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        match Self::cell(nx, ny) {
            Cell::Wall => MoveOutcome::Blocked,
            Cell::Goal => {
                self.player = (nx, ny);
                self.complete = true;
                MoveOutcome::ReachedGoal
            }
            Cell::Path | Cell::Start => {
                self.player = (nx, ny);
                MoveOutcome::Moved
            }
        }
    }
}

// ---------------- Chapter 3: memory pairs ----------------

pub const MEMORY_SYMBOLS: [&str; 6] = ["🕰️", "🗝️", "🦄", "🌈", "🪐", "💎"];
pub const MATCH_REVEAL: Duration = Duration::from_millis(600);
pub const MISMATCH_REVEAL: Duration = Duration::from_millis(1000);
pub const MEMORY_COMPLETE_HOLD: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Card {
    pub id: usize,
    pub symbol: &'static str,
    pub flipped: bool,
    pub matched: bool,
}

impl Card {
    pub fn face_up(&self) -> bool {
        self.flipped || self.matched
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Locked, already face up, or unknown id.
    Ignored,
    /// First card of a pair is showing.
    Flipped,
    /// Second card shown; call `resolve` after `reveal`.
    PairShown { matched: bool, reveal: Duration },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    Nothing,
    Matched { solved: bool },
    Mismatched,
}

#[derive(Clone, Debug)]
pub struct MemoryBoard {
    cards: Vec<Card>,
    face_up: Vec<usize>,
    locked: bool,
}

impl MemoryBoard {
    /// Two of every symbol, shuffled.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut symbols: Vec<&'static str> = MEMORY_SYMBOLS
            .iter()
            .chain(MEMORY_SYMBOLS.iter())
            .copied()
            .collect();
        symbols.shuffle(rng);
        Self::from_symbols(&symbols)
    }

    pub fn from_symbols(symbols: &[&'static str]) -> Self {
        let cards = symbols
            .iter()
            .enumerate()
            .map(|(id, &symbol)| Card {
                id,
                symbol,
                flipped: false,
                matched: false,
            })
            .collect();
        Self {
            cards,
            face_up: Vec::with_capacity(2),
            locked: false,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_solved(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|c| c.matched)
    }

    pub fn flip(&mut self, id: usize) -> FlipOutcome {
        if self.locked {
            return FlipOutcome::Ignored;
        }
        let Some(card) = self.cards.get_mut(id) else {
            return FlipOutcome::Ignored;
        };
        if card.face_up() {
            return FlipOutcome::Ignored;
        }
        card.flipped = true;
        self.face_up.push(id);
        if self.face_up.len() < 2 {
            return FlipOutcome::Flipped;
        }
        self.locked = true;
        let matched = self.cards[self.face_up[0]].symbol == self.cards[self.face_up[1]].symbol;
        let reveal = if matched { MATCH_REVEAL } else { MISMATCH_REVEAL };
        FlipOutcome::PairShown { matched, reveal }
    }

    /// Settle the face-up pair once its reveal time has passed.
    pub fn resolve(&mut self) -> ResolveOutcome {
        if self.face_up.len() < 2 {
            return ResolveOutcome::Nothing;
        }
        let (a, b) = (self.face_up[0], self.face_up[1]);
        self.face_up.clear();
        self.locked = false;
        if self.cards[a].symbol == self.cards[b].symbol {
            for i in [a, b] {
                self.cards[i].matched = true;
                self.cards[i].flipped = false;
            }
            ResolveOutcome::Matched {
                solved: self.is_solved(),
            }
        } else {
            self.cards[a].flipped = false;
            self.cards[b].flipped = false;
            ResolveOutcome::Mismatched
        }
    }
}
