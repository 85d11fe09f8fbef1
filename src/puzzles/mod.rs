//! DOM views for the three chapter puzzles. Rules live in
//! `guardian_core::puzzles`; these views only render state and forward input.

mod maze;
mod memory;
mod riddle;

pub use maze::MazeView;
pub use memory::MemoryView;
pub use riddle::RiddleView;

use crate::audio::AudioOutput;
use guardian_core::Cue;
use std::cell::RefCell;
use std::rc::Rc;

/// What a mounted puzzle may reach: the shared audio output and the
/// "solved" callback.
#[derive(Clone)]
pub struct PuzzleContext {
    pub audio: Rc<RefCell<AudioOutput>>,
    pub on_complete: Rc<dyn Fn()>,
}

impl PuzzleContext {
    pub fn cue(&self, cue: Cue) {
        self.audio.borrow_mut().play(cue);
    }

    pub fn complete(&self) {
        (self.on_complete)();
    }
}
