use super::PuzzleContext;
use crate::dom::{self, Timeout};
use crate::events::{keyboard, pointer, Listener};
use guardian_core::puzzles::{Cell, Direction, Maze, MoveOutcome, MAZE_SIZE, SOLVED_HOLD};
use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;
use web_sys as web;

struct MazeState {
    maze: Maze,
    grid: web::HtmlElement,
    ctx: PuzzleContext,
    done_timer: Option<Timeout>,
}

impl MazeState {
    fn step(&mut self, dir: Direction) {
        let outcome = self.maze.step(dir);
        if let Some(cue) = outcome.cue() {
            self.ctx.cue(cue);
        }
        match outcome {
            MoveOutcome::Moved => self.grid.set_inner_html(&grid_html(&self.maze)),
            MoveOutcome::ReachedGoal => {
                self.grid.set_inner_html(&grid_html(&self.maze));
                _ = self.grid.class_list().add_1("solved");
                let done = self.ctx.clone();
                self.done_timer = dom::after(SOLVED_HOLD, move || done.complete());
            }
            MoveOutcome::Blocked | MoveOutcome::OutOfBounds | MoveOutcome::Finished => {}
        }
    }
}

fn grid_html(maze: &Maze) -> String {
    let mut html = String::with_capacity(MAZE_SIZE * MAZE_SIZE * 32);
    for y in 0..MAZE_SIZE {
        for x in 0..MAZE_SIZE {
            let class = if maze.player == (x, y) {
                "player"
            } else {
                match Maze::cell(x, y) {
                    Cell::Wall => "wall",
                    Cell::Goal => "goal",
                    Cell::Start | Cell::Path => "path",
                }
            };
            _ = write!(html, "<div class=\"cell {}\"></div>", class);
        }
    }
    html
}

const TEMPLATE: &str = "<div class=\"puzzle maze\">\
    <h2>The Neon Labyrinth</h2>\
    <p>Guide the light to the portal. Use arrow keys or the controls.</p>\
    <div class=\"maze-grid\"></div>\
    <div class=\"maze-controls\">\
      <button data-dir=\"up\">&#9650;</button>\
      <button data-dir=\"left\">&#9664;</button>\
      <button data-dir=\"down\">&#9660;</button>\
      <button data-dir=\"right\">&#9654;</button>\
    </div>\
  </div>";

fn parse_dir(s: &str) -> Option<Direction> {
    match s {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    }
}

/// Chapter 2: steer from the top-left start to the bottom-right portal.
pub struct MazeView {
    _keys: Option<Listener>,
    _buttons: Listener,
    _state: Rc<RefCell<MazeState>>,
}

impl MazeView {
    pub fn mount(container: &web::HtmlElement, ctx: PuzzleContext) -> anyhow::Result<Self> {
        container.set_inner_html(TEMPLATE);
        let grid: web::HtmlElement = dom::query(container, ".maze-grid")?;
        let controls: web::HtmlElement = dom::query(container, ".maze-controls")?;
        let maze = Maze::new();
        grid.set_inner_html(&grid_html(&maze));

        let state = Rc::new(RefCell::new(MazeState {
            maze,
            grid,
            ctx,
            done_timer: None,
        }));

        let st = state.clone();
        let keys = keyboard::on_arrow_keys(move |dir| st.borrow_mut().step(dir));
        let st = state.clone();
        let buttons = pointer::on_click_attr(&controls, "data-dir", move |value| {
            if let Some(dir) = parse_dir(&value) {
                st.borrow_mut().step(dir);
            }
        });
        Ok(Self {
            _keys: keys,
            _buttons: buttons,
            _state: state,
        })
    }
}
