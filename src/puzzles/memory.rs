use super::PuzzleContext;
use crate::dom::{self, Timeout};
use crate::events::{pointer, Listener};
use guardian_core::puzzles::{FlipOutcome, MemoryBoard, ResolveOutcome, MEMORY_COMPLETE_HOLD};
use guardian_core::Cue;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::fmt::Write;
use std::rc::{Rc, Weak};
use web_sys as web;

struct MemoryState {
    board: MemoryBoard,
    grid: web::HtmlElement,
    ctx: PuzzleContext,
    reveal_timer: Option<Timeout>,
    done_timer: Option<Timeout>,
}

impl MemoryState {
    fn render(&self) {
        let mut html = String::with_capacity(self.board.cards().len() * 64);
        for card in self.board.cards() {
            let class = match (card.matched, card.flipped) {
                (true, _) => "card matched",
                (false, true) => "card flipped",
                (false, false) => "card",
            };
            let face = if card.face_up() { card.symbol } else { "" };
            _ = write!(
                html,
                "<button class=\"{}\" data-card=\"{}\">{}</button>",
                class, card.id, face
            );
        }
        self.grid.set_inner_html(&html);
    }

    fn flip(this: &Rc<RefCell<Self>>, id: usize) {
        let mut s = this.borrow_mut();
        match s.board.flip(id) {
            FlipOutcome::Ignored => {}
            FlipOutcome::Flipped => {
                s.ctx.cue(Cue::Flip);
                s.render();
            }
            FlipOutcome::PairShown { reveal, .. } => {
                s.ctx.cue(Cue::Flip);
                s.render();
                let weak = Rc::downgrade(this);
                s.reveal_timer = dom::after(reveal, move || Self::resolve(&weak));
            }
        }
    }

    fn resolve(weak: &Weak<RefCell<Self>>) {
        let Some(this) = weak.upgrade() else {
            return;
        };
        let mut s = this.borrow_mut();
        match s.board.resolve() {
            ResolveOutcome::Nothing => return,
            ResolveOutcome::Matched { solved } => {
                s.ctx.cue(Cue::Success);
                if solved {
                    log::info!("[memory] all pairs found");
                    let done = s.ctx.clone();
                    s.done_timer = dom::after(MEMORY_COMPLETE_HOLD, move || done.complete());
                }
            }
            ResolveOutcome::Mismatched => {}
        }
        s.render();
    }
}

const TEMPLATE: &str = "<div class=\"puzzle memory\">\
    <h2>Shards of Memory</h2>\
    <p>Match the fragments to restore the timeline.</p>\
    <div class=\"memory-grid\"></div>\
  </div>";

/// Chapter 3: find all six pairs.
pub struct MemoryView {
    _cards: Listener,
    _state: Rc<RefCell<MemoryState>>,
}

impl MemoryView {
    pub fn mount(container: &web::HtmlElement, ctx: PuzzleContext) -> anyhow::Result<Self> {
        container.set_inner_html(TEMPLATE);
        let grid: web::HtmlElement = dom::query(container, ".memory-grid")?;
        let mut rng = StdRng::seed_from_u64(dom::random_seed());
        let state = Rc::new(RefCell::new(MemoryState {
            board: MemoryBoard::shuffled(&mut rng),
            grid: grid.clone(),
            ctx,
            reveal_timer: None,
            done_timer: None,
        }));
        state.borrow().render();

        let st = state.clone();
        let cards = pointer::on_click_attr(&grid, "data-card", move |value| {
            if let Ok(id) = value.parse::<usize>() {
                MemoryState::flip(&st, id);
            }
        });
        Ok(Self {
            _cards: cards,
            _state: state,
        })
    }
}
