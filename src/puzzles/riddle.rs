use super::PuzzleContext;
use crate::dom::{self, Timeout};
use crate::events::Listener;
use guardian_core::puzzles::{check_sequence_answer, RIDDLE_ERROR_HOLD, SEQUENCE, SOLVED_HOLD};
use guardian_core::Cue;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

const ERROR_MESSAGE: &str = "The gears grind... that is not the number.";
const SOLVED_MESSAGE: &str = "Time resumes flowing...";

#[derive(Default)]
struct RiddleState {
    solved: bool,
    error_timer: Option<Timeout>,
    solved_timer: Option<Timeout>,
}

/// Chapter 1: name the next term of the sequence.
pub struct RiddleView {
    _submit: Listener,
    _state: Rc<RefCell<RiddleState>>,
}

fn template() -> String {
    let terms: String = SEQUENCE
        .iter()
        .map(|n| format!("<span class=\"term\">{}</span>", n))
        .collect();
    format!(
        "<div class=\"puzzle riddle\">\
           <h2>The Sequence of Destiny</h2>\
           <p>The clock's gears follow an ancient pattern. Complete the sequence to restart time.</p>\
           <div class=\"sequence\">{}<span class=\"term missing\">?</span></div>\
           <form class=\"riddle-form\">\
             <input class=\"riddle-answer\" type=\"text\" autocomplete=\"off\" placeholder=\"Enter the next number...\">\
             <button type=\"submit\">RESTORE TIME</button>\
           </form>\
           <p class=\"riddle-status\"></p>\
         </div>",
        terms
    )
}

impl RiddleView {
    pub fn mount(container: &web::HtmlElement, ctx: PuzzleContext) -> anyhow::Result<Self> {
        container.set_inner_html(&template());
        let form: web::HtmlFormElement = dom::query(container, ".riddle-form")?;
        let input: web::HtmlInputElement = dom::query(container, ".riddle-answer")?;
        let status: web::HtmlElement = dom::query(container, ".riddle-status")?;
        let state = Rc::new(RefCell::new(RiddleState::default()));

        let st = state.clone();
        let submit = Listener::new(&form, "submit", move |ev| {
            ev.prevent_default();
            if st.borrow().solved {
                return;
            }
            if check_sequence_answer(&input.value()) {
                ctx.cue(Cue::Success);
                status.set_text_content(Some(SOLVED_MESSAGE));
                _ = status.class_list().add_1("ok");
                let done = ctx.clone();
                let mut s = st.borrow_mut();
                s.solved = true;
                s.error_timer = None;
                s.solved_timer = dom::after(SOLVED_HOLD, move || done.complete());
            } else {
                ctx.cue(Cue::Error);
                status.set_text_content(Some(ERROR_MESSAGE));
                let clear = status.clone();
                st.borrow_mut().error_timer = dom::after(RIDDLE_ERROR_HOLD, move || {
                    clear.set_text_content(None);
                });
            }
        });
        _ = input.focus();
        Ok(Self {
            _submit: submit,
            _state: state,
        })
    }
}
