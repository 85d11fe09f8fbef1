use crate::audio::AudioOutput;
use crate::dom::{self, Timeout};
use crate::view::{StageHooks, StageView};
use guardian_core::{Effect, Event, Narrator, SessionState, Snapshot};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;

/// Runs the session reducer against the browser: feeds it events, executes
/// the effects it returns and redraws the page when the snapshot changes.
pub struct Director {
    state: RefCell<SessionState>,
    narrator: Rc<dyn Narrator>,
    audio: Rc<RefCell<AudioOutput>>,
    view: RefCell<StageView>,
    delay: RefCell<Option<Timeout>>,
    shown: RefCell<Option<Snapshot>>,
    hooks: RefCell<Option<StageHooks>>,
}

impl Director {
    pub fn new(
        state: SessionState,
        narrator: Rc<dyn Narrator>,
        audio: Rc<RefCell<AudioOutput>>,
        view: StageView,
    ) -> Rc<Self> {
        let director = Rc::new(Self {
            state: RefCell::new(state),
            narrator,
            audio: audio.clone(),
            view: RefCell::new(view),
            delay: RefCell::new(None),
            shown: RefCell::new(None),
            hooks: RefCell::new(None),
        });
        let weak = Rc::downgrade(&director);
        *director.hooks.borrow_mut() = Some(StageHooks {
            audio,
            on_begin: dispatcher(&weak, Event::Begin),
            on_complete: dispatcher(&weak, Event::AdvanceRequested),
        });
        director
    }

    /// Show the current stage and kick off its story load.
    pub fn mount(self: &Rc<Self>) {
        let stage = self.state.borrow().stage();
        self.enter(stage);
        self.dispatch(Event::Mounted);
    }

    pub fn dispatch(self: &Rc<Self>, event: Event) {
        log::debug!("[director] {:?}", event);
        let effects = self.state.borrow_mut().apply(event);
        for effect in effects {
            self.run(effect);
        }
        self.refresh();
    }

    fn run(self: &Rc<Self>, effect: Effect) {
        match effect {
            Effect::ScheduleDelay { ticket, delay } => {
                let weak = Rc::downgrade(self);
                *self.delay.borrow_mut() = dom::after(delay, move || {
                    if let Some(d) = weak.upgrade() {
                        d.dispatch(Event::DelayElapsed(ticket));
                    }
                });
            }
            Effect::FetchNarration { ticket, stage } => {
                let weak = Rc::downgrade(self);
                let narrator = self.narrator.clone();
                spawn_local(async move {
                    let text = narrator.narrate(stage).await;
                    if let Some(d) = weak.upgrade() {
                        d.dispatch(Event::NarrationResolved { ticket, text });
                    }
                });
            }
            Effect::CancelPending => {
                self.delay.borrow_mut().take();
            }
            Effect::SetAmbience(on) => self.audio.borrow_mut().set_ambience(on),
            Effect::PlayCue(cue) => self.audio.borrow_mut().play(cue),
            Effect::StageEntered(stage) => self.enter(stage),
        }
    }

    fn enter(&self, stage: guardian_core::Stage) {
        let hooks = self.hooks.borrow().clone();
        if let Some(hooks) = hooks {
            self.view.borrow_mut().mount_stage(stage, &hooks);
        }
    }

    fn refresh(&self) {
        let snap = self.state.borrow().snapshot();
        if self.shown.borrow().as_ref() == Some(&snap) {
            return;
        }
        self.view.borrow().render(&snap);
        *self.shown.borrow_mut() = Some(snap);
    }

    /// Page is going away: cancel outstanding work and release every
    /// resource the stages hold.
    pub fn shutdown(self: &Rc<Self>) {
        self.dispatch(Event::Unmounted);
        self.view.borrow_mut().unmount();
        self.hooks.borrow_mut().take();
        self.audio.borrow_mut().close();
        log::info!("[director] shut down");
    }
}

fn dispatcher(weak: &Weak<Director>, event: Event) -> Rc<dyn Fn()> {
    let weak = weak.clone();
    Rc::new(move || {
        if let Some(d) = weak.upgrade() {
            d.dispatch(event.clone());
        }
    })
}
