//! Session state and its event reducer.
//!
//! The reducer never sleeps or performs I/O. It returns [`Effect`]s that the
//! host executes (start a timer, fetch narration, play a cue) and later feeds
//! the outcome back in as another [`Event`]. Every asynchronous step carries
//! a [`Ticket`]; results whose ticket no longer matches the pending step are
//! dropped, which is how superseded loads and unmount cancellation work.
//!
//! A stage transition is two steps joined in sequence: the fixed fade-out
//! delay elapses first, then narration for the next stage is requested, and
//! the new stage commits only once that narration resolves.

use crate::audio::Cue;
use crate::constants::TRANSITION_DELAY;
use crate::narration::fallback_text;
use crate::stage::Stage;
use instant::Instant;
use smallvec::SmallVec;
use std::time::Duration;
use thiserror::Error;

/// Identifies one asynchronous step issued by the reducer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct SessionParams {
    /// Fade-out time between "advance requested" and the narration request.
    pub transition_delay: Duration,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            transition_delay: TRANSITION_DELAY,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The presentation is on screen; loads the current stage's story.
    Mounted,
    /// "Begin journey" on the intro screen: switches audio on, then advances.
    Begin,
    /// A puzzle reported completion.
    AdvanceRequested,
    DelayElapsed(Ticket),
    NarrationResolved { ticket: Ticket, text: String },
    AudioToggled,
    Unmounted,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    ScheduleDelay { ticket: Ticket, delay: Duration },
    FetchNarration { ticket: Ticket, stage: Stage },
    /// Cancel any timer or fetch still outstanding.
    CancelPending,
    SetAmbience(bool),
    PlayCue(Cue),
    StageEntered(Stage),
}

pub type Effects = SmallVec<[Effect; 3]>;

/// Why a request was ignored. Rejections never change state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    #[error("{0} is the final stage")]
    Terminal(Stage),
    #[error("a stage transition is already in progress")]
    InProgress,
    #[error("begin is only available on the intro")]
    NotAtIntro,
    #[error("session has been unmounted")]
    Unmounted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Loading { ticket: Ticket, stage: Stage },
    Delaying { ticket: Ticket, next: Stage },
    Narrating { ticket: Ticket, next: Stage },
}

/// Observable part of the session, compared by the view layer to decide
/// whether anything needs redrawing.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub stage: Stage,
    pub story_text: String,
    pub is_loading_story: bool,
    pub is_transitioning: bool,
    pub audio_enabled: bool,
}

/// The presentation's session. Fields change only through [`apply`] and the
/// operations it dispatches to, so the transition flags always agree with
/// the pending step.
///
/// [`apply`]: SessionState::apply
#[derive(Clone, Debug)]
pub struct SessionState {
    stage: Stage,
    story_text: String,
    is_loading_story: bool,
    is_transitioning: bool,
    audio_enabled: bool,
    params: SessionParams,
    pending: Option<Pending>,
    next_ticket: u64,
    unmounted: bool,
    transition_started: Option<Instant>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SessionParams::default())
    }
}

impl SessionState {
    pub fn new(params: SessionParams) -> Self {
        Self {
            stage: Stage::Intro,
            story_text: String::new(),
            is_loading_story: false,
            is_transitioning: false,
            audio_enabled: false,
            params,
            pending: None,
            next_ticket: 0,
            unmounted: false,
            transition_started: None,
        }
    }

    /// A fresh session resuming at `stage`, e.g. after a reload mid-journey.
    pub fn at(stage: Stage, params: SessionParams) -> Self {
        Self {
            stage,
            ..Self::new(params)
        }
    }

    /// Start with audio already switched on.
    pub fn with_audio_enabled(mut self, on: bool) -> Self {
        self.audio_enabled = on;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn story_text(&self) -> &str {
        &self.story_text
    }

    pub fn is_loading_story(&self) -> bool {
        self.is_loading_story
    }

    pub fn is_transitioning(&self) -> bool {
        self.is_transitioning
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stage: self.stage,
            story_text: self.story_text.clone(),
            is_loading_story: self.is_loading_story,
            is_transitioning: self.is_transitioning,
            audio_enabled: self.audio_enabled,
        }
    }

    /// Whether the ambience drone should be running right now.
    pub fn wants_ambience(&self) -> bool {
        self.audio_enabled && self.stage != Stage::Finale
    }

    /// True while a timer or fetch issued by this session is outstanding.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn apply(&mut self, event: Event) -> Effects {
        if self.unmounted {
            log::debug!("[stage] ignoring {:?} after unmount", event);
            return Effects::new();
        }
        match event {
            Event::Mounted => self.load_story(self.stage),
            Event::Begin => self.begin().unwrap_or_else(|r| ignored("begin", r)),
            Event::AdvanceRequested => self.advance().unwrap_or_else(|r| ignored("advance", r)),
            Event::DelayElapsed(ticket) => self.on_delay_elapsed(ticket),
            Event::NarrationResolved { ticket, text } => self.on_narration(ticket, text),
            Event::AudioToggled => self.toggle_audio(),
            Event::Unmounted => self.unmount(),
        }
    }

    /// Request narration for `stage`. Ignored while a transition is running,
    /// since the transition owns the next narration request.
    pub fn load_story(&mut self, stage: Stage) -> Effects {
        if self.unmounted || self.is_transitioning {
            log::debug!("[stage] load_story({}) ignored", stage);
            return Effects::new();
        }
        let ticket = self.issue();
        self.is_loading_story = true;
        self.pending = Some(Pending::Loading { ticket, stage });
        let mut fx = Effects::new();
        fx.push(Effect::FetchNarration { ticket, stage });
        fx
    }

    /// Start the transition to the next stage.
    pub fn advance(&mut self) -> Result<Effects, Rejected> {
        if self.unmounted {
            return Err(Rejected::Unmounted);
        }
        let next = self.stage.next().ok_or(Rejected::Terminal(self.stage))?;
        if self.is_transitioning {
            return Err(Rejected::InProgress);
        }
        let ticket = self.issue();
        self.is_transitioning = true;
        // a story load still in flight is superseded by the transition
        self.is_loading_story = false;
        self.pending = Some(Pending::Delaying { ticket, next });
        self.transition_started = Some(Instant::now());

        let mut fx = Effects::new();
        if self.audio_enabled {
            fx.push(Effect::PlayCue(Cue::Win));
        }
        fx.push(Effect::ScheduleDelay {
            ticket,
            delay: self.params.transition_delay,
        });
        Ok(fx)
    }

    pub fn begin(&mut self) -> Result<Effects, Rejected> {
        if self.unmounted {
            return Err(Rejected::Unmounted);
        }
        if self.stage != Stage::Intro {
            return Err(Rejected::NotAtIntro);
        }
        if self.is_transitioning {
            return Err(Rejected::InProgress);
        }
        let mut fx = Effects::new();
        if self.audio_enabled {
            fx.push(Effect::PlayCue(Cue::Success));
            fx.extend(self.advance()?);
        } else {
            // switched on by this very click; the win cue is skipped once
            let adv = self.advance()?;
            self.audio_enabled = true;
            fx.push(Effect::SetAmbience(true));
            fx.extend(adv);
        }
        Ok(fx)
    }

    pub fn toggle_audio(&mut self) -> Effects {
        if self.unmounted {
            log::debug!("[stage] toggle_audio ignored after unmount");
            return Effects::new();
        }
        self.audio_enabled = !self.audio_enabled;
        log::info!("[stage] audio_enabled={}", self.audio_enabled);
        let mut fx = Effects::new();
        fx.push(Effect::SetAmbience(self.wants_ambience()));
        fx.push(Effect::PlayCue(Cue::Click));
        fx
    }

    fn on_delay_elapsed(&mut self, ticket: Ticket) -> Effects {
        let mut fx = Effects::new();
        match self.pending {
            Some(Pending::Delaying { ticket: t, next }) if t == ticket => {
                self.is_loading_story = true;
                self.pending = Some(Pending::Narrating { ticket, next });
                fx.push(Effect::FetchNarration { ticket, stage: next });
            }
            _ => log::debug!("[stage] stale delay {:?}", ticket),
        }
        fx
    }

    fn on_narration(&mut self, ticket: Ticket, text: String) -> Effects {
        let mut fx = Effects::new();
        match self.pending {
            Some(Pending::Loading { ticket: t, stage }) if t == ticket => {
                self.story_text = non_empty(stage, text);
                self.is_loading_story = false;
                self.pending = None;
            }
            Some(Pending::Narrating { ticket: t, next }) if t == ticket => {
                let from = self.stage;
                self.story_text = non_empty(next, text);
                self.is_loading_story = false;
                self.stage = next;
                self.is_transitioning = false;
                self.pending = None;
                if let Some(started) = self.transition_started.take() {
                    log::info!("[stage] {} -> {} in {:?}", from, next, started.elapsed());
                }
                fx.push(Effect::StageEntered(next));
                fx.push(Effect::SetAmbience(self.wants_ambience()));
            }
            _ => log::debug!("[stage] stale narration {:?}", ticket),
        }
        fx
    }

    fn unmount(&mut self) -> Effects {
        self.unmounted = true;
        self.pending = None;
        self.transition_started = None;
        let mut fx = Effects::new();
        fx.push(Effect::CancelPending);
        fx.push(Effect::SetAmbience(false));
        fx
    }

    fn issue(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }
}

/// By-value form of [`SessionState::apply`].
pub fn reduce(mut state: SessionState, event: Event) -> (SessionState, Effects) {
    let fx = state.apply(event);
    (state, fx)
}

fn ignored(what: &str, reason: Rejected) -> Effects {
    log::debug!("[stage] {} ignored: {}", what, reason);
    Effects::new()
}

fn non_empty(stage: Stage, text: String) -> String {
    if text.trim().is_empty() {
        fallback_text(stage).to_string()
    } else {
        text
    }
}
