// Host-side tests for the stage machine and session reducer.

use guardian_core::*;
use std::collections::VecDeque;
use std::time::Duration;

/// Runs effects synchronously: delays elapse at once and narration is
/// awaited with `pollster`. Returns every effect seen, in order.
fn drive(state: &mut SessionState, narrator: &dyn Narrator, event: Event) -> Vec<Effect> {
    let mut seen = Vec::new();
    let mut queue: VecDeque<Event> = VecDeque::from([event]);
    while let Some(ev) = queue.pop_front() {
        for fx in state.apply(ev) {
            match &fx {
                Effect::ScheduleDelay { ticket, .. } => queue.push_back(Event::DelayElapsed(*ticket)),
                Effect::FetchNarration { ticket, stage } => {
                    let text = pollster::block_on(narrator.narrate(*stage));
                    queue.push_back(Event::NarrationResolved {
                        ticket: *ticket,
                        text,
                    });
                }
                _ => {}
            }
            seen.push(fx);
        }
    }
    seen
}

fn delay_ticket(fx: &[Effect]) -> Ticket {
    fx.iter()
        .find_map(|e| match e {
            Effect::ScheduleDelay { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("no delay scheduled")
}

fn fetch(fx: &[Effect]) -> (Ticket, Stage) {
    fx.iter()
        .find_map(|e| match e {
            Effect::FetchNarration { ticket, stage } => Some((*ticket, *stage)),
            _ => None,
        })
        .expect("no narration requested")
}

#[test]
fn next_is_the_successor_in_order() {
    for w in Stage::ALL.windows(2) {
        assert_eq!(w[0].next(), Some(w[1]));
        assert!(w[0] < w[1]);
    }
    assert_eq!(Stage::Finale.next(), None);
    assert!(Stage::Finale.is_terminal());
}

#[test]
fn every_non_final_stage_advances_to_exactly_the_next() {
    for &from in &Stage::ALL[..4] {
        let mut s = SessionState::at(from, SessionParams::default());
        drive(&mut s, &FallbackNarrator, Event::AdvanceRequested);
        assert_eq!(s.stage(), from.next().unwrap());
        assert!(!s.is_transitioning());
        assert!(!s.is_loading_story());
        assert!(!s.has_pending());
        assert_eq!(s.story_text(), fallback_text(s.stage()));
    }
}

#[test]
fn advancing_from_finale_is_a_no_op() {
    let mut s = SessionState::at(Stage::Finale, SessionParams::default());
    let before = s.snapshot();
    assert_eq!(s.advance(), Err(Rejected::Terminal(Stage::Finale)));
    let fx = s.apply(Event::AdvanceRequested);
    assert!(fx.is_empty());
    assert_eq!(s.snapshot(), before);
}

#[test]
fn advance_while_transitioning_is_rejected() {
    let mut s = SessionState::default();
    let first = s.apply(Event::AdvanceRequested);
    assert!(s.is_transitioning());
    assert_eq!(s.advance(), Err(Rejected::InProgress));
    assert!(s.apply(Event::AdvanceRequested).is_empty());

    // the first transition still completes to a single next stage
    let fx = s.apply(Event::DelayElapsed(delay_ticket(&first)));
    let (ticket, stage) = fetch(&fx);
    assert_eq!(stage, Stage::Chapter1);
    s.apply(Event::NarrationResolved {
        ticket,
        text: "ok".into(),
    });
    assert_eq!(s.stage(), Stage::Chapter1);
}

#[test]
fn advance_schedules_the_configured_delay() {
    let mut s = SessionState::new(SessionParams {
        transition_delay: Duration::from_millis(20),
    });
    let fx = s.apply(Event::AdvanceRequested);
    assert!(fx.iter().any(|e| matches!(
        e,
        Effect::ScheduleDelay { delay, .. } if *delay == Duration::from_millis(20)
    )));
    assert_eq!(SessionParams::default().transition_delay, Duration::from_millis(1500));
}

#[test]
fn load_story_sets_flag_then_resolves_with_text() {
    let mut s = SessionState::default();
    let fx = s.load_story(Stage::Intro);
    assert!(s.is_loading_story());
    let (ticket, stage) = fetch(&fx);
    assert_eq!(stage, Stage::Intro);

    let text = pollster::block_on(FallbackNarrator.narrate(stage));
    s.apply(Event::NarrationResolved { ticket, text });
    assert!(!s.is_loading_story());
    assert!(!s.story_text().is_empty());
    assert_eq!(s.stage(), Stage::Intro);
}

#[test]
fn empty_narration_is_replaced_by_fallback() {
    let mut s = SessionState::default();
    let (ticket, _) = fetch(&s.load_story(Stage::Intro));
    s.apply(Event::NarrationResolved {
        ticket,
        text: "   ".into(),
    });
    assert_eq!(s.story_text(), fallback_text(Stage::Intro));
}

#[test]
fn stage_does_not_commit_before_narration_resolves() {
    let mut s = SessionState::default();
    let fx = s.apply(Event::AdvanceRequested);
    assert!(s.is_transitioning());
    assert!(!s.is_loading_story());

    let fx = s.apply(Event::DelayElapsed(delay_ticket(&fx)));
    let (ticket, stage) = fetch(&fx);
    assert_eq!(stage, Stage::Chapter1);
    // narration still outstanding
    assert_eq!(s.stage(), Stage::Intro);
    assert!(s.is_transitioning());
    assert!(s.is_loading_story());

    let fx = s.apply(Event::NarrationResolved {
        ticket,
        text: "The clock tower waits.".into(),
    });
    assert_eq!(s.stage(), Stage::Chapter1);
    assert_eq!(s.story_text(), "The clock tower waits.");
    assert!(!s.is_transitioning());
    assert!(fx.contains(&Effect::StageEntered(Stage::Chapter1)));
}

#[test]
fn stale_results_are_ignored() {
    let mut s = SessionState::default();
    let (load_ticket, _) = fetch(&s.apply(Event::Mounted));
    // the transition supersedes the intro load
    let fx = s.apply(Event::AdvanceRequested);
    let delay = delay_ticket(&fx);
    assert!(s
        .apply(Event::NarrationResolved {
            ticket: load_ticket,
            text: "late intro".into(),
        })
        .is_empty());
    assert_eq!(s.story_text(), "");
    assert!(s.is_transitioning());

    s.apply(Event::DelayElapsed(delay));
    // a repeated delay for the same ticket is no longer pending
    assert!(s.apply(Event::DelayElapsed(delay)).is_empty());
}

#[test]
fn full_journey_reaches_finale_and_stays() {
    let mut s = SessionState::default();
    drive(&mut s, &FallbackNarrator, Event::Mounted);
    assert_eq!(s.story_text(), "Time waits for no one...");

    let fx = drive(&mut s, &FallbackNarrator, Event::Begin);
    assert_eq!(s.stage(), Stage::Chapter1);
    assert!(s.audio_enabled());
    assert!(fx.contains(&Effect::SetAmbience(true)));
    // audio was switched on by this click, so no win fanfare
    assert!(!fx.contains(&Effect::PlayCue(Cue::Win)));

    let mut visited = vec![s.stage()];
    for _ in 0..3 {
        let fx = drive(&mut s, &FallbackNarrator, Event::AdvanceRequested);
        assert!(fx.contains(&Effect::PlayCue(Cue::Win)));
        visited.push(s.stage());
    }
    assert_eq!(
        visited,
        vec![Stage::Chapter1, Stage::Chapter2, Stage::Chapter3, Stage::Finale]
    );
    assert!(!s.wants_ambience());

    let fx = drive(&mut s, &FallbackNarrator, Event::AdvanceRequested);
    assert!(fx.is_empty());
    assert_eq!(s.stage(), Stage::Finale);
}

#[test]
fn finale_entry_turns_ambience_off() {
    let mut s =
        SessionState::at(Stage::Chapter3, SessionParams::default()).with_audio_enabled(true);
    let fx = drive(&mut s, &FallbackNarrator, Event::AdvanceRequested);
    assert_eq!(s.stage(), Stage::Finale);
    assert!(fx.contains(&Effect::SetAmbience(false)));
}

#[test]
fn begin_with_audio_on_plays_success_then_win() {
    let mut s = SessionState::default();
    s.apply(Event::AudioToggled);
    let fx = s.apply(Event::Begin);
    let cues: Vec<Cue> = fx
        .iter()
        .filter_map(|e| match e {
            Effect::PlayCue(c) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(cues, vec![Cue::Success, Cue::Win]);
}

#[test]
fn begin_outside_intro_is_rejected() {
    let mut s = SessionState::at(Stage::Chapter2, SessionParams::default());
    assert_eq!(s.begin(), Err(Rejected::NotAtIntro));
    assert!(s.apply(Event::Begin).is_empty());
}

#[test]
fn audio_toggle_flips_and_clicks() {
    let mut s = SessionState::default();
    let fx = s.apply(Event::AudioToggled);
    assert!(s.audio_enabled());
    assert_eq!(
        fx.to_vec(),
        vec![Effect::SetAmbience(true), Effect::PlayCue(Cue::Click)]
    );
    let fx = s.apply(Event::AudioToggled);
    assert!(!s.audio_enabled());
    assert!(fx.contains(&Effect::SetAmbience(false)));
}

#[test]
fn unmount_cancels_and_ignores_later_results() {
    let mut s = SessionState::default();
    let fx = s.apply(Event::AdvanceRequested);
    let delay = delay_ticket(&fx);
    let fx = s.apply(Event::Unmounted);
    assert!(fx.contains(&Effect::CancelPending));
    assert!(fx.contains(&Effect::SetAmbience(false)));
    assert!(!s.has_pending());

    assert!(s.apply(Event::DelayElapsed(delay)).is_empty());
    assert_eq!(s.stage(), Stage::Intro);
    assert_eq!(s.advance(), Err(Rejected::Unmounted));

    // toggling after unmount neither flips the flag nor restarts ambience
    assert!(s.toggle_audio().is_empty());
    assert!(!s.audio_enabled());
}

#[test]
fn resumed_session_starts_idle_at_its_stage() {
    let s = SessionState::at(Stage::Chapter2, SessionParams::default());
    assert_eq!(s.stage(), Stage::Chapter2);
    assert!(!s.is_transitioning());
    assert!(!s.has_pending());
    assert!(!s.audio_enabled());
    assert!(s.with_audio_enabled(true).wants_ambience());
}

#[test]
fn reduce_is_apply_by_value() {
    let (s, fx) = reduce(SessionState::default(), Event::Mounted);
    assert!(s.is_loading_story());
    assert_eq!(fx.len(), 1);
}

#[test]
fn labels_match_headings() {
    assert_eq!(Stage::Chapter1.to_string(), "CHAPTER 1 LOGIC");
    assert_eq!(Stage::Finale.label(), "FINALE");
}
