// Host-side tests for constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use guardian_core::constants::*;
use std::time::Duration;

#[test]
#[allow(clippy::assertions_on_constants)]
fn simulation_ranges_are_well_formed() {
    assert!(SPEED_MIN > 0.0 && SPEED_MIN < SPEED_MAX);
    assert!(DECAY_MIN > 0.0 && DECAY_MIN < DECAY_MAX);
    assert!(RADIUS_MIN > 0.0 && RADIUS_MIN < RADIUS_MAX);
    assert!(GRAVITY > 0.0);
    assert!(BURST_PROBABILITY > 0.0 && BURST_PROBABILITY <= 1.0);
    assert!(SKY_FRACTION > 0.0 && SKY_FRACTION <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn cap_holds_several_bursts() {
    assert!(PARTICLES_PER_BURST > 0);
    assert!(MAX_LIVE_PARTICLES >= PARTICLES_PER_BURST * 10);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn frame_styling_is_in_range() {
    assert!(TRAIL_FADE_ALPHA > 0.0 && TRAIL_FADE_ALPHA < 1.0);
    assert!(GLOW_BLUR >= 0.0);
    assert_eq!(VISUALIZER_BARS, 50);
    assert!(BAR_MAX_HEIGHT_FRACTION > 0.0 && BAR_MAX_HEIGHT_FRACTION <= 0.25);
    assert!(BAR_ALPHA > 0.0 && BAR_ALPHA <= 1.0);
    assert!(BAR_SATURATION_PCT <= 100 && BAR_LIGHTNESS_PCT <= 100);
}

#[test]
fn timings_match_the_presentation() {
    assert_eq!(TRANSITION_DELAY, Duration::from_millis(1500));
    assert_eq!(SECRET_REVEAL_DELAY, Duration::from_secs(60));
    assert!((FINALE_TRACK_VOLUME - 0.5).abs() < f64::EPSILON);
}

#[test]
fn palette_is_seven_distinct_colours() {
    for (i, a) in PALETTE.iter().enumerate() {
        for b in &PALETTE[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn element_ids_are_unique() {
    let ids = [
        MAIN_ID,
        STORY_PANEL_ID,
        STAGE_TITLE_ID,
        STORY_TEXT_ID,
        STORY_LOADING_ID,
        CONTENT_ID,
        AUDIO_TOGGLE_ID,
    ];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        assert!(!ids[i + 1..].contains(a), "duplicate id {a}");
    }
}
