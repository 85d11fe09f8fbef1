// Front-end wiring and styling constants. Simulation and timing tuning lives
// in `guardian_core::constants`; these only concern the browser page.
use std::time::Duration;

// Page skeleton (see index.html)
pub const MAIN_ID: &str = "stage-main";
pub const STORY_PANEL_ID: &str = "story-panel";
pub const STAGE_TITLE_ID: &str = "stage-title";
pub const STORY_TEXT_ID: &str = "story-text";
pub const STORY_LOADING_ID: &str = "story-loading";
pub const CONTENT_ID: &str = "stage-content";
pub const AUDIO_TOGGLE_ID: &str = "audio-toggle";

// Class toggled on the main area while a stage transition fades out
pub const TRANSITIONING_CLASS: &str = "transitioning";
pub const HIDDEN_CLASS: &str = "hidden";

// Finale
pub const FINALE_TRACK: &str = "memory.mp3";
pub const FINALE_TRACK_VOLUME: f64 = 0.5;
pub const SECRET_REVEAL_DELAY: Duration = Duration::from_secs(60);

// Canvas styling
pub const BAR_SATURATION_PCT: u32 = 85;
pub const BAR_LIGHTNESS_PCT: u32 = 60;
pub const BAR_ALPHA: f64 = 0.8;

// WebAudio: exponential ramps cannot reach zero
pub const SILENCE_GAIN: f32 = 0.001;

// Narration service
pub const NARRATION_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const NARRATION_MODEL: &str = "gemini-3-flash-preview";
pub const API_KEY_META: &str = "guardian-api-key";
