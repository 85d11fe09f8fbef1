//! Audio cue tables. The web front-end turns these into oscillator/gain
//! envelopes; nothing here touches a platform API.

/// Basic oscillator shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

/// Gain envelope shape for the release of a tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ramp {
    Linear,
    Exponential,
}

/// A single oscillator note inside a cue.
///
/// All times are seconds after the cue trigger:
/// - `offset_sec`: when the oscillator starts and `gain` is applied
/// - `freq_start_hz` / `freq_end_hz`: pitch glide reaching the end at `glide_sec` (equal = no glide)
/// - `release_sec`: when the gain reaches near-silence
/// - `stop_sec`: when the oscillator stops
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub offset_sec: f64,
    pub freq_start_hz: f32,
    pub freq_end_hz: f32,
    pub glide: Ramp,
    pub glide_sec: f64,
    pub gain: f32,
    pub release: Ramp,
    pub release_sec: f64,
    pub stop_sec: f64,
}

impl Tone {
    const fn blip(
        waveform: Waveform,
        freq_start_hz: f32,
        freq_end_hz: f32,
        glide: Ramp,
        gain: f32,
        release: Ramp,
        duration_sec: f64,
    ) -> Self {
        Self {
            waveform,
            offset_sec: 0.0,
            freq_start_hz,
            freq_end_hz,
            glide,
            glide_sec: duration_sec,
            gain,
            release,
            release_sec: duration_sec,
            stop_sec: duration_sec,
        }
    }

    const fn chime(waveform: Waveform, hz: f32, offset_sec: f64, release_sec: f64, stop_sec: f64) -> Self {
        Self {
            waveform,
            offset_sec,
            freq_start_hz: hz,
            freq_end_hz: hz,
            glide: Ramp::Linear,
            glide_sec: 0.0,
            gain: 0.05,
            release: Ramp::Exponential,
            release_sec,
            stop_sec,
        }
    }
}

/// Discrete UI sound effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Click,
    Hover,
    Success,
    Error,
    Step,
    Flip,
    Win,
}

static CLICK: [Tone; 1] = [Tone::blip(Waveform::Sine, 800.0, 400.0, Ramp::Exponential, 0.05, Ramp::Exponential, 0.1)];
static HOVER: [Tone; 1] = [Tone::blip(Waveform::Triangle, 200.0, 200.0, Ramp::Linear, 0.02, Ramp::Linear, 0.05)];
static STEP: [Tone; 1] = [Tone::blip(Waveform::Square, 100.0, 100.0, Ramp::Linear, 0.03, Ramp::Exponential, 0.05)];
static ERROR: [Tone; 1] = [Tone::blip(Waveform::Saw, 150.0, 100.0, Ramp::Linear, 0.05, Ramp::Linear, 0.3)];
static FLIP: [Tone; 1] = [Tone::blip(Waveform::Triangle, 300.0, 600.0, Ramp::Linear, 0.05, Ramp::Linear, 0.1)];

// C major arpeggio, 50 ms apart
static SUCCESS: [Tone; 4] = [
    Tone::chime(Waveform::Sine, 523.25, 0.00, 1.0, 1.5),
    Tone::chime(Waveform::Sine, 659.25, 0.05, 1.0, 1.5),
    Tone::chime(Waveform::Sine, 783.99, 0.10, 1.0, 1.5),
    Tone::chime(Waveform::Sine, 1046.50, 0.15, 1.0, 1.5),
];

// A major, extended over two octaves, 80 ms apart
static WIN: [Tone; 6] = [
    Tone::chime(Waveform::Triangle, 440.0, 0.00, 2.5, 3.0),
    Tone::chime(Waveform::Triangle, 554.0, 0.08, 2.5, 3.0),
    Tone::chime(Waveform::Triangle, 659.0, 0.16, 2.5, 3.0),
    Tone::chime(Waveform::Triangle, 880.0, 0.24, 2.5, 3.0),
    Tone::chime(Waveform::Triangle, 1108.0, 0.32, 2.5, 3.0),
    Tone::chime(Waveform::Triangle, 1318.0, 0.40, 2.5, 3.0),
];

impl Cue {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Cue::Click => &CLICK,
            Cue::Hover => &HOVER,
            Cue::Success => &SUCCESS,
            Cue::Error => &ERROR,
            Cue::Step => &STEP,
            Cue::Flip => &FLIP,
            Cue::Win => &WIN,
        }
    }
}

/// One sustained oscillator of the ambience drone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DroneVoice {
    pub freq_hz: f32,
    pub gain: f32,
    /// Slow gain modulation as `(rate_hz, depth)`.
    pub lfo: Option<(f32, f32)>,
}

/// Deep "time void" drone: C2 plus a slightly detuned twin that breathes.
pub const AMBIENCE: [DroneVoice; 2] = [
    DroneVoice {
        freq_hz: 65.41,
        gain: 0.08,
        lfo: Some((0.05, 0.02)),
    },
    DroneVoice {
        freq_hz: 65.0,
        gain: 0.06,
        lfo: None,
    },
];
