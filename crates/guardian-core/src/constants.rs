// Shared simulation/timing tuning constants used by the web frontend and tests.

use std::time::Duration;

// Particle physics (units are canvas pixels and animation ticks)
pub const GRAVITY: f32 = 0.05; // downward pull per tick²
pub const SPEED_MIN: f32 = 2.0;
pub const SPEED_MAX: f32 = 7.0;
pub const DECAY_MIN: f32 = 0.005; // alpha lost per tick
pub const DECAY_MAX: f32 = 0.02;
pub const MIN_DECAY: f32 = 1e-4; // slowest accepted fade; caps a spark at 10k ticks
pub const RADIUS_MIN: f32 = 1.0;
pub const RADIUS_MAX: f32 = 4.0;

// Spawn policy
pub const BURST_PROBABILITY: f32 = 0.05; // chance of a new burst on any tick
pub const PARTICLES_PER_BURST: usize = 64;
pub const SKY_FRACTION: f32 = 0.6; // bursts start in the upper part of the surface
pub const MAX_LIVE_PARTICLES: usize = 2400;

// Frame compositing
pub const TRAIL_FADE_ALPHA: f32 = 0.15; // lower = longer trails
pub const GLOW_BLUR: f32 = 12.0;

// Visualizer
pub const VISUALIZER_BARS: usize = 50;
pub const BAR_MAX_HEIGHT_FRACTION: f32 = 0.25;
pub const BAR_JITTER_FRACTION: f32 = 0.3; // share of bar height driven by jitter
pub const BAR_HUE_SPEED: f32 = 2.0; // degrees per tick

// Stage transitions
pub const TRANSITION_DELAY: Duration = Duration::from_millis(1500);

// Firework palette (red, green, blue, yellow, magenta, cyan, orange)
pub const PALETTE: [[u8; 3]; 7] = [
    [0xFF, 0x00, 0x00],
    [0x00, 0xFF, 0x00],
    [0x00, 0x00, 0xFF],
    [0xFF, 0xFF, 0x00],
    [0xFF, 0x00, 0xFF],
    [0x00, 0xFF, 0xFF],
    [0xFF, 0xA5, 0x00],
];
