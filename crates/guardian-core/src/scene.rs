use crate::constants::*;
use crate::particles::{Extent, FireworksParams, ParamsError, ParticleField, Rgb};
use crate::visualizer::{layout_bars, Bar};
use glam::Vec2;

/// One drawing step for the frame executor, in paint order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCmd {
    /// Translucent black over the whole surface; leaves motion trails.
    Fade { alpha: f32 },
    /// Filled glowing circle.
    Spark {
        pos: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
        glow: f32,
    },
    Bar(Bar),
}

/// Reusable per-frame command buffer; cleared by each tick, never shrunk.
#[derive(Default)]
pub struct DrawList {
    pub cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            cmds: Vec::with_capacity(n),
        }
    }
}

/// Platform-free half of the finale animation: spawn, simulate, and emit
/// draw commands. The web front-end executes the commands on a 2D canvas.
pub struct FireworksScene {
    field: ParticleField,
    frame: u64,
    bars: Vec<Bar>,
}

impl FireworksScene {
    pub fn new(params: FireworksParams, seed: u64) -> Result<Self, ParamsError> {
        Ok(Self {
            field: ParticleField::new(params, seed)?,
            frame: 0,
            bars: Vec::with_capacity(VISUALIZER_BARS),
        })
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one tick: fade, maybe spawn, advance + reap, sparks, then bars
    /// when the finale track is playing.
    pub fn tick(&mut self, extent: Extent, music_playing: bool, out: &mut DrawList) {
        out.cmds.clear();
        out.cmds.push(DrawCmd::Fade {
            alpha: TRAIL_FADE_ALPHA,
        });

        let (probability, per_burst, gravity) = {
            let p = self.field.params();
            (p.burst_probability, p.particles_per_burst, p.gravity)
        };
        if let Some(origin) = self.field.maybe_spawn_burst(extent, probability, per_burst) {
            log::trace!("[fireworks] burst at ({:.0},{:.0})", origin.x, origin.y);
        }
        self.field.advance_and_reap(gravity);

        out.cmds.extend(self.field.particles().iter().map(|p| DrawCmd::Spark {
            pos: p.pos,
            radius: p.radius,
            color: p.color,
            alpha: p.alpha.clamp(0.0, 1.0),
            glow: GLOW_BLUR,
        }));

        if music_playing {
            layout_bars(self.frame, extent, VISUALIZER_BARS, &mut self.bars);
            out.cmds.extend(self.bars.iter().copied().map(DrawCmd::Bar));
        }

        self.frame = self.frame.wrapping_add(1);
    }
}
