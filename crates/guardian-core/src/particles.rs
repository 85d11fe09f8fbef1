use crate::constants::*;
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;
use thiserror::Error;

/// Opaque sRGB colour shared by every spark of one burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_array(c: [u8; 3]) -> Self {
        Rgb(c[0], c[1], c[2])
    }

    /// CSS `rgb(r, g, b)` form.
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Drawing surface size in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Tuning for the fireworks simulation.
///
/// - `gravity` is added to every particle's vertical velocity per tick
/// - `speed` / `decay` / `radius` are the `(min, max)` ranges spawn draws from
/// - `burst_probability` is the per-tick chance of a new burst
/// - `particles_per_burst` is the number of sparks in one burst
/// - `sky_fraction` bounds burst origins to the upper part of the surface
/// - `max_particles` caps the live set; the oldest sparks are evicted first
#[derive(Clone, Debug, PartialEq)]
pub struct FireworksParams {
    pub gravity: f32,
    pub speed: (f32, f32),
    pub decay: (f32, f32),
    pub radius: (f32, f32),
    pub burst_probability: f32,
    pub particles_per_burst: usize,
    pub sky_fraction: f32,
    pub max_particles: usize,
}

/// Why a [`FireworksParams`] was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ParamsError {
    #[error("{name} range ({min}, {max}) is not finite or has min > max")]
    Range { name: &'static str, min: f32, max: f32 },
    #[error("{name} must be at least {floor}, got {value}")]
    TooSmall {
        name: &'static str,
        value: f32,
        floor: f32,
    },
    #[error("{name} must lie in [0, 1], got {value}")]
    Fraction { name: &'static str, value: f32 },
    #[error("max_particles must be at least 1")]
    NoCapacity,
}

fn check_range(name: &'static str, (min, max): (f32, f32)) -> Result<(), ParamsError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ParamsError::Range { name, min, max })
    }
}

fn check_floor(name: &'static str, value: f32, floor: f32) -> Result<(), ParamsError> {
    if value >= floor {
        Ok(())
    } else {
        Err(ParamsError::TooSmall { name, value, floor })
    }
}

fn check_fraction(name: &'static str, value: f32) -> Result<(), ParamsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParamsError::Fraction { name, value })
    }
}

impl FireworksParams {
    /// Every spark must fade (`decay >= MIN_DECAY`) and be visible
    /// (`radius > 0`); ranges may collapse to a single value.
    pub fn validate(&self) -> Result<(), ParamsError> {
        check_range("speed", self.speed)?;
        check_range("decay", self.decay)?;
        check_range("radius", self.radius)?;
        check_floor("speed", self.speed.0, 0.0)?;
        check_floor("decay", self.decay.0, MIN_DECAY)?;
        check_floor("radius", self.radius.0, f32::MIN_POSITIVE)?;
        if !self.gravity.is_finite() {
            return Err(ParamsError::Range {
                name: "gravity",
                min: self.gravity,
                max: self.gravity,
            });
        }
        check_fraction("burst_probability", self.burst_probability)?;
        check_fraction("sky_fraction", self.sky_fraction)?;
        if self.max_particles == 0 {
            return Err(ParamsError::NoCapacity);
        }
        Ok(())
    }
}

impl Default for FireworksParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            speed: (SPEED_MIN, SPEED_MAX),
            decay: (DECAY_MIN, DECAY_MAX),
            radius: (RADIUS_MIN, RADIUS_MAX),
            burst_probability: BURST_PROBABILITY,
            particles_per_burst: PARTICLES_PER_BURST,
            sky_fraction: SKY_FRACTION,
            max_particles: MAX_LIVE_PARTICLES,
        }
    }
}

/// A single decaying spark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    pub radius: f32,
    pub alpha: f32,
    pub decay: f32,
}

/// Uniform in `[min, max]`; a collapsed range yields `min`.
fn sample<R: Rng + ?Sized>(rng: &mut R, (min, max): (f32, f32)) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// Create a spark at `origin` flying in a uniformly random direction.
pub fn spawn<R: Rng + ?Sized>(
    origin: Vec2,
    color: Rgb,
    params: &FireworksParams,
    rng: &mut R,
) -> Particle {
    let angle = rng.gen_range(0.0..TAU);
    let speed = sample(rng, params.speed);
    Particle {
        pos: origin,
        vel: Vec2::new(angle.cos(), angle.sin()) * speed,
        color,
        radius: sample(rng, params.radius),
        alpha: 1.0,
        decay: sample(rng, params.decay),
    }
}

/// Advance one tick: move, then apply gravity, then fade.
#[inline]
pub fn tick(mut p: Particle, gravity: f32) -> Particle {
    p.pos += p.vel;
    p.vel.y += gravity;
    p.alpha -= p.decay;
    p
}

#[inline]
pub fn is_expired(p: &Particle) -> bool {
    p.alpha <= 0.0
}

/// The live set of sparks plus the stochastic burst policy that feeds it.
///
/// Particles live in one contiguous `Vec`. Reaping compacts it in place, so
/// insertion order is preserved and the oldest sparks are always at the
/// front; that is what cap eviction relies on.
pub struct ParticleField {
    particles: Vec<Particle>,
    params: FireworksParams,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(params: FireworksParams, seed: u64) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self {
            particles: Vec::with_capacity(params.max_particles),
            params,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn params(&self) -> &FireworksParams {
        &self.params
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Roll once; on success start a burst somewhere in the sky and return
    /// its origin.
    pub fn maybe_spawn_burst(
        &mut self,
        extent: Extent,
        burst_probability: f32,
        particles_per_burst: usize,
    ) -> Option<Vec2> {
        if self.rng.gen::<f32>() >= burst_probability {
            return None;
        }
        let x = self.rng.gen::<f32>() * extent.width.max(0.0);
        let y = self.rng.gen::<f32>() * (extent.height.max(0.0) * self.params.sky_fraction);
        let origin = Vec2::new(x, y);
        self.spawn_burst(origin, particles_per_burst);
        Some(origin)
    }

    /// Insert `count` sparks at `origin` sharing one palette colour, evicting
    /// the oldest sparks first when the cap would be exceeded.
    pub fn spawn_burst(&mut self, origin: Vec2, count: usize) {
        let cap = self.params.max_particles;
        let count = count.min(cap);
        let overflow = (self.particles.len() + count).saturating_sub(cap);
        if overflow > 0 {
            self.particles.drain(..overflow);
            log::debug!("[fireworks] evicted {} oldest sparks", overflow);
        }
        let color = Rgb::from_array(PALETTE[self.rng.gen_range(0..PALETTE.len())]);
        for _ in 0..count {
            let p = spawn(origin, color, &self.params, &mut self.rng);
            self.particles.push(p);
        }
    }

    /// Tick every spark, then drop every spark that has faded out.
    pub fn advance_and_reap(&mut self, gravity: f32) {
        for p in self.particles.iter_mut() {
            *p = tick(*p, gravity);
        }
        self.particles.retain(|p| !is_expired(p));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_respects_configured_ranges() {
        let params = FireworksParams::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let p = spawn(Vec2::new(10.0, 20.0), Rgb(1, 2, 3), &params, &mut rng);
            let speed = p.vel.length();
            assert!(speed >= params.speed.0 - 1e-4 && speed <= params.speed.1 + 1e-4);
            assert!(p.decay >= params.decay.0 && p.decay <= params.decay.1);
            assert!(p.radius >= params.radius.0 && p.radius <= params.radius.1);
            assert_eq!(p.alpha, 1.0);
            assert_eq!(p.pos, Vec2::new(10.0, 20.0));
        }
    }

    #[test]
    fn burst_shares_one_colour() {
        let mut field = ParticleField::new(FireworksParams::default(), 3).unwrap();
        field.spawn_burst(Vec2::new(100.0, 100.0), 40);
        let first = field.particles()[0].color;
        assert!(field.particles().iter().all(|p| p.color == first));
    }

    #[test]
    fn collapsed_range_samples_its_single_value() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample(&mut rng, (0.01, 0.01)), 0.01);
        let v = sample(&mut rng, (1.0, 2.0));
        assert!((1.0..=2.0).contains(&v));
    }
}
