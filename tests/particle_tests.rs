// Host-side tests for the fireworks simulation and the frame command list.

use glam::Vec2;
use guardian_core::constants::{MAX_LIVE_PARTICLES, PALETTE, TRAIL_FADE_ALPHA, VISUALIZER_BARS};
use guardian_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn spark(alpha: f32, decay: f32) -> Particle {
    Particle {
        pos: Vec2::new(5.0, 5.0),
        vel: Vec2::new(1.0, -2.0),
        color: Rgb(255, 0, 0),
        radius: 2.0,
        alpha,
        decay,
    }
}

#[test]
fn tick_moves_then_applies_gravity() {
    let p = tick(spark(1.0, 0.01), 0.05);
    assert_eq!(p.pos, Vec2::new(6.0, 3.0));
    assert!((p.vel.y - (-1.95)).abs() < 1e-6);
    assert!((p.alpha - 0.99).abs() < 1e-6);
}

#[test]
fn alpha_never_increases_and_expires_on_first_non_positive() {
    let mut p = spark(1.0, 0.3);
    let mut ticks = 0;
    while !is_expired(&p) {
        let next = tick(p, 0.05);
        assert!(next.alpha <= p.alpha);
        p = next;
        ticks += 1;
    }
    // 1.0 - 4 * 0.3 = -0.2 is the first value at or below zero
    assert_eq!(ticks, 4);
    assert!(is_expired(&spark(0.0, 0.1)));
    assert!(!is_expired(&spark(0.001, 0.1)));
}

#[test]
fn advancing_the_field_matches_sequential_ticks() {
    let params = FireworksParams::default();
    let mut field = ParticleField::new(params.clone(), 11).unwrap();
    field.spawn_burst(Vec2::new(200.0, 100.0), 30);
    let mut expected: Vec<Particle> = field.particles().to_vec();
    assert_eq!(expected.len(), 30);
    // nothing moves until the field is advanced
    assert_eq!(field.particles(), expected.as_slice());

    for _ in 0..25 {
        field.advance_and_reap(params.gravity);
        expected = expected
            .into_iter()
            .map(|p| tick(p, params.gravity))
            .filter(|p| !is_expired(p))
            .collect();
        assert_eq!(field.particles(), expected.as_slice());
    }
}

#[test]
fn reaping_removes_only_expired_and_keeps_order() {
    let params = FireworksParams {
        decay: (0.5, 0.5001),
        ..FireworksParams::default()
    };
    let mut field = ParticleField::new(params, 5).unwrap();
    field.spawn_burst(Vec2::ZERO, 8);
    field.advance_and_reap(0.0);
    assert_eq!(field.len(), 8);
    field.advance_and_reap(0.0);
    assert!(field.is_empty());
}

#[test]
fn fixed_value_ranges_are_accepted() {
    let params = FireworksParams {
        decay: (0.01, 0.01),
        radius: (2.0, 2.0),
        speed: (3.0, 3.0),
        ..FireworksParams::default()
    };
    let mut field = ParticleField::new(params, 8).unwrap();
    field.spawn_burst(Vec2::ZERO, 4);
    assert_eq!(field.len(), 4);
    for p in field.particles() {
        assert_eq!(p.decay, 0.01);
        assert_eq!(p.radius, 2.0);
        assert!((p.vel.length() - 3.0).abs() < 1e-4);
    }
}

#[test]
fn params_that_never_fade_are_rejected() {
    let zero = FireworksParams {
        decay: (0.0, 1e-9),
        ..FireworksParams::default()
    };
    assert!(matches!(
        ParticleField::new(zero, 1),
        Err(ParamsError::TooSmall { name: "decay", .. })
    ));

    let inverted = FireworksParams {
        radius: (4.0, 1.0),
        ..FireworksParams::default()
    };
    assert!(matches!(
        FireworksScene::new(inverted, 1),
        Err(ParamsError::Range { name: "radius", .. })
    ));

    let flat = FireworksParams {
        radius: (0.0, 0.0),
        ..FireworksParams::default()
    };
    assert!(flat.validate().is_err());

    let no_room = FireworksParams {
        max_particles: 0,
        ..FireworksParams::default()
    };
    assert_eq!(no_room.validate(), Err(ParamsError::NoCapacity));
    assert_eq!(FireworksParams::default().validate(), Ok(()));
}

#[test]
fn certain_burst_spawns_exactly_k() {
    let mut field = ParticleField::new(FireworksParams::default(), 9).unwrap();
    let extent = Extent::new(800.0, 600.0);
    let origin = field.maybe_spawn_burst(extent, 1.0, 37).expect("burst");
    assert_eq!(field.len(), 37);
    assert!(origin.x >= 0.0 && origin.x < 800.0);
    assert!(origin.y >= 0.0 && origin.y < 600.0 * field.params().sky_fraction);
    assert!(field.particles().iter().all(|p| p.pos == origin));

    assert!(field.maybe_spawn_burst(extent, 0.0, 37).is_none());
    assert_eq!(field.len(), 37);
}

#[test]
fn burst_colour_comes_from_palette() {
    let mut field = ParticleField::new(FireworksParams::default(), 21).unwrap();
    for _ in 0..20 {
        field.spawn_burst(Vec2::ZERO, 3);
    }
    for p in field.particles() {
        assert!(PALETTE.iter().any(|&c| Rgb::from_array(c) == p.color));
    }
}

#[test]
fn cap_holds_under_sustained_bursts() {
    let params = FireworksParams {
        burst_probability: 1.0,
        ..FireworksParams::default()
    };
    let mut scene = FireworksScene::new(params, 1).unwrap();
    let mut out = DrawList::default();
    for _ in 0..100 {
        scene.tick(Extent::new(800.0, 600.0), false, &mut out);
        assert!(scene.field().len() <= MAX_LIVE_PARTICLES);
    }
    assert!(scene.field().len() > 0);
}

#[test]
fn eviction_drops_oldest_first() {
    let params = FireworksParams {
        max_particles: 10,
        ..FireworksParams::default()
    };
    let mut field = ParticleField::new(params, 2).unwrap();
    field.spawn_burst(Vec2::new(1.0, 1.0), 6);
    field.spawn_burst(Vec2::new(2.0, 2.0), 6);
    assert_eq!(field.len(), 10);
    let from_first = field
        .particles()
        .iter()
        .filter(|p| p.pos == Vec2::new(1.0, 1.0))
        .count();
    assert_eq!(from_first, 4);
    assert_eq!(field.particles()[0].pos, Vec2::new(1.0, 1.0));
    assert_eq!(field.particles()[9].pos, Vec2::new(2.0, 2.0));

    // a burst larger than the cap keeps only `cap` sparks
    field.spawn_burst(Vec2::new(3.0, 3.0), 50);
    assert_eq!(field.len(), 10);
    assert!(field.particles().iter().all(|p| p.pos == Vec2::new(3.0, 3.0)));
}

#[test]
fn scene_emits_fade_sparks_then_bars() {
    let params = FireworksParams {
        burst_probability: 1.0,
        ..FireworksParams::default()
    };
    let mut scene = FireworksScene::new(params, 4).unwrap();
    let mut out = DrawList::default();
    let extent = Extent::new(800.0, 600.0);

    scene.tick(extent, true, &mut out);
    assert_eq!(
        out.cmds[0],
        DrawCmd::Fade {
            alpha: TRAIL_FADE_ALPHA
        }
    );
    let sparks = out
        .cmds
        .iter()
        .filter(|c| matches!(c, DrawCmd::Spark { .. }))
        .count();
    assert_eq!(sparks, scene.field().len());
    let bars = &out.cmds[1 + sparks..];
    assert_eq!(bars.len(), VISUALIZER_BARS);
    assert!(bars.iter().all(|c| matches!(c, DrawCmd::Bar(_))));

    scene.tick(extent, false, &mut out);
    assert!(!out.cmds.iter().any(|c| matches!(c, DrawCmd::Bar(_))));
    assert_eq!(scene.frame(), 2);
}

#[test]
fn empty_surface_spawns_at_origin() {
    let mut field = ParticleField::new(FireworksParams::default(), 3).unwrap();
    let origin = field.maybe_spawn_burst(Extent::new(0.0, 0.0), 1.0, 4);
    assert_eq!(origin, Some(Vec2::ZERO));
}

#[test]
fn bars_stay_within_a_quarter_of_the_height() {
    let extent = Extent::new(1000.0, 800.0);
    let mut bars = Vec::new();
    for frame in [0u64, 1, 17, 999, u64::MAX] {
        layout_bars(frame, extent, VISUALIZER_BARS, &mut bars);
        assert_eq!(bars.len(), VISUALIZER_BARS);
        for (i, b) in bars.iter().enumerate() {
            assert!(b.height >= 0.0 && b.height <= 200.0 + 1e-3);
            assert!((0.0..360.0).contains(&b.hue));
            assert!((b.x - i as f32 * 20.0).abs() < 1e-3);
            assert!((b.top(extent) + b.height - 800.0).abs() < 1e-3);
        }
    }
    layout_bars(5, Extent::new(0.0, 600.0), VISUALIZER_BARS, &mut bars);
    assert!(bars.is_empty());
}

#[test]
fn spawned_spark_starts_opaque_with_given_colour() {
    let mut rng = StdRng::seed_from_u64(3);
    let p = spawn(Vec2::new(4.0, 4.0), Rgb(1, 2, 3), &FireworksParams::default(), &mut rng);
    assert_eq!(p.alpha, 1.0);
    assert_eq!(p.color, Rgb(1, 2, 3));
    assert_eq!(Rgb(255, 165, 0).css(), "rgb(255, 165, 0)");
}
