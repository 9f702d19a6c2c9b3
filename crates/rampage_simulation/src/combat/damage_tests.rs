//! Tests для расчёта урона и поглотителей

use super::*;
use crate::components::Health;
use crate::effects::{apply_effect, ActiveEffects, Effect, EffectAttribute, EffectiveAttributes, StackPolicy};
use bevy::prelude::*;
use std::f32::consts::PI;

fn profile() -> ArmorProfile {
    ArmorProfile {
        front: 0.5,
        side: 0.8,
        rear: 1.25,
        front_arc: 45f32.to_radians(),
        rear_arc: 45f32.to_radians(),
        rating: 100.0,
    }
}

fn direct(raw: f32, penetration: f32, impact_direction: Vec3) -> DamageInput {
    DamageInput { raw, penetration, impact_direction, kind: DamageKind::Direct }
}

#[test]
fn test_front_hit_halves_damage() {
    // Танк смотрит в +Z, снаряд летит навстречу (−Z)
    let mut health = Health::new(100.0);
    let breakdown = resolve_damage(
        &direct(40.0, 150.0, Vec3::NEG_Z),
        0.0,
        &profile(),
        &EffectiveAttributes::default(),
        None,
        None,
    );

    assert_eq!(breakdown.band, ArmorBand::Front);
    health.apply_damage(breakdown.to_health);
    assert!((health.current - 80.0).abs() < 1e-4, "health = {}", health.current);
}

#[test]
fn test_side_and_rear_bands() {
    let attrs = EffectiveAttributes::default();

    // Снаряд летит в −X → пришёл с +X → борт
    let side = resolve_damage(&direct(40.0, 150.0, Vec3::NEG_X), 0.0, &profile(), &attrs, None, None);
    assert_eq!(side.band, ArmorBand::Side);
    assert!((side.to_health - 32.0).abs() < 1e-4);

    // Снаряд летит в +Z (догоняет сзади) → корма
    let rear = resolve_damage(&direct(40.0, 150.0, Vec3::Z), 0.0, &profile(), &attrs, None, None);
    assert_eq!(rear.band, ArmorBand::Rear);
    assert!((rear.to_health - 50.0).abs() < 1e-4);
}

#[test]
fn test_band_follows_hull_heading() {
    // Корпус развёрнут на 90° (нос в +X): удар с +X теперь в лоб
    let breakdown = resolve_damage(
        &direct(40.0, 150.0, Vec3::NEG_X),
        PI / 2.0,
        &profile(),
        &EffectiveAttributes::default(),
        None,
        None,
    );
    assert_eq!(breakdown.band, ArmorBand::Front);
}

#[test]
fn test_low_penetration_scales_direct_only() {
    let attrs = EffectiveAttributes::default();

    let weak = resolve_damage(&direct(40.0, 50.0, Vec3::NEG_Z), 0.0, &profile(), &attrs, None, None);
    assert!((weak.penetration_factor - 0.5).abs() < 1e-5);
    assert!((weak.to_health - 10.0).abs() < 1e-4);

    let splash = DamageInput { kind: DamageKind::Splash, ..direct(40.0, 0.0, Vec3::NEG_Z) };
    let blast = resolve_damage(&splash, 0.0, &profile(), &attrs, None, None);
    assert_eq!(blast.penetration_factor, 1.0);
    assert!((blast.to_health - 20.0).abs() < 1e-4);
}

#[test]
fn test_damage_taken_effect_scales() {
    let mut effects = ActiveEffects::default();
    let mut attrs = EffectiveAttributes::default();
    let reinforced = Effect {
        id: "reinforced_hull".into(),
        attribute: EffectAttribute::DamageTaken,
        magnitude: -0.5,
        duration: Some(5.0),
        stack: StackPolicy::Refresh,
        max_stacks: 1,
    };
    apply_effect(&mut effects, &mut attrs, &reinforced, None);

    let breakdown = resolve_damage(&direct(40.0, 150.0, Vec3::NEG_Z), 0.0, &profile(), &attrs, None, None);
    assert!((breakdown.to_health - 10.0).abs() < 1e-4);
}

#[test]
fn test_over_time_bypasses_armor_and_absorbers() {
    let mut shield = Shield { capacity: 50.0, charge: 50.0, recharge_delay: 2.0, recharge_rate: 10.0, since_last_hit: 0.0 };
    let input = DamageInput { raw: 3.0, penetration: 0.0, impact_direction: Vec3::Z, kind: DamageKind::OverTime };

    let breakdown = resolve_damage(&input, 0.0, &profile(), &EffectiveAttributes::default(), Some(&mut shield), None);

    assert_eq!(breakdown.to_health, 3.0);
    assert_eq!(shield.charge, 50.0);
}

#[test]
fn test_shield_then_plating_chain() {
    let mut shield = Shield { capacity: 10.0, charge: 10.0, recharge_delay: 2.0, recharge_rate: 5.0, since_last_hit: 2.0 };
    let mut plating = ArmorPlating { remaining: 100.0, absorb_fraction: 0.5 };

    // 40 × 0.5 (front) = 20 → shield 10 → plating 5 → health 5
    let breakdown = resolve_damage(
        &direct(40.0, 150.0, Vec3::NEG_Z),
        0.0,
        &profile(),
        &EffectiveAttributes::default(),
        Some(&mut shield),
        Some(&mut plating),
    );

    assert!((breakdown.shield_absorbed - 10.0).abs() < 1e-4);
    assert!((breakdown.plating_absorbed - 5.0).abs() < 1e-4);
    assert!((breakdown.to_health - 5.0).abs() < 1e-4);
    assert_eq!(shield.charge, 0.0);
    assert!((plating.remaining - 95.0).abs() < 1e-4);
}

#[test]
fn test_shield_recharges_after_delay() {
    let mut shield = Shield { capacity: 10.0, charge: 10.0, recharge_delay: 1.0, recharge_rate: 5.0, since_last_hit: 1.0 };
    shield.absorb(8.0);
    assert_eq!(shield.charge, 2.0);

    shield.recharge(0.5);
    assert_eq!(shield.charge, 2.0, "delay not elapsed yet");

    shield.recharge(0.5);
    shield.recharge(1.0);
    assert!(shield.charge > 2.0);
    shield.recharge(10.0);
    assert_eq!(shield.charge, 10.0);
}

#[test]
fn test_plating_breaks_below_threshold() {
    let mut plating = ArmorPlating { remaining: 1.5, absorb_fraction: 1.0 };
    let absorbed = plating.absorb(1.0);
    assert_eq!(absorbed, 1.0);
    assert_eq!(plating.remaining, 0.0);
    assert_eq!(plating.absorb(10.0), 0.0);
}

#[test]
fn test_garbage_raw_damage_is_zero() {
    let attrs = EffectiveAttributes::default();
    for raw in [f32::NAN, f32::NEG_INFINITY, -5.0] {
        let breakdown = resolve_damage(&direct(raw, 150.0, Vec3::NEG_Z), 0.0, &profile(), &attrs, None, None);
        assert_eq!(breakdown.to_health, 0.0);
    }
}

#[test]
fn test_splash_falloff() {
    let splash = Splash { inner_radius: 2.0, outer_radius: 10.0, min_damage: 5.0, falloff: 1.0 };

    assert_eq!(splash.damage_at(45.0, 0.0), Some(45.0));
    assert_eq!(splash.damage_at(45.0, 2.0), Some(45.0));
    // Середина спада: 5 + 40 × 0.5
    let mid = splash.damage_at(45.0, 6.0).unwrap();
    assert!((mid - 25.0).abs() < 1e-4);
    assert_eq!(splash.damage_at(45.0, 10.0), None);
}

#[test]
fn test_statistics_skip_friendly_kills() {
    use crate::components::Team;

    let mut stats = MatchStatistics::default();
    stats.record_destruction(Team(2), Some(Team(1)));
    stats.record_destruction(Team(1), Some(Team(1)));
    stats.record_destruction(Team(2), None);

    assert_eq!(stats.kills_for(Team(1)), 1);
    assert_eq!(stats.losses_for(Team(2)), 2);
    assert_eq!(stats.losses_for(Team(1)), 1);
}
