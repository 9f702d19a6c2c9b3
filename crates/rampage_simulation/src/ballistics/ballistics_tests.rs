//! Tests for swept hit test and projectile bookkeeping.

use super::*;
use crate::combat::WeaponStats;
use crate::components::Team;
use bevy::prelude::*;

fn target(index: u32, center: Vec3, radius: f32) -> SweepTarget {
    SweepTarget {
        entity: Entity::from_raw(index),
        center,
        radius,
    }
}

#[test]
fn test_segment_hits_sphere_in_front() {
    let t = segment_sphere(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 6.0), 1.0);
    assert!((t.unwrap() - 0.5).abs() < 1e-6);
}

#[test]
fn test_segment_misses_sphere_beside() {
    assert!(segment_sphere(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), Vec3::new(3.0, 0.0, 5.0), 1.0).is_none());
}

#[test]
fn test_segment_stops_short() {
    assert!(segment_sphere(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 0.0, 6.0), 1.0).is_none());
}

#[test]
fn test_sphere_behind_start_is_ignored() {
    assert!(segment_sphere(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
}

#[test]
fn test_start_inside_sphere() {
    assert_eq!(segment_sphere(Vec3::ZERO, Vec3::X, Vec3::ZERO, 2.0), Some(0.0));
}

#[test]
fn test_no_tunneling_through_thin_target() {
    // 1200 m/s при 60 Hz → 20 м за tick; цель радиусом 0.3 посередине отрезка
    let start = Vec3::new(0.0, 1.0, 0.0);
    let end = start + Vec3::Z * 20.0;
    let thin = target(1, Vec3::new(0.0, 1.0, 10.0), 0.3);

    // Ни начало, ни конец отрезка не внутри — endpoint check бы промахнулся
    assert!(start.distance(thin.center) > thin.radius);
    assert!(end.distance(thin.center) > thin.radius);

    let (hit, t) = first_hit(start, end, [thin]).expect("swept test must hit");
    assert_eq!(hit.entity, thin.entity);
    assert!((t - (9.7 / 20.0)).abs() < 1e-4);
}

#[test]
fn test_first_hit_is_nearest() {
    let far = target(1, Vec3::new(0.0, 0.0, 8.0), 1.0);
    let near = target(2, Vec3::new(0.0, 0.0, 4.0), 1.0);
    let (hit, _) = first_hit(Vec3::ZERO, Vec3::Z * 10.0, [far, near]).unwrap();
    assert_eq!(hit.entity, near.entity);
}

#[test]
fn test_equal_distance_tiebreak_by_index() {
    let a = target(9, Vec3::new(0.0, 0.0, 5.0), 1.0);
    let b = target(3, Vec3::new(0.0, 0.0, 5.0), 1.0);
    let (hit, _) = first_hit(Vec3::ZERO, Vec3::Z * 10.0, [a, b]).unwrap();
    assert_eq!(hit.entity, b.entity);
}

#[test]
fn test_launch_keeps_team_and_payload() {
    let stats = WeaponStats::direct("cannon", 150.0, 40.0, 120.0, 2.0, 250.0);
    let owner = Entity::from_raw(5);
    let projectile = Projectile::launch(owner, Team(2), Vec3::Y, Vec3::new(0.0, 0.0, 2.0), &stats);

    assert_eq!(projectile.owner_team, Team(2));
    assert_eq!(projectile.velocity, Vec3::Z * 150.0);
    assert_eq!(projectile.payload.damage, 40.0);
    assert_eq!(projectile.payload.penetration, 120.0);
    assert!(!projectile.hitscan);
}

#[test]
fn test_hitscan_launch_stores_direction() {
    let stats = WeaponStats {
        hitscan: true,
        ..WeaponStats::direct("mg", 0.0, 2.0, 10.0, 0.5, 90.0)
    };
    let projectile = Projectile::launch(Entity::from_raw(1), Team(1), Vec3::ZERO, Vec3::X * 5.0, &stats);
    assert_eq!(projectile.velocity, Vec3::X);
    assert_eq!(projectile.range, 90.0);
}

#[test]
fn test_spawn_queue_drains_in_fire_order() {
    let stats = WeaponStats::direct("cannon", 150.0, 40.0, 120.0, 2.0, 250.0);
    let first = Entity::from_raw(1);
    let second = Entity::from_raw(2);

    let mut queue = ProjectileSpawnQueue::default();
    queue.push(Projectile::launch(first, Team(1), Vec3::ZERO, Vec3::Z, &stats));
    queue.push(Projectile::launch(second, Team(2), Vec3::ZERO, Vec3::Z, &stats));
    assert_eq!(queue.len(), 2);

    let drained = queue.drain();
    assert_eq!(drained.iter().map(|p| p.owner).collect::<Vec<_>>(), vec![first, second]);
    assert!(queue.is_empty());
}

#[test]
fn test_arena_bounds() {
    let bounds = ArenaBounds { half_extent: 100.0, floor: -10.0 };
    assert!(bounds.contains(Vec3::new(99.0, 0.0, -99.0)));
    assert!(!bounds.contains(Vec3::new(101.0, 0.0, 0.0)));
    assert!(!bounds.contains(Vec3::new(0.0, -11.0, 0.0)));
}
