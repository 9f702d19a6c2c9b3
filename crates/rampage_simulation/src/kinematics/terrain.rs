use bevy::prelude::*;

use crate::config::WorldSpec;

/// Дистанция пробы уклона вдоль направления движения (м)
const SLOPE_PROBE: f32 = 1.0;

/// Источник высоты земли (heightfield, плоскость, тестовые рельефы)
pub trait GroundSampler: Send + Sync {
    fn height(&self, x: f32, z: f32) -> f32;
}

pub struct FlatGround {
    pub height: f32,
}

impl GroundSampler for FlatGround {
    fn height(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
}

/// y = base + gradient.x * x + gradient.y * z
pub struct PlanarGround {
    pub base: f32,
    pub gradient: Vec2,
}

impl GroundSampler for PlanarGround {
    fn height(&self, x: f32, z: f32) -> f32 {
        self.base + self.gradient.x * x + self.gradient.y * z
    }
}

#[derive(Resource)]
pub struct Terrain(pub Box<dyn GroundSampler>);

impl Default for Terrain {
    fn default() -> Self {
        Self(Box::new(FlatGround { height: 0.0 }))
    }
}

impl Terrain {
    pub fn from_world(world: &WorldSpec) -> Self {
        let [gx, gz] = world.ground_slope;
        if gx == 0.0 && gz == 0.0 {
            Self::default()
        } else {
            Self(Box::new(PlanarGround {
                base: 0.0,
                gradient: Vec2::new(gx, gz),
            }))
        }
    }

    pub fn height_at(&self, position: Vec3) -> f32 {
        self.0.height(position.x, position.z)
    }

    /// Уклон (градусы) вдоль горизонтального направления: > 0 — в гору
    pub fn slope_deg(&self, position: Vec3, direction: Vec3) -> f32 {
        let flat = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
        if flat == Vec3::ZERO {
            return 0.0;
        }
        let ahead = position + flat * SLOPE_PROBE;
        let rise = self.height_at(ahead) - self.height_at(position);
        rise.atan2(SLOPE_PROBE).to_degrees()
    }
}
