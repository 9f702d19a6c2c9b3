use bevy::prelude::*;

use crate::components::{Vehicle, Wreck};
use crate::effects::{ActiveEffects, EffectiveAttributes};

/// Система: expiry sweep (последняя фаза tick'а перед snapshot).
///
/// Истёкшие эффекты снимаются, производные атрибуты пересчитываются —
/// следующий kinematics pass уже видит скорость без истёкшего slow.
/// Наложенное на этом же tick'е (команда или on-hit) начинает отсчёт со следующего.
pub fn sweep_effects(
    mut vehicles: Query<
        (Entity, &mut ActiveEffects, &mut EffectiveAttributes),
        (With<Vehicle>, Without<Wreck>),
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut effects, mut attributes) in vehicles.iter_mut() {
        if effects.is_empty() {
            continue;
        }

        let expired = effects.tick(delta);
        if !expired.is_empty() {
            crate::log(&format!("⏳ {:?}: effects expired {:?}", entity, expired));
        }

        let recomputed = effects.effective_attributes();
        if *attributes != recomputed {
            *attributes = recomputed;
        }
    }
}
