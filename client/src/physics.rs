//! Physics layers
//!
//! Maps the config's aim layers onto rapier collision groups.

use bevy_rapier3d::prelude::*;
use gunner_shared::AimLayer;

/// Collision group a layer's colliders are members of.
pub fn layer_group(layer: AimLayer) -> Group {
    match layer {
        AimLayer::Character => Group::GROUP_1,
        AimLayer::Ground => Group::GROUP_2,
        AimLayer::Obstacle => Group::GROUP_3,
    }
}

/// Groups for a collider living on `layer` that collides with everything.
pub fn collider_groups(layer: AimLayer) -> CollisionGroups {
    CollisionGroups::new(layer_group(layer), Group::ALL)
}

/// Ray-query filter that only hits colliders on the given layers.
pub fn aim_filter_groups(layers: &[AimLayer]) -> CollisionGroups {
    let mask = layers
        .iter()
        .fold(Group::NONE, |acc, layer| acc | layer_group(*layer));
    CollisionGroups::new(Group::ALL, mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aim_mask_excludes_character() {
        let groups = aim_filter_groups(&[AimLayer::Ground, AimLayer::Obstacle]);
        assert!(groups.filters.contains(Group::GROUP_2));
        assert!(groups.filters.contains(Group::GROUP_3));
        assert!(!groups.filters.contains(layer_group(AimLayer::Character)));
    }

    #[test]
    fn layers_are_distinct() {
        let all = [AimLayer::Character, AimLayer::Ground, AimLayer::Obstacle];
        for a in all {
            for b in all {
                if a != b {
                    assert!(!layer_group(a).intersects(layer_group(b)));
                }
            }
        }
    }
}
