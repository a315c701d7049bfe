//! Gameplay variants
//!
//! - `player`: Skratch, driven by the controls
//! - `blaster`: the blaster pickup, the held weapon and its shots
//! - `suit`: the blue-collar suit enemy

pub mod blaster;
pub mod player;
pub mod suit;

pub use blaster::{Blaster, BlasterShot};
pub use player::Player;
pub use suit::Suit;

use super::Entity;
use crate::math::Vector3;

/// Every sound a variant may ask for. Sounds are decoded before the first
/// level loads, so they must be known up front.
pub const SOUND_PATHS: &[&str] = &[player::JUMP_SOUND, blaster::SHOOT_SOUND];

/// Build the variant an entity-map code stands for, or `None` for codes that
/// place nothing.
pub fn spawn(code: u8, position: Vector3<f32>) -> Option<Entity> {
    match code {
        b'B' => Some(Blaster::spawn(position)),
        b'S' => Some(Suit::spawn(position)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::EntityKind;

    #[test]
    fn test_spawn_codes() {
        let at = Vector3::new(32.0, 64.0, 0.0);
        assert_eq!(spawn(b'B', at).map(|e| e.kind()), Some(EntityKind::Item));
        assert_eq!(spawn(b'S', at).map(|e| e.kind()), Some(EntityKind::Enemy));
        assert!(spawn(b'X', at).is_none());
        assert_eq!(spawn(b'S', at).unwrap().position(), at);
    }
}
