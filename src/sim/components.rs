use bitflags::bitflags;
use glam::Vec2;

use crate::world::sprite::Pose;

bitflags! {
    /// Input intents active this tick, already decoupled from key codes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Intents: u8 {
        const FORWARD      = 1 << 0;
        const BACK         = 1 << 1;
        const STRAFE_LEFT  = 1 << 2;
        const STRAFE_RIGHT = 1 << 3;
        const TURN_LEFT    = 1 << 4;
        const TURN_RIGHT   = 1 << 5;
        const SHOOT        = 1 << 6;

        const MOVE = Self::FORWARD.bits()
            | Self::BACK.bits()
            | Self::STRAFE_LEFT.bits()
            | Self::STRAFE_RIGHT.bits();
        const TURN = Self::TURN_LEFT.bits() | Self::TURN_RIGHT.bits();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ActorState {
    #[default]
    Idle,
    Walking,
    Shooting,
    Dying,
    Dead,
}

/// Player or enemy.
///
/// Position is in world units, rotation in radians `(-π, π]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub pos: Vec2,
    pub rotation: f32,
    pub state: ActorState,
    pub walking_frame: usize, // 0‥3
    pub shooting_frame: usize,
    pub dying_frame: usize,
    /// Ticks spent animating; frames advance when it is a multiple of the
    /// animation period.
    pub timer: u32,
    pub is_player: bool,
}

impl Actor {
    pub fn player(pos: Vec2, rotation: f32) -> Self {
        Self {
            pos,
            rotation,
            state: ActorState::Idle,
            walking_frame: 0,
            shooting_frame: 0,
            dying_frame: 0,
            timer: 0,
            is_player: true,
        }
    }

    /// Enemies start out patrolling.
    pub fn enemy(pos: Vec2, rotation: f32) -> Self {
        Self {
            state: ActorState::Walking,
            is_player: false,
            ..Self::player(pos, rotation)
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !matches!(self.state, ActorState::Dying | ActorState::Dead)
    }

    /// Sheet pose for the current state and its animation frame.
    pub fn pose(&self) -> Pose {
        match self.state {
            ActorState::Idle => Pose::Standing,
            ActorState::Walking => Pose::Walking(self.walking_frame),
            ActorState::Shooting => Pose::Shooting(self.shooting_frame),
            ActorState::Dying | ActorState::Dead => Pose::Dying(self.dying_frame),
        }
    }
}

/// Which sprite sheet an enemy entity is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Guard,
}
