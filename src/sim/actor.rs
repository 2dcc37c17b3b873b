//! Actor state machine.
//!
//! ```text
//!   Idle ⇄ Walking ──shoot──▶ Shooting ──(frames done)──▶ Walking
//!              │
//!             hit
//!              ▼
//!           Dying ──(frames done)──▶ Dead   (absorbing)
//! ```
//!
//! Animation frames advance only on ticks where `timer % anim_ticks == 0`
//! so sheet playback speed is independent of the tick rate.

use glam::Vec2;

use super::components::{Actor, ActorState};
use crate::config::SimConfig;
use crate::world::camera::normalize_angle;
use crate::world::map::{CellKind, Map};

/// `signum` that maps 0 to 0, so a zero move never probes ahead.
#[inline]
pub(crate) fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl Actor {
    /// Advance one tick of animation (and, for enemies, wandering).
    pub fn animate(&mut self, map: &Map, cfg: &SimConfig) {
        match self.state {
            ActorState::Idle => {}
            ActorState::Walking => {
                if self.frame_due(cfg.anim_ticks) {
                    self.walking_frame = (self.walking_frame + 1) % 4;
                }
                if !self.is_player {
                    self.wander(map, cfg);
                }
            }
            ActorState::Shooting => {
                if self.shooting_frame + 1 >= cfg.shoot_frames {
                    self.state = ActorState::Walking;
                    self.shooting_frame = 0;
                } else if self.frame_due(cfg.anim_ticks) {
                    self.shooting_frame += 1;
                }
            }
            ActorState::Dying => {
                if self.dying_frame + 1 >= cfg.dying_frames {
                    self.settle_dead(cfg);
                } else if self.frame_due(cfg.anim_ticks) {
                    self.dying_frame += 1;
                }
            }
            ActorState::Dead => self.settle_dead(cfg),
        }
    }

    /// Returns `true` only when this hit moved the actor into `Dying`.
    pub fn hit(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.state = ActorState::Dying;
        self.dying_frame = 0;
        self.timer = 0;
        true
    }

    /// Begin the shooting animation. Ignored while already shooting or
    /// once dying.
    pub fn start_shooting(&mut self) -> bool {
        if !self.is_alive() || self.state == ActorState::Shooting {
            return false;
        }
        self.state = ActorState::Shooting;
        self.shooting_frame = 0;
        self.timer = 0;
        true
    }

    /// Step forward along the heading; turn on collision.
    ///
    /// Each axis is tested separately with a look-ahead buffer; every
    /// blocked axis adds one turn increment.
    pub fn wander(&mut self, map: &Map, cfg: &SimConfig) {
        let d = Vec2::from_angle(self.rotation) * cfg.enemy_step;
        let next = self.pos + d;
        let buffer = cfg.collision_buffer;
        let turn = cfg.enemy_turn_deg.to_radians();
        let mut rotation = self.rotation;

        if map.classify(next.x + sign(d.x) * buffer, self.pos.y, cfg.cell_size) == CellKind::None {
            self.pos.x = next.x;
        } else {
            rotation = normalize_angle(rotation + turn);
        }

        if map.classify(self.pos.x, next.y + sign(d.y) * buffer, cfg.cell_size) == CellKind::None {
            self.pos.y = next.y;
        } else {
            rotation = normalize_angle(rotation + turn);
        }

        self.rotation = rotation;
    }

    #[inline]
    pub fn distance_to(&self, p: Vec2) -> f32 {
        self.pos.distance(p)
    }

    /// World-space bearing from this actor towards `p`.
    #[inline]
    pub fn angle_to(&self, p: Vec2) -> f32 {
        let d = p - self.pos;
        d.y.atan2(d.x)
    }

    /// `p` lies strictly inside `±cone` radians of the heading.
    pub fn in_shot_cone(&self, p: Vec2, cone: f32) -> bool {
        normalize_angle(self.rotation - self.angle_to(p)).abs() < cone
    }

    /* ───────────────────────── internals ───────────────────────── */

    fn frame_due(&mut self, period: u32) -> bool {
        let due = self.timer % period.max(1) == 0;
        self.timer = self.timer.wrapping_add(1);
        due
    }

    fn settle_dead(&mut self, cfg: &SimConfig) {
        self.state = ActorState::Dead;
        self.dying_frame = cfg.dying_frames.saturating_sub(1);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::sprite::Pose;
    use std::f32::consts::FRAC_PI_2;

    fn room() -> Map {
        Map::parse(
            "1 1 1 1
             1 0 0 1
             1 0 0 1
             1 1 1 1",
        )
        .unwrap()
    }

    fn cfg() -> SimConfig {
        SimConfig {
            cell_size: 1.0,
            ..SimConfig::default()
        }
    }

    #[test]
    fn walking_frame_advances_every_anim_period() {
        let (map, cfg) = (room(), cfg());
        let mut p = Actor::player(Vec2::new(1.5, 1.5), 0.0);
        p.state = ActorState::Walking;

        p.animate(&map, &cfg);
        assert_eq!(p.walking_frame, 1);
        for _ in 1..7 {
            p.animate(&map, &cfg);
        }
        assert_eq!(p.walking_frame, 1);
        p.animate(&map, &cfg);
        assert_eq!(p.walking_frame, 2);

        for _ in 0..14 {
            p.animate(&map, &cfg);
        }
        assert_eq!(p.walking_frame, 0, "wraps after four frames");
        assert_eq!(p.pos, Vec2::new(1.5, 1.5), "player never wanders");
    }

    #[test]
    fn pose_carries_the_frame_of_the_current_state() {
        let mut a = Actor::enemy(Vec2::ZERO, 0.0);
        a.walking_frame = 3;
        assert_eq!(a.pose(), Pose::Walking(3));
        a.state = ActorState::Idle;
        assert_eq!(a.pose(), Pose::Standing);
        a.state = ActorState::Shooting;
        a.shooting_frame = 2;
        assert_eq!(a.pose(), Pose::Shooting(2));
        a.state = ActorState::Dead;
        a.dying_frame = 4;
        assert_eq!(a.pose(), Pose::Dying(4));
    }

    #[test]
    fn shooting_returns_to_walking() {
        let (map, cfg) = (room(), cfg());
        let mut p = Actor::player(Vec2::new(1.5, 1.5), 0.0);
        assert!(p.start_shooting());
        assert!(!p.start_shooting(), "already shooting");

        let mut ticks = 0;
        while p.state == ActorState::Shooting {
            assert!(p.shooting_frame < cfg.shoot_frames);
            p.animate(&map, &cfg);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(p.state, ActorState::Walking);
        assert_eq!(p.shooting_frame, 0);
    }

    #[test]
    fn dying_ends_dead_and_dead_is_absorbing() {
        let (map, cfg) = (room(), cfg());
        let mut e = Actor::enemy(Vec2::new(1.5, 1.5), 0.0);
        assert!(e.hit());
        assert!(!e.hit(), "dying actors ignore hits");

        for _ in 0..100 {
            e.animate(&map, &cfg);
            assert!(e.dying_frame < cfg.dying_frames);
        }
        assert_eq!(e.state, ActorState::Dead);
        assert_eq!(e.dying_frame, cfg.dying_frames - 1);

        let rest = e.pos;
        for _ in 0..20 {
            assert!(!e.hit());
            assert!(!e.start_shooting());
            e.animate(&map, &cfg);
            assert_eq!(e.state, ActorState::Dead);
        }
        assert_eq!(e.pos, rest, "dead actors do not move");
    }

    #[test]
    fn wander_moves_in_open_space() {
        let (map, cfg) = (room(), cfg());
        let mut e = Actor::enemy(Vec2::new(1.5, 1.5), 0.0);
        e.wander(&map, &cfg);
        assert!((e.pos.x - 1.6).abs() < 1e-5);
        assert_eq!(e.rotation, 0.0);
    }

    #[test]
    fn wander_turns_at_walls() {
        let (map, cfg) = (room(), cfg());
        let mut e = Actor::enemy(Vec2::new(2.8, 1.5), 0.0);
        e.wander(&map, &cfg);
        assert_eq!(e.pos.x, 2.8);
        assert!((e.rotation - 10f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn wander_into_corner_turns_twice() {
        let (map, cfg) = (room(), cfg());
        let heading = std::f32::consts::FRAC_PI_4;
        let mut e = Actor::enemy(Vec2::new(2.85, 2.85), heading);
        e.wander(&map, &cfg);
        assert_eq!(e.pos, Vec2::new(2.85, 2.85));
        assert!((e.rotation - (heading + 20f32.to_radians())).abs() < 1e-5);
    }

    #[test]
    fn shot_cone() {
        let p = Actor::player(Vec2::ZERO, FRAC_PI_2);
        let cone = 10f32.to_radians();
        assert!(p.in_shot_cone(Vec2::new(0.0, 10.0), cone));
        assert!(p.in_shot_cone(Vec2::new(1.0, 10.0), cone));
        assert!(!p.in_shot_cone(Vec2::new(3.0, 10.0), cone));
        assert!(!p.in_shot_cone(Vec2::new(0.0, -10.0), cone));
        assert!((p.distance_to(Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }
}
