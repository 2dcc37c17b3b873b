use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use hecs::{Entity, World};

use super::actor::sign;
use super::components::{Actor, ActorState, Intents};
use super::event::{Events, GameEvent};
use crate::config::SimConfig;
use crate::world::camera::normalize_angle;
use crate::world::map::{CellKind, Map};
use crate::world::ray::cast_ray;

/* ── Enemy system ─────────────────────────────────────────────────── */

/// Animate every enemy; walking ones also wander.
pub fn enemies(world: &mut World, map: &Map, cfg: &SimConfig) {
    for (_, actor) in world.query_mut::<&mut Actor>() {
        actor.animate(map, cfg);
    }
}

/* ── Player movement ──────────────────────────────────────────────── */

/// Turn, translate with per-axis collision, update the pose state.
///
/// Returns `true` when the player ran into an exit.
pub fn player_input(
    player: &mut Actor,
    map: &mut Map,
    intents: Intents,
    cfg: &SimConfig,
    events: &mut Events,
) -> bool {
    if !player.is_alive() {
        return false;
    }

    /* 1. turn */
    let turn = cfg.rotation_step_deg.to_radians();
    if intents.contains(Intents::TURN_LEFT) {
        player.rotation -= turn;
    }
    if intents.contains(Intents::TURN_RIGHT) {
        player.rotation += turn;
    }
    player.rotation = normalize_angle(player.rotation);

    /* 2. wish direction */
    let fwd = Vec2::from_angle(player.rotation);
    let mut wish = Vec2::ZERO;
    if intents.contains(Intents::FORWARD) {
        wish += fwd;
    }
    if intents.contains(Intents::BACK) {
        wish -= fwd;
    }
    if intents.contains(Intents::STRAFE_LEFT) {
        wish += Vec2::from_angle(player.rotation - FRAC_PI_2);
    }
    if intents.contains(Intents::STRAFE_RIGHT) {
        wish += Vec2::from_angle(player.rotation + FRAC_PI_2);
    }
    let d = wish * cfg.move_step;

    /* 3. per-axis collision */
    let mut exit = false;
    if d.x != 0.0 {
        let probe = Vec2::new(player.pos.x + d.x + sign(d.x) * cfg.collision_buffer, player.pos.y);
        if try_enter(map, probe, cfg.cell_size, events, &mut exit) {
            player.pos.x += d.x;
        }
    }
    if d.y != 0.0 {
        let probe = Vec2::new(player.pos.x, player.pos.y + d.y + sign(d.y) * cfg.collision_buffer);
        if try_enter(map, probe, cfg.cell_size, events, &mut exit) {
            player.pos.y += d.y;
        }
    }

    /* 4. pose */
    if player.state != ActorState::Shooting {
        player.state = if intents.intersects(Intents::MOVE | Intents::TURN) {
            ActorState::Walking
        } else {
            ActorState::Idle
        };
    }

    exit
}

/// Whether the mover may enter `probe`; opens doors and secret walls.
fn try_enter(map: &mut Map, probe: Vec2, cell_size: f32, events: &mut Events, exit: &mut bool) -> bool {
    match map.step_into(probe.x, probe.y, cell_size) {
        CellKind::None => true,
        CellKind::Door => {
            log::debug!("door opened at {probe}");
            events.push(GameEvent::DoorOpened);
            true
        }
        CellKind::Secret => {
            log::debug!("secret found at {probe}");
            events.push(GameEvent::SecretFound);
            true
        }
        CellKind::Exit => {
            if !*exit {
                events.push(GameEvent::ExitReached);
            }
            *exit = true;
            false
        }
        CellKind::Wall => false,
    }
}

/* ── Shooting ─────────────────────────────────────────────────────── */

/// Fire if asked and able; hits at most the nearest live enemy in range,
/// inside the aim cone and in front of the first wall along the heading.
pub fn shooting(
    player: &mut Actor,
    world: &mut World,
    map: &Map,
    intents: Intents,
    cfg: &SimConfig,
    events: &mut Events,
) -> Option<Entity> {
    if !intents.contains(Intents::SHOOT) || !player.start_shooting() {
        return None;
    }
    events.push(GameEvent::Gunshot);

    let wall = cast_ray(map, player.pos / cfg.cell_size, player.rotation).distance * cfg.cell_size;
    let reach = cfg.shot_range().min(wall);
    let cone = cfg.shot_cone_deg.to_radians();

    let target = world
        .query_mut::<&Actor>()
        .into_iter()
        .filter(|(_, e)| e.is_alive())
        .map(|(id, e)| (id, player.distance_to(e.pos), e.pos))
        .filter(|&(_, dist, pos)| dist < reach && player.in_shot_cone(pos, cone))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _, _)| id)?;

    let enemy = world.query_one_mut::<&mut Actor>(target).ok()?;
    if enemy.hit() {
        log::debug!("enemy {target:?} hit at {}", enemy.pos);
        events.push(GameEvent::EnemyKilled);
        events.push(GameEvent::DeathScream);
        Some(target)
    } else {
        None
    }
}
