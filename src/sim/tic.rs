use std::thread;
use std::time::Duration;

use glam::Vec2;
use hecs::World;

use super::components::{Actor, Intents, SpriteKind};
use super::event::{Events, SoundSink, dispatch};
use super::systems;
use crate::config::SimConfig;
use crate::world::camera::Camera;
use crate::world::map::{Map, MapError};

/// Result of one fixed-rate tick.
#[derive(Debug, Default)]
pub struct TickOutcome {
    pub events: Events,
    /// The player touched an exit this tick.
    pub level_complete: bool,
}

/// Owns the level state and drives all game-logic systems.
///
/// * The map is mutated only by door / secret opening.
/// * Enemies live in the ECS world as `(Actor, SpriteKind)`.
/// * The player is a singleton outside the ECS.
pub struct Game {
    map: Map,
    player: Actor,
    world: World,
    cfg: SimConfig,
    ticks: u64,
}

impl Game {
    /// Consume the spawn markers of `map` and populate the level.
    pub fn new(mut map: Map, cfg: SimConfig) -> Result<Self, MapError> {
        let spawns = map.take_spawns(cfg.cell_size)?;
        if spawns.guards.is_empty() {
            log::warn!("map has no guard spawns");
        }

        let mut game = Self {
            map,
            player: Actor::player(spawns.player, 0.0),
            world: World::new(),
            cfg,
            ticks: 0,
        };
        for pos in spawns.guards {
            game.spawn_enemy(pos, 0.0);
        }
        log::info!(
            "level ready: {}x{} cells, player at {}, {} guards",
            game.map.width(),
            game.map.height(),
            game.player.pos,
            game.world.len()
        );
        Ok(game)
    }

    pub fn spawn_enemy(&mut self, pos: Vec2, rotation: f32) -> hecs::Entity {
        self.world.spawn((Actor::enemy(pos, rotation), SpriteKind::Guard))
    }

    #[inline]
    pub fn map(&self) -> &Map {
        &self.map
    }

    #[inline]
    pub fn player(&self) -> &Actor {
        &self.player
    }

    #[inline]
    pub fn player_mut(&mut self) -> &mut Actor {
        &mut self.player
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// View from the player's eyes.
    pub fn camera(&self, fov: f32) -> Camera {
        Camera::from_world(self.player.pos, self.player.rotation, fov, self.cfg.cell_size)
    }

    /// Run one tick: enemies → player animation → movement → shooting,
    /// then hand the sound triggers to `sink`.
    pub fn tick(&mut self, intents: Intents, sink: &dyn SoundSink) -> TickOutcome {
        let mut out = TickOutcome::default();

        systems::enemies(&mut self.world, &self.map, &self.cfg);
        self.player.animate(&self.map, &self.cfg);
        out.level_complete = systems::player_input(
            &mut self.player,
            &mut self.map,
            intents,
            &self.cfg,
            &mut out.events,
        );
        systems::shooting(
            &mut self.player,
            &mut self.world,
            &self.map,
            intents,
            &self.cfg,
            &mut out.events,
        );

        dispatch(&out.events, sink);
        self.ticks += 1;
        out
    }
}

/* ---------------------------------------------------------------- */
/* frame pacing                                                      */
/* ---------------------------------------------------------------- */

/// Sleeps away what is left of each tick's budget.
#[derive(Clone, Copy, Debug)]
pub struct FramePacer {
    budget: Duration,
}

impl FramePacer {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            budget: Duration::from_micros(1_000_000 / u64::from(tick_rate.max(1))),
        }
    }

    #[inline]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left after a frame that took `elapsed`; `None` on overrun.
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.budget.checked_sub(elapsed).filter(|d| !d.is_zero())
    }

    /// Sleep for the remainder of the budget. Returns `true` when the frame
    /// overran and the sleep was skipped.
    pub fn pace(&self, elapsed: Duration) -> bool {
        match self.remaining(elapsed) {
            Some(rest) => {
                thread::sleep(rest);
                false
            }
            None => {
                log::trace!("frame overran budget: {elapsed:?} > {:?}", self.budget);
                true
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ActorState;
    use crate::sim::GameEvent;
    use crate::sim::event::Recorder;
    use crate::world::map::{CellKind, EMPTY};
    use std::time::Instant;

    fn game(text: &str) -> Game {
        Game::new(Map::parse(text).unwrap(), SimConfig::default()).unwrap()
    }

    fn run(game: &mut Game, intents: Intents, n: usize) -> Events {
        let mut all = Events::new();
        for _ in 0..n {
            all.extend(game.tick(intents, &()).events);
        }
        all
    }

    const DOOR_CORRIDOR: &str = "
        1  1 1 1 1 9 1 1 1
        1 -1 0 0 0 9 0 0 1
        1  1 1 1 1 1 1 1 1
    ";

    #[test]
    fn player_stops_at_walls() {
        let mut g = game("1 1 1 1\n1 -1 0 1\n1 1 1 1");
        run(&mut g, Intents::FORWARD, 50);
        let x = g.player().pos.x;
        assert!(x < 15.0 - g.config().collision_buffer, "walked into the wall: {x}");
        assert!(x > 10.0);
        assert_eq!(g.player().state, ActorState::Walking);

        g.tick(Intents::empty(), &());
        assert_eq!(g.player().state, ActorState::Idle);
    }

    #[test]
    fn walking_through_a_door_opens_it_for_good() {
        let mut g = game(DOOR_CORRIDOR);
        let events = run(&mut g, Intents::FORWARD, 100);

        let opened = events.iter().filter(|e| **e == GameEvent::DoorOpened).count();
        assert_eq!(opened, 1);
        assert_eq!(g.map().get(5, 1), Some(EMPTY));
        assert_eq!(g.map().get(5, 0), Some(9), "only the entered door opens");
        assert_eq!(g.map().classify(27.5, 7.5, 5.0), CellKind::None);
        assert!(g.player().pos.x > 30.0 && g.player().pos.x < 40.0);
    }

    #[test]
    fn exit_blocks_and_completes_level() {
        let mut g = game("1 1 1 1 1\n1 -1 0 8 1\n1 1 1 1 1");
        let mut done = false;
        for _ in 0..40 {
            done |= g.tick(Intents::FORWARD, &()).level_complete;
        }
        assert!(done);
        assert!(g.player().pos.x < 15.0);
        assert_eq!(g.map().get(3, 1), Some(8));
    }

    #[test]
    fn turning_is_normalised() {
        let mut g = game("1 1 1\n1 -1 1\n1 1 1");
        run(&mut g, Intents::TURN_LEFT, 100);
        let r = g.player().rotation;
        assert!((r - (-200f32).to_radians()).abs() > 1.0, "must wrap");
        assert!((r - 160f32.to_radians()).abs() < 1e-3, "{r}");
    }

    const GALLERY: &str = "
        1  1 1 1  1 1  1 1 1 1 1  1 1
        1 -1 0 0 -2 0 -2 0 0 0 0 -2 1
        1  0 0 0  0 0  0 0 0 0 0  0 1
        1  1 1 1  1 1  1 1 1 1 1  1 1
    ";

    #[test]
    fn one_shot_kills_only_the_nearest_enemy() {
        let mut g = game(GALLERY);
        let sink = Recorder::default();
        let out = g.tick(Intents::SHOOT, &sink);

        assert_eq!(
            out.events.as_slice(),
            &[GameEvent::Gunshot, GameEvent::EnemyKilled, GameEvent::DeathScream]
        );
        assert_eq!(sink.take(), vec!["gunshot", "death_scream"]);
        assert_eq!(g.player().state, ActorState::Shooting);

        let mut states: Vec<(f32, ActorState)> = g
            .world()
            .query::<&Actor>()
            .iter()
            .map(|(_, a)| (a.pos.x, a.state))
            .collect();
        states.sort_by(|a, b| a.0.total_cmp(&b.0));
        assert_eq!(states[0].1, ActorState::Dying);
        assert!(states[1..].iter().all(|(_, s)| *s == ActorState::Walking));
    }

    #[test]
    fn walls_and_range_stop_shots() {
        let mut g = game(
            "1  1 1 1 1  1
             1 -1 0 1 -2 1
             1  1 1 1 1  1",
        );
        let out = g.tick(Intents::SHOOT, &());
        assert_eq!(out.events.as_slice(), &[GameEvent::Gunshot]);

        let mut far = game(
            "1  1 1 1 1 1 1 1 1 1 1 1  1
             1 -1 0 0 0 0 0 0 0 0 0 -2 1
             1  1 1 1 1 1 1 1 1 1 1 1  1",
        );
        let out = far.tick(Intents::SHOOT, &());
        assert_eq!(out.events.as_slice(), &[GameEvent::Gunshot], "57.5 units is out of range");
    }

    #[test]
    fn holding_fire_does_not_retrigger_mid_animation() {
        let mut g = game("1 1 1 1\n1 -1 0 1\n1 1 1 1");
        let events = run(&mut g, Intents::SHOOT, 10);
        let shots = events.iter().filter(|e| **e == GameEvent::Gunshot).count();
        assert_eq!(shots, 1);
    }

    #[test]
    fn missing_player_spawn_is_an_error() {
        let err = Game::new(Map::parse("1 1\n1 1").unwrap(), SimConfig::default())
            .err()
            .unwrap();
        assert_eq!(err, MapError::NoPlayerSpawn);
    }

    #[test]
    fn pacer_skips_sleep_on_overrun() {
        let pacer = FramePacer::new(30);
        assert_eq!(pacer.budget(), Duration::from_micros(33_333));

        let t0 = Instant::now();
        assert!(pacer.pace(Duration::from_millis(50)));
        assert!(t0.elapsed() < Duration::from_millis(20));
    }

    #[test]
    fn pacer_sleeps_the_remainder() {
        let pacer = FramePacer::new(50);
        let t0 = Instant::now();
        assert!(!pacer.pace(Duration::from_millis(5)));
        assert!(t0.elapsed() >= Duration::from_millis(15));
        assert_eq!(pacer.remaining(Duration::from_millis(20)), None);
    }
}
