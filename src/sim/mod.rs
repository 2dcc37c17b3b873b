mod actor;
mod components;
pub mod event;
mod systems;
mod tic;

pub use components::{Actor, ActorState, Intents, SpriteKind};
pub use event::{ChannelSink, Events, GameEvent, SoundSink};
pub use tic::{FramePacer, Game, TickOutcome};
