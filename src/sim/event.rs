//! Gameplay events and the fire-and-forget sound dispatcher.

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use smallvec::SmallVec;

/// Discrete things that happened during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameEvent {
    Gunshot,
    EnemyKilled,
    DeathScream,
    DoorOpened,
    SecretFound,
    ExitReached,
}

/// Events raised in one tick; rarely more than a handful.
pub type Events = SmallVec<[GameEvent; 4]>;

impl GameEvent {
    /// Name of the sound effect this event triggers, if any.
    pub fn sound(self) -> Option<&'static str> {
        match self {
            GameEvent::Gunshot => Some("gunshot"),
            GameEvent::DeathScream => Some("death_scream"),
            GameEvent::DoorOpened => Some("door"),
            GameEvent::SecretFound => Some("secret"),
            GameEvent::EnemyKilled | GameEvent::ExitReached => None,
        }
    }
}

/// "Play sound by name" collaborator.
///
/// `play` must return without waiting for playback. No delivery or ordering
/// guarantee is given.
pub trait SoundSink {
    fn play(&self, name: &'static str);
}

/// Discards everything.
impl SoundSink for () {
    fn play(&self, _name: &'static str) {}
}

/// Hands sound names to a worker thread over a channel.
pub struct ChannelSink {
    tx: Option<Sender<&'static str>>,
    worker: Option<JoinHandle<()>>,
}

impl ChannelSink {
    /// Worker that only logs the requested sounds.
    pub fn logging() -> std::io::Result<Self> {
        Self::spawn(|name| log::debug!("sound: {name}"))
    }

    /// Run `handler` on a dedicated thread for every requested sound.
    pub fn spawn<F>(mut handler: F) -> std::io::Result<Self>
    where
        F: FnMut(&'static str) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<&'static str>();
        let worker = thread::Builder::new()
            .name("sound".into())
            .spawn(move || {
                for name in rx {
                    handler(name);
                }
            })?;
        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }
}

impl SoundSink for ChannelSink {
    fn play(&self, name: &'static str) {
        if let Some(tx) = &self.tx {
            if tx.send(name).is_err() {
                log::warn!("sound worker gone, dropped `{name}`");
            }
        }
    }
}

impl Drop for ChannelSink {
    fn drop(&mut self) {
        // closing the channel ends the worker loop
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("sound worker panicked");
            }
        }
    }
}

/// Dispatch the sounds of `events` to `sink`.
pub fn dispatch(events: &[GameEvent], sink: &dyn SoundSink) {
    for name in events.iter().filter_map(|e| e.sound()) {
        sink.play(name);
    }
}

/// Collects sound names; test helper.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct Recorder(pub std::sync::Mutex<Vec<&'static str>>);

#[cfg(test)]
impl Recorder {
    pub fn take(&self) -> Vec<&'static str> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

#[cfg(test)]
impl SoundSink for Recorder {
    fn play(&self, name: &'static str) {
        self.0.lock().unwrap().push(name);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn play_does_not_wait_for_a_slow_worker() {
        let (seen_tx, seen_rx) = mpsc::channel();
        let sink = ChannelSink::spawn(move |name| {
            thread::sleep(Duration::from_millis(50));
            let _ = seen_tx.send(name);
        })
        .unwrap();

        let t0 = Instant::now();
        for _ in 0..5 {
            sink.play("gunshot");
        }
        assert!(t0.elapsed() < Duration::from_millis(50));

        for _ in 0..5 {
            let got = seen_rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert_eq!(got, "gunshot");
        }
    }

    #[test]
    fn dispatch_skips_silent_events() {
        let rec = Recorder::default();
        dispatch(
            &[
                GameEvent::Gunshot,
                GameEvent::EnemyKilled,
                GameEvent::DeathScream,
                GameEvent::ExitReached,
            ],
            &rec,
        );
        assert_eq!(rec.take(), vec!["gunshot", "death_scream"]);
    }
}
