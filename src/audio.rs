//! Audio cues emitted by the simulation.
//!
//! The session never plays sound itself. It reports discrete events to an
//! [`AudioSink`]; with no backend available the [`NullAudio`] sink swallows
//! them and the simulation behaves identically.

use log::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioEvent {
    /// A projectile was fired, by the player or an enemy.
    Shot,
    /// The player or an enemy took damage.
    Damage,
    /// The player picked up a collectible.
    Collect,
}

pub trait AudioSink {
    fn play(&mut self, event: AudioEvent);
}

/// Discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _event: AudioEvent) {}
}

/// Reports cues through the `log` facade at trace level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, event: AudioEvent) {
        trace!("audio cue: {:?}", event);
    }
}
