//! Soundboard - coordinates playback of a set of page audio elements.
//! Tracks which sounds are playing, explicitly paused, or paused by the
//! controller itself (window blur, mute) so only the latter resume on their own.

pub mod controller;
pub mod cookie;
pub mod options;
pub mod store;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use controller::{
    ControllerEvent, ControllerSnapshot, ListenerId, MediaEvent, SoundController, SoundHandle,
    SoundLookup, SoundRef, SoundSet, SoundState, SoundStatus, WindowEvent,
};
pub use options::{ControllerOptions, MuteStorage};
pub use store::{MemoryMuteStore, MuteStore, StoreError};
