//! UI for the soundboard demo.

mod board;
#[cfg(target_arch = "wasm32")]
mod sound_row;

pub use board::*;
