//! Yet Another Wolfenstein in Rust.
//!
//! * [`world`] – tile map, camera, grid ray traversal, textures and sprite sheets.
//! * [`sim`] – fixed-rate game logic: player, guards, shooting, doors.
//! * [`renderer`] – software ray-casting back-end and framebuffer.
//! * [`assets`] – PPM decoding and the procedural fallback set.
//! * [`config`] – TOML runtime configuration.

pub mod assets;
pub mod config;
pub mod renderer;
pub mod sim;
pub mod world;
