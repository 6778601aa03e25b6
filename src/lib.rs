//! Pokedex TUI - browse PokeAPI data in the terminal
//!
//! The library exposes the app's modules so the binary and the
//! integration tests share one store, reducer, and component set.

pub mod action;
pub mod api;
pub mod audio;
pub mod components;
pub mod config;
pub mod effect;
pub mod error;
pub mod logging;
pub mod reducer;
pub mod sprite;
pub mod sprite_backend;
pub mod stat_bar;
pub mod state;
pub mod theme;
pub mod ui;
