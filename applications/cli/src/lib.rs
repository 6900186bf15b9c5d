//! Cadence - headless music client
//!
//! Search the remote catalog, play queues on the simulated engine, and manage
//! favorites, playlists, recent searches and the theme preference stored in
//! the local database.

pub mod commands;
pub mod config;
pub mod session;
