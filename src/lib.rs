//! Library crate for the live scoreboard, exposing modules for binaries and integration tests.

pub mod clock;
pub mod client;
pub mod config;
pub mod control;
pub mod dao;
pub mod display;
pub mod dto;
pub mod error;
pub mod logging;
pub mod routes;
pub mod services;
pub mod state;
