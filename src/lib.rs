//! creAnva - Studio backend for turning screen recordings into videos and guides
//!
//! Simulated recording sessions, a timer-driven AI processing pipeline, a
//! keyword-matching support assistant and the dashboard's project catalog,
//! served over a JSON/WebSocket API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
