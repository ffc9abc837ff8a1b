//! CultureQuest — a geography quiz engine.
//!
//! The core is the spot resolver: given a country name, it samples random
//! coordinates inside the country's bounding box until one has panoramic
//! street imagery and is confirmed inside the country, falling back to the
//! box centroid after a bounded number of attempts. Around it: a country
//! catalog, a linear quiz flow, locally persisted player stats, a remote
//! leaderboard client, and an HTTP API.

pub mod config;
pub mod countries;
pub mod geo;
pub mod leaderboard;
pub mod quiz;
pub mod score;
pub mod server;
