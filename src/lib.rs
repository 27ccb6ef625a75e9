//! # Gridportal API Library
//!
//! Backend API for an electricity consumer dashboard: consumer details,
//! tariff rates, power-quality snapshots, billing, DTR aggregates, a
//! support-ticket CRUD flow, and client error logging.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub use migration;
