//! # firewatch
//!
//! Queue-fed emergency incident registry.
//!
//! Consumes registration and extinguish events from pgmq queues and applies
//! idempotent mutations to the `emergencies` table: decode, dedup-on-insert,
//! conditional status transition. Observability via OpenTelemetry.

pub mod codec;
pub mod config;
pub mod consumer;
pub mod db;
pub mod error;
pub mod model;
pub mod telemetry;
