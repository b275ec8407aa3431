//! FootprintLens Library
//!
//! This library provides the core functionality of the FootprintLens privacy
//! awareness service: a schema-constrained client for the hosted Gemini
//! model, the footprint data model, input validation, per-session UI state,
//! the radar chart renderer and the HTTP handlers that tie them together.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `dashboard`: Server-rendered input and results pages.
//! - `errors`: Error handling types.
//! - `gemini_client`: Schema-constrained inference client.
//! - `handlers`: HTTP request handlers and router.
//! - `models`: Footprint data model and API envelopes.
//! - `radar`: Radar chart geometry and SVG rendering.
//! - `session`: Per-session analysis state.
//! - `validation`: Input length gating.

pub mod config;
pub mod dashboard;
pub mod errors;
pub mod gemini_client;
pub mod handlers;
pub mod models;
pub mod radar;
pub mod session;
pub mod validation;
