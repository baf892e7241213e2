//! grievance-core — the core of the citizen grievance desk.
//!
//! Two components live here:
//!   - the complaint lifecycle: creation, status transitions, classification
//!     and derived read-time fields, persisted through the SQLite store;
//!   - the FAQ bot: keyword-overlap canned answers plus a complaint-status
//!     path that summarizes a user's own complaints by intent.
//!
//! RULES:
//!   - Only the store modules execute SQL.
//!   - Time flows through the injected Clock; randomness through ReplyRng.
//!   - External collaborators (geocoder, classifier) sit behind traits and
//!     are best-effort: their failures substitute fallbacks, never errors.
//!   - Configuration is loaded once at process start and never mutated.

pub mod bot;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod error;
pub mod geocode;
pub mod lifecycle;
pub mod rng;
pub mod store;
pub mod types;
