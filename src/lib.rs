//! Draft coordination and pick/ban recommendations for 5v5 hero drafts.
//!
//! [`draft`] owns the turn order and validates every ban and pick. [`analysis`] scores
//! candidates from meta rankings, ally synergy and enemy counters supplied by any
//! [`stats::StatsProvider`].

pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod draft;
pub mod error;
pub mod roster;
pub mod stats;
pub mod storage;
