//! kairos-graph - query builder and chart back-end for a KairosDB-style
//! time-series service.

pub mod chart;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod query;
pub mod session;
pub mod surface;
pub mod web;
