//! stockind: technical analysis indicators over ordered price quotes.
//!
//! Hexagonal architecture: indicator computation in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
