//! Core domain types and indicator computation.

pub mod quote;
pub mod error;
pub mod alignment;
pub mod validation;
pub mod indicator;
pub mod settings;
