//! The three Textami engines. They share data shapes from `common` and never
//! call each other at runtime.

pub mod freeze;
pub mod generation;
pub mod mapping;
