//! Game implementations.

pub mod scratch;
