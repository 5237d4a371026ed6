//! Shared helpers for the export pipeline.

pub mod fs;
