//! Integrity data for produced archives

pub mod checksum;

pub use checksum::{calculate_checksum_bytes, calculate_checksum_file};
