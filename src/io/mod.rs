//! I/O module
//!
//! Handles loading seed accounts from CSV.
//!
//! # Components
//!
//! - `csv_format` - Seed row conversion
//! - `seed_reader` - Streaming seed file reader and ledger seeding

pub mod csv_format;
pub mod seed_reader;

pub use csv_format::{convert_seed_record, SeedRecord};
pub use seed_reader::{seed_ledger, SeedReader};
