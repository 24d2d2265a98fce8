//! CLI subcommand implementations for the bizscout binary.

pub mod doctor;
pub mod harvest_cmd;
pub mod output;
