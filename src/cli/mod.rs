//! Command implementations behind the binary's subcommands

pub mod orchestration;
