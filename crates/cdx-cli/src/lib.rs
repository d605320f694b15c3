//! # cdx CLI subcommands
//!
//! Implementation modules for the `cdx` binary. Each module exports an
//! `Args` struct parsed by clap and a `run_*` entry point returning the
//! process exit code.

pub mod keygen;
pub mod status;
pub mod verify;
