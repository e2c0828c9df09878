//! Crate for the `dogstatsd-validator` project
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_copy_implementations)]
// #![deny(missing_debug_implementations)]

// TODO rmove these over time
#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod dogstatsd;
pub mod logger;

/// Loopback only, DogStatsD traffic is never accepted from other hosts.
pub const DOGSTATSD_HOST: &str = "127.0.0.1";

pub const DOGSTATSD_PORT: u16 = 8125;
