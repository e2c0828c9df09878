//! DogStatsD datagram listener and validator.
//!
//! The listener owns the UDP socket and hands every datagram to the
//! validator, which classifies it, and to a [`validator::Reporter`], which
//! emits one diagnostic per datagram.

pub mod constants;
#[allow(clippy::module_inception)]
pub mod dogstatsd;
pub mod errors;
pub mod event;
pub mod fields;
pub mod message;
pub mod metric;
pub mod service_check;
pub mod validator;
