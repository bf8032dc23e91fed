//! Mock Identity Provider for testing.
//!
//! Serves the canned discovery, token and userinfo responses over HTTP so
//! tests can exercise a real transport end to end.

mod server;

pub use server::{router, MockIdpServer};
