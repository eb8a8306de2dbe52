//! Data model shared between the study backend and its clients.
//!
//! - `model`: feed metadata as stored next to the rendered screenshots, the
//!   per-session assignment and the identity a participant arrives with.
//! - `requests` / `responses`: JSON bodies of the HTTP surface.

pub mod model;
pub mod requests;
pub mod responses;
