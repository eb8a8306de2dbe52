//! Study workflow: assigning stimuli, recording sessions and responses.

pub mod allow_list;
pub mod assignment;
pub mod attention;
pub mod collections;
pub mod feeds;
pub mod responses;
pub mod session;
