pub mod assignment;
pub mod feed;
pub mod session;
