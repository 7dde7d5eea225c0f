pub mod error;
pub mod projection;
pub mod rest;
