//! Core: platform-neutral building blocks (addresses, route patterns, constants)

pub mod address;
pub mod paths;
pub mod pattern;
