//! 도메인 타입.

pub mod account;

pub use account::*;
