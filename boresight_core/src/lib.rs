// boresight_core/src/lib.rs

// This file defines the public modules of the library.
pub mod config;
pub mod context;
pub mod error;
pub mod frames;
pub mod gimbal;
pub mod math;
pub mod prelude;
pub mod types;
