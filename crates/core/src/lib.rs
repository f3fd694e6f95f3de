//! Domain logic for the post gateway: payload decoding, upload policy and
//! staging-file management. Has no HTTP or upstream-client dependencies so it
//! can be unit-tested in isolation.

pub mod error;
pub mod payload;
pub mod staging;
pub mod types;
pub mod validation;
