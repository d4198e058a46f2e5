//! Blob storage backends.

pub mod filesystem;
