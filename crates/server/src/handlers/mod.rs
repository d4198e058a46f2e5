//! HTTP request handlers.

pub mod common;
pub mod cookbooks;
pub mod data_bags;
pub mod system;

pub use common::*;
pub use cookbooks::*;
pub use data_bags::*;
pub use system::*;
