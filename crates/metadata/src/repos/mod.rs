//! Repository traits for metadata operations.

pub mod cookbooks;
pub mod data_bags;
pub mod sandbox;

pub use cookbooks::CookbookRepo;
pub use data_bags::DataBagRepo;
pub use sandbox::SandboxRepo;
