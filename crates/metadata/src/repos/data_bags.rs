//! Data bag repository trait.

use crate::error::MetadataResult;
use crate::models::{DataBagItemRow, DataBagRow};
use async_trait::async_trait;

/// Repository for data bags and their items.
#[async_trait]
pub trait DataBagRepo: Send + Sync {
    /// Create an empty bag.
    async fn create_bag(&self, name: &str) -> MetadataResult<DataBagRow>;

    /// Get a bag by name.
    async fn get_bag(&self, name: &str) -> MetadataResult<Option<DataBagRow>>;

    /// List all bags, ordered by name.
    async fn list_bags(&self) -> MetadataResult<Vec<DataBagRow>>;

    /// Delete a bag together with its items.
    async fn delete_bag(&self, name: &str) -> MetadataResult<()>;

    /// List the item names of a bag, ordered by name.
    async fn list_items(&self, bag: &str) -> MetadataResult<Vec<String>>;

    /// Store a new item. `raw` is kept byte for byte.
    async fn create_item(&self, bag: &str, item: &str, raw: &str)
    -> MetadataResult<DataBagItemRow>;

    /// Get an item.
    async fn get_item(&self, bag: &str, item: &str) -> MetadataResult<Option<DataBagItemRow>>;

    /// Replace the document of an existing item.
    async fn update_item(&self, bag: &str, item: &str, raw: &str)
    -> MetadataResult<DataBagItemRow>;

    /// Delete an item and return its last state.
    async fn delete_item(&self, bag: &str, item: &str) -> MetadataResult<DataBagItemRow>;
}
