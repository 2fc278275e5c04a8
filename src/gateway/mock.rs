use async_trait::async_trait;
use mockall::mock;

use super::{GatewayResult, InventoryReader, InventoryWriter};
use crate::domain::inventory::{Category, InventoryPayload, InventoryRecord, RecordKey};

mock! {
    pub Gateway {}

    #[async_trait]
    impl InventoryReader for Gateway {
        async fn retrieve(&self, key: &RecordKey) -> GatewayResult<InventoryRecord>;
        async fn list(&self, category: Option<Category>) -> GatewayResult<Vec<InventoryRecord>>;
    }

    #[async_trait]
    impl InventoryWriter for Gateway {
        async fn create(&self, payload: &InventoryPayload) -> GatewayResult<InventoryRecord>;
        async fn update(&self, key: &RecordKey, payload: &InventoryPayload) -> GatewayResult<InventoryRecord>;
        async fn delete(&self, key: &RecordKey) -> GatewayResult<()>;
        async fn set_can_update(&self, key: &RecordKey, allowed: bool) -> GatewayResult<()>;
    }
}
