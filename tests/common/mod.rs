//! Helpers for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use inventory_console::domain::inventory::{
    Category, Condition, InventoryPayload, InventoryRecord, LooseValue, RecordKey,
};
use inventory_console::forms::inventory::FormState;
use inventory_console::gateway::{GatewayError, GatewayResult, InventoryReader, InventoryWriter};

/// In-memory stand-in for the remote `/inventory` resource.
///
/// Assigns product ids when the request carries none, computes the restock
/// category, refuses updates of records whose `can_update` flag is off and
/// answers missing keys with 404.
pub struct InMemoryInventory {
    state: Mutex<FakeState>,
    requests: AtomicUsize,
}

#[derive(Default)]
struct FakeState {
    records: Vec<InventoryRecord>,
    next_id: i64,
    clock: u32,
}

impl FakeState {
    fn stamp(&mut self) -> String {
        self.clock += 1;
        format!("2024-01-01T00:00:{:02}", self.clock)
    }

    fn position(&self, product_id: i64, condition: Condition) -> Option<usize> {
        self.records.iter().position(|record| {
            record.product_id == Some(product_id) && record.condition == Some(condition)
        })
    }
}

fn status(code: u16, message: impl Into<String>) -> GatewayError {
    GatewayError::Status {
        status: code,
        message: Some(message.into()),
    }
}

fn parse_key(key: &RecordKey) -> GatewayResult<(i64, Condition)> {
    let condition =
        Condition::parse(&key.condition).ok_or_else(|| status(400, "Invalid Condition Type."))?;
    let product_id = key
        .product_id
        .parse::<i64>()
        .map_err(|_| status(404, format!("Inventory with id '{}' was not found.", key.product_id)))?;
    Ok((product_id, condition))
}

fn not_found(product_id: i64, condition: Condition) -> GatewayError {
    status(
        404,
        format!("Inventory with id '{product_id}' and condition '{condition}' was not found."),
    )
}

fn required_count(value: Option<i64>, name: &str) -> GatewayResult<i64> {
    match value {
        Some(count) if count >= 0 => Ok(count),
        _ => Err(status(400, format!("Invalid type for [{name}]"))),
    }
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 100,
                ..Default::default()
            }),
            requests: AtomicUsize::new(0),
        }
    }

    /// Store `record` as-is, bypassing validation.
    pub fn seed(&self, record: InventoryRecord) {
        self.state.lock().expect("fake lock").records.push(record);
    }

    /// Number of requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Stored record for a key, if any.
    pub fn stored(&self, product_id: i64, condition: Condition) -> Option<InventoryRecord> {
        let state = self.state.lock().expect("fake lock");
        state
            .position(product_id, condition)
            .map(|index| state.records[index].clone())
    }

    fn count_request(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl InventoryReader for InMemoryInventory {
    async fn retrieve(&self, key: &RecordKey) -> GatewayResult<InventoryRecord> {
        self.count_request();
        let (product_id, condition) = parse_key(key)?;
        self.stored(product_id, condition)
            .ok_or_else(|| not_found(product_id, condition))
    }

    async fn list(&self, category: Option<Category>) -> GatewayResult<Vec<InventoryRecord>> {
        self.count_request();
        let state = self.state.lock().expect("fake lock");
        let matches = |record: &&InventoryRecord| match category {
            None => true,
            Some(Category::Restock) => match (record.quantity, record.restock_level) {
                (Some(quantity), Some(level)) => quantity <= level,
                _ => false,
            },
            Some(Category::New) => record.condition == Some(Condition::New),
            Some(Category::Used) => record.condition == Some(Condition::Used),
            Some(Category::OpenBox) => record.condition == Some(Condition::OpenBox),
        };
        Ok(state.records.iter().filter(matches).cloned().collect())
    }
}

#[async_trait]
impl InventoryWriter for InMemoryInventory {
    async fn create(&self, payload: &InventoryPayload) -> GatewayResult<InventoryRecord> {
        self.count_request();
        let mut state = self.state.lock().expect("fake lock");

        let condition = payload
            .condition
            .as_deref()
            .and_then(Condition::parse)
            .ok_or_else(|| status(400, "Invalid Condition Type."))?;
        let quantity = required_count(payload.quantity, "quantity")?;
        let restock_level = required_count(payload.restock_level, "restock_level")?;
        let product_id = match &payload.product_id {
            Some(LooseValue::Integer(id)) => *id,
            None => {
                state.next_id += 1;
                state.next_id
            }
            Some(_) => return Err(status(400, "Invalid type for [product_id]")),
        };
        let can_update = match &payload.can_update {
            Some(LooseValue::Boolean(flag)) => *flag,
            None => true,
            Some(_) => return Err(status(400, "Invalid type for [can_update]")),
        };

        if state.position(product_id, condition).is_some() {
            return Err(status(
                409,
                format!(
                    "Primary key conflict: <{product_id}, {condition}> key pair already exists in database"
                ),
            ));
        }

        let record = InventoryRecord {
            product_id: Some(product_id),
            condition: Some(condition),
            quantity: Some(quantity),
            restock_level: Some(restock_level),
            last_updated_on: Some(state.stamp()),
            can_update: Some(can_update),
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        key: &RecordKey,
        payload: &InventoryPayload,
    ) -> GatewayResult<InventoryRecord> {
        self.count_request();
        let (product_id, condition) = parse_key(key)?;
        let mut state = self.state.lock().expect("fake lock");
        let index = state
            .position(product_id, condition)
            .ok_or_else(|| not_found(product_id, condition))?;

        if state.records[index].can_update != Some(true) {
            return Err(status(
                409,
                format!("Inventory <{product_id}, {condition}> cannot be updated"),
            ));
        }

        let quantity = required_count(payload.quantity, "quantity")?;
        let restock_level = required_count(payload.restock_level, "restock_level")?;
        let stamp = state.stamp();
        let record = &mut state.records[index];
        record.quantity = Some(quantity);
        record.restock_level = Some(restock_level);
        record.last_updated_on = Some(stamp);
        Ok(record.clone())
    }

    async fn delete(&self, key: &RecordKey) -> GatewayResult<()> {
        self.count_request();
        let (product_id, condition) = parse_key(key)?;
        let mut state = self.state.lock().expect("fake lock");
        if let Some(index) = state.position(product_id, condition) {
            state.records.remove(index);
        }
        Ok(())
    }

    async fn set_can_update(&self, key: &RecordKey, allowed: bool) -> GatewayResult<()> {
        self.count_request();
        let (product_id, condition) = parse_key(key)?;
        let mut state = self.state.lock().expect("fake lock");
        let index = state
            .position(product_id, condition)
            .ok_or_else(|| not_found(product_id, condition))?;
        state.records[index].can_update = Some(allowed);
        Ok(())
    }
}

/// Form whose fields hold the given name/value pairs.
pub fn form(pairs: &[(&str, &str)]) -> FormState {
    let submitted: HashMap<String, String> = pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    FormState::from_submitted(&submitted)
}

pub fn record(
    product_id: i64,
    condition: Condition,
    quantity: i64,
    restock_level: i64,
    can_update: bool,
) -> InventoryRecord {
    InventoryRecord {
        product_id: Some(product_id),
        condition: Some(condition),
        quantity: Some(quantity),
        restock_level: Some(restock_level),
        last_updated_on: Some("2023-12-31T23:59:59".to_string()),
        can_update: Some(can_update),
    }
}
