//! Persistence collaborator contract and an in-memory implementation.
//!
//! The store owns two guarantees the pure engine relies on: order numbers are
//! unique, and writes carry an expected version so concurrent transitions on
//! the same order cannot silently overwrite each other.

use crate::error::{Result, WorkflowError};
use crate::models::Order;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashSet;
use uuid::Uuid;

/// Order snapshot plus its optimistic-concurrency version
#[derive(Debug, Clone, PartialEq)]
pub struct StoredOrder {
    pub order: Order,
    pub version: u64,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn fetch(&self, order_id: Uuid) -> Result<StoredOrder>;

    /// Order numbers of orders created within `[start, end)`
    async fn order_numbers_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<String>>;

    /// Insert a new order; a taken order number yields `AllocationConflict`
    async fn insert(&self, order: Order) -> Result<StoredOrder>;

    /// Replace an order if its stored version still equals `expected_version`
    async fn replace(&self, order: Order, expected_version: u64) -> Result<StoredOrder>;
}

#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: DashMap<Uuid, StoredOrder>,
    order_numbers: Mutex<HashSet<String>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn fetch(&self, order_id: Uuid) -> Result<StoredOrder> {
        self.orders
            .get(&order_id)
            .map(|entry| entry.value().clone())
            .ok_or(WorkflowError::OrderNotFound { order_id })
    }

    async fn order_numbers_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<String>> {
        Ok(self
            .orders
            .iter()
            .filter(|entry| {
                let created_at = entry.order.created_at;
                created_at >= start && created_at < end
            })
            .map(|entry| entry.order.order_number.clone())
            .collect())
    }

    async fn insert(&self, order: Order) -> Result<StoredOrder> {
        let mut numbers = self.order_numbers.lock();
        if numbers.contains(&order.order_number) {
            return Err(WorkflowError::AllocationConflict {
                order_number: order.order_number,
            });
        }
        if self.orders.contains_key(&order.id) {
            return Err(WorkflowError::InvalidInput(format!(
                "Order {} already exists",
                order.id
            )));
        }

        numbers.insert(order.order_number.clone());
        let stored = StoredOrder { order, version: 1 };
        self.orders.insert(stored.order.id, stored.clone());
        Ok(stored)
    }

    async fn replace(&self, order: Order, expected_version: u64) -> Result<StoredOrder> {
        let mut entry = self
            .orders
            .get_mut(&order.id)
            .ok_or(WorkflowError::OrderNotFound { order_id: order.id })?;

        if entry.version != expected_version {
            return Err(WorkflowError::ConcurrentModification {
                order_id: order.id,
                expected_version,
                actual_version: entry.version,
            });
        }
        if entry.order.order_number != order.order_number {
            return Err(WorkflowError::InvalidInput(format!(
                "Order number of {} is immutable",
                order.id
            )));
        }

        entry.order = order;
        entry.version += 1;
        Ok(entry.value().clone())
    }
}
