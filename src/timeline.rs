//! # Order Timeline
//!
//! Read-side projection merging status history and completed production
//! stages into one chronological, human-readable sequence.

use crate::models::{Order, Role};
use crate::production::{ProductionStage, ProductionStageTracker};
use crate::state_machine::OrderStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEntryKind {
    StatusChange,
    Production,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub kind: TimelineEntryKind,
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<OrderStatus>,
    pub stage: Option<ProductionStage>,
    pub item_index: Option<usize>,
    pub actor: Option<String>,
    pub actor_role: Option<Role>,
}

pub struct OrderTimelineBuilder;

impl OrderTimelineBuilder {
    /// Build the timeline, ascending by timestamp. Ties keep insertion order:
    /// status history first, then production stages item by item.
    pub fn build_timeline(order: &Order) -> Vec<TimelineEntry> {
        let mut entries: Vec<TimelineEntry> = order
            .status_history
            .iter()
            .map(|record| TimelineEntry {
                kind: TimelineEntryKind::StatusChange,
                timestamp: record.timestamp,
                title: record.status.label().to_string(),
                description: record.notes.clone(),
                status: Some(record.status),
                stage: None,
                item_index: None,
                actor: Some(record.changed_by.clone()),
                actor_role: Some(record.changed_by_role),
            })
            .collect();

        for (index, item) in order.items.iter().enumerate() {
            let stages = &item.production_stages;
            for stage in ProductionStageTracker::completed_stages(Some(stages)) {
                let progress = &stages[&stage];
                let description = match &progress.notes {
                    Some(notes) => format!("{}: {notes}", item.product_name),
                    None => item.product_name.clone(),
                };
                entries.push(TimelineEntry {
                    kind: TimelineEntryKind::Production,
                    // Stages flagged complete without a timestamp sort with order creation
                    timestamp: progress.completed_at.unwrap_or(order.created_at),
                    title: format!("{} completed", stage.label()),
                    description: Some(description),
                    status: None,
                    stage: Some(stage),
                    item_index: Some(index),
                    actor: None,
                    actor_role: None,
                });
            }
        }

        // sort_by_key is stable
        entries.sort_by_key(|entry| entry.timestamp);
        entries
    }
}
