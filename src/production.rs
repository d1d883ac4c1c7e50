//! # Production Stage Tracking
//!
//! Per-item production progress. Each order item carries a map from stage to
//! [`StageProgress`]; stages may be marked complete in any order, but the
//! "next pending stage" query always follows the canonical production order.

use crate::constants::PRODUCTION_STAGE_ORDER;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Discrete manufacturing step for one order item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionStage {
    SourcingProduct,
    PreparingMaterials,
    Printing,
    Sublimating,
    QualityCheck,
    Packaging,
}

impl ProductionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourcingProduct => "sourcing_product",
            Self::PreparingMaterials => "preparing_materials",
            Self::Printing => "printing",
            Self::Sublimating => "sublimating",
            Self::QualityCheck => "quality_check",
            Self::Packaging => "packaging",
        }
    }

    /// Human-readable label used in timelines and views
    pub fn label(&self) -> &'static str {
        match self {
            Self::SourcingProduct => "Sourcing product",
            Self::PreparingMaterials => "Preparing materials",
            Self::Printing => "Printing",
            Self::Sublimating => "Sublimating",
            Self::QualityCheck => "Quality check",
            Self::Packaging => "Packaging",
        }
    }

    /// All stages in canonical production order
    pub fn all() -> &'static [ProductionStage] {
        &PRODUCTION_STAGE_ORDER
    }
}

impl fmt::Display for ProductionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductionStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("Invalid production stage: {s}"))
    }
}

/// Completion record for a single stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageProgress {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl StageProgress {
    pub fn completed_at(at: DateTime<Utc>) -> Self {
        Self {
            completed: true,
            completed_at: Some(at),
            notes: None,
            photo_url: None,
        }
    }
}

pub type ProductionStageMap = HashMap<ProductionStage, StageProgress>;

/// Read-side queries over a production stage map
pub struct ProductionStageTracker;

impl ProductionStageTracker {
    /// Percentage of recorded stages that are complete, rounded to the nearest integer
    pub fn progress(stages: Option<&ProductionStageMap>) -> u8 {
        let Some(stages) = stages.filter(|stages| !stages.is_empty()) else {
            return 0;
        };
        let completed = stages.values().filter(|stage| stage.completed).count();
        let percent = (100.0 * completed as f64 / stages.len() as f64).round();
        percent.clamp(0.0, 100.0) as u8
    }

    /// First stage in canonical order that is not complete; absent stages count as pending
    pub fn next_pending_stage(stages: Option<&ProductionStageMap>) -> Option<ProductionStage> {
        ProductionStage::all()
            .iter()
            .copied()
            .find(|stage| !Self::is_complete(stages, *stage))
    }

    /// Completed stages in canonical order, independent of map insertion order
    pub fn completed_stages(stages: Option<&ProductionStageMap>) -> Vec<ProductionStage> {
        ProductionStage::all()
            .iter()
            .copied()
            .filter(|stage| Self::is_complete(stages, *stage))
            .collect()
    }

    /// Whether every canonical stage has been completed
    pub fn is_finished(stages: Option<&ProductionStageMap>) -> bool {
        Self::next_pending_stage(stages).is_none()
    }

    fn is_complete(stages: Option<&ProductionStageMap>, stage: ProductionStage) -> bool {
        stages
            .and_then(|stages| stages.get(&stage))
            .is_some_and(|progress| progress.completed)
    }
}
