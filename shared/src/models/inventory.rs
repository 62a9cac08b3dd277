//! Inventory snapshot handed to the forecasting engine

use serde::{Deserialize, Serialize};

use super::{CuppingRecord, GreenCoffeeBatch, RoastedCoffeeBatch, SalesEntry, ThresholdPolicy};
use crate::types::InventoryKind;

/// Everything the forecasting engine reads, fetched in one go
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub green_batches: Vec<GreenCoffeeBatch>,
    pub roasted_batches: Vec<RoastedCoffeeBatch>,
    pub sales_entries: Vec<SalesEntry>,
    pub cupping_records: Vec<CuppingRecord>,
    pub thresholds: ThresholdPolicy,
}

/// Stock position of a single batch, regardless of which collection it lives in
pub trait StockBatch {
    fn variety(&self) -> &str;
    fn warehouse(&self) -> &str;
    fn quantity_bags(&self) -> u32;
}

impl StockBatch for GreenCoffeeBatch {
    fn variety(&self) -> &str {
        &self.variety
    }

    fn warehouse(&self) -> &str {
        &self.warehouse
    }

    fn quantity_bags(&self) -> u32 {
        self.quantity_bags
    }
}

impl StockBatch for RoastedCoffeeBatch {
    fn variety(&self) -> &str {
        &self.variety
    }

    fn warehouse(&self) -> &str {
        &self.warehouse
    }

    fn quantity_bags(&self) -> u32 {
        self.quantity_bags
    }
}

/// Headline counters for the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickStats {
    pub total_green_bags: u64,
    pub green_varieties: usize,
    pub total_roasted_bags: u64,
    pub roasted_varieties: usize,
}

impl InventorySnapshot {
    /// Batches of one inventory collection as trait objects
    pub fn stock(&self, kind: InventoryKind) -> Vec<&dyn StockBatch> {
        match kind {
            InventoryKind::Green => self
                .green_batches
                .iter()
                .map(|b| b as &dyn StockBatch)
                .collect(),
            InventoryKind::Roasted => self
                .roasted_batches
                .iter()
                .map(|b| b as &dyn StockBatch)
                .collect(),
        }
    }

    pub fn quick_stats(&self) -> QuickStats {
        let distinct = |varieties: Vec<&str>| {
            varieties
                .into_iter()
                .collect::<std::collections::BTreeSet<_>>()
                .len()
        };

        QuickStats {
            total_green_bags: self
                .green_batches
                .iter()
                .map(|b| u64::from(b.quantity_bags))
                .sum(),
            green_varieties: distinct(self.green_batches.iter().map(|b| b.variety.as_str()).collect()),
            total_roasted_bags: self
                .roasted_batches
                .iter()
                .map(|b| u64::from(b.quantity_bags))
                .sum(),
            roasted_varieties: distinct(
                self.roasted_batches.iter().map(|b| b.variety.as_str()).collect(),
            ),
        }
    }
}
