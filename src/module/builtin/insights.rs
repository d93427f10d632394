//! Usage insights module
//!
//! Contributes the insights persistence entities and reports which insights
//! views are available once initialized.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

use crate::module::registry::metadata::{ModuleClass, ModuleDeclaration};
use crate::module::traits::{Entity, Module, ModuleError, ModuleName, ModuleSettings};

const ENTITIES: [Entity; 3] = [
    Entity::new("InsightsMetadata", "insights_metadata"),
    Entity::new("InsightsRaw", "insights_raw"),
    Entity::new("InsightsByPeriod", "insights_by_period"),
];

/// Date ranges the insights summary can be queried for
const DATE_RANGES: [&str; 5] = ["day", "week", "2weeks", "month", "quarter"];

#[derive(Debug, Default)]
pub struct InsightsModule {
    collecting: AtomicBool,
}

impl InsightsModule {
    pub fn declaration() -> ModuleDeclaration {
        ModuleDeclaration::new(ModuleName::INSIGHTS, ModuleClass::of::<Self>())
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Module for InsightsModule {
    async fn entities(&self) -> Result<Vec<Entity>, ModuleError> {
        Ok(ENTITIES.to_vec())
    }

    async fn init(&self) -> Result<(), ModuleError> {
        self.collecting.store(true, Ordering::SeqCst);
        debug!("Insights collection started");
        Ok(())
    }

    async fn settings(&self) -> Result<Option<ModuleSettings>, ModuleError> {
        Ok(Some(json!({
            "summary": true,
            "dashboard": false,
            "dateRanges": DATE_RANGES,
        })))
    }

    async fn shutdown(&self) -> Result<(), ModuleError> {
        if self.collecting.swap(false, Ordering::SeqCst) {
            debug!("Insights collection stopped");
        }
        Ok(())
    }
}
