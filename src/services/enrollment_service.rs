use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::export;
use crate::models::{Enrollment, EnrollmentDraft, Scheduled};
use crate::services::conflict;
use crate::services::layout::{Placement, WeekView};
use crate::services::validator::{self, ValidationReport};
use crate::state::AppState;

/// Outcome of a committed add or edit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Saved {
    pub enrollment: Enrollment,
    /// Present when the new block overlaps another; the record is saved regardless.
    pub conflict_warning: Option<String>,
}

/// Query and command surface over the shared store.
///
/// All access goes through the store's mutex, so a validate-then-commit
/// sequence is never interleaved with another writer.
pub struct EnrollmentService {
    state: AppState,
}

impl EnrollmentService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Snapshot of every record in insertion order.
    pub async fn list(&self) -> Vec<Enrollment> {
        self.state.store.lock().await.list().to_vec()
    }

    pub async fn get(&self, id: &str) -> Result<Enrollment, AppError> {
        self.state
            .store
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    pub async fn validate(
        &self,
        draft: &EnrollmentDraft,
        exclude_id: Option<&str>,
    ) -> ValidationReport {
        let store = self.state.store.lock().await;
        validator::validate(draft, store.list(), exclude_id, &self.state.rules)
    }

    pub async fn add(&self, draft: &EnrollmentDraft) -> Result<Saved, AppError> {
        let mut store = self.state.store.lock().await;

        let report = validator::validate(draft, store.list(), None, &self.state.rules);
        if report.is_blocking() {
            return Err(AppError::Invalid(report));
        }

        let enrollment = Enrollment::from_draft(self.state.ids.next_id(), draft, Utc::now());
        store.add(enrollment.clone()).await?;

        info!("enrolled {} ({})", enrollment.name, enrollment.id);
        if let Some(warning) = &report.conflict_warning {
            warn!("saved with conflict: {}", warning);
        }
        Ok(Saved {
            enrollment,
            conflict_warning: report.conflict_warning,
        })
    }

    pub async fn replace(&self, id: &str, draft: &EnrollmentDraft) -> Result<Saved, AppError> {
        let mut store = self.state.store.lock().await;
        if store.get(id).is_none() {
            return Err(AppError::NotFound);
        }

        let report = validator::validate(draft, store.list(), Some(id), &self.state.rules);
        if report.is_blocking() {
            return Err(AppError::Invalid(report));
        }

        let edited = Enrollment::from_draft(id.to_string(), draft, Utc::now());
        let enrollment = store.replace(id, edited).await?.ok_or(AppError::NotFound)?;

        info!("updated enrollment {}", id);
        if let Some(warning) = &report.conflict_warning {
            warn!("saved with conflict: {}", warning);
        }
        Ok(Saved {
            enrollment,
            conflict_warning: report.conflict_warning,
        })
    }

    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        let removed = self.state.store.lock().await.remove(id).await?;
        if !removed {
            return Err(AppError::NotFound);
        }
        info!("removed enrollment {}", id);
        Ok(())
    }

    pub async fn conflicts(&self, record: &impl Scheduled, exclude_id: Option<&str>) -> bool {
        let store = self.state.store.lock().await;
        conflict::conflicts(record, store.list(), exclude_id)
    }

    pub fn layout(&self, record: &impl Scheduled) -> Option<Placement> {
        self.state.window.layout(record)
    }

    /// Drawable blocks in display order, each flagged if it clashes, plus grid metrics.
    pub async fn week_view(&self) -> WeekView {
        let store = self.state.store.lock().await;
        let ordered: Vec<Enrollment> = export::presentation_order(store.list())
            .into_iter()
            .cloned()
            .collect();
        drop(store);
        self.state.window.week_view(&ordered)
    }

    pub async fn export_csv(&self) -> Result<String, AppError> {
        let store = self.state.store.lock().await;
        export::to_csv(store.list())
    }
}
