/// Business logic services layer
use crate::clients::ApodSource;
use crate::domain::{Selection, SelectionState};
use crate::errors::{ApiError, ApiResult};
use crate::utils::{in_archive, Clock, DatePicker};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Fetch-and-select over an APOD source
pub struct ApodService {
    source: Arc<dyn ApodSource>,
    dates: Arc<dyn DatePicker>,
    max_attempts: Option<u32>,
}

impl ApodService {
    pub fn new(
        source: Arc<dyn ApodSource>,
        dates: Arc<dyn DatePicker>,
        max_attempts: Option<u32>,
    ) -> Self {
        Self {
            source,
            dates,
            max_attempts,
        }
    }

    /// Draw a fallback date
    pub fn random_date(&self) -> NaiveDate {
        self.dates.pick()
    }

    /// Fetch `date` (or today) and keep drawing random dates until a record
    /// can be displayed. Transport failures end the chain immediately.
    pub async fn select(&self, date: Option<NaiveDate>, fallback: bool) -> ApiResult<Selection> {
        let mut target = date;
        let mut is_fallback = fallback;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let record = self.source.fetch_apod(target).await?;

            if record.is_displayable() {
                return Ok(Selection {
                    record,
                    is_fallback,
                    attempts,
                });
            }

            debug!(
                date = %record.date,
                media_type = record.media_type.as_str(),
                attempts,
                "Record rejected, drawing a random archive date"
            );

            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(ApiError::RetriesExhausted { attempts });
                }
            }

            target = Some(self.dates.pick());
            is_fallback = true;
        }
    }
}

/// Owns the selection state and drives fetch chains against it
pub struct ViewController {
    service: ApodService,
    clock: Arc<dyn Clock>,
    state: RwLock<SelectionState>,
}

impl ViewController {
    pub fn new(service: ApodService, clock: Arc<dyn Clock>) -> Self {
        Self {
            service,
            clock,
            state: RwLock::new(SelectionState::default()),
        }
    }

    /// Snapshot of the current state
    pub async fn snapshot(&self) -> SelectionState {
        self.state.read().await.clone()
    }

    /// Start a chain: bump the generation and mark loading
    pub async fn begin(&self) -> u64 {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.is_loading = true;
        state.generation
    }

    /// Apply a chain's outcome if no newer chain has started since.
    /// Returns whether the state was updated.
    pub async fn complete(&self, generation: u64, outcome: ApiResult<Selection>) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(
                generation,
                latest = state.generation,
                "Discarding superseded chain"
            );
            return false;
        }

        state.is_loading = false;
        match outcome {
            Ok(selection) => {
                info!(
                    date = %selection.record.date,
                    fallback = selection.is_fallback,
                    attempts = selection.attempts,
                    "APOD selected"
                );
                state.current_record = Some(selection.record);
                state.is_random_fallback = selection.is_fallback;
                state.last_error = None;
            }
            Err(e) => {
                warn!("APOD fetch failed: {}", e);
                state.last_error = Some(e.to_string());
            }
        }
        true
    }

    /// Validate a user-chosen date before a chain is started for it
    pub fn check_date(&self, date: NaiveDate) -> ApiResult<NaiveDate> {
        let today = self.clock.today();
        if in_archive(date, today) {
            Ok(date)
        } else {
            Err(ApiError::InvalidInput(format!(
                "date {} is outside the archive ({} to {})",
                date,
                crate::utils::ARCHIVE_START,
                today
            )))
        }
    }

    /// Mark loading now and finish the chain on a background task.
    /// Returns the chain's generation.
    pub async fn spawn_chain(self: &Arc<Self>, date: Option<NaiveDate>, fallback: bool) -> u64 {
        let generation = self.begin().await;
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = controller.service.select(date, fallback).await;
            controller.complete(generation, outcome).await;
        });
        generation
    }

    /// Randomize from archive, skipping the today attempt
    pub async fn spawn_randomize(self: &Arc<Self>) -> u64 {
        let date = self.service.random_date();
        self.spawn_chain(Some(date), true).await
    }

    /// Select an explicit archive date
    pub async fn spawn_select_date(self: &Arc<Self>, date: NaiveDate) -> ApiResult<u64> {
        let date = self.check_date(date)?;
        Ok(self.spawn_chain(Some(date), false).await)
    }
}
