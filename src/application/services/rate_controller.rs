//! Rate Controller - Lifecycle orchestration for resource rates
//!
//! Owns the rate book and drives it through startup, periodic saves, entity
//! spawns and shutdown. Every method takes `&mut self`; the host serializes
//! calls by owning the controller from a single task.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::application::dto::{CommandState, ControllerStatus, LifecycleState, SyncReport, TableSummary};
use crate::application::ports::outbound::{
    DocumentError, EntitySourcePort, PermissionRegistryPort, ADMIN_PERMISSION,
};
use crate::application::services::load_coordinator::join_both;
use crate::application::services::rate_repository::RateRepository;
use crate::application::services::sync_service::{apply_all, apply_one};
use crate::domain::aggregates::RateBook;
use crate::domain::value_objects::{EntityId, RateTable, RuleSet, RuleSnapshot, RuleValidationError};

/// Errors that abort startup
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to load rate documents: {0}")]
    Storage(#[from] DocumentError),
    #[error("Invalid rule documents: {0}")]
    Validation(#[from] RuleValidationError),
    #[error("Controller already started (state: {0:?})")]
    AlreadyStarted(LifecycleState),
}

pub struct RateController {
    state: LifecycleState,
    book: RateBook,
    repository: RateRepository,
    entities: Arc<dyn EntitySourcePort>,
    permissions: Arc<dyn PermissionRegistryPort>,
}

impl RateController {
    pub fn new(
        rules: RuleSet,
        repository: RateRepository,
        entities: Arc<dyn EntitySourcePort>,
        permissions: Arc<dyn PermissionRegistryPort>,
    ) -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            book: RateBook::new(rules),
            repository,
            entities,
            permissions,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn book(&self) -> &RateBook {
        &self.book
    }

    fn is_ready(&self) -> bool {
        self.state == LifecycleState::Ready
    }

    // ========================================================================
    // Startup
    // ========================================================================

    /// Load saved rates, capture whatever is missing and apply derived rates.
    ///
    /// Either every step succeeds and the controller is Ready, or it ends up
    /// Failed without having touched a single dispenser.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<SyncReport, LoadError> {
        if self.state != LifecycleState::Uninitialized {
            return Err(LoadError::AlreadyStarted(self.state));
        }

        if !self.permissions.exists(ADMIN_PERMISSION) {
            self.permissions.register(ADMIN_PERMISSION);
        }
        self.state = LifecycleState::Loading;

        let (baseline, derived) = match self.load().await {
            Ok(tables) => tables,
            Err(e) => {
                error!(error = %e, "Failed to initialize resource rates");
                self.state = LifecycleState::Failed;
                return Err(e);
            }
        };

        self.book.restore(baseline, derived);
        self.state = LifecycleState::Ready;

        let captured = self.capture_live();
        info!(
            captured,
            kinds = self.book.baseline().kind_count(),
            "Resource rates ready"
        );

        self.persist().await;
        Ok(apply_all(self.entities.as_ref(), self.book.derived()))
    }

    async fn load(&self) -> Result<(RateTable, Option<(RateTable, RuleSnapshot)>), LoadError> {
        self.book.rules().validate()?;
        for issue in self.book.rules().pass_through_issues() {
            warn!(error = %issue, "Carrying rule value through unchecked");
        }
        let tables = join_both(self.repository.load_baseline(), self.repository.load_derived()).await?;
        Ok(tables)
    }

    /// Run every live dispenser through the rate book; returns new kinds
    fn capture_live(&mut self) -> usize {
        let book = &mut self.book;
        let mut captured = 0;
        self.entities.visit_all(&mut |dispenser| {
            if book.ensure_recorded(dispenser.kind(), dispenser.slots()) {
                captured += 1;
            }
        });
        captured
    }

    // ========================================================================
    // Host signals
    // ========================================================================

    /// Persist both tables. Failures are logged and leave the state alone.
    async fn persist(&self) -> bool {
        let (baseline, derived) = tokio::join!(
            self.repository.save_baseline(self.book.baseline()),
            self.repository.save_derived(self.book.derived(), self.book.rules().snapshot()),
        );

        let mut saved = true;
        if let Err(e) = baseline {
            error!(error = %e, "Failed to save baseline rates");
            saved = false;
        }
        if let Err(e) = derived {
            error!(error = %e, "Failed to save derived rates");
            saved = false;
        }
        saved
    }

    #[instrument(skip(self))]
    pub async fn on_save(&mut self) -> bool {
        if !self.is_ready() {
            debug!(state = ?self.state, "Ignoring save before rates are ready");
            return false;
        }
        self.persist().await
    }

    /// Capture and apply rates for a single freshly spawned entity.
    ///
    /// Returns true when the entity's dispenser was changed.
    #[instrument(skip(self))]
    pub fn on_entity_spawned(&mut self, id: EntityId) -> bool {
        if !self.is_ready() {
            debug!(state = ?self.state, "Ignoring spawn before rates are ready");
            return false;
        }

        let book = &mut self.book;
        let mut changed = false;
        let found = self.entities.visit(id, &mut |dispenser| {
            book.ensure_recorded(dispenser.kind(), dispenser.slots());
            changed = apply_one(dispenser, book.derived());
        });
        if !found {
            debug!("Spawned entity has no resource dispenser");
        }
        changed
    }

    /// Save both tables right away
    #[instrument(skip(self))]
    pub async fn show_data(&mut self) -> CommandState {
        if !self.is_ready() {
            warn!(state = ?self.state, "Rates are not initialized, nothing to save");
            return CommandState::NotReady;
        }
        if self.persist().await {
            info!("Saved baseline and derived rates");
        }
        CommandState::Completed
    }

    /// Put every live dispenser back on its baseline rates.
    ///
    /// Skipped entirely when startup never completed.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) -> Option<SyncReport> {
        if !self.is_ready() {
            info!(state = ?self.state, "Rates were never applied, skipping restore");
            return None;
        }

        self.state = LifecycleState::ShuttingDown;
        let report = apply_all(self.entities.as_ref(), self.book.baseline());
        self.state = LifecycleState::Restored;
        Some(report)
    }

    pub fn status(&self) -> ControllerStatus {
        let summary = |table: &RateTable| TableSummary {
            kinds: table.kind_count(),
            rates: table.rate_count(),
        };
        ControllerStatus {
            state: self.state,
            baseline: summary(self.book.baseline()),
            derived: summary(self.book.derived()),
        }
    }
}
