use std::collections::HashSet;
use std::sync::{Arc, Mutex as SyncMutex};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::notice::{Notice, NoticeBoard, Severity};
use super::state::{DeleteOutcome, EditTarget, SaveOutcome, Transition, WorkflowState};
use crate::clients::RecordClient;
use crate::confirmation::{ConfirmationFlow, Decision, DELETE_PROMPT};
use crate::domain::{Department, Product, ProductDraft, ProductId};

pub const MISSING_FIELDS_NOTICE: &str = "Please fill in all required fields.";

struct Session {
    state: WorkflowState,
    draft: Option<ProductDraft>,
    /// Bumped every time an editor opens, so a late save result can tell
    /// whether the editor it came from is still the one on screen.
    generation: u64,
    products: Arc<Vec<Product>>,
    departments: Arc<Vec<Department>>,
    notices: NoticeBoard,
}

impl Session {
    fn open_editor(&mut self, target: EditTarget, draft: ProductDraft) -> Transition {
        if let WorkflowState::AwaitingDeleteConfirmation(_) = self.state {
            return Transition::Rejected { from: self.state };
        }
        if self.state.is_editing() {
            debug!(previous = ?self.state, "Replacing open draft");
        }
        self.state = WorkflowState::Editing(target);
        self.draft = Some(draft);
        self.generation += 1;
        Transition::Applied
    }

    fn close_editor(&mut self) {
        self.state = WorkflowState::Browsing;
        self.draft = None;
    }
}

/// Targets with a create, update or delete on the wire.
///
/// Lives outside the session lock so a claim is released in `Drop`, including
/// when the save or delete future is dropped mid-request.
#[derive(Debug, Default)]
struct InFlight(SyncMutex<HashSet<EditTarget>>);

impl InFlight {
    fn contains(&self, target: EditTarget) -> bool {
        self.0.lock().map(|set| set.contains(&target)).unwrap_or(false)
    }

    /// Claims `target`, or returns `None` when a request for it is already pending.
    fn claim(&self, target: EditTarget) -> Option<InFlightClaim<'_>> {
        if !self.0.lock().ok()?.insert(target) {
            return None;
        }
        Some(InFlightClaim { in_flight: self, target })
    }
}

struct InFlightClaim<'a> {
    in_flight: &'a InFlight,
    target: EditTarget,
}

impl Drop for InFlightClaim<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.in_flight.0.lock() {
            set.remove(&self.target);
        }
    }
}

/// Drives the list/create/edit/delete workflow against a [`RecordClient`].
///
/// All methods take `&self`; the session lock is never held while waiting on the
/// backend or the confirmation dialog, so the operator can keep interacting
/// (cancel, browse) while a request is pending.
pub struct WorkflowController {
    records: RecordClient,
    confirmation: Arc<dyn ConfirmationFlow>,
    session: Mutex<Session>,
    in_flight: InFlight,
}

impl WorkflowController {
    pub fn new(
        records: RecordClient,
        confirmation: Arc<dyn ConfirmationFlow>,
        notice_ttl: Duration,
    ) -> Self {
        Self {
            records,
            confirmation,
            session: Mutex::new(Session {
                state: WorkflowState::Browsing,
                draft: None,
                generation: 0,
                products: Arc::new(Vec::new()),
                departments: Arc::new(Vec::new()),
                notices: NoticeBoard::new(notice_ttl),
            }),
            in_flight: InFlight::default(),
        }
    }

    pub async fn state(&self) -> WorkflowState {
        self.session.lock().await.state
    }

    pub async fn draft(&self) -> Option<ProductDraft> {
        self.session.lock().await.draft.clone()
    }

    pub async fn products(&self) -> Arc<Vec<Product>> {
        Arc::clone(&self.session.lock().await.products)
    }

    pub async fn departments(&self) -> Arc<Vec<Department>> {
        Arc::clone(&self.session.lock().await.departments)
    }

    /// Notices that have not expired yet.
    pub async fn notices(&self) -> Vec<Notice> {
        self.session.lock().await.notices.active()
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn load(&self) {
        info!("Loading products and departments");
        tokio::join!(self.reload_products(), self.reload_departments());
    }

    /// Replaces the product snapshot. On failure the previous snapshot is kept.
    pub async fn reload_products(&self) -> bool {
        let result = self.records.list_products().await;
        let mut session = self.session.lock().await;
        match result {
            Ok(products) => {
                debug!(count = products.len(), "Product list replaced");
                session.products = Arc::new(products);
                true
            }
            Err(e) => {
                session
                    .notices
                    .push(Severity::Error, format!("Failed to load products: {e}"));
                false
            }
        }
    }

    pub async fn reload_departments(&self) -> bool {
        let result = self.records.list_departments().await;
        let mut session = self.session.lock().await;
        match result {
            Ok(departments) => {
                debug!(count = departments.len(), "Department list replaced");
                session.departments = Arc::new(departments);
                true
            }
            Err(e) => {
                session
                    .notices
                    .push(Severity::Error, format!("Failed to load departments: {e}"));
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn start_create(&self) -> Transition {
        let mut session = self.session.lock().await;
        session.open_editor(EditTarget::New, ProductDraft::default())
    }

    /// Opens the editor pre-filled from the product with `id`, fetching it when
    /// it is not part of the current snapshot.
    #[instrument(skip(self))]
    pub async fn start_edit(&self, id: ProductId) -> Transition {
        let cached = {
            let session = self.session.lock().await;
            if let WorkflowState::AwaitingDeleteConfirmation(_) = session.state {
                return Transition::Rejected { from: session.state };
            }
            session.products.iter().find(|product| product.id == id).cloned()
        };

        let product = match cached {
            Some(product) => product,
            None => match self.records.get_product(id).await {
                Ok(product) => product,
                Err(e) => {
                    let mut session = self.session.lock().await;
                    session
                        .notices
                        .push(Severity::Error, format!("Failed to load product: {e}"));
                    return Transition::Failed(e);
                }
            },
        };

        let mut session = self.session.lock().await;
        session.open_editor(EditTarget::Existing(id), ProductDraft::from(&product))
    }

    /// Applies `edit` to the open draft.
    pub async fn edit_draft(&self, edit: impl FnOnce(&mut ProductDraft)) -> Transition {
        let mut session = self.session.lock().await;
        if !session.state.is_editing() {
            return Transition::Rejected { from: session.state };
        }
        match session.draft.as_mut() {
            Some(draft) => {
                edit(draft);
                Transition::Applied
            }
            None => Transition::Rejected { from: session.state },
        }
    }

    /// Closes the editor and discards the draft. A save already sent is not aborted.
    #[instrument(skip(self))]
    pub async fn cancel(&self) -> Transition {
        let mut session = self.session.lock().await;
        if !session.state.is_editing() {
            return Transition::Rejected { from: session.state };
        }
        session.close_editor();
        debug!("Editor closed, draft discarded");
        Transition::Applied
    }

    /// Validates the draft and, if it passes, creates or updates the product.
    ///
    /// On success the editor closes and the product list is reloaded once the
    /// write has been confirmed. On a backend error the editor stays open with
    /// the draft intact.
    #[instrument(skip(self))]
    pub async fn save(&self) -> SaveOutcome {
        let (target, generation, payload, claim) = {
            let mut session = self.session.lock().await;
            let WorkflowState::Editing(target) = session.state else {
                return SaveOutcome::Rejected { from: session.state };
            };
            let Some(claim) = self.in_flight.claim(target) else {
                debug!(?target, "Save ignored, another request for this product is in flight");
                return SaveOutcome::Busy;
            };
            let Some(draft) = session.draft.as_ref() else {
                return SaveOutcome::Rejected { from: session.state };
            };
            let payload = match draft.validated() {
                Ok(payload) => payload,
                Err(invalid) => {
                    warn!(fields = ?invalid.fields, "Draft rejected by validation");
                    session.notices.push(Severity::Warning, MISSING_FIELDS_NOTICE);
                    return SaveOutcome::Invalid(invalid.fields);
                }
            };
            (target, session.generation, payload, claim)
        };

        let result = match target {
            EditTarget::New => self.records.create_product(payload).await,
            EditTarget::Existing(id) => self.records.update_product(id, payload).await,
        };

        drop(claim);

        let saved = {
            let mut session = self.session.lock().await;
            match result {
                Ok(product) => {
                    let message = match target {
                        EditTarget::New => "Product created successfully!",
                        EditTarget::Existing(_) => "Product updated successfully!",
                    };
                    info!(product_id = product.id, "{message}");
                    session.notices.push(Severity::Success, message);
                    let still_open = session.state == WorkflowState::Editing(target)
                        && session.generation == generation;
                    if still_open {
                        session.close_editor();
                    }
                    product
                }
                Err(e) => {
                    let context = match target {
                        EditTarget::New => "Failed to create product",
                        EditTarget::Existing(_) => "Failed to update product",
                    };
                    session.notices.push(Severity::Error, format!("{context}: {e}"));
                    return SaveOutcome::Failed(e);
                }
            }
        };

        self.reload_products().await;
        match target {
            EditTarget::New => SaveOutcome::Created(saved),
            EditTarget::Existing(_) => SaveOutcome::Updated(saved),
        }
    }

    // -------------------------------------------------------------------------
    // Deleting
    // -------------------------------------------------------------------------

    /// Asks for confirmation and deletes the product if the operator agrees.
    ///
    /// The list is reloaded only after a successful delete.
    #[instrument(skip(self))]
    pub async fn request_delete(&self, id: ProductId) -> DeleteOutcome {
        {
            let mut session = self.session.lock().await;
            if session.state != WorkflowState::Browsing {
                return DeleteOutcome::Rejected { from: session.state };
            }
            if self.in_flight.contains(EditTarget::Existing(id)) {
                return DeleteOutcome::Busy;
            }
            session.state = WorkflowState::AwaitingDeleteConfirmation(id);
        }

        let decision = self.confirmation.confirm(DELETE_PROMPT).await;

        let claim = {
            let mut session = self.session.lock().await;
            if session.state == WorkflowState::AwaitingDeleteConfirmation(id) {
                session.state = WorkflowState::Browsing;
            }
            if decision == Decision::Declined {
                info!("Delete declined");
                return DeleteOutcome::Declined;
            }
            match self.in_flight.claim(EditTarget::Existing(id)) {
                Some(claim) => claim,
                None => return DeleteOutcome::Busy,
            }
        };

        let result = self.records.delete_product(id).await;
        drop(claim);

        {
            let mut session = self.session.lock().await;
            if let Err(e) = result {
                session
                    .notices
                    .push(Severity::Error, format!("Failed to delete product: {e}"));
                return DeleteOutcome::Failed(e);
            }
            info!("Product deleted");
            session.notices.push(Severity::Success, "Product deleted successfully!");
        }

        self.reload_products().await;
        DeleteOutcome::Deleted
    }
}
