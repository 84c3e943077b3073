use crate::classifier::ClassifiedError;
use crate::domain::{Product, ProductId};

/// Which record an open editor will write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditTarget {
    New,
    Existing(ProductId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Browsing,
    Editing(EditTarget),
    AwaitingDeleteConfirmation(ProductId),
}

impl WorkflowState {
    pub fn is_editing(&self) -> bool {
        matches!(self, WorkflowState::Editing(_))
    }
}

/// Result of a state change that does not talk to the backend on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Applied,
    Rejected { from: WorkflowState },
    /// The product to edit could not be fetched.
    Failed(ClassifiedError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(Product),
    Updated(Product),
    /// Nothing was sent; the listed fields failed validation.
    Invalid(Vec<String>),
    Failed(ClassifiedError),
    /// A save for the same target is still in flight; this one was ignored.
    Busy,
    Rejected { from: WorkflowState },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
    Failed(ClassifiedError),
    Busy,
    Rejected { from: WorkflowState },
}
