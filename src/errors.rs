//! Typed error definitions for cpmove.
//! Every engine operation surfaces one of these verbatim; nothing is retried.

use thiserror::Error;

use crate::namespace::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamespaceError {
    #[error("Container is not a valid container: {0}")]
    NotAValidContainer(ItemId),

    /// A precondition or parent constraint rejected the item.
    #[error("{0}")]
    ValidationFailed(String),

    #[error("Item not found: ({container}, '{name}')")]
    ItemNotFound { container: ItemId, name: String },

    #[error("{0} is already in use")]
    DuplicateName(String),

    #[error("Cannot add an object to itself or its children: {item} -> {target}")]
    MoveIntoSelf { item: ItemId, target: ItemId },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("New order is not a permutation of the current keys: {0}")]
    InvalidOrder(String),

    #[error("Container {0} does not keep an explicit order")]
    NotOrdered(ItemId),

    #[error("Unknown item handle: {0}")]
    UnknownItem(ItemId),

    #[error("Item {0} is not contained in any container")]
    NotContained(ItemId),

    #[error("Item {0} already belongs to a container")]
    AlreadyContained(ItemId),
}

impl NamespaceError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> i32 {
        match self {
            NamespaceError::NotAValidContainer(_) => 10,
            NamespaceError::ValidationFailed(_) => 11,
            NamespaceError::ItemNotFound { .. } => 12,
            NamespaceError::DuplicateName(_) => 13,
            NamespaceError::MoveIntoSelf { .. } => 14,
            NamespaceError::InvalidName { .. } => 15,
            NamespaceError::InvalidOrder(_) => 16,
            NamespaceError::NotOrdered(_) => 17,
            NamespaceError::UnknownItem(_) => 18,
            NamespaceError::NotContained(_) => 19,
            NamespaceError::AlreadyContained(_) => 20,
        }
    }

    /// Short machine-friendly tag for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            NamespaceError::NotAValidContainer(_) => "not_a_valid_container",
            NamespaceError::ValidationFailed(_) => "validation_failed",
            NamespaceError::ItemNotFound { .. } => "item_not_found",
            NamespaceError::DuplicateName(_) => "duplicate_name",
            NamespaceError::MoveIntoSelf { .. } => "move_into_self",
            NamespaceError::InvalidName { .. } => "invalid_name",
            NamespaceError::InvalidOrder(_) => "invalid_order",
            NamespaceError::NotOrdered(_) => "not_ordered",
            NamespaceError::UnknownItem(_) => "unknown_item",
            NamespaceError::NotContained(_) => "not_contained",
            NamespaceError::AlreadyContained(_) => "already_contained",
        }
    }
}

pub type NsResult<T> = Result<T, NamespaceError>;
