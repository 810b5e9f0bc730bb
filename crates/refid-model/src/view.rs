use serde::{Deserialize, Serialize};

use crate::AllocatedIdentifier;

/// Text shown in place of an identifier while an allocation is in flight.
///
/// Deliberately has no `-<digits>` suffix so it can never be mistaken for,
/// or persisted as, a real identifier.
pub const PENDING_PLACEHOLDER: &str = "PENDING";

/// What a report form may display for an allocation request.
///
/// A guessed identifier is never part of this type: until the allocator
/// answers, the only thing to show is [`PENDING_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum AllocationView {
    /// Request in flight.
    Pending,
    /// Identifier issued.
    Allocated { identifier: AllocatedIdentifier },
    /// Request failed; `retryable` tells the form whether to offer a retry.
    Failed { retryable: bool, reason: String },
}

impl AllocationView {
    /// `true` once the request resolved either way.
    pub fn is_final(&self) -> bool {
        !matches!(self, AllocationView::Pending)
    }

    pub fn identifier(&self) -> Option<&AllocatedIdentifier> {
        match self {
            AllocationView::Allocated { identifier } => Some(identifier),
            _ => None,
        }
    }

    /// Text for the identifier field of a form.
    ///
    /// Failed requests render as an empty field.
    pub fn display_text(&self) -> &str {
        match self {
            AllocationView::Pending => PENDING_PLACEHOLDER,
            AllocationView::Allocated { identifier } => identifier.as_str(),
            AllocationView::Failed { .. } => "",
        }
    }
}
