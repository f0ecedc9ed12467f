// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model access and edits.

use crate::ids::{ElementId, InstanceKey, LevelId, LinkInstanceId, SymbolId};

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or editing a model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No element with this id exists in the document.
    #[error("element not found: {0}")]
    ElementNotFound(ElementId),

    /// No reference level with this id exists in the document.
    #[error("level not found: {0:?}")]
    LevelNotFound(LevelId),

    /// No link instance with this id exists in the document.
    #[error("link instance not found: {0:?}")]
    LinkInstanceNotFound(LinkInstanceId),

    /// The requested family type is not loaded in the catalog.
    #[error("family type not found: {family} : {type_name}")]
    FamilyTypeNotFound { family: String, type_name: String },

    /// A symbol id does not index the catalog.
    #[error("family symbol not found: {0:?}")]
    SymbolNotFound(SymbolId),

    /// An opening instance key does not resolve.
    #[error("instance not found: {0:?}")]
    InstanceNotFound(InstanceKey),

    /// A centerline needs at least two distinct points.
    #[error("invalid centerline: {0}")]
    InvalidCenterline(String),
}
