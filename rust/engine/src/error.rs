// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for opening placement.
//!
//! Every variant except [`Error::Unexpected`] is a precondition failure: it
//! is raised before the document is touched, or it rolls the edit scope
//! back. User cancellation is not an error and never appears here.

use serde::Serialize;
use sleeve_lite_model::{ElementId, ElementReference, LinkInstanceId};
use std::fmt;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a penetration an element plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Conduit,
    Host,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Conduit => f.write_str("conduit"),
            Role::Host => f.write_str("host"),
        }
    }
}

/// Coarse classification surfaced to the command layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Precondition,
    Unexpected,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Element {0} is not a pipe or duct")]
    NotAConduit(ElementId),

    #[error("Element {0} is not a structural host")]
    NotAHost(ElementReference),

    #[error("No solid geometry found for {role} element {element}")]
    MissingSolids { role: Role, element: ElementReference },

    #[error("Link instance not found: {0:?}")]
    LinkInstanceNotFound(LinkInstanceId),

    #[error("Linked document '{0}' is not loaded")]
    LinkDocumentNotLoaded(String),

    #[error("Element {element} not found in linked document '{document}'")]
    LinkedElementNotFound { document: String, element: ElementId },

    #[error("No intersection found between conduit {conduit} and host {host}")]
    NoIntersection {
        conduit: ElementId,
        host: ElementReference,
    },

    #[error("No reference level exists in the project")]
    NoReferenceLevel,

    #[error("Family type not found: {family} : {type_name}")]
    FamilyTypeNotFound { family: String, type_name: String },

    #[error("Unsupported conduit cross-section: {0}")]
    UnsupportedCrossSection(String),

    #[error("Invalid {what}: {value}")]
    InvalidDimension { what: &'static str, value: f64 },

    #[error("Invalid opening size table: {0}")]
    InvalidSizeTable(String),

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unexpected(_) => ErrorKind::Unexpected,
            _ => ErrorKind::Precondition,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Error::ElementNotFound(_) => "ELEMENT_NOT_FOUND",
            Error::NotAConduit(_) => "NOT_A_CONDUIT",
            Error::NotAHost(_) => "NOT_A_HOST",
            Error::MissingSolids { .. } => "MISSING_SOLIDS",
            Error::LinkInstanceNotFound(_) => "LINK_INSTANCE_NOT_FOUND",
            Error::LinkDocumentNotLoaded(_) => "LINK_DOCUMENT_NOT_LOADED",
            Error::LinkedElementNotFound { .. } => "LINKED_ELEMENT_NOT_FOUND",
            Error::NoIntersection { .. } => "NO_INTERSECTION",
            Error::NoReferenceLevel => "NO_REFERENCE_LEVEL",
            Error::FamilyTypeNotFound { .. } => "FAMILY_TYPE_NOT_FOUND",
            Error::UnsupportedCrossSection(_) => "UNSUPPORTED_CROSS_SECTION",
            Error::InvalidDimension { .. } => "INVALID_DIMENSION",
            Error::InvalidSizeTable(_) => "INVALID_SIZE_TABLE",
            Error::Unexpected(_) => "UNEXPECTED",
        }
    }
}

impl From<sleeve_lite_model::Error> for Error {
    fn from(err: sleeve_lite_model::Error) -> Self {
        use sleeve_lite_model::Error as M;
        match err {
            M::ElementNotFound(id) => Error::ElementNotFound(id),
            M::LinkInstanceNotFound(id) => Error::LinkInstanceNotFound(id),
            M::FamilyTypeNotFound { family, type_name } => {
                Error::FamilyTypeNotFound { family, type_name }
            }
            M::LevelNotFound(_) => Error::NoReferenceLevel,
            other => Error::Unexpected(other.to_string()),
        }
    }
}

impl From<sleeve_lite_geometry::Error> for Error {
    fn from(err: sleeve_lite_geometry::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unexpected_is_unexpected() {
        assert_eq!(Error::NoReferenceLevel.kind(), ErrorKind::Precondition);
        assert_eq!(
            Error::Unexpected("boom".into()).kind(),
            ErrorKind::Unexpected
        );
    }

    #[test]
    fn test_model_errors_map_to_preconditions() {
        let err: Error = sleeve_lite_model::Error::FamilyTypeNotFound {
            family: "Opening Round".into(),
            type_name: "Sleeve".into(),
        }
        .into();
        assert_eq!(err.code(), "FAMILY_TYPE_NOT_FOUND");
        assert_eq!(
            err.to_string(),
            "Family type not found: Opening Round : Sleeve"
        );
    }
}
