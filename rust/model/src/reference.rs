// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ids::{ElementId, LinkInstanceId};
use std::fmt;

/// A picked element: either in the active document or inside a linked model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementReference {
    Local(ElementId),
    Linked {
        link: LinkInstanceId,
        element: ElementId,
    },
}

impl ElementReference {
    pub fn is_linked(&self) -> bool {
        matches!(self, ElementReference::Linked { .. })
    }
}

impl fmt::Display for ElementReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementReference::Local(id) => write!(f, "{id}"),
            ElementReference::Linked { link, element } => write!(f, "link {}/{element}", link.0),
        }
    }
}
