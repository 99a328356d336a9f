//! Declaration-site metadata — what a metadata-driven host knows about the
//! place a component was declared.
//!
//! Hosts that register components through annotated factory functions hand
//! the condition a [`DeclarationSite`]: the string-keyed attributes attached
//! at the site plus the shape of the declaration itself. The condition reads
//! the explicit [`COMPONENT_ATTRIBUTE`] first and falls back to the factory
//! method's return type; everything else about the host's registration
//! machinery stays on the host's side of the boundary.

use std::collections::HashMap;

/// Attribute key naming an explicit candidate component type.
///
/// When present, its value wins over return-type inference. Absence is the
/// normal case, not a sentinel value.
pub const COMPONENT_ATTRIBUTE: &str = "component";

// ── SiteKind ──────────────────────────────────────────────────────────────────

/// Shape of the declaration the condition was attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteKind {
    /// A factory method whose return type names the component it produces.
    FactoryMethod {
        declaring_type: String,
        method_name: String,
        /// `None` when the host could not resolve the declared return type.
        return_type: Option<String>,
    },
    /// A type-level declaration; there is no return type to infer from.
    TypeLevel { type_name: String },
}

// ── DeclarationSite ───────────────────────────────────────────────────────────

/// Metadata for one annotated registration site.
#[derive(Debug, Clone)]
pub struct DeclarationSite {
    attributes: HashMap<String, String>,
    kind: SiteKind,
}

impl DeclarationSite {
    /// A site on a factory method. `return_type` is the declared return type
    /// name, when the host resolved one.
    pub fn factory_method(
        declaring_type: impl Into<String>,
        method_name: impl Into<String>,
        return_type: Option<&str>,
    ) -> Self {
        Self {
            attributes: HashMap::new(),
            kind: SiteKind::FactoryMethod {
                declaring_type: declaring_type.into(),
                method_name: method_name.into(),
                return_type: return_type.map(str::to_string),
            },
        }
    }

    /// A site on a type declaration.
    pub fn type_level(type_name: impl Into<String>) -> Self {
        Self {
            attributes: HashMap::new(),
            kind: SiteKind::TypeLevel {
                type_name: type_name.into(),
            },
        }
    }

    /// Attach an explicit attribute, builder-style.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Explicit attribute value for `key`, or `None` when the site did not
    /// supply one.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn kind(&self) -> &SiteKind {
        &self.kind
    }

    pub fn is_factory_method(&self) -> bool {
        matches!(self.kind, SiteKind::FactoryMethod { .. })
    }

    /// Human-readable location for error messages.
    pub fn location(&self) -> String {
        match &self.kind {
            SiteKind::FactoryMethod {
                declaring_type,
                method_name,
                ..
            } => format!("{declaring_type}::{method_name}"),
            SiteKind::TypeLevel { type_name } => type_name.clone(),
        }
    }
}
