//! Config-driven enablement gate for modular gateway components.
//!
//! A gateway runtime assembles its behavior from registrable components:
//! route predicate factories, route filter factories, global filters. Every
//! component is active by default; an operator opts one out by setting its
//! `gateway.<name>.enabled` property to `false`. This crate owns that
//! decision — key derivation, the opt-out rule, and the registration-time
//! sweep that reports what was admitted and why:
//!
//! ```
//! use portcullis::{ComponentRegistry, PredicateNaming, Settings};
//!
//! let mut registry = ComponentRegistry::new();
//! registry.register("RandomRoutePredicateFactory", PredicateNaming)?;
//!
//! let settings = Settings::from_toml_str("[gateway.random]\nenabled = false\n")?;
//! let report = registry.resolve(&settings);
//! assert!(!report.admits("RandomRoutePredicateFactory"));
//! # Ok::<(), portcullis::GateError>(())
//! ```
//!
//! # Module map
//!
//! - [`enablement`] — the decision itself: candidates, outcomes, the
//!   condition, and the [`PropertyResolver`] seam.
//! - [`naming`] — per-category name-normalization policies.
//! - [`metadata`] — declaration-site metadata for hosts that infer the
//!   candidate from an annotated factory method.
//! - [`settings`] — TOML-backed property store with overlay chains and
//!   environment overrides.
//! - [`registry`] — the registration sweep and its report.

pub mod enablement;
pub mod error;
pub mod metadata;
pub mod naming;
pub mod registry;
pub mod settings;

pub use enablement::{
    Candidate, EnabledCondition, Outcome, PROPERTY_PREFIX, PROPERTY_SUFFIX, PropertyResolver,
};
pub use error::{GateError, Result};
pub use metadata::{COMPONENT_ATTRIBUTE, DeclarationSite, SiteKind};
pub use naming::{FilterNaming, GlobalFilterNaming, NamePolicy, PredicateNaming, kebab_case};
pub use registry::{ComponentDecision, ComponentRegistry, RegistryReport};
pub use settings::Settings;
