//! Conditional component registry — the registration-time sweep.
//!
//! A host registers every candidate component with the naming policy of its
//! category, then calls [`ComponentRegistry::resolve`] once against a
//! configuration source. The registry decides and reports; constructing the
//! admitted components stays entirely on the host's side.

use serde::Serialize;
use tracing::{debug, info};

use crate::enablement::{Candidate, EnabledCondition, PropertyResolver};
use crate::error::{GateError, Result};
use crate::naming::NamePolicy;

struct Registration {
    candidate: Candidate,
    condition: EnabledCondition<Box<dyn NamePolicy>>,
}

/// Ordered set of candidate components awaiting an enablement decision.
///
/// Registration order is preserved so reports are stable run to run.
#[derive(Default)]
pub struct ComponentRegistry {
    entries: Vec<Registration>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate under its category's naming policy.
    ///
    /// Component type names are unique across categories; registering the
    /// same name twice is an error.
    pub fn register(
        &mut self,
        candidate: impl Into<Candidate>,
        policy: impl NamePolicy + 'static,
    ) -> Result<()> {
        let candidate = candidate.into();
        if self.entries.iter().any(|r| r.candidate == candidate) {
            return Err(GateError::Registry(format!(
                "component '{candidate}' is already registered"
            )));
        }

        debug!(component = %candidate, category = policy.category(), "component registered");
        self.entries.push(Registration {
            candidate,
            condition: EnabledCondition::new(Box::new(policy) as Box<dyn NamePolicy>),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate every registration once and partition the decisions.
    ///
    /// Each sweep is independent: nothing is cached between calls and the
    /// registry itself is never mutated.
    pub fn resolve(&self, resolver: &dyn PropertyResolver) -> RegistryReport {
        let mut admitted = Vec::new();
        let mut refused = Vec::new();

        for entry in &self.entries {
            let key = entry.condition.property_key(entry.candidate.type_name());
            let outcome = entry.condition.evaluate(&entry.candidate, resolver);
            let decision = ComponentDecision {
                component: entry.candidate.type_name().to_string(),
                category: entry.condition.category().to_string(),
                key,
                reason: outcome.reason,
            };
            if outcome.matched {
                admitted.push(decision);
            } else {
                refused.push(decision);
            }
        }

        info!(
            admitted = admitted.len(),
            refused = refused.len(),
            "component registrations resolved"
        );
        RegistryReport { admitted, refused }
    }
}

// ── RegistryReport ────────────────────────────────────────────────────────────

/// One component's decision within a [`RegistryReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDecision {
    pub component: String,
    pub category: String,
    /// The configuration key the decision was derived from.
    pub key: String,
    pub reason: String,
}

/// Outcome of one registry sweep, in registration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistryReport {
    pub admitted: Vec<ComponentDecision>,
    pub refused: Vec<ComponentDecision>,
}

impl RegistryReport {
    /// Whether `type_name` was admitted in this sweep.
    pub fn admits(&self, type_name: &str) -> bool {
        self.admitted.iter().any(|d| d.component == type_name)
    }

    /// Serialized snapshot for management surfaces and logs.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
