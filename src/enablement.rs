//! The enablement decision — should a candidate component be registered?
//!
//! Every component is enabled unless configuration says otherwise: the
//! condition derives `gateway.<normalized-name>.enabled` for the candidate
//! and refuses it only when that property compares case-insensitively equal
//! to `"false"`. An unset property is the normal case and means enabled —
//! operators opt components out, they never have to opt them in.
//!
//! Evaluation is a pure function of the candidate and the resolver: no
//! caching, no shared state, nothing to synchronize. Hosts that evaluate
//! candidates in parallel need no coordination here.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{GateError, Result};
use crate::metadata::{COMPONENT_ATTRIBUTE, DeclarationSite, SiteKind};
use crate::naming::NamePolicy;

/// Property-key root shared by every component category.
pub const PROPERTY_PREFIX: &str = "gateway.";

/// Property-key tail — the flag an operator flips to opt a component out.
pub const PROPERTY_SUFFIX: &str = ".enabled";

// ── PropertyResolver ──────────────────────────────────────────────────────────

/// Key-value lookup for string-valued settings.
///
/// The condition only ever asks for one key per decision; `None` means the
/// key is unset, which is not an error.
pub trait PropertyResolver {
    fn property(&self, key: &str) -> Option<&str>;
}

impl PropertyResolver for HashMap<String, String> {
    fn property(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

// ── Candidate ─────────────────────────────────────────────────────────────────

/// A component type under consideration for registration.
///
/// Only the type name matters here; it is resolved once per evaluation and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    type_name: String,
}

impl Candidate {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl From<&str> for Candidate {
    fn from(type_name: &str) -> Self {
        Self::new(type_name)
    }
}

impl From<String> for Candidate {
    fn from(type_name: String) -> Self {
        Self::new(type_name)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name)
    }
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Verdict of one enablement decision: admitted or refused, with the reason.
///
/// Produced fresh per evaluation and handed to the host; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub matched: bool,
    pub reason: String,
}

impl Outcome {
    pub fn admit(reason: impl Into<String>) -> Self {
        Self {
            matched: true,
            reason: reason.into(),
        }
    }

    pub fn refuse(reason: impl Into<String>) -> Self {
        Self {
            matched: false,
            reason: reason.into(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched
    }
}

// ── EnabledCondition ──────────────────────────────────────────────────────────

/// The enablement condition for one component category.
///
/// The category's [`NamePolicy`] is injected at construction; everything
/// else — key shape, the opt-out comparison, the fail-open default — is
/// shared across categories.
#[derive(Debug, Clone)]
pub struct EnabledCondition<P: NamePolicy> {
    policy: P,
}

impl<P: NamePolicy> EnabledCondition<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// Category label of the injected policy, for diagnostics.
    pub fn category(&self) -> &'static str {
        self.policy.category()
    }

    /// Configuration key controlling `type_name`. Rebuilt on every call;
    /// deterministic for a fixed policy.
    pub fn property_key(&self, type_name: &str) -> String {
        format!(
            "{PROPERTY_PREFIX}{}{PROPERTY_SUFFIX}",
            self.policy.normalize(type_name)
        )
    }

    /// Decide whether `candidate` is enabled under `resolver`.
    ///
    /// Only a value comparing case-insensitively equal to `"false"` refuses
    /// the component; any other value — or no value at all — admits it.
    pub fn evaluate(&self, candidate: &Candidate, resolver: &dyn PropertyResolver) -> Outcome {
        let key = self.property_key(candidate.type_name());
        let value = resolver.property(&key);
        debug!(
            component = %candidate,
            %key,
            value = value.unwrap_or("<unset>"),
            "evaluating enablement"
        );

        match value {
            Some(v) if v.eq_ignore_ascii_case("false") => {
                info!(component = %candidate, %key, "component disabled by configuration");
                Outcome::refuse(format!(
                    "{} '{candidate}' disabled: {key} is false",
                    self.policy.category()
                ))
            }
            _ => Outcome::admit(format!(
                "{} '{candidate}' enabled: {key} is not set to false",
                self.policy.category()
            )),
        }
    }

    /// Decide for a metadata-described declaration site.
    ///
    /// Resolving the candidate can fail — applying the condition to a site
    /// it cannot read is a defect in the host's wiring, so the error is
    /// fatal and must abort registration rather than soft-skip.
    pub fn evaluate_site(
        &self,
        site: &DeclarationSite,
        resolver: &dyn PropertyResolver,
    ) -> Result<Outcome> {
        let candidate = self.candidate_from(site)?;
        Ok(self.evaluate(&candidate, resolver))
    }

    /// Resolve the candidate component for a site: an explicit
    /// [`COMPONENT_ATTRIBUTE`] wins, otherwise the site must be a factory
    /// method with a known return type.
    fn candidate_from(&self, site: &DeclarationSite) -> Result<Candidate> {
        if let Some(explicit) = site.attribute(COMPONENT_ATTRIBUTE) {
            return Ok(Candidate::new(explicit));
        }

        match site.kind() {
            SiteKind::FactoryMethod {
                return_type: Some(type_name),
                ..
            } if !type_name.is_empty() => Ok(Candidate::new(type_name.clone())),
            SiteKind::FactoryMethod { .. } => Err(GateError::Condition(format!(
                "cannot infer a component type for {}: the factory method has no known return type",
                site.location()
            ))),
            SiteKind::TypeLevel { .. } => Err(GateError::Condition(format!(
                "{} condition on {} requires an explicit '{}' attribute when not on a factory method",
                self.policy.category(),
                site.location(),
                COMPONENT_ATTRIBUTE
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Identity-lower-case policy: key segment is just the lowered type name.
    struct LowerNaming;

    impl NamePolicy for LowerNaming {
        fn category(&self) -> &'static str {
            "component"
        }

        fn normalize(&self, type_name: &str) -> String {
            type_name.to_ascii_lowercase()
        }
    }

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unset_property_admits() {
        let condition = EnabledCondition::new(LowerNaming);
        let outcome = condition.evaluate(&Candidate::new("MyFilter"), &props(&[]));
        assert!(outcome.is_match());
    }

    #[test]
    fn false_in_any_casing_refuses() {
        let condition = EnabledCondition::new(LowerNaming);
        for value in ["false", "FALSE", "False", "fAlSe"] {
            let resolver = props(&[("gateway.myfilter.enabled", value)]);
            let outcome = condition.evaluate(&Candidate::new("MyFilter"), &resolver);
            assert!(!outcome.is_match(), "value {value:?} must refuse");
        }
    }

    #[test]
    fn non_false_values_admit() {
        let condition = EnabledCondition::new(LowerNaming);
        for value in ["true", "", "0", "no", "disabled"] {
            let resolver = props(&[("gateway.myfilter.enabled", value)]);
            let outcome = condition.evaluate(&Candidate::new("MyFilter"), &resolver);
            assert!(outcome.is_match(), "value {value:?} must admit");
        }
    }

    #[test]
    fn property_key_is_deterministic() {
        let condition = EnabledCondition::new(LowerNaming);
        assert_eq!(
            condition.property_key("MyFilter"),
            condition.property_key("MyFilter")
        );
        assert_eq!(condition.property_key("MyFilter"), "gateway.myfilter.enabled");
    }

    #[test]
    fn refusal_reason_cites_the_key() {
        let condition = EnabledCondition::new(LowerNaming);
        let resolver = props(&[("gateway.myfilter.enabled", "false")]);
        let outcome = condition.evaluate(&Candidate::new("MyFilter"), &resolver);
        assert!(!outcome.matched);
        assert!(outcome.reason.contains("gateway.myfilter.enabled"));
    }

    #[test]
    fn empty_configuration_admits() {
        let condition = EnabledCondition::new(LowerNaming);
        let outcome = condition.evaluate(&Candidate::new("MyFilter"), &props(&[]));
        assert!(outcome.matched);
    }

    #[test]
    fn site_with_explicit_attribute_uses_it() {
        let condition = EnabledCondition::new(LowerNaming);
        let site = DeclarationSite::type_level("SomeDeclaringType")
            .with_attribute(COMPONENT_ATTRIBUTE, "MyFilter");
        let resolver = props(&[("gateway.myfilter.enabled", "false")]);
        let outcome = condition.evaluate_site(&site, &resolver).unwrap();
        assert!(!outcome.matched);
    }

    #[test]
    fn site_infers_from_factory_return_type() {
        let condition = EnabledCondition::new(LowerNaming);
        let site = DeclarationSite::factory_method("Assembly", "my_filter", Some("MyFilter"));
        let resolver = props(&[("gateway.myfilter.enabled", "false")]);
        let outcome = condition.evaluate_site(&site, &resolver).unwrap();
        assert!(!outcome.matched);
    }

    #[test]
    fn explicit_attribute_wins_over_return_type() {
        let condition = EnabledCondition::new(LowerNaming);
        let site = DeclarationSite::factory_method("Assembly", "build", Some("OtherType"))
            .with_attribute(COMPONENT_ATTRIBUTE, "MyFilter");
        let resolver = props(&[("gateway.myfilter.enabled", "false")]);
        let outcome = condition.evaluate_site(&site, &resolver).unwrap();
        assert!(!outcome.matched, "the explicit attribute must drive the key");
    }

    #[test]
    fn type_level_site_without_attribute_is_fatal() {
        let condition = EnabledCondition::new(LowerNaming);
        let site = DeclarationSite::type_level("SomeDeclaringType");
        let err = condition.evaluate_site(&site, &props(&[])).unwrap_err();
        match err {
            GateError::Condition(msg) => {
                assert!(msg.contains("SomeDeclaringType"));
                assert!(msg.contains(COMPONENT_ATTRIBUTE));
            }
            other => panic!("expected a condition error, got: {other}"),
        }
    }

    #[test]
    fn factory_method_without_return_type_is_fatal() {
        let condition = EnabledCondition::new(LowerNaming);
        let site = DeclarationSite::factory_method("Assembly", "mystery", None);
        let err = condition.evaluate_site(&site, &props(&[])).unwrap_err();
        match err {
            GateError::Condition(msg) => assert!(msg.contains("Assembly::mystery")),
            other => panic!("expected a condition error, got: {other}"),
        }
    }

    #[test]
    fn outcome_serializes_for_reports() {
        let outcome = Outcome::refuse("component 'X' disabled");
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"matched\":false"));
        assert!(json.contains("disabled"));
    }
}
