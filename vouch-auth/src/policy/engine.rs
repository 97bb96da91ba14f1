//! Policy registry and evaluation.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use vouch_core::ClaimSet;

/// A policy declaration as loaded from startup configuration.
///
/// The configuration source (file, environment, remote) is the caller's
/// concern; this is just the triple shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Policy name used at evaluation time.
    pub name: String,
    /// Claim type the policy requires.
    pub claim_type: String,
    /// Claim value the policy requires, matched exactly.
    pub required_value: String,
}

/// Outcome of evaluating a named policy against a claim set.
///
/// `UnknownPolicy` is deliberately distinct from `Denied`: both deny access
/// (fail closed), but an unknown policy name is a wiring defect worth
/// surfacing in diagnostics, while `Denied` is a normal negative result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    /// The claim set satisfies the policy's required claim.
    Allowed,
    /// The policy exists but the required claim is absent.
    Denied,
    /// No policy with that name was ever registered.
    UnknownPolicy,
}

impl PolicyDecision {
    /// Whether access should be granted. Everything except `Allowed` denies.
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Registry of named policies, each requiring one (claim-type, value) pair.
///
/// Reads are lock-free and concurrent; registration replaces the whole
/// predicate for a name in one shard operation, so evaluators never observe
/// a half-written policy. Registration is expected at startup but remains
/// safe at runtime under the usual single-writer discipline.
#[derive(Debug, Default)]
pub struct PolicyEngine {
    policies: DashMap<String, RequiredClaim>,
}

#[derive(Debug, Clone)]
struct RequiredClaim {
    claim_type: String,
    value: String,
}

impl PolicyEngine {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configuration triples.
    ///
    /// Later rules win over earlier ones with the same name, matching
    /// [`register`](Self::register) semantics.
    pub fn from_rules<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = PolicyRule>,
    {
        let engine = Self::new();
        for rule in rules {
            engine.register(rule.name, rule.claim_type, rule.required_value);
        }
        engine
    }

    /// Register a policy requiring `claim_type` to equal `required_value`.
    ///
    /// Registration is idempotent by name and last-write-wins: registering
    /// an existing name silently replaces the prior predicate. The
    /// replacement is logged because it is a classic source of surprising
    /// authorization behavior.
    pub fn register(
        &self,
        name: impl Into<String>,
        claim_type: impl Into<String>,
        required_value: impl Into<String>,
    ) {
        let name = name.into();
        let previous = self.policies.insert(
            name.clone(),
            RequiredClaim { claim_type: claim_type.into(), value: required_value.into() },
        );
        if previous.is_some() {
            tracing::debug!(policy = %name, "replaced existing policy registration");
        }
    }

    /// Evaluate the named policy against a claim set.
    ///
    /// Returns [`PolicyDecision::Allowed`] iff the set contains at least one
    /// claim matching the policy's (type, value) pair exactly: no case
    /// folding, no substring matching. Synchronous and deterministic; no
    /// retries.
    pub fn evaluate(&self, policy_name: &str, claims: &ClaimSet) -> PolicyDecision {
        let Some(required) = self.policies.get(policy_name) else {
            tracing::debug!(policy = %policy_name, "evaluated unregistered policy");
            return PolicyDecision::UnknownPolicy;
        };

        if claims.has(&required.claim_type, &required.value) {
            PolicyDecision::Allowed
        } else {
            PolicyDecision::Denied
        }
    }

    /// Number of registered policies.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
