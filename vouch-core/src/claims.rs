//! Claim and claim set types.

use serde::{Deserialize, Serialize};

/// A single (type, value) fact about an authenticated subject.
///
/// Multiple claims of the same type may coexist in a [`ClaimSet`]; each
/// pair is logically its own fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type, e.g. `role` or `name`.
    pub claim_type: String,
    /// Claim value, compared with exact string equality everywhere.
    pub value: String,
}

impl Claim {
    /// Create a new claim.
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self { claim_type: claim_type.into(), value: value.into() }
    }
}

/// An unordered collection of claims about one subject.
///
/// Produced by successful token validation or by a completed federated
/// login. Lookups are exact string matches: no case folding, no substring
/// matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet {
    claims: Vec<Claim>,
}

impl ClaimSet {
    /// Create an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a claim set from (type, value) pairs.
    pub fn from_pairs<I, T, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, V)>,
        T: Into<String>,
        V: Into<String>,
    {
        Self { claims: pairs.into_iter().map(|(t, v)| Claim::new(t, v)).collect() }
    }

    /// Flatten a decoded JWT payload (or OIDC userinfo document) into claims.
    ///
    /// String members become one claim each; array members become one claim
    /// per element; numbers and booleans are stringified. `null` members and
    /// nested objects are skipped; they carry no single claim value.
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut set = Self::new();
        for (claim_type, value) in object {
            set.push_json_value(claim_type, value);
        }
        set
    }

    fn push_json_value(&mut self, claim_type: &str, value: &serde_json::Value) {
        use serde_json::Value;
        match value {
            Value::String(s) => self.add(claim_type, s.clone()),
            Value::Array(items) => {
                for item in items {
                    self.push_json_value(claim_type, item);
                }
            }
            Value::Number(n) => self.add(claim_type, n.to_string()),
            Value::Bool(b) => self.add(claim_type, b.to_string()),
            Value::Null | Value::Object(_) => {}
        }
    }

    /// Add a claim. Duplicates are permitted; each pair is its own fact.
    pub fn add(&mut self, claim_type: impl Into<String>, value: impl Into<String>) {
        self.claims.push(Claim::new(claim_type, value));
    }

    /// Whether the set contains a claim matching both type and value exactly.
    pub fn has(&self, claim_type: &str, value: &str) -> bool {
        self.claims.iter().any(|c| c.claim_type == claim_type && c.value == value)
    }

    /// Whether the set contains any claim of the given type.
    pub fn has_type(&self, claim_type: &str) -> bool {
        self.claims.iter().any(|c| c.claim_type == claim_type)
    }

    /// First value of the given claim type, if any.
    pub fn first_value(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    /// All values of the given claim type.
    pub fn values<'a>(&'a self, claim_type: &'a str) -> impl Iterator<Item = &'a str> {
        self.claims
            .iter()
            .filter(move |c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    /// Iterate over all claims.
    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter()
    }

    /// Number of claims in the set.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the set holds no claims.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl FromIterator<Claim> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = Claim>>(iter: I) -> Self {
        Self { claims: iter.into_iter().collect() }
    }
}

impl IntoIterator for ClaimSet {
    type Item = Claim;
    type IntoIter = std::vec::IntoIter<Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.into_iter()
    }
}
