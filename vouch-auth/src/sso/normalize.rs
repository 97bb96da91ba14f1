//! Claim normalization for federated logins.

use vouch_core::{ClaimSet, well_known};

/// Reconcile a raw provider claim set into canonical form.
///
/// Rules, in order:
///
/// 1. If the set already carries a [`well_known::DISPLAY_NAME`] claim it is
///    returned unchanged; an authoritative value established earlier in
///    the pipeline is never overwritten.
/// 2. Otherwise, if the set carries a raw [`well_known::RAW_NAME`] claim,
///    a canonical claim with that value is added; the raw claim stays
///    (normalization is additive, never destructive).
/// 3. Otherwise the set is returned unchanged; a subject without a
///    displayable name is not an error.
///
/// Pure and idempotent: `normalize(normalize(c)) == normalize(c)`.
pub fn normalize(mut claims: ClaimSet) -> ClaimSet {
    if claims.has_type(well_known::DISPLAY_NAME) {
        return claims;
    }
    if let Some(name) = claims.first_value(well_known::RAW_NAME).map(str::to_string) {
        claims.add(well_known::DISPLAY_NAME, name);
    }
    claims
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_name_becomes_canonical() {
        let raw = ClaimSet::from_pairs([(well_known::RAW_NAME, "Kermit")]);

        let normalized = normalize(raw);

        assert!(normalized.has(well_known::RAW_NAME, "Kermit"));
        assert!(normalized.has(well_known::DISPLAY_NAME, "Kermit"));
        assert_eq!(normalized.len(), 2);
    }

    #[test]
    fn test_existing_canonical_claim_is_preserved() {
        // The canonical value wins even when a raw name disagrees.
        let raw = ClaimSet::from_pairs([
            (well_known::DISPLAY_NAME, "Kermit"),
            (well_known::RAW_NAME, "Miss Piggy"),
        ]);

        let normalized = normalize(raw.clone());

        assert_eq!(normalized, raw);
        assert!(normalized.has(well_known::DISPLAY_NAME, "Kermit"));
        assert!(!normalized.has(well_known::DISPLAY_NAME, "Miss Piggy"));
    }

    #[test]
    fn test_no_name_claims_is_not_an_error() {
        let raw = ClaimSet::from_pairs([("sub", "user-42")]);

        let normalized = normalize(raw.clone());

        assert_eq!(normalized, raw);
        assert!(!normalized.has_type(well_known::DISPLAY_NAME));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = ClaimSet::from_pairs([(well_known::RAW_NAME, "Kermit"), ("sub", "user-42")]);

        let once = normalize(raw);
        let twice = normalize(once.clone());

        assert_eq!(once, twice);
    }
}
