//! Static rule catalog
//!
//! One entry per checkpoint id: the requirement it grades, why it matters,
//! and a concrete remediation. Backs the explain and fixes surfaces.

use serde::Serialize;

/// Catalog entry for one rule/checkpoint id
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub rule_id: &'static str,
    pub category: &'static str,
    pub requirement: &'static str,
    pub rationale: &'static str,
    pub fix: &'static str,
}

pub const CATALOG: [CatalogEntry; 22] = [
    CatalogEntry {
        rule_id: "NAM-NS",
        category: "naming",
        requirement: "Every path lives under the /api/v2 namespace.",
        rationale: "A single versioned namespace keeps routing, gateways, and deprecation policies uniform across services.",
        fix: "Move the offending paths under /api/v2/, e.g. /users becomes /api/v2/users.",
    },
    CatalogEntry {
        rule_id: "NAM-CASE",
        category: "naming",
        requirement: "Path segments are lowercase kebab-case.",
        rationale: "Mixed casing breaks case-sensitive routers and makes URLs unpredictable for clients.",
        fix: "Rename segments like /UserAccounts or /user_files to /user-accounts and /user-files.",
    },
    CatalogEntry {
        rule_id: "NAM-PLURAL",
        category: "naming",
        requirement: "Collection resources use plural nouns.",
        rationale: "Plural collections (/orders, /orders/{id}) keep item and collection addressing consistent.",
        fix: "Rename singular collections, e.g. /order to /orders.",
    },
    CatalogEntry {
        rule_id: "PAG-OFFSET",
        category: "pagination",
        requirement: "List endpoints do not expose offset or page query parameters.",
        rationale: "Offset pagination skips or repeats rows under concurrent writes and degrades on deep pages.",
        fix: "Replace offset/page parameters with an opaque cursor parameter and return the next cursor in the response meta block.",
    },
    CatalogEntry {
        rule_id: "PAG-CURSOR",
        category: "pagination",
        requirement: "List endpoints accept a cursor parameter.",
        rationale: "Cursor pagination stays correct and fast regardless of collection size or write volume.",
        fix: "Add a `cursor` query parameter (string) and echo the follow-up cursor in the response.",
    },
    CatalogEntry {
        rule_id: "PAG-LIMIT",
        category: "pagination",
        requirement: "List endpoints accept a limit parameter with a declared maximum.",
        rationale: "An unbounded page size lets a single request exhaust server memory.",
        fix: "Add a `limit` integer parameter with `maximum` declared in its schema.",
    },
    CatalogEntry {
        rule_id: "HTTP-VERBS",
        category: "http",
        requirement: "Path segments name resources, never actions.",
        rationale: "Actions belong in the HTTP method; verb paths (/get-users) duplicate and contradict it.",
        fix: "Replace verb segments with resource nouns and move the action into the method.",
    },
    CatalogEntry {
        rule_id: "HTTP-STATUS",
        category: "http",
        requirement: "Every operation declares at least one 2xx response.",
        rationale: "Without a declared success shape, clients cannot be generated or validated.",
        fix: "Declare the success status and payload for each operation.",
    },
    CatalogEntry {
        rule_id: "HTTP-DELETE",
        category: "http",
        requirement: "DELETE operations declare 204 No Content.",
        rationale: "A deleted resource has no representation to return; 204 states that explicitly.",
        fix: "Add a 204 response to DELETE operations.",
    },
    CatalogEntry {
        rule_id: "CACHE-ETAG",
        category: "caching",
        requirement: "GET success responses declare an ETag header.",
        rationale: "ETags enable conditional requests and cheap cache validation.",
        fix: "Declare an ETag response header on GET 2xx responses and honour If-None-Match.",
    },
    CatalogEntry {
        rule_id: "CACHE-CONTROL",
        category: "caching",
        requirement: "GET success responses declare Cache-Control.",
        rationale: "Explicit cache policy prevents intermediaries from guessing freshness.",
        fix: "Declare a Cache-Control response header with an explicit max-age or no-store.",
    },
    CatalogEntry {
        rule_id: "ENV-DATA",
        category: "envelope",
        requirement: "List responses wrap their payload in a top-level data property.",
        rationale: "An envelope leaves room for meta and errors without breaking clients later.",
        fix: "Wrap the array payload as {\"data\": [...], \"meta\": {...}}.",
    },
    CatalogEntry {
        rule_id: "ENV-ERROR",
        category: "envelope",
        requirement: "The contract declares a reusable Error or Problem schema.",
        rationale: "A single error shape lets clients handle failures uniformly across endpoints.",
        fix: "Add an Error (or ProblemDetails) schema under components.schemas and reference it from 4xx/5xx responses.",
    },
    CatalogEntry {
        rule_id: "ENV-META",
        category: "envelope",
        requirement: "List envelopes carry a meta or pagination block.",
        rationale: "Cursors and counts need a stable place that is not mixed into the payload.",
        fix: "Add a meta object with the next cursor alongside data.",
    },
    CatalogEntry {
        rule_id: "I18N-ACCEPT-LANG",
        category: "i18n",
        requirement: "Operations accept an Accept-Language header.",
        rationale: "Localized messages and formats need a declared negotiation channel.",
        fix: "Declare an Accept-Language header parameter on operations returning human-readable text.",
    },
    CatalogEntry {
        rule_id: "I18N-DATETIME",
        category: "i18n",
        requirement: "Temporal string fields declare format: date-time.",
        rationale: "Untyped timestamps invite locale-dependent parsing bugs; RFC 3339 is unambiguous.",
        fix: "Add `format: date-time` to temporal string properties.",
    },
    CatalogEntry {
        rule_id: "ASYNC-LOCATION",
        category: "async",
        requirement: "202 responses declare a Location or Operation-Location header.",
        rationale: "Accepted work is useless if the caller cannot find out where to poll.",
        fix: "Declare a Location header on 202 responses pointing at the status resource.",
    },
    CatalogEntry {
        rule_id: "ASYNC-STATUS",
        category: "async",
        requirement: "A status resource (/operations, /jobs, /tasks) exists for long-running work.",
        rationale: "Polling needs an addressable resource with a stable status shape.",
        fix: "Add a GET /api/v2/operations/{id} (or jobs/tasks) endpoint returning the work status.",
    },
    CatalogEntry {
        rule_id: "WH-DELIVERY",
        category: "webhooks",
        requirement: "Declared webhooks deliver via POST.",
        rationale: "Webhook deliveries are writes to the consumer; any other method is a contract smell.",
        fix: "Declare the webhook delivery as a post operation on the webhook item.",
    },
    CatalogEntry {
        rule_id: "WH-SIGNATURE",
        category: "webhooks",
        requirement: "Webhook deliveries document a signature header.",
        rationale: "Consumers must be able to verify that a delivery really came from this API.",
        fix: "Document an X-Webhook-Signature header parameter and its verification scheme.",
    },
    CatalogEntry {
        rule_id: "EXT-PREFIX",
        category: "extensions",
        requirement: "Non-standard root keys carry the x- prefix.",
        rationale: "Unprefixed custom keys collide with future OpenAPI revisions.",
        fix: "Rename custom root keys to x-<vendor>-<name>.",
    },
    CatalogEntry {
        rule_id: "EXT-NAMESPACE",
        category: "extensions",
        requirement: "Vendor extensions are namespaced as x-vendor-name.",
        rationale: "Namespacing prevents collisions between tooling vendors reading the same document.",
        fix: "Rename extensions like x-ratelimit to x-<vendor>-ratelimit.",
    },
];

/// Look up a catalog entry by rule id
pub fn lookup(rule_id: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.rule_id == rule_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Registry;

    #[test]
    fn test_every_checkpoint_has_a_catalog_entry() {
        let registry = Registry::standard();
        for cp in registry.checkpoint_specs() {
            assert!(lookup(cp.id).is_some(), "no catalog entry for {}", cp.id);
        }
    }

    #[test]
    fn test_lookup_unknown_is_none() {
        assert!(lookup("NOPE-1").is_none());
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<&str> = CATALOG.iter().map(|e| e.rule_id).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }
}
