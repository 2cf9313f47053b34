//! Compliance regime tables
//!
//! Static, read-only mappings from named compliance regimes to rule checks,
//! bucketed into mandatory/recommended/conditional per business domain.
//! Loaded once, never mutated, safe to share across concurrent evaluations.

use crate::rules::Severity;

/// Mapping from a compliance regime to one rule check
#[derive(Debug, Clone, Copy)]
pub struct ComplianceRule {
    pub rule_id: &'static str,
    /// Named regime this requirement belongs to
    pub compliance: &'static str,
    pub requirement: &'static str,
    pub severity: Severity,
    pub auto_fail: bool,
    pub evidence: &'static [&'static str],
}

/// Compliance buckets for one business domain
#[derive(Debug, Clone, Copy)]
pub struct DomainCompliance {
    pub domain: &'static str,
    pub mandatory: &'static [ComplianceRule],
    pub recommended: &'static [ComplianceRule],
    pub conditional: &'static [ComplianceRule],
}

/// Rules that gate the run regardless of domain
pub const AUTO_FAIL_RULES: [&str; 2] = ["NAM-NS", "PAG-OFFSET"];

const BASELINE_MANDATORY: &[ComplianceRule] = &[
    ComplianceRule {
        rule_id: "NAM-NS",
        compliance: "REST-BASELINE",
        requirement: "All paths are served under the /api/v2 namespace",
        severity: Severity::Error,
        auto_fail: true,
        evidence: &["paths"],
    },
    ComplianceRule {
        rule_id: "PAG-OFFSET",
        compliance: "REST-BASELINE",
        requirement: "Collection endpoints use cursor pagination, never offset/page",
        severity: Severity::Error,
        auto_fail: true,
        evidence: &["paths.*.get.parameters"],
    },
];

const BASELINE_RECOMMENDED: &[ComplianceRule] = &[
    ComplianceRule {
        rule_id: "ENV-ERROR",
        compliance: "REST-BASELINE",
        requirement: "A reusable error schema is declared",
        severity: Severity::Warn,
        auto_fail: false,
        evidence: &["components.schemas"],
    },
    ComplianceRule {
        rule_id: "HTTP-STATUS",
        compliance: "REST-BASELINE",
        requirement: "Every operation declares its success response",
        severity: Severity::Warn,
        auto_fail: false,
        evidence: &["paths.*.*.responses"],
    },
];

const FINANCE_MANDATORY: &[ComplianceRule] = &[
    ComplianceRule {
        rule_id: "ENV-ERROR",
        compliance: "FIN-API-1",
        requirement: "Financial APIs declare a machine-readable error schema",
        severity: Severity::Error,
        auto_fail: true,
        evidence: &["components.schemas"],
    },
    ComplianceRule {
        rule_id: "PAG-LIMIT",
        compliance: "FIN-API-1",
        requirement: "Statement and transaction listings declare a bounded page size",
        severity: Severity::Error,
        auto_fail: false,
        evidence: &["paths.*.get.parameters"],
    },
];

const FINANCE_CONDITIONAL: &[ComplianceRule] = &[ComplianceRule {
    rule_id: "ASYNC-LOCATION",
    compliance: "FIN-API-1",
    requirement: "Deferred settlement operations expose a pollable status location",
    severity: Severity::Warn,
    auto_fail: false,
    evidence: &["paths.*.post.responses.202"],
}];

const HEALTHCARE_MANDATORY: &[ComplianceRule] = &[ComplianceRule {
    rule_id: "WH-SIGNATURE",
    compliance: "HL-EXCHANGE",
    requirement: "Event deliveries carrying clinical data are signed",
    severity: Severity::Error,
    auto_fail: true,
    evidence: &["webhooks.*.post.parameters"],
}];

const HEALTHCARE_RECOMMENDED: &[ComplianceRule] = &[ComplianceRule {
    rule_id: "I18N-ACCEPT-LANG",
    compliance: "HL-EXCHANGE",
    requirement: "Patient-facing text negotiates language",
    severity: Severity::Warn,
    auto_fail: false,
    evidence: &["paths.*.*.parameters"],
}];

const ECOMMERCE_RECOMMENDED: &[ComplianceRule] = &[ComplianceRule {
    rule_id: "CACHE-ETAG",
    compliance: "STOREFRONT-CORE",
    requirement: "Catalog reads are cache-validatable",
    severity: Severity::Warn,
    auto_fail: false,
    evidence: &["paths.*.get.responses"],
}];

const GENERAL: DomainCompliance = DomainCompliance {
    domain: "general",
    mandatory: BASELINE_MANDATORY,
    recommended: BASELINE_RECOMMENDED,
    conditional: &[],
};

const FINANCE: DomainCompliance = DomainCompliance {
    domain: "finance",
    mandatory: FINANCE_MANDATORY,
    recommended: BASELINE_RECOMMENDED,
    conditional: FINANCE_CONDITIONAL,
};

const HEALTHCARE: DomainCompliance = DomainCompliance {
    domain: "healthcare",
    mandatory: HEALTHCARE_MANDATORY,
    recommended: HEALTHCARE_RECOMMENDED,
    conditional: &[],
};

const ECOMMERCE: DomainCompliance = DomainCompliance {
    domain: "ecommerce",
    mandatory: BASELINE_MANDATORY,
    recommended: ECOMMERCE_RECOMMENDED,
    conditional: &[],
};

/// Compliance buckets for a domain; unknown domains use the baseline
pub fn for_domain(domain: &str) -> &'static DomainCompliance {
    match domain.to_lowercase().as_str() {
        "finance" => &FINANCE,
        "healthcare" => &HEALTHCARE,
        "ecommerce" => &ECOMMERCE,
        _ => &GENERAL,
    }
}

/// Whether a rule gates the run for the given domain
pub fn gates_run(domain: &str, rule_id: &str) -> bool {
    AUTO_FAIL_RULES.contains(&rule_id)
        || for_domain(domain)
            .mandatory
            .iter()
            .any(|c| c.rule_id == rule_id && c.auto_fail)
}
