//! Domain weight resolution
//!
//! Each business domain carries a static table of weight multipliers keyed
//! by rule id or wildcard prefix. Lookup order: exact id match, then the
//! longest wildcard-prefix match, then the default weight 1.0. Tables are
//! immutable configuration, loaded once and shared.

/// Default weight when no table entry applies
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Domains with dedicated weight tables
pub const KNOWN_DOMAINS: [&str; 4] = ["general", "finance", "healthcare", "ecommerce"];

const GENERAL: &[(&str, f64)] = &[];

const FINANCE: &[(&str, f64)] = &[
    ("PAG-OFFSET", 1.5),
    ("PAG-*", 1.2),
    ("ENV-ERROR", 1.3),
    ("ENV-*", 1.1),
    ("CACHE-*", 0.8),
    ("ASYNC-*", 1.2),
];

const HEALTHCARE: &[(&str, f64)] = &[
    ("I18N-*", 1.3),
    ("ENV-ERROR", 1.2),
    ("NAM-*", 1.1),
    ("WH-SIGNATURE", 1.4),
];

const ECOMMERCE: &[(&str, f64)] = &[
    ("CACHE-*", 1.3),
    ("PAG-*", 1.2),
    ("I18N-ACCEPT-LANG", 1.2),
    ("WH-*", 1.1),
];

fn table_for(domain: &str) -> Option<&'static [(&'static str, f64)]> {
    match domain {
        "general" => Some(GENERAL),
        "finance" => Some(FINANCE),
        "healthcare" => Some(HEALTHCARE),
        "ecommerce" => Some(ECOMMERCE),
        _ => None,
    }
}

/// Resolve the weight multiplier for a rule id within a domain
///
/// Unknown domains resolve everything to the default weight rather than
/// failing the grading run.
pub fn resolve_weight(domain: &str, rule_id: &str) -> f64 {
    let Some(table) = table_for(&domain.to_lowercase()) else {
        tracing::warn!(domain, "unknown domain, using default weights");
        return DEFAULT_WEIGHT;
    };

    // Exact match wins outright
    if let Some((_, w)) = table.iter().find(|(id, _)| *id == rule_id) {
        return *w;
    }

    // Longest wildcard prefix wins among the rest
    table
        .iter()
        .filter_map(|(pattern, w)| {
            let prefix = pattern.strip_suffix('*')?;
            rule_id.starts_with(prefix).then_some((prefix.len(), *w))
        })
        .max_by_key(|(len, _)| *len)
        .map(|(_, w)| w)
        .unwrap_or(DEFAULT_WEIGHT)
}
