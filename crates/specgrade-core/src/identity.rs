//! Content identity
//!
//! Three independent SHA-256 hashes fingerprint a grading run: the
//! normalized contract body, the active scoring template, and the active
//! ruleset. Identical inputs always produce identical hashes, which makes
//! the triple usable as a cache and versioning key.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::contract::Contract;
use crate::rules::Registry;
use crate::template::TemplateConfig;

/// Name of the scoring engine recorded in metadata
pub const SCORING_ENGINE: &str = "specgrade-core";

/// Version tag of the standard ruleset, part of the ruleset hash
pub const RULESET_VERSION: &str = "2026.1";

/// Reproducibility metadata attached to every grade result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub spec_hash: String,
    pub template_hash: String,
    pub ruleset_hash: String,
    pub template_version: String,
    pub tool_versions: BTreeMap<String, String>,
    pub scoring_engine: String,
    pub instance_id: String,
    pub instance_start_time: String,
    pub graded_at: String,
}

/// Process-wide instance identity, fixed at first use
#[derive(Debug, Clone)]
pub struct Instance {
    pub id: String,
    pub start_time: String,
}

pub fn instance() -> &'static Instance {
    static INSTANCE: OnceLock<Instance> = OnceLock::new();
    INSTANCE.get_or_init(|| Instance {
        id: ulid::Ulid::new().to_string().to_lowercase(),
        start_time: rfc3339_now(),
    })
}

fn rfc3339_now() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash of the normalized contract body
pub fn spec_hash(contract: &Contract) -> String {
    sha256_hex(&contract.canonical_bytes())
}

/// Hash of the active scoring template
pub fn template_hash(template: &TemplateConfig) -> String {
    sha256_hex(&template.canonical_bytes())
}

/// Hash of the active ruleset: version tag plus every checkpoint id and max
pub fn ruleset_hash(registry: &Registry) -> String {
    let mut descriptor = String::from(RULESET_VERSION);
    let mut specs = registry.checkpoint_specs();
    specs.sort_by_key(|cp| cp.id);
    for cp in specs {
        descriptor.push('\n');
        descriptor.push_str(cp.id);
        descriptor.push(':');
        descriptor.push_str(&format!("{}", cp.max_points));
    }
    sha256_hex(&descriptor)
}

impl Metadata {
    /// Collect metadata for one grading run
    pub fn collect(contract: &Contract, template: &TemplateConfig, registry: &Registry) -> Self {
        let inst = instance();
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            "specgrade-core".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );

        Metadata {
            spec_hash: spec_hash(contract),
            template_hash: template_hash(template),
            ruleset_hash: ruleset_hash(registry),
            template_version: template.version.clone(),
            tool_versions,
            scoring_engine: SCORING_ENGINE.to_string(),
            instance_id: inst.id.clone(),
            instance_start_time: inst.start_time.clone(),
            graded_at: rfc3339_now(),
        }
    }
}
