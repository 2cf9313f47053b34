//! Version command - engine, ruleset, and template identity

use serde::Serialize;

use crate::cli::Cli;
use specgrade_core::error::Result;
use specgrade_core::format::OutputFormat;
use specgrade_core::identity::{self, SCORING_ENGINE};
use specgrade_core::rules::Registry;
use specgrade_core::template::TemplateConfig;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionInfo {
    server_version: String,
    scoring_engine: String,
    instance_id: String,
    instance_start_time: String,
    ruleset_hash: String,
    template_version: String,
    template_hash: String,
}

pub fn execute(cli: &Cli) -> Result<()> {
    let template = TemplateConfig::default();
    let registry = Registry::standard();
    let instance = identity::instance();

    let info = VersionInfo {
        server_version: env!("CARGO_PKG_VERSION").to_string(),
        scoring_engine: SCORING_ENGINE.to_string(),
        instance_id: instance.id.clone(),
        instance_start_time: instance.start_time.clone(),
        ruleset_hash: identity::ruleset_hash(&registry),
        template_version: template.version.clone(),
        template_hash: identity::template_hash(&template),
    };

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Human => {
            println!("specgrade {}", info.server_version);
            println!("  engine:   {}", info.scoring_engine);
            println!("  instance: {} (started {})", info.instance_id, info.instance_start_time);
            println!("  ruleset:  {}", info.ruleset_hash);
            println!(
                "  template: {} ({})",
                info.template_version, info.template_hash
            );
        }
        OutputFormat::Records => {
            println!(
                "H specgrade=1 records=1 version={} engine={} ruleset={} template={}",
                info.server_version, info.scoring_engine, info.ruleset_hash, info.template_version
            );
        }
    }

    Ok(())
}
