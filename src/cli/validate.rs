use std::path::Path;

use plugreg::validator::{duplicate_ids, load_json, plugin_ids, schema_issues, ValidationIssue};

pub(crate) fn run(registry_path: &Path, schema_path: &Path) {
    let schema = match load_json(schema_path, "schema") {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let registry_doc = match load_json(registry_path, "plugin registry") {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut issues = match schema_issues(&schema, &registry_doc) {
        Ok(issues) => issues,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Uniqueness is a cross-entry constraint the schema cannot express. It
    // runs on the raw document, separate from schema validation, so
    // duplicates are caught even when entries fail other constraints.
    let duplicates = duplicate_ids(&plugin_ids(&registry_doc));
    if !duplicates.is_empty() {
        issues.push(ValidationIssue::global(format!(
            "Duplicate plugin IDs: {}",
            duplicates.join(", ")
        )));
    }

    let entry_count = registry_doc
        .get("plugins")
        .and_then(|p| p.as_array())
        .map_or(0, Vec::len);

    if !issues.is_empty() {
        eprintln!("Validation failed:\n");
        for issue in &issues {
            eprintln!("  - {issue}");
        }
        eprintln!();
        std::process::exit(1);
    }

    println!("Validated {entry_count} plugin(s). All checks passed.");
}
