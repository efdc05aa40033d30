//! Integration tests: running the subcommands against files on disk.

use std::path::Path;

use itemval_cli::check::{check_settings, CheckSettingsArgs};
use itemval_cli::validate::{run_validate, ValidateArgs};
use serde_json::{json, Value};

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn validate_writes_survivors_and_stats() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "product.json",
        &json!({"type": "object", "required": ["title"]}).to_string(),
    );
    let settings = write(
        dir.path(),
        "settings.yaml",
        "SPIDERMON_VALIDATION_SCHEMAS:\n  Product: product.json\n\
         SPIDERMON_VALIDATION_DROP_ITEMS_WITH_ERRORS: true\n",
    );
    let items = write(
        dir.path(),
        "items.jl",
        "{\"_type\": \"Product\", \"title\": \"lamp\"}\n{\"_type\": \"Product\"}\n",
    );
    let out = dir.path().join("out.jl");
    let stats = dir.path().join("stats.json");

    let args = ValidateArgs {
        settings,
        catalog: None,
        items,
        out: Some(out.clone()),
        stats: Some(stats.clone()),
        type_field: "_type".to_string(),
    };
    assert_eq!(run_validate(&args).unwrap(), 0);

    let survivors = std::fs::read_to_string(&out).unwrap();
    assert_eq!(survivors.lines().count(), 1);
    assert!(survivors.contains("lamp"));

    let report: Value = serde_json::from_str(&std::fs::read_to_string(&stats).unwrap()).unwrap();
    assert_eq!(report["spidermon/validation/items"], 2);
    assert_eq!(report["spidermon/validation/items/dropped"], 1);
    assert_eq!(report["spidermon/validation/validators/Product/JSONSchema"], 1);
    assert_eq!(
        report["spidermon/validation/fields/errors/Missing required field/title"],
        1
    );
}

#[test]
fn check_settings_resolves_catalogue_references() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(
        dir.path(),
        "catalog.yaml",
        "shop.schemas.PRODUCT:\n  type: object\n",
    );
    let settings = write(
        dir.path(),
        "settings.json",
        &json!({
            "SPIDERMON_VALIDATION_SCHEMAS": ["shop.schemas.PRODUCT"]
        })
        .to_string(),
    );

    let summary = check_settings(&CheckSettingsArgs {
        settings,
        catalog: Some(catalog),
    })
    .unwrap();
    assert_eq!(
        summary.0.get("UniversalItem"),
        Some(&vec!["JSONSchema".to_string()])
    );
}

#[test]
fn check_settings_fails_on_unknown_reference() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write(
        dir.path(),
        "settings.yaml",
        "SPIDERMON_VALIDATION_SCHEMAS: [shop.schemas.MISSING]\n",
    );
    let err = check_settings(&CheckSettingsArgs {
        settings,
        catalog: None,
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("shop.schemas.MISSING"));
}
