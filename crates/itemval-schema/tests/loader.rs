//! Integration tests: resolving schema and model declarations through the
//! loader, including on-disk schema files.

use std::io::Write;

use itemval_core::{FieldMap, Validator};
use itemval_schema::{ConfigurationError, Model, ObjectCatalog, ValidatorLoader};
use serde::Deserialize;
use serde_json::{json, Value};

fn fields(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture must be an object"),
    }
}

fn title_schema() -> Value {
    json!({
        "type": "object",
        "properties": {"title": {"type": "string"}},
        "required": ["title"]
    })
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct Article {
    title: String,
}

impl Model for Article {}

#[test]
fn inline_schema_loads() {
    let catalog = ObjectCatalog::new();
    let loader = ValidatorLoader::new(&catalog);
    let validator = loader.load_schema(&title_schema()).unwrap();
    assert_eq!(validator.name(), "JSONSchema");
    assert!(!validator.validate(&fields(json!({}))).unwrap().is_ok());
}

#[test]
fn schema_file_loads_relative_to_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("article.json")).unwrap();
    write!(file, "{}", title_schema()).unwrap();

    let catalog = ObjectCatalog::new();
    let loader = ValidatorLoader::new(&catalog).with_base_dir(dir.path());
    let validator = loader.load_schema(&json!("article.json")).unwrap();
    assert!(validator
        .validate(&fields(json!({"title": "x"})))
        .unwrap()
        .is_ok());
}

#[test]
fn missing_schema_file_is_a_configuration_error() {
    let catalog = ObjectCatalog::new();
    let loader = ValidatorLoader::new(&catalog);
    let err = loader
        .load_schema(&json!("/nonexistent/dir/article.json"))
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::SchemaFile { .. }));
}

#[test]
fn malformed_schema_file_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let catalog = ObjectCatalog::new();
    let loader = ValidatorLoader::new(&catalog);
    let err = loader
        .load_schema(&json!(path.to_string_lossy()))
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::SchemaFile { .. }));
}

#[test]
fn catalogue_value_and_text_both_resolve() {
    let mut catalog = ObjectCatalog::new();
    catalog
        .register_value("news.schemas.ARTICLE", title_schema())
        .register_text("news.schemas.ARTICLE_TEXT", title_schema().to_string());
    let loader = ValidatorLoader::new(&catalog);

    for reference in ["news.schemas.ARTICLE", "news.schemas.ARTICLE_TEXT"] {
        let validator = loader.load_schema(&json!(reference)).unwrap();
        let outcome = validator.validate(&fields(json!({}))).unwrap();
        assert!(outcome.errors().get("title").is_some(), "{reference}");
    }
}

#[test]
fn catalogue_entry_that_is_not_an_object_is_rejected() {
    let mut catalog = ObjectCatalog::new();
    catalog
        .register_value("news.schemas.LIST", json!(["a"]))
        .register_text("news.schemas.NUMBER", "42");
    let loader = ValidatorLoader::new(&catalog);

    for reference in ["news.schemas.LIST", "news.schemas.NUMBER"] {
        let err = loader.load_schema(&json!(reference)).unwrap_err();
        assert!(
            matches!(err, ConfigurationError::InvalidSchema { .. }),
            "{reference}: {err}"
        );
    }
}

#[test]
fn scalar_schema_declaration_is_rejected() {
    let catalog = ObjectCatalog::new();
    let loader = ValidatorLoader::new(&catalog);
    let err = loader.load_schema(&json!(12)).unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidSchema { .. }));
    assert!(err.to_string().contains("a path to a JSON file"));
}

#[test]
fn model_reference_loads_model_validator() {
    let mut catalog = ObjectCatalog::new();
    catalog.register_model::<Article>("news.models.Article");
    let loader = ValidatorLoader::new(&catalog);

    let validator = loader.load_model(&json!("news.models.Article")).unwrap();
    assert_eq!(validator.name(), "Model");
    assert!(!validator.validate(&fields(json!({}))).unwrap().is_ok());
}

#[test]
fn model_reference_to_non_model_is_rejected() {
    let mut catalog = ObjectCatalog::new();
    catalog.register_value("news.schemas.ARTICLE", title_schema());
    let loader = ValidatorLoader::new(&catalog);

    let err = loader.load_model(&json!("news.schemas.ARTICLE")).unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidModel { .. }));
}

#[test]
fn unknown_model_reference_is_unresolved() {
    let catalog = ObjectCatalog::new();
    let loader = ValidatorLoader::new(&catalog);
    let err = loader.load_model(&json!("news.models.Missing")).unwrap_err();
    assert!(matches!(err, ConfigurationError::UnresolvedReference { .. }));
}
