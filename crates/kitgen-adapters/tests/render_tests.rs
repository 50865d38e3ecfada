//! Full-pipeline tests: real templates, in-memory filesystem.

use std::path::Path;

use serde_json::json;

use kitgen_adapters::{MemoryFilesystem, SimpleRenderer};
use kitgen_core::application::{GenerateOptions, GenerateService, SpecBuilder};

fn service(fs: &MemoryFilesystem) -> GenerateService {
    GenerateService::new(Box::new(fs.clone()), Box::new(SimpleRenderer::new()), None)
}

#[test]
fn package_manifest_lists_baseline_plus_service_dependencies() {
    let fs = MemoryFilesystem::new();
    let spec = SpecBuilder::from_value(json!({
        "appType": "scaffold",
        "appName": "notes",
        "services": {"cloudant": [{"name": "db1"}, {"name": "db2"}]}
    }))
    .unwrap();

    service(&fs)
        .generate(&spec, &GenerateOptions::new("out"))
        .unwrap();

    let manifest = fs.file_content(Path::new("out/Package.swift")).unwrap();
    assert!(manifest.contains("https://github.com/Kitura/Kitura.git"));
    assert!(manifest.contains("https://github.com/Kitura/HeliumLogger.git"));
    // Two instances, one dependency line.
    assert_eq!(manifest.matches("Kitura-CouchDB").count(), 1);
    assert!(!manifest.contains("{{"));
}

#[test]
fn bootstrap_renders_one_initializer_per_instance() {
    let fs = MemoryFilesystem::new();
    let spec = SpecBuilder::from_value(json!({
        "appType": "scaffold",
        "appName": "notes",
        "services": {"cloudant": [{"name": "db1"}, {"name": "db2"}]}
    }))
    .unwrap();

    service(&fs)
        .generate(&spec, &GenerateOptions::new("out"))
        .unwrap();

    let bootstrap = fs
        .file_content(Path::new("out/Sources/Application/Application.swift"))
        .unwrap();
    assert_eq!(bootstrap.matches("import CouchDB").count(), 1);
    assert_eq!(bootstrap.matches("CouchDBClient(connectionProperties:").count(), 2);
    assert_eq!(
        bootstrap
            .matches("internal var couchDBClient: CouchDBClient?")
            .count(),
        1
    );
    assert!(bootstrap.contains("onPort: 8080"));
}

#[test]
fn cloud_target_renders_cloud_environment_wiring() {
    let fs = MemoryFilesystem::new();
    let spec = SpecBuilder::from_value(json!({
        "appType": "scaffold",
        "appName": "notes",
        "bluemix": true,
        "services": {"redis": [{"name": "cache"}]}
    }))
    .unwrap();

    service(&fs)
        .generate(&spec, &GenerateOptions::new("out"))
        .unwrap();

    let bootstrap = fs
        .file_content(Path::new("out/Sources/Application/Application.swift"))
        .unwrap();
    assert!(bootstrap.contains("import CloudEnvironment"));
    assert!(bootstrap.contains("let cloudEnv = CloudEnv()"));
    assert!(bootstrap.contains("getRedisCredentials(name: \"cache\")"));
    assert!(bootstrap.contains("onPort: cloudEnv.port"));

    let manifest = fs.file_content(Path::new("out/manifest.yml")).unwrap();
    assert!(manifest.contains("- name: notes"));
    assert!(manifest.contains("label: compose-for-redis"));
    assert!(manifest.contains("random-route: true"));
}

#[test]
fn crud_triads_render_with_derived_classnames() {
    let fs = MemoryFilesystem::new();
    let spec = SpecBuilder::from_value(json!({
        "appType": "crud",
        "appName": "todo",
        "models": [{
            "name": "my-model",
            "properties": {
                "title": {"type": "string", "required": true},
                "count": {"type": "number"}
            }
        }]
    }))
    .unwrap();

    service(&fs)
        .generate(&spec, &GenerateOptions::new("out"))
        .unwrap();

    let model = fs
        .file_content(Path::new("out/Sources/Application/Models/My_model.swift"))
        .unwrap();
    assert!(model.contains("public struct My_model"));
    assert!(model.contains("public var title: String"));
    assert!(model.contains("public var count: Double?"));
    assert!(model.contains("try values.double(\"count\")"));

    let adapter = fs
        .file_content(Path::new(
            "out/Sources/Application/Adapters/My_modelAdapter.swift",
        ))
        .unwrap();
    assert!(adapter.contains("public protocol My_modelAdapter"));
    assert!(adapter.contains("My_modelMemoryAdapter"));

    let helper = fs
        .file_content(Path::new("out/Sources/Application/Models/ModelValues.swift"))
        .unwrap();
    assert!(helper.contains("public typealias ModelValues"));

    let swagger = fs
        .file_content(Path::new("out/definitions/todo.json"))
        .unwrap();
    assert!(swagger.contains("\"my-model.create\""));
}

#[test]
fn rerun_preserves_create_once_files_and_refreshes_the_rest() {
    let fs = MemoryFilesystem::new();
    let spec = SpecBuilder::from_value(json!({
        "appType": "scaffold",
        "appName": "notes"
    }))
    .unwrap();

    let svc = service(&fs);
    svc.generate(&spec, &GenerateOptions::new("out")).unwrap();

    fs.seed("out/Package.swift", "// user pinned versions\n");
    fs.seed(
        "out/Sources/Application/Application.swift",
        "// stale bootstrap\n",
    );

    svc.generate(&spec, &GenerateOptions::new("out")).unwrap();

    assert_eq!(
        fs.file_content(Path::new("out/Package.swift")).unwrap(),
        "// user pinned versions\n"
    );
    let bootstrap = fs
        .file_content(Path::new("out/Sources/Application/Application.swift"))
        .unwrap();
    assert!(bootstrap.contains("import Kitura"));
}
