//! Built-in template text for every generated file.
//!
//! Templates contain `{{VAR}}` placeholders and nothing else: no loops, no
//! conditionals. The Composition Engine resolves every decision into flat
//! substitution values before rendering.

use kitgen_core::application::composer::TemplateId;

/// Template text for a template id.
pub fn template_text(id: TemplateId) -> &'static str {
    match id {
        TemplateId::Bootstrap => BOOTSTRAP,
        TemplateId::Main => MAIN,
        TemplateId::PackageManifest => PACKAGE_MANIFEST,
        TemplateId::DeploymentManifest => DEPLOYMENT_MANIFEST,
        TemplateId::PipelineConfig => PIPELINE,
        TemplateId::ToolchainConfig => TOOLCHAIN,
        TemplateId::Dockerfile => DOCKERFILE,
        TemplateId::DockerfileTools => DOCKERFILE_TOOLS,
        TemplateId::DockerIgnore => DOCKER_IGNORE,
        TemplateId::CliConfig => CLI_CONFIG,
        TemplateId::WebIndex => WEB_INDEX,
        TemplateId::SwaggerRoutes => SWAGGER_ROUTES,
        TemplateId::SwaggerDefinition => SWAGGER_DEFINITION,
        TemplateId::ProductRoutes => PRODUCT_ROUTES,
        TemplateId::CrudModel => CRUD_MODEL,
        TemplateId::CrudAdapterMemory => CRUD_ADAPTER_MEMORY,
        TemplateId::CrudAdapterCloudant => CRUD_ADAPTER_CLOUDANT,
        TemplateId::CrudRoutes => CRUD_ROUTES,
        TemplateId::CrudValues => MODEL_VALUES,
        TemplateId::ProjectMarker => PROJECT_MARKER,
        TemplateId::SpecSnapshot => SPEC_SNAPSHOT,
    }
}

const BOOTSTRAP: &str = r#"import Foundation
import Kitura
import LoggerAPI
import HeliumLogger
{{IMPORTS}}

public class App {
    let router = Router()

{{SERVICE_VARIABLES}}

    public init() throws {
        HeliumLogger.use(LoggerMessageType.info)
    }

    func postInit() throws {
{{SERVICE_INITIALIZERS}}
{{CAPABILITY_INITIALIZERS}}
{{MIDDLEWARE_REGISTRATIONS}}
{{ENDPOINT_REGISTRATIONS}}
    }

    public func run() throws {
        try postInit()
        Kitura.addHTTPServer(onPort: {{PORT}}, with: router)
        Kitura.run()
    }
}
"#;

const MAIN: &str = r#"import Foundation
import LoggerAPI
import HeliumLogger
import Application

do {
    HeliumLogger.use(LoggerMessageType.info)
    let app = try App()
    try app.run()
} catch let error {
    Log.error(error.localizedDescription)
}
"#;

const PACKAGE_MANIFEST: &str = r#"// swift-tools-version:5.0
import PackageDescription

let package = Package(
    name: "{{APP_NAME}}",
    dependencies: [
{{PACKAGE_DEPENDENCIES}}
    ],
    targets: [
        .target(name: "{{APP_NAME}}", dependencies: [.target(name: "Application")]),
        .target(name: "Application", dependencies: []),
    ]
)
"#;

const DEPLOYMENT_MANIFEST: &str = r#"applications:
- name: {{CLOUD_NAME}}
  memory: {{MEMORY}}
  disk_quota: {{DISK_QUOTA}}
  instances: {{INSTANCES}}
  command: {{APP_NAME}}
{{ROUTE}}
  services:
{{SERVICE_NAMES}}
declared-services:
{{DECLARED_SERVICES}}
"#;

const PIPELINE: &str = r#"---
stages:
- name: Build Stage
  inputs:
  - type: git
    branch: master
  jobs:
  - name: Build
    type: builder
    build_type: shell
    script: |
      #!/bin/bash
      swift build
- name: Deploy Stage
  inputs:
  - type: job
    stage: Build Stage
    job: Build
  jobs:
  - name: Deploy
    type: deployer
    script: |
      #!/bin/bash
      cf push "{{APP_NAME}}"
"#;

const TOOLCHAIN: &str = r#"version: 1
name: "{{APP_NAME}}"
description: "Continuous delivery toolchain for {{APP_NAME}}"
services:
  repo:
    service_id: hostedgit
  build:
    service_id: pipeline
    parameters:
      name: "{{APP_NAME}}"
      configuration:
        content:
          $ref: pipeline.yml
"#;

const DOCKERFILE: &str = r#"FROM swift:5.0
LABEL maintainer="{{APP_NAME}}"

WORKDIR /swift-project
COPY . /swift-project

RUN swift build -c release

CMD [ ".build/release/{{APP_NAME}}" ]
"#;

const DOCKERFILE_TOOLS: &str = r#"FROM swift:5.0
LABEL maintainer="{{APP_NAME}}"

WORKDIR /swift-project
COPY . /swift-project

CMD [ "swift", "build" ]
"#;

const DOCKER_IGNORE: &str = r#".build/
.git/
definitions/
"#;

const CLI_CONFIG: &str = r#"container-name-run: "{{APP_NAME}}-swift-run"
container-name-tools: "{{APP_NAME}}-swift-tools"
image-name-run: "{{APP_NAME}}-swift-run"
image-name-tools: "{{APP_NAME}}-swift-tools"
dockerfile-run: "Dockerfile"
dockerfile-tools: "Dockerfile-tools"
build-cmd-run: "swift build -c release"
build-cmd-tools: "swift build"
"#;

const WEB_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{{APP_NAME}}</title>
</head>
<body>
    <h1>{{APP_NAME}}</h1>
    <p>Your server is up and running.</p>
</body>
</html>
"#;

const SWAGGER_ROUTES: &str = r#"import Foundation
import Kitura
import LoggerAPI

func initializeSwaggerRoutes(app: App) {
    app.router.get("/swagger/api") { _, response, next in
        response.headers["Content-Type"] = "application/json"
        try response.send(fileName: "definitions/{{APP_NAME}}.json")
        next()
    }
}
"#;

const SWAGGER_DEFINITION: &str = "{{SWAGGER_JSON}}\n";

const PRODUCT_ROUTES: &str = r#"import Foundation
import Kitura
import LoggerAPI

func initializeProductRoutes(app: App) {
    app.router.get("/products") { _, response, next in
        response.send(json: [:])
        next()
    }

    app.router.get("/products/:id") { request, response, next in
        guard let id = request.parameters["id"] else {
            response.status(.badRequest)
            return next()
        }
        response.send(json: ["id": id])
        next()
    }
}
"#;

const CRUD_MODEL: &str = r#"import Foundation

public struct {{CLASS_NAME}} {
{{PROPERTY_DECLARATIONS}}

    public init(values: ModelValues) throws {
{{PROPERTY_EXTRACTIONS}}
    }
}
"#;

const CRUD_ADAPTER_MEMORY: &str = r#"import Foundation

public protocol {{CLASS_NAME}}Adapter {
    func findAll(onCompletion: @escaping ([{{CLASS_NAME}}], Error?) -> Void)
    func findOne(id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void)
    func create(model: {{CLASS_NAME}}, id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void)
    func update(model: {{CLASS_NAME}}, id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void)
    func delete(id: String, onCompletion: @escaping (Error?) -> Void)
    func deleteAll(onCompletion: @escaping (Error?) -> Void)
}

public class {{CLASS_NAME}}MemoryAdapter: {{CLASS_NAME}}Adapter {
    var items: [String: {{CLASS_NAME}}] = [:]

    public func findAll(onCompletion: @escaping ([{{CLASS_NAME}}], Error?) -> Void) {
        onCompletion(Array(items.values), nil)
    }

    public func findOne(id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void) {
        onCompletion(items[id], nil)
    }

    public func create(model: {{CLASS_NAME}}, id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void) {
        items[id] = model
        onCompletion(model, nil)
    }

    public func update(model: {{CLASS_NAME}}, id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void) {
        items[id] = model
        onCompletion(model, nil)
    }

    public func delete(id: String, onCompletion: @escaping (Error?) -> Void) {
        items[id] = nil
        onCompletion(nil)
    }

    public func deleteAll(onCompletion: @escaping (Error?) -> Void) {
        items.removeAll()
        onCompletion(nil)
    }
}
"#;

const CRUD_ADAPTER_CLOUDANT: &str = r#"import Foundation
import CouchDB

public protocol {{CLASS_NAME}}Adapter {
    func findAll(onCompletion: @escaping ([{{CLASS_NAME}}], Error?) -> Void)
    func findOne(id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void)
    func create(model: {{CLASS_NAME}}, id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void)
    func update(model: {{CLASS_NAME}}, id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void)
    func delete(id: String, onCompletion: @escaping (Error?) -> Void)
    func deleteAll(onCompletion: @escaping (Error?) -> Void)
}

public class {{CLASS_NAME}}CloudantAdapter: {{CLASS_NAME}}Adapter {
    let client: CouchDBClient
    let databaseName = "{{SERVICE_NAME}}"

    public init(client: CouchDBClient) {
        self.client = client
    }

    public func findAll(onCompletion: @escaping ([{{CLASS_NAME}}], Error?) -> Void) {
        client.retrieveDB(databaseName) { database, _ in
            database?.retrieveAll(includeDocuments: true) { documents, error in
                onCompletion(documents?.decodeDocuments(ofType: {{CLASS_NAME}}.self) ?? [], error)
            }
        }
    }

    public func findOne(id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void) {
        client.retrieveDB(databaseName) { database, _ in
            database?.retrieve(id) { (document: {{CLASS_NAME}}?, error) in
                onCompletion(document, error)
            }
        }
    }

    public func create(model: {{CLASS_NAME}}, id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void) {
        client.retrieveDB(databaseName) { database, _ in
            database?.create(model) { _, _, error in
                onCompletion(model, error)
            }
        }
    }

    public func update(model: {{CLASS_NAME}}, id: String, onCompletion: @escaping ({{CLASS_NAME}}?, Error?) -> Void) {
        client.retrieveDB(databaseName) { database, _ in
            database?.update(id, document: model) { _, _, error in
                onCompletion(model, error)
            }
        }
    }

    public func delete(id: String, onCompletion: @escaping (Error?) -> Void) {
        client.retrieveDB(databaseName) { database, _ in
            database?.deleteDoc(id) { error in
                onCompletion(error)
            }
        }
    }

    public func deleteAll(onCompletion: @escaping (Error?) -> Void) {
        client.deleteDB(databaseName) { error in
            onCompletion(error)
        }
    }
}
"#;

const CRUD_ROUTES: &str = r#"import Foundation
import Kitura
import LoggerAPI

func initialize{{CLASS_NAME}}Routes(app: App) {
    app.router.get("/api/{{PLURAL}}") { _, response, next in
        response.send(json: [:])
        next()
    }

    app.router.post("/api/{{PLURAL}}") { _, response, next in
        response.status(.created)
        next()
    }

    app.router.get("/api/{{PLURAL}}/:id") { request, response, next in
        guard let id = request.parameters["id"] else {
            response.status(.badRequest)
            return next()
        }
        response.send(json: ["id": id])
        next()
    }

    app.router.delete("/api/{{PLURAL}}") { _, response, next in
        response.status(.noContent)
        next()
    }
}
"#;

const MODEL_VALUES: &str = r#"import Foundation

/// Loosely typed payload decoded from a request body.
public typealias ModelValues = [String: Any]

public enum ModelValuesError: Error {
    case missingProperty(String)
    case typeMismatch(String)
}

extension Dictionary where Key == String, Value == Any {
    public func string(_ key: String) throws -> String {
        guard let raw = self[key] else { throw ModelValuesError.missingProperty(key) }
        guard let value = raw as? String else { throw ModelValuesError.typeMismatch(key) }
        return value
    }

    public func double(_ key: String) throws -> Double {
        guard let raw = self[key] else { throw ModelValuesError.missingProperty(key) }
        guard let value = raw as? Double else { throw ModelValuesError.typeMismatch(key) }
        return value
    }

    public func bool(_ key: String) throws -> Bool {
        guard let raw = self[key] else { throw ModelValuesError.missingProperty(key) }
        guard let value = raw as? Bool else { throw ModelValuesError.typeMismatch(key) }
        return value
    }

    public func object(_ key: String) throws -> [String: Any] {
        guard let raw = self[key] else { throw ModelValuesError.missingProperty(key) }
        guard let value = raw as? [String: Any] else { throw ModelValuesError.typeMismatch(key) }
        return value
    }

    public func arrayObject(_ key: String) throws -> [Any] {
        guard let raw = self[key] else { throw ModelValuesError.missingProperty(key) }
        guard let value = raw as? [Any] else { throw ModelValuesError.typeMismatch(key) }
        return value
    }
}
"#;

const PROJECT_MARKER: &str = r#"generator: kitgen
version: {{GENERATOR_VERSION}}
"#;

const SPEC_SNAPSHOT: &str = "{{SPEC_JSON}}\n";
