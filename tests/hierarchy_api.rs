use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use structra_catalog::config::AppConfig;
use structra_catalog::store::traits::{BusinessFunctionStore, CompanyStore, ErpSystemStore};
use structra_catalog::store::MemoryStore;
use structra_catalog::{
    build_app, seed, BusinessFunction, Id, NewBusinessFunction, NewCompany, NewErpSystem,
};
use tokio::net::TcpListener;

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn put(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .put(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    async fn delete(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .delete(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}

/// Serve the API over an in-memory store on an ephemeral port
async fn spawn_app() -> (TestClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    seed::seed_artifact_types(&*store).await.unwrap();

    let app = build_app(store.clone(), &AppConfig::default()).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (TestClient::new(format!("http://{}", addr)), store)
}

async fn json_body(resp: reqwest::Response) -> Value {
    resp.json::<Value>().await.unwrap()
}

async fn create_client(api: &TestClient, code: &str, name: &str) -> Id {
    let resp = api
        .post("/api/clients", json!({"code": code, "name": name}))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await["data"]["id"].as_i64().unwrap() as Id
}

/// Company, ERP system and one business function under `client_id`
async fn build_branch(store: &MemoryStore, client_id: Id, function_name: &str) -> BusinessFunction {
    let company = store
        .create_company(
            NewCompany {
                client_id,
                code: "CO1".to_string(),
                name: "Acme EU".to_string(),
                description: None,
                location: Some("Berlin".to_string()),
            },
            None,
        )
        .await
        .unwrap();
    let erp = store
        .create_erp_system(
            NewErpSystem {
                company_id: company.id,
                code: "ERP1".to_string(),
                name: "SAP".to_string(),
                description: None,
                vendor: Some("SAP".to_string()),
                version: None,
                environment: Some("production".to_string()),
            },
            None,
        )
        .await
        .unwrap();
    store
        .create_business_function(
            NewBusinessFunction {
                erp_id: erp.id,
                code: "BF1".to_string(),
                name: function_name.to_string(),
                description: None,
                icon: None,
            },
            None,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let (api, _store) = spawn_app().await;

    let resp = api.get("/api/health").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Structra API is running");

    let resp = api.get("/api/nowhere").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(resp).await,
        json!({"success": false, "message": "Route not found"})
    );
}

#[tokio::test]
async fn test_client_hierarchy_counts_diagrams() {
    let (api, store) = spawn_app().await;
    let client_id = create_client(&api, "C1", "Acme").await;
    let finance = build_branch(&store, client_id, "Finance").await;

    for name in ["Customer Order Model", "Financial Transactions"] {
        let resp = api
            .post(
                &format!("/api/diagrams/function/{}", finance.id),
                json!({"name": name}),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = api
        .get(&format!("/api/hierarchy/clients/{}", client_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);

    let tree = &body["data"];
    assert_eq!(tree["code"], "C1");
    let company = &tree["companies"][0];
    assert_eq!(company["location"], "Berlin");
    let erp = &company["erpSystems"][0];
    assert_eq!(erp["vendor"], "SAP");
    let function = &erp["businessFunctions"][0];
    assert_eq!(function["name"], "Finance");
    assert_eq!(
        function["artifacts"],
        json!({
            "diagrams": {"count": 2},
            "models": {"count": 0},
            "mappings": {"count": 0},
            "validations": {"count": 0},
            "documentation": {"count": 0},
            "businessMetadata": {"count": 0}
        })
    );
}

#[tokio::test]
async fn test_unknown_client_hierarchy_is_not_found() {
    let (api, _store) = spawn_app().await;

    let resp = api.get("/api/hierarchy/clients/4242").await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(resp).await,
        json!({"success": false, "message": "Client not found"})
    );
}

#[tokio::test]
async fn test_clients_with_companies_listing() {
    let (api, store) = spawn_app().await;
    let zeta = create_client(&api, "Z", "Zeta").await;
    create_client(&api, "A", "Alpha").await;
    build_branch(&store, zeta, "Sales").await;

    let resp = api.get("/api/hierarchy/clients").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;

    let clients = body["data"]["clients"].as_array().unwrap();
    let names: Vec<&str> = clients.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
    assert_eq!(clients[0]["companies"], json!([]));
    assert_eq!(clients[1]["companies"][0]["name"], "Acme EU");
    assert!(clients[1]["companies"][0].get("erpSystems").is_none());
}

#[tokio::test]
async fn test_client_lifecycle() {
    let (api, _store) = spawn_app().await;

    let resp = api
        .post("/api/clients", json!({"code": "C1"}))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["message"], "Code and name are required");

    let id = create_client(&api, "C1", "Acme").await;
    let resp = api
        .post("/api/clients", json!({"code": "C1", "name": "Other"}))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(resp).await["message"],
        "Client with this code already exists"
    );

    let resp = api
        .put(
            &format!("/api/clients/{}", id),
            json!({"code": "C1", "name": "Acme Group", "description": "Renamed"}),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["data"]["name"], "Acme Group");

    let body = json_body(api.get("/api/clients").await.unwrap()).await;
    assert_eq!(body["data"][0]["company_count"], 0);

    let resp = api.delete(&format!("/api/clients/{}", id)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["message"], "Client deleted successfully");

    let resp = api.get(&format!("/api/clients/{}", id)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_diagram_lifecycle() {
    let (api, store) = spawn_app().await;
    let client_id = create_client(&api, "C1", "Acme").await;
    let function = build_branch(&store, client_id, "Finance").await;

    let resp = api
        .post(
            &format!("/api/diagrams/function/{}", function.id),
            json!({"description": "no name"}),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = api
        .post("/api/diagrams/function/9999", json!({"name": "Orphan"}))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = api
        .post(
            &format!("/api/diagrams/function/{}", function.id),
            json!({"name": "Canvas"}),
        )
        .await
        .unwrap();
    let created = json_body(resp).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["content"], json!({}));

    let resp = api
        .put(
            &format!("/api/diagrams/{}/content", id),
            json!({"nodes": [{"id": "1", "type": "entity"}]}),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = api
        .put(
            &format!("/api/diagrams/{}/content", id),
            json!({"nodes": [{"id": "1", "type": "entity"}], "edges": []}),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(api.get(&format!("/api/diagrams/{}", id)).await.unwrap()).await;
    assert_eq!(body["data"]["function_name"], "Finance");
    assert_eq!(body["data"]["content"]["nodes"][0]["type"], "entity");

    let listed = json_body(
        api.get(&format!("/api/diagrams/function/{}", function.id))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let resp = api.delete(&format!("/api/diagrams/{}", id)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = api.delete(&format!("/api/diagrams/{}", id)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_client_removes_subtree() {
    let (api, store) = spawn_app().await;
    let client_id = create_client(&api, "C1", "Acme").await;
    let function = build_branch(&store, client_id, "Finance").await;

    api.delete(&format!("/api/clients/{}", client_id))
        .await
        .unwrap();

    assert!(store.get_business_function(function.id).await.unwrap().is_none());
    assert!(store.list_companies(client_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_failure_is_reported_without_partial_tree() {
    let (api, store) = spawn_app().await;
    let client_id = create_client(&api, "C1", "Acme").await;
    build_branch(&store, client_id, "Finance").await;

    // client, companies and ERP systems load; business functions do not
    store.fail_reads_after(3);
    let resp = api
        .get(&format!("/api/hierarchy/clients/{}", client_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(resp).await,
        json!({"success": false, "message": "Error fetching hierarchy"})
    );

    store.fail_reads_after(0);
    let resp = api.get("/api/hierarchy/clients").await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(resp).await,
        json!({"success": false, "message": "Error fetching clients"})
    );

    store.restore_reads();
    let resp = api
        .get(&format!("/api/hierarchy/clients/{}", client_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_requests_use_envelope() {
    let (api, _store) = spawn_app().await;

    let resp = api.get("/api/hierarchy/clients/abc").await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("abc"));

    let resp = api
        .client
        .post(&format!("{}/api/clients", api.base_url))
        .header("content-type", "application/json")
        .body("{\"code\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["success"], false);
}
