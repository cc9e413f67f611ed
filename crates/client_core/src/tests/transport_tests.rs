use super::*;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Default)]
struct MockStore {
    records: Vec<HospitalRecord>,
    next_id: u64,
    fail_with: Option<StatusCode>,
    requests: Vec<(String, Option<Value>)>,
}

#[derive(Clone, Default)]
struct MockState {
    store: Arc<Mutex<MockStore>>,
}

impl MockState {
    async fn seed(&self, records: Vec<HospitalRecord>) {
        let mut store = self.store.lock().await;
        store.next_id = records.len() as u64 + 1;
        store.records = records;
    }

    async fn fail_with(&self, status: StatusCode) {
        self.store.lock().await.fail_with = Some(status);
    }

    async fn requests(&self) -> Vec<(String, Option<Value>)> {
        self.store.lock().await.requests.clone()
    }
}

async fn list_hospitals(
    State(state): State<MockState>,
) -> Result<Json<Vec<HospitalRecord>>, StatusCode> {
    let mut store = state.store.lock().await;
    store.requests.push(("GET /hospitals".into(), None));
    if let Some(status) = store.fail_with {
        return Err(status);
    }
    Ok(Json(store.records.clone()))
}

async fn create_hospital(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<HospitalRecord>), StatusCode> {
    let mut store = state.store.lock().await;
    store
        .requests
        .push(("POST /hospitals".into(), Some(body.clone())));
    if let Some(status) = store.fail_with {
        return Err(status);
    }
    let id = match body.get("id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            let id = store.next_id;
            store.next_id += 1;
            id.to_string()
        }
    };
    let record = HospitalRecord::new(
        id,
        body["name"].as_str().unwrap_or_default(),
        body["address"].as_str().unwrap_or_default(),
    );
    store.records.push(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_hospital(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(body): Json<HospitalFields>,
) -> StatusCode {
    let mut store = state.store.lock().await;
    store.requests.push((
        format!("PUT /hospitals/{id}"),
        Some(json!({ "name": body.name, "address": body.address })),
    ));
    if let Some(status) = store.fail_with {
        return status;
    }
    match store.records.iter_mut().find(|r| r.id.as_str() == id) {
        Some(record) => {
            record.name = body.name;
            record.address = body.address;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_hospital(State(state): State<MockState>, Path(id): Path<String>) -> StatusCode {
    let mut store = state.store.lock().await;
    store.requests.push((format!("DELETE /hospitals/{id}"), None));
    if let Some(status) = store.fail_with {
        return status;
    }
    let before = store.records.len();
    store.records.retain(|r| r.id.as_str() != id);
    if store.records.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

fn hospital_routes(state: MockState) -> Router {
    Router::new()
        .route("/hospitals", get(list_hospitals).post(create_hospital))
        .route(
            "/hospitals/:id",
            put(update_hospital).delete(delete_hospital),
        )
        .with_state(state)
}

async fn spawn_hospital_server(prefix: Option<&str>) -> (String, MockState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = MockState::default();
    let app = match prefix {
        Some(prefix) => Router::new().nest(prefix, hospital_routes(state.clone())),
        None => hospital_routes(state.clone()),
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let base = match prefix {
        Some(prefix) => format!("http://{addr}{prefix}/"),
        None => format!("http://{addr}"),
    };
    (base, state)
}

fn client_for(base: &str) -> HttpHospitalApi {
    HttpHospitalApi::new(parse_base_url(base).expect("base url"))
}

#[tokio::test]
async fn list_returns_server_order() {
    let (base, state) = spawn_hospital_server(None).await;
    state
        .seed(vec![
            HospitalRecord::new("2", "B", "Y"),
            HospitalRecord::new("1", "A", "X"),
        ])
        .await;

    let hospitals = client_for(&base).list().await.expect("list");
    assert_eq!(
        hospitals,
        vec![
            HospitalRecord::new("2", "B", "Y"),
            HospitalRecord::new("1", "A", "X"),
        ]
    );
}

#[tokio::test]
async fn create_posts_fields_without_id() {
    let (base, state) = spawn_hospital_server(None).await;
    state.seed(vec![HospitalRecord::new("1", "A", "X")]).await;

    let created = client_for(&base)
        .create(&HospitalFields::new("B", "Y"))
        .await
        .expect("create");
    assert_eq!(created, HospitalRecord::new("2", "B", "Y"));

    let requests = state.requests().await;
    assert_eq!(
        requests,
        vec![(
            "POST /hospitals".to_string(),
            Some(json!({ "name": "B", "address": "Y" }))
        )]
    );
}

#[tokio::test]
async fn create_with_id_posts_client_id() {
    let (base, state) = spawn_hospital_server(None).await;

    client_for(&base)
        .create_with_id(&HospitalRecord::new("rs-9", "C", "Z"))
        .await
        .expect("create with id");

    let requests = state.requests().await;
    assert_eq!(
        requests[0].1,
        Some(json!({ "id": "rs-9", "name": "C", "address": "Z" }))
    );
}

#[tokio::test]
async fn update_and_delete_address_the_record() {
    let (base, state) = spawn_hospital_server(None).await;
    state
        .seed(vec![HospitalRecord::new("st mary", "A", "X")])
        .await;
    let client = client_for(&base);
    let id = HospitalId::new("st mary");

    client
        .update(&id, &HospitalFields::new("A2", "X2"))
        .await
        .expect("update");
    client.delete(&id).await.expect("delete");

    let requests = state.requests().await;
    assert_eq!(requests[0].0, "PUT /hospitals/st mary");
    assert_eq!(requests[0].1, Some(json!({ "name": "A2", "address": "X2" })));
    assert_eq!(requests[1].0, "DELETE /hospitals/st mary");
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let (base, state) = spawn_hospital_server(Some("/api")).await;
    state.seed(vec![HospitalRecord::new("1", "A", "X")]).await;

    let client = client_for(&base);
    assert_eq!(client.hospitals_url(None).path(), "/api/hospitals");
    assert_eq!(client.list().await.expect("list").len(), 1);
}

#[tokio::test]
async fn non_success_status_is_a_transport_failure() {
    let (base, state) = spawn_hospital_server(None).await;
    state.fail_with(StatusCode::UNPROCESSABLE_ENTITY).await;
    let client = client_for(&base);

    let failure = client
        .create(&HospitalFields::new("B", "Y"))
        .await
        .expect_err("must fail");
    assert_eq!(failure.operation, HospitalOperation::Create);
    assert!(failure.detail.contains("422"), "unexpected detail: {}", failure.detail);

    let failure = client
        .delete(&HospitalId::new("1"))
        .await
        .expect_err("must fail");
    assert_eq!(failure.operation, HospitalOperation::Delete);
}

#[tokio::test]
async fn missing_record_on_update_is_a_transport_failure() {
    let (base, _state) = spawn_hospital_server(None).await;

    let failure = client_for(&base)
        .update(&HospitalId::new("404"), &HospitalFields::new("A", "X"))
        .await
        .expect_err("must fail");
    assert_eq!(failure.operation, HospitalOperation::Update);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let failure = client_for(&format!("http://{addr}"))
        .list()
        .await
        .expect_err("must fail");
    assert_eq!(failure.operation, HospitalOperation::List);
    assert!(!failure.to_string().is_empty());
}

#[test]
fn settings_pick_the_matching_base_url() {
    let settings = Settings {
        api_url: "http://list-host:3001".into(),
        create_api_url: "http://create-host:3001".into(),
        request_timeout_secs: Some(3),
    };
    let list_client = HttpHospitalApi::from_settings(&settings).expect("list client");
    let create_client = HttpHospitalApi::for_create_form(&settings).expect("create client");

    assert_eq!(list_client.base_url().host_str(), Some("list-host"));
    assert_eq!(create_client.base_url().host_str(), Some("create-host"));
    assert!(HttpHospitalApi::from_settings(&Settings {
        api_url: "ftp://nope".into(),
        ..Settings::default()
    })
    .is_err());
}
