//! End-to-end tests for the relaydashd stack.
//!
//! Each test wires the real controller, the real REST schedule adapter and the
//! real axum router. The hub's REST API is a small axum stub bound to an
//! ephemeral port; hub events are injected through the controller handle.
//! Dashboard requests go through `tower::ServiceExt::oneshot`.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Method, Request, StatusCode, header};
use axum::routing::{get, post};
use http_body_util::BodyExt;
use relaydash_adapter_http_axum::router;
use relaydash_adapter_http_axum::state::AppState;
use relaydash_adapter_rest_reqwest::{RestConfig, RestScheduleApi};
use relaydash_app::controller::{Controller, ControllerConfig, DashboardHandle, DashboardSnapshot};
use relaydash_app::ports::{HubChannel, HubEvent, HubListener};
use relaydash_domain::device::{DeviceSet, DeviceState, RelayState};
use relaydash_domain::error::DashboardError;
use relaydash_domain::message::{InboundMessage, OutboundMessage};
use serde_json::{Value, json};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Stub hub
// ---------------------------------------------------------------------------

#[derive(Default)]
struct NullHub {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl HubChannel for NullHub {
    fn emit(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send {
        self.sent.lock().unwrap().push(message);
        async { Ok(()) }
    }
}

/// In-memory schedule store behind the hub's REST routes.
#[derive(Default)]
struct HubStore {
    schedules: Mutex<Vec<Value>>,
    next_id: Mutex<u64>,
    reject_mutations: bool,
}

type Store = Arc<HubStore>;

async fn list(State(store): State<Store>, Path(device): Path<String>) -> Json<Value> {
    let schedules = store.schedules.lock().unwrap();
    Json(Value::Array(
        schedules
            .iter()
            .filter(|s| s["device_name"] == device.as_str())
            .cloned()
            .collect(),
    ))
}

async fn create(State(store): State<Store>, Json(mut body): Json<Value>) -> Json<Value> {
    if store.reject_mutations {
        return Json(json!({"success": false}));
    }
    let mut next_id = store.next_id.lock().unwrap();
    *next_id += 1;
    body["id"] = json!(*next_id);
    store.schedules.lock().unwrap().push(body);
    Json(json!({"success": true}))
}

async fn update(
    State(store): State<Store>,
    Path(id): Path<u64>,
    Json(mut body): Json<Value>,
) -> Json<Value> {
    let mut schedules = store.schedules.lock().unwrap();
    let Some(existing) = schedules.iter_mut().find(|s| s["id"] == id) else {
        return Json(json!({"success": false}));
    };
    body["id"] = json!(id);
    *existing = body;
    Json(json!({"success": true}))
}

async fn delete(State(store): State<Store>, Path(id): Path<u64>) -> Json<Value> {
    if store.reject_mutations {
        return Json(json!({"success": false}));
    }
    store.schedules.lock().unwrap().retain(|s| s["id"] != id);
    Json(json!({"success": true}))
}

async fn serve_hub(store: Store) -> String {
    let app = axum::Router::new()
        .route("/api/schedules", post(create))
        .route(
            "/api/schedules/{key}",
            get(list).put(update).delete(delete),
        )
        .with_state(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    format!("http://{addr}")
}

async fn serve_failing_hub() -> String {
    let app = axum::Router::new()
        .route(
            "/api/schedules",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route("/api/schedules/{key}", get(|| async { Json(json!([])) }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

struct Stack {
    app: axum::Router,
    handle: DashboardHandle,
    hub: Arc<NullHub>,
}

fn stack(base_url: String) -> Stack {
    let hub = Arc::new(NullHub::default());
    let api = RestScheduleApi::new(&RestConfig {
        base_url,
        ..RestConfig::default()
    })
    .expect("valid base url");
    let (controller, handle) = Controller::new(Arc::clone(&hub), api, ControllerConfig::default());
    tokio::spawn(controller.run());
    let app = router::build(AppState::new(handle.clone(), 5));
    Stack { app, handle, hub }
}

impl Stack {
    async fn connect_lab(&self) {
        let devices: DeviceSet = [(
            "Lab",
            DeviceState {
                lamp: RelayState::Off,
                cooler: RelayState::On,
                connected: true,
            },
        )]
        .into_iter()
        .collect();
        self.handle.on_event(HubEvent::Connected {
            sid: Some("e2e".to_string()),
        });
        self.handle
            .on_event(HubEvent::Message(InboundMessage::Devices(devices)));
        self.wait_for(|s| s.dashboard.card("Lab").is_some()).await;
    }

    async fn wait_for(&self, mut predicate: impl FnMut(&DashboardSnapshot) -> bool) {
        let mut snapshots = self.handle.subscribe();
        tokio::time::timeout(
            Duration::from_secs(5),
            snapshots.wait_for(|snapshot| predicate(snapshot)),
        )
        .await
        .expect("snapshot condition not reached in time")
        .expect("controller stopped");
    }

    async fn wait_for_list_loaded(&self) {
        self.wait_for(|s| {
            s.panel
                .as_ref()
                .is_some_and(|panel| !panel.busy && panel.list.message() != Some("Carregando agendamentos..."))
        })
        .await;
    }

    async fn request(&self, method: Method, uri: &str, form: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder().method(method).uri(uri);
        if form.is_some() {
            request = request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        }
        let response = self
            .app
            .clone()
            .oneshot(
                request
                    .body(Body::from(form.unwrap_or_default().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn page(&self, uri: &str) -> String {
        let (status, body) = self.request(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}

// ---------------------------------------------------------------------------
// Health and dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let stack = stack(serve_hub(Store::default()).await);

    let (status, body) = stack.request(Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn should_render_devices_pushed_by_hub() {
    let stack = stack(serve_hub(Store::default()).await);
    stack.connect_lab().await;

    let body = stack.page("/").await;

    assert!(body.contains("Lab"));
    assert!(body.contains("Relé 1: Desligado"));
    assert!(body.contains("Relé 2: Ligado"));
    assert!(body.contains("Conectado ao Hub (SID: e2e)."));
}

#[tokio::test]
async fn should_emit_toggle_command_for_online_device() {
    let stack = stack(serve_hub(Store::default()).await);
    stack.connect_lab().await;

    let (status, _) = stack
        .request(Method::POST, "/devices/Lab/cooler/toggle", None)
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let sent = stack.hub.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].state(), RelayState::Off);
    assert!(stack.page("/").await.contains("Comando enviado: Lab"));
}

// ---------------------------------------------------------------------------
// Schedules against the REST stub
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_edit_and_delete_schedule_through_rest_hub() {
    let store = Store::default();
    let stack = stack(serve_hub(Arc::clone(&store)).await);
    stack.connect_lab().await;

    stack.request(Method::POST, "/schedules/open/Lab", None).await;
    stack.wait_for_list_loaded().await;
    assert!(stack.page("/schedules").await.contains("Nenhum agendamento encontrado."));

    // create
    let (status, _) = stack
        .request(
            Method::POST,
            "/schedules/submit",
            Some("target=lamp&state=on&time=07%3A30&day_mon=on&day_wed=on"),
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    stack
        .wait_for(|s| {
            s.panel
                .as_ref()
                .is_some_and(|panel| panel.list.items().len() == 1)
        })
        .await;
    let body = stack.page("/schedules").await;
    assert!(body.contains("Agendamento criado!"));
    assert!(body.contains("07:30 — ON"));
    assert!(body.contains("Repetir: MON, WED"));

    // edit
    stack.request(Method::POST, "/schedules/1/edit", None).await;
    stack
        .request(
            Method::POST,
            "/schedules/submit",
            Some("target=lamp&state=off&time=08%3A00&day_fri=on"),
        )
        .await;
    stack
        .wait_for(|s| {
            s.notices
                .iter()
                .any(|notice| notice.text == "Agendamento atualizado!")
        })
        .await;
    stack.wait_for_list_loaded().await;
    let body = stack.page("/schedules").await;
    assert!(body.contains("08:00 — OFF"));
    assert!(body.contains("Adicionar Agendamento"));
    assert_eq!(store.schedules.lock().unwrap()[0]["days"], json!(["fri"]));

    // delete
    stack.request(Method::POST, "/schedules/1/delete", None).await;
    stack
        .request(Method::POST, "/schedules/delete/confirm", None)
        .await;
    stack
        .wait_for(|s| {
            s.panel
                .as_ref()
                .is_some_and(|panel| panel.list.message() == Some("Nenhum agendamento encontrado."))
        })
        .await;
    assert!(store.schedules.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_show_connection_error_when_rest_hub_fails() {
    let stack = stack(serve_failing_hub().await);
    stack.connect_lab().await;
    stack.request(Method::POST, "/schedules/open/Lab", None).await;
    stack.wait_for_list_loaded().await;

    stack
        .request(
            Method::POST,
            "/schedules/submit",
            Some("target=cooler&state=on&time=12%3A00&day_sun=on"),
        )
        .await;
    stack
        .wait_for(|s| s.notices.iter().any(|n| n.is_error()))
        .await;

    assert!(stack.page("/schedules").await.contains("Erro de conexão com servidor."));
}

#[tokio::test]
async fn should_show_generic_error_when_hub_rejects_mutation() {
    let store = Arc::new(HubStore {
        reject_mutations: true,
        ..HubStore::default()
    });
    let stack = stack(serve_hub(store).await);
    stack.connect_lab().await;
    stack.request(Method::POST, "/schedules/open/Lab", None).await;
    stack.wait_for_list_loaded().await;

    stack
        .request(
            Method::POST,
            "/schedules/submit",
            Some("target=lamp&state=on&time=06%3A00&day_tue=on"),
        )
        .await;
    stack
        .wait_for(|s| s.notices.iter().any(|n| n.is_error()))
        .await;

    assert!(stack.page("/schedules").await.contains("Erro ao criar."));
}

#[tokio::test]
async fn should_mark_list_failed_when_rest_hub_unreachable() {
    let stack = stack("http://127.0.0.1:1".to_string());
    stack.connect_lab().await;

    stack.request(Method::POST, "/schedules/open/Lab", None).await;
    stack.wait_for_list_loaded().await;

    assert!(stack.page("/schedules").await.contains("Erro ao carregar agendamentos."));
}
