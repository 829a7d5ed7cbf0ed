use crate::{
    api::{DeleteOptions, GetOptions, ListOptions, MachineSetsGetter, PatchType, WatchEvent},
    core::{MachineSet, MachineSetSpec, MachineSetStatus},
    Client, Error, ResourceExt,
};
use anyhow::Result;
use clusteroperator_client::client::Body;
use futures::TryStreamExt;
use http::{Method, Request, Response, StatusCode};
use serde_json::{json, Value};

const ROOT: &str = "/apis/clusteroperator.openshift.io/v1alpha1/namespaces/ops/machinesets";

fn machineset(name: &str, rv: &str) -> MachineSet {
    let mut ms = MachineSet::new(name, MachineSetSpec {
        size: 2,
        ..MachineSetSpec::default()
    });
    ms.metadata.namespace = Some("ops".into());
    ms.metadata.resource_version = Some(rv.into());
    ms
}

#[tokio::test]
async fn create_then_get_returns_named_object() {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::CreateThenGet);

    let api = client.machine_sets("ops");
    let created = api
        .create(&MachineSet::new("ms-1", MachineSetSpec::default()))
        .await
        .unwrap();
    assert_eq!(created.name_any(), "ms-1");
    assert_eq!(created.namespace().as_deref(), Some("ops"));
    let fetched = api.get("ms-1", &GetOptions::default()).await.unwrap();
    assert_eq!(fetched.name_any(), "ms-1");
    assert_eq!(fetched.resource_version(), created.resource_version());
    timeout_after_1s(mocksrv).await;
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::DeleteThenGet);

    let api = client.machine_sets("ops");
    api.delete("ms-1", &DeleteOptions::default()).await.unwrap();
    let err = api.get("ms-1", &GetOptions::default()).await.unwrap_err();
    match &err {
        Error::Api(ae) => {
            assert_eq!(ae.code, 404);
            assert_eq!(ae.reason, "NotFound");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(!err.is_transport());
    timeout_after_1s(mocksrv).await;
}

#[tokio::test]
async fn get_then_update_target_same_instance() {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::GetThenUpdate);

    let api = client.machine_sets("ops");
    let mut ms = api.get("ms-1", &GetOptions::at("7")).await.unwrap();
    ms.spec.size = 5;
    let updated = api.update(&ms).await.unwrap();
    assert_eq!(updated.spec.size, 5);
    assert_eq!(updated.resource_version().as_deref(), Some("8"));
    timeout_after_1s(mocksrv).await;
}

#[tokio::test]
async fn update_status_only_adds_status_segment() {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::UpdateThenUpdateStatus);

    let api = client.machine_sets("ops");
    let mut ms = machineset("ms-1", "3");
    api.update(&ms).await.unwrap();
    ms.status = Some(MachineSetStatus {
        replicas: 2,
        ready_replicas: 1,
        observed_generation: Some(1),
    });
    let updated = api.update_status(&ms).await.unwrap();
    assert_eq!(updated.status.map(|s| s.ready_replicas), Some(1));
    timeout_after_1s(mocksrv).await;
}

#[tokio::test]
async fn watch_forces_watch_flag() {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::Watch);

    let api = client.machine_sets("ops");
    let lo = ListOptions::default().labels("tier=compute");
    let events: Vec<_> = api.watch(&lo).await.unwrap().try_collect().await.unwrap();
    assert!(!lo.watch, "caller options were mutated");
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], WatchEvent::Added(ms) if ms.name_any() == "ms-1"));
    assert!(matches!(&events[1], WatchEvent::Modified(ms) if ms.spec.size == 3));
    assert!(matches!(&events[2], WatchEvent::Deleted(_)));
    timeout_after_1s(mocksrv).await;
}

#[tokio::test]
async fn watch_rejected_before_streaming() {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::WatchForbidden);

    let api = client.machine_sets("ops");
    let err = api.watch(&ListOptions::default()).await.err().unwrap();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    timeout_after_1s(mocksrv).await;
}

#[tokio::test]
async fn delete_collection_keeps_query_and_body_apart() {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::DeleteCollectionTwice);

    let api = client.machine_sets("ops");
    let lo = ListOptions::default().labels("tier=compute");
    api.delete_collection(&DeleteOptions::orphan(), &lo).await.unwrap();
    let lo = ListOptions::default().fields("metadata.name=ms-1");
    api.delete_collection(&DeleteOptions::default().grace_period(0), &lo)
        .await
        .unwrap();
    timeout_after_1s(mocksrv).await;
}

#[tokio::test]
async fn patch_appends_subresource_segments() {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::PatchBaseThenStatus);

    let api = client.machine_sets("ops");
    let body = serde_json::to_vec(&json!({"spec": {"size": 4}})).unwrap();
    let ms = api.patch("ms-1", PatchType::Merge, body, &[]).await.unwrap();
    assert_eq!(ms.spec.size, 4);
    let body = serde_json::to_vec(&json!({"status": {"replicas": 4}})).unwrap();
    let ms = api
        .patch("ms-1", PatchType::StrategicMerge, body, &["status"])
        .await
        .unwrap();
    assert_eq!(ms.status.map(|s| s.replicas), Some(4));
    timeout_after_1s(mocksrv).await;
}

#[tokio::test]
async fn server_errors_surface_verbatim() {
    let (client, fakeserver) = testcontext();
    let mocksrv = fakeserver.run(Scenario::Conflict);

    let api = client.machine_sets("ops");
    let err = api.update(&machineset("ms-1", "1")).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    match err {
        Error::Api(ae) => assert!(ae.message.contains("the object has been modified")),
        other => panic!("unexpected error {other:?}"),
    }
    timeout_after_1s(mocksrv).await;
}

// ------------------------------------------------------------------------
// mock test setup cruft
// ------------------------------------------------------------------------

// We wrap tower_test::mock::Handle
type ApiServerHandle = tower_test::mock::Handle<Request<Body>, Response<Body>>;
struct ApiServerVerifier {
    handle: ApiServerHandle,
    // last object the fake server accepted
    stored: Option<MachineSet>,
}

async fn timeout_after_1s(handle: tokio::task::JoinHandle<()>) {
    tokio::time::timeout(std::time::Duration::from_secs(1), handle)
        .await
        .expect("timeout on mock apiserver")
        .expect("scenario succeeded")
}

/// Scenarios we test for in ApiServerVerifier above
enum Scenario {
    CreateThenGet,
    DeleteThenGet,
    GetThenUpdate,
    UpdateThenUpdateStatus,
    Watch,
    WatchForbidden,
    DeleteCollectionTwice,
    PatchBaseThenStatus,
    Conflict,
}

impl ApiServerVerifier {
    /// Tests only get to run specific scenarios that has matching handlers
    ///
    /// NB: If the test is causing more calls than we are handling in the scenario,
    /// you then typically see a `Service(Closed(()))` error from the test.
    ///
    /// You should await the `JoinHandle` (with a timeout) from this function to ensure that the
    /// scenario runs to completion (i.e. all expected calls were responded to),
    /// using the timeout to catch missing api calls.
    fn run(self, scenario: Scenario) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            // moving self => one scenario per test
            self.play(scenario).await.expect("scenario completed without errors");
        })
    }

    async fn play(self, scenario: Scenario) -> Result<Self> {
        match scenario {
            Scenario::CreateThenGet => self.handle_create().await?.handle_get_stored().await,
            Scenario::DeleteThenGet => self.handle_delete().await?.handle_get_not_found().await,
            Scenario::GetThenUpdate => self.handle_get_at_version().await?.handle_update().await,
            Scenario::UpdateThenUpdateStatus => {
                self.handle_update().await?.handle_update_status().await
            }
            Scenario::Watch => self.handle_watch().await,
            Scenario::WatchForbidden => self.handle_watch_forbidden().await,
            Scenario::DeleteCollectionTwice => self.handle_delete_collections().await,
            Scenario::PatchBaseThenStatus => self.handle_patches().await,
            Scenario::Conflict => self.handle_conflict().await,
        }
    }

    async fn next(&mut self) -> (Request<Body>, tower_test::mock::SendResponse<Response<Body>>) {
        self.handle.next_request().await.expect("service not called")
    }

    async fn handle_create(mut self) -> Result<Self> {
        let (request, send) = self.next().await;
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri().to_string(), ROOT);
        assert_eq!(request.headers()[http::header::CONTENT_TYPE], "application/json");
        assert!(request.extensions().get::<&'static str>().is_some_and(|op| *op == "create"));

        let bytes = request.into_body().collect_bytes().await?;
        let mut ms: MachineSet = serde_json::from_slice(&bytes)?;
        assert_eq!(ms.name_any(), "ms-1");
        ms.metadata.namespace = Some("ops".into());
        ms.metadata.resource_version = Some("1".into());
        send.send_response(json_response(StatusCode::CREATED, &ms));
        self.stored = Some(ms);
        Ok(self)
    }

    async fn handle_get_stored(mut self) -> Result<Self> {
        let (request, send) = self.next().await;
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().to_string(), format!("{ROOT}/ms-1"));
        let ms = self.stored.clone().expect("object was created first");
        send.send_response(json_response(StatusCode::OK, &ms));
        Ok(self)
    }

    async fn handle_get_at_version(mut self) -> Result<Self> {
        let (request, send) = self.next().await;
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().to_string(), format!("{ROOT}/ms-1?resourceVersion=7"));
        send.send_response(json_response(StatusCode::OK, &machineset("ms-1", "7")));
        Ok(self)
    }

    async fn handle_get_not_found(mut self) -> Result<Self> {
        let (request, send) = self.next().await;
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().to_string(), format!("{ROOT}/ms-1"));
        let status = json!({
            "kind": "Status",
            "apiVersion": "v1",
            "status": "Failure",
            "message": "machinesets.clusteroperator.openshift.io \"ms-1\" not found",
            "reason": "NotFound",
            "details": { "name": "ms-1", "group": "clusteroperator.openshift.io", "kind": "machinesets" },
            "code": 404
        });
        send.send_response(json_response(StatusCode::NOT_FOUND, &status));
        Ok(self)
    }

    async fn handle_delete(mut self) -> Result<Self> {
        let (request, send) = self.next().await;
        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.uri().to_string(), format!("{ROOT}/ms-1"));
        let bytes = request.into_body().collect_bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body, json!({}));
        let status = json!({
            "kind": "Status",
            "apiVersion": "v1",
            "status": "Success",
            "details": { "name": "ms-1", "group": "clusteroperator.openshift.io", "kind": "machinesets" }
        });
        send.send_response(json_response(StatusCode::OK, &status));
        Ok(self)
    }

    async fn handle_update(mut self) -> Result<Self> {
        let (request, send) = self.next().await;
        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.uri().to_string(), format!("{ROOT}/ms-1"));
        let bytes = request.into_body().collect_bytes().await?;
        let mut ms: MachineSet = serde_json::from_slice(&bytes)?;
        assert_eq!(ms.name_any(), "ms-1");
        let rv: u64 = ms.resource_version().expect("update carries a version").parse()?;
        ms.metadata.resource_version = Some((rv + 1).to_string());
        send.send_response(json_response(StatusCode::OK, &ms));
        self.stored = Some(ms);
        Ok(self)
    }

    async fn handle_update_status(mut self) -> Result<Self> {
        let (request, send) = self.next().await;
        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.uri().to_string(), format!("{ROOT}/ms-1/status"));
        assert!(request.extensions().get::<&'static str>().is_some_and(|op| *op == "update_status"));
        let bytes = request.into_body().collect_bytes().await?;
        let ms: MachineSet = serde_json::from_slice(&bytes)?;
        assert_eq!(ms.status.as_ref().map(|s| s.replicas), Some(2));
        send.send_response(json_response(StatusCode::OK, &ms));
        Ok(self)
    }

    async fn handle_watch(mut self) -> Result<Self> {
        let (request, send) = self.next().await;
        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.uri().to_string(),
            format!("{ROOT}?labelSelector=tier%3Dcompute&watch=true")
        );
        let added = machineset("ms-1", "10");
        let mut modified = machineset("ms-1", "11");
        modified.spec.size = 3;
        let deleted = machineset("ms-1", "12");
        let stream = [
            json!({"type": "ADDED", "object": added}),
            json!({"type": "MODIFIED", "object": modified}),
            json!({"type": "DELETED", "object": deleted}),
        ]
        .iter()
        .map(|ev| format!("{ev}\n"))
        .collect::<String>();
        send.send_response(
            Response::builder()
                .body(Body::from(stream.into_bytes()))
                .unwrap(),
        );
        Ok(self)
    }

    async fn handle_watch_forbidden(mut self) -> Result<Self> {
        let (request, send) = self.next().await;
        assert_eq!(request.uri().to_string(), format!("{ROOT}?watch=true"));
        let status = json!({
            "kind": "Status",
            "apiVersion": "v1",
            "status": "Failure",
            "message": "machinesets.clusteroperator.openshift.io is forbidden",
            "reason": "Forbidden",
            "code": 403
        });
        send.send_response(json_response(StatusCode::FORBIDDEN, &status));
        Ok(self)
    }

    async fn handle_delete_collections(mut self) -> Result<Self> {
        let expected = [
            (
                format!("{ROOT}?labelSelector=tier%3Dcompute"),
                json!({"propagationPolicy": "Orphan"}),
            ),
            (
                format!("{ROOT}?fieldSelector=metadata.name%3Dms-1"),
                json!({"gracePeriodSeconds": 0}),
            ),
        ];
        for (uri, body) in expected {
            let (request, send) = self.next().await;
            assert_eq!(request.method(), Method::DELETE);
            assert_eq!(request.uri().to_string(), uri);
            let bytes = request.into_body().collect_bytes().await?;
            assert_eq!(serde_json::from_slice::<Value>(&bytes)?, body);
            let status = json!({"kind": "Status", "apiVersion": "v1", "status": "Success"});
            send.send_response(json_response(StatusCode::OK, &status));
        }
        Ok(self)
    }

    async fn handle_patches(mut self) -> Result<Self> {
        let (request, send) = self.next().await;
        assert_eq!(request.method(), Method::PATCH);
        assert_eq!(request.uri().to_string(), format!("{ROOT}/ms-1"));
        assert_eq!(
            request.headers()[http::header::CONTENT_TYPE],
            PatchType::Merge.content_type()
        );
        let mut ms = machineset("ms-1", "20");
        ms.spec.size = 4;
        send.send_response(json_response(StatusCode::OK, &ms));

        let (request, send) = self.next().await;
        assert_eq!(request.method(), Method::PATCH);
        assert_eq!(request.uri().to_string(), format!("{ROOT}/ms-1/status"));
        assert_eq!(
            request.headers()[http::header::CONTENT_TYPE],
            PatchType::StrategicMerge.content_type()
        );
        let bytes = request.into_body().collect_bytes().await?;
        assert_eq!(
            serde_json::from_slice::<Value>(&bytes)?,
            json!({"status": {"replicas": 4}})
        );
        ms.status = Some(MachineSetStatus {
            replicas: 4,
            ..MachineSetStatus::default()
        });
        send.send_response(json_response(StatusCode::OK, &ms));
        Ok(self)
    }

    async fn handle_conflict(mut self) -> Result<Self> {
        let (request, send) = self.next().await;
        assert_eq!(request.method(), Method::PUT);
        let status = json!({
            "kind": "Status",
            "apiVersion": "v1",
            "status": "Failure",
            "message": "Operation cannot be fulfilled on machinesets.clusteroperator.openshift.io \"ms-1\": the object has been modified; please apply your changes to the latest version and try again",
            "reason": "Conflict",
            "code": 409
        });
        send.send_response(json_response(StatusCode::CONFLICT, &status));
        Ok(self)
    }
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response<Body> {
    Response::builder()
        .status(status)
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

// Create a test context with a mocked client
fn testcontext() -> (Client, ApiServerVerifier) {
    let (mock_service, handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
    let mock_client = Client::new(mock_service, "default");
    let verifier = ApiServerVerifier { handle, stored: None };
    (mock_client, verifier)
}
