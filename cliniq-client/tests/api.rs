use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cliniq_client::{ClientError, ClinIqClient, PollOptions, UploadFile};
use cliniq_core::domain::document::{DocumentStatus, ExtractedFields};
use cliniq_core::domain::job::{JobStatus, PipelineStage, UseCase};
use cliniq_core::dto::job::ListJobsQuery;
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct MockState {
    /// Number of `GET /api/jobs/job-live` requests served
    live_polls: Arc<AtomicUsize>,
    /// `(use_case, filenames)` of every upload received
    uploads: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

fn document(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "filename": format!("{}.pdf", id),
        "status": status,
        "doc_type": "DischargeSummary",
        "doc_type_confidence": 0.93,
        "created_at": "2025-03-01T10:00:00"
    })
}

fn job_body(id: &str, status: &str, doc_status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "use_case": "claim_submission",
        "created_at": "2025-03-01T10:00:00",
        "updated_at": "2025-03-01T10:00:07",
        "documents": [document("doc-1", doc_status)]
    })
}

async fn upload(State(state): State<MockState>, mut multipart: Multipart) -> Response {
    let mut use_case = String::new();
    let mut filenames = Vec::new();

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "use_case" {
            use_case = field.text().await.unwrap();
        } else if name == "files" {
            filenames.push(field.file_name().unwrap_or_default().to_string());
            let _ = field.bytes().await.unwrap();
        }
    }

    let count = filenames.len();
    state.uploads.lock().unwrap().push((use_case, filenames));

    Json(json!({ "job_id": "job-live", "document_count": count, "status": "queued" }))
        .into_response()
}

async fn list_jobs(Query(params): Query<HashMap<String, String>>) -> Response {
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let per_page: u32 = params
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);

    Json(json!({
        "page": page,
        "per_page": per_page,
        "total": 25,
        "items": [{
            "id": "job-old",
            "status": "completed",
            "use_case": "pre_authorisation",
            "created_at": "2025-02-28T08:30:00Z",
            "document_count": 2,
            "avg_confidence": 0.88
        }]
    }))
    .into_response()
}

async fn get_job(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    match id.as_str() {
        "missing" => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Job not found" })))
            .into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        "stuck" => Json(job_body("stuck", "processing", "parsing")).into_response(),
        _ => {
            let n = state.live_polls.fetch_add(1, Ordering::SeqCst);
            let body = match n {
                0 => job_body(&id, "processing", "extracting"),
                1 => job_body(&id, "processing", "building_fhir"),
                _ => job_body(&id, "completed", "completed"),
            };
            Json(body).into_response()
        }
    }
}

async fn job_bundle(Path(_id): Path<String>) -> Response {
    Json(json!({ "resourceType": "Bundle", "type": "collection" })).into_response()
}

async fn get_extracted(Path(_id): Path<String>) -> Response {
    Json(json!({ "patient_name": "A. Sharma", "diagnosis": "Dengue" })).into_response()
}

async fn patch_extracted(Path(_id): Path<String>, Json(mut body): Json<Value>) -> Response {
    if let Value::Object(map) = &mut body {
        map.insert("patient_name".to_string(), json!("A. Sharma"));
    }
    Json(body).into_response()
}

async fn validate(Path(_id): Path<String>) -> Response {
    Json(json!({ "status": "validated" })).into_response()
}

async fn validation_report(Path(id): Path<String>) -> Response {
    if id == "unvalidated" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "No validation report found" })),
        )
            .into_response();
    }

    Json(json!({
        "document_id": id,
        "bundle_health_score": 72.5,
        "errors": [{ "message": "Claim.patient is required" }],
        "warnings": [],
        "info": ["Profile checked"],
        "nhcx_compliance_checklist": [{ "item": "Coverage present", "passed": true }],
        "raw_report": { "status": "error" }
    }))
    .into_response()
}

async fn document_fhir(Path(_id): Path<String>) -> Response {
    Json(json!({ "resourceType": "Composition", "status": "final" })).into_response()
}

async fn document_download(Path(id): Path<String>) -> Response {
    (
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.json\"", id),
        )],
        r#"{"resourceType":"Bundle"}"#,
    )
        .into_response()
}

async fn submit_abdm(Path(_id): Path<String>) -> Response {
    Json(json!({
        "status": "submitted",
        "abha_reference": "ABHA-1234",
        "timestamp": "2025-03-01T11:00:00Z"
    }))
    .into_response()
}

async fn audit(Path(_id): Path<String>) -> Response {
    Json(json!([
        {
            "timestamp": "2025-03-01T10:05:00",
            "actor": "system",
            "action": "extracted",
            "field_path": "",
            "old_value": null,
            "new_value": null
        },
        {
            "timestamp": "2025-03-01T10:09:00",
            "actor": "reviewer@clinic",
            "action": "updated",
            "field_path": "diagnosis",
            "old_value": "Fever",
            "new_value": "Dengue"
        }
    ]))
    .into_response()
}

async fn analytics() -> Response {
    Json(json!({
        "total_documents": 40,
        "total_jobs": 12,
        "avg_confidence": 87.5,
        "avg_processing_time_seconds": 41.5,
        "validation_pass_rate": 75.0,
        "doc_type_breakdown": { "DischargeSummary": 30, "DiagnosticReport": 10 },
        "time_saved_minutes": 320.0,
        "status_breakdown": { "completed": 10, "failed": 2 }
    }))
    .into_response()
}

/// Starts a mock ClinIQ API on a random port.
/// Returns (base_url, state, shutdown_tx); send `()` on shutdown_tx to stop it.
async fn start_mock_api() -> (String, MockState, tokio::sync::oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://127.0.0.1:{}", addr.port());

    let state = MockState::default();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let app = Router::new()
        .route("/api/upload", post(upload))
        .route("/api/jobs", get(list_jobs))
        .route("/api/jobs/{id}", get(get_job))
        .route("/api/jobs/{id}/fhir/bundle", get(job_bundle))
        .route(
            "/api/documents/{id}/extracted",
            get(get_extracted).patch(patch_extracted),
        )
        .route("/api/documents/{id}/validate", post(validate))
        .route("/api/documents/{id}/validation", get(validation_report))
        .route("/api/documents/{id}/fhir", get(document_fhir))
        .route("/api/documents/{id}/fhir/download", get(document_download))
        .route("/api/documents/{id}/submit-abdm", post(submit_abdm))
        .route("/api/documents/{id}/audit", get(audit))
        .route("/api/analytics/summary", get(analytics))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (base_url, state, shutdown_tx)
}

#[tokio::test]
async fn given_pdf_files_when_uploaded_then_multipart_carries_use_case_and_files() {
    let (base_url, state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(format!("{}/", base_url));

    let files = vec![
        UploadFile::new("discharge.pdf", b"%PDF-1.4 a".to_vec()),
        UploadFile::new("labs.zip", b"PK\x03\x04".to_vec()),
    ];
    let response = client
        .upload_documents(&UseCase::PreAuthorisation, files)
        .await
        .unwrap();

    assert_eq!(response.job_id, "job-live");
    assert_eq!(response.document_count, 2);
    assert_eq!(response.status, JobStatus::Queued);

    let uploads = state.uploads.lock().unwrap().clone();
    assert_eq!(
        uploads,
        vec![(
            "pre_authorisation".to_string(),
            vec!["discharge.pdf".to_string(), "labs.zip".to_string()]
        )]
    );

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_unsupported_file_when_uploaded_then_nothing_is_sent() {
    let (base_url, state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let err = client
        .upload_documents(
            &UseCase::ClaimSubmission,
            vec![UploadFile::new("photo.jpg", b"\xff\xd8".to_vec())],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert!(state.uploads.lock().unwrap().is_empty());

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_page_query_when_listing_jobs_then_page_is_forwarded() {
    let (base_url, _state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let page = client
        .list_jobs(ListJobsQuery {
            page: 2,
            per_page: 12,
        })
        .await
        .unwrap();

    assert_eq!(page.page, 2);
    assert_eq!(page.per_page, 12);
    assert_eq!(page.total, 25);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.items[0].use_case, UseCase::PreAuthorisation);
    assert_eq!(page.items[0].avg_confidence, Some(0.88));

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_missing_job_when_fetched_then_detail_message_is_surfaced() {
    let (base_url, _state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let err = client.get_job("missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Job not found");

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_non_json_error_body_when_fetched_then_status_text_is_used() {
    let (base_url, _state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let err = client.get_job("broken").await.unwrap_err();

    match err {
        ClientError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_unreachable_server_when_fetched_then_request_failed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = ClinIqClient::new(format!("http://127.0.0.1:{}", port));
    let err = client.get_job("job-1").await.unwrap_err();

    assert!(matches!(err, ClientError::RequestFailed(_)));
}

#[tokio::test]
async fn given_running_job_when_polled_then_progress_is_reported_until_completed() {
    let (base_url, state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let mut stages = Vec::new();
    let job = client
        .poll_job(
            "job-live",
            PollOptions::new(Duration::from_millis(10), 5),
            |job| stages.push(job.pipeline_stage()),
        )
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.documents[0].status, DocumentStatus::Completed);
    assert_eq!(
        stages,
        vec![
            Some(PipelineStage::Extracting),
            Some(PipelineStage::BuildingFhir),
            Some(PipelineStage::Done),
        ]
    );
    assert_eq!(state.live_polls.load(Ordering::SeqCst), 3);

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_stuck_job_when_polled_then_times_out() {
    let (base_url, _state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let mut callbacks = 0;
    let err = client
        .poll_job(
            "stuck",
            PollOptions::new(Duration::from_millis(5), 3),
            |_| callbacks += 1,
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(callbacks, 3);

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_missing_job_when_polled_then_request_error_aborts() {
    let (base_url, _state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let mut callbacks = 0;
    let err = client
        .poll_job("missing", PollOptions::default(), |_| callbacks += 1)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(callbacks, 0);

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_extracted_fields_when_patched_then_updated_map_is_returned() {
    let (base_url, _state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let current = client.get_extracted("doc-1").await.unwrap();
    assert_eq!(current["diagnosis"], json!("Dengue"));

    let mut changes = ExtractedFields::new();
    changes.insert("diagnosis".to_string(), json!("Dengue fever"));
    let updated = client.patch_extracted("doc-1", &changes).await.unwrap();

    assert_eq!(updated["diagnosis"], json!("Dengue fever"));
    assert_eq!(updated["patient_name"], json!("A. Sharma"));

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_document_when_validated_then_report_is_available() {
    let (base_url, _state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let triggered = client.trigger_validation("doc-1").await.unwrap();
    assert_eq!(triggered.status, "validated");

    let report = client.get_validation_report("doc-1").await.unwrap();
    assert_eq!(report.document_id, "doc-1");
    assert!(!report.passed());
    assert_eq!(report.issue_count(), 2);
    assert_eq!(report.nhcx_compliance_checklist.len(), 1);

    let err = client.get_validation_report("unvalidated").await.unwrap_err();
    assert_eq!(err.user_message(), "No validation report found");

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_bundles_when_downloaded_then_filenames_are_resolved() {
    let (base_url, _state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let doc_bundle = client.download_document_bundle("doc-1").await.unwrap();
    assert_eq!(doc_bundle.filename, "doc-1.json");
    assert_eq!(doc_bundle.json().unwrap()["resourceType"], json!("Bundle"));

    let job_bundle = client.download_job_bundle("job-old").await.unwrap();
    assert_eq!(job_bundle.filename, "job-old_nhcx_claim_bundle.json");
    assert!(!job_bundle.bytes.is_empty());

    let fhir = client.get_document_fhir("doc-1").await.unwrap();
    assert_eq!(fhir["resourceType"], json!("Composition"));

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_document_when_submitted_then_abha_reference_is_returned() {
    let (base_url, _state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let submission = client.submit_to_abdm("doc-1").await.unwrap();

    assert_eq!(submission.status, "submitted");
    assert_eq!(submission.abha_reference, "ABHA-1234");

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_document_when_audit_requested_then_entries_keep_order() {
    let (base_url, _state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let entries = client.get_audit_log("doc-1").await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "extracted");
    assert!(entries[0].old_value.is_none());
    assert_eq!(entries[1].field_path, "diagnosis");
    assert_eq!(entries[1].new_value.as_deref(), Some("Dengue"));
    assert!(entries[0].timestamp < entries[1].timestamp);

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn given_service_when_analytics_requested_then_summary_is_parsed() {
    let (base_url, _state, shutdown_tx) = start_mock_api().await;
    let client = ClinIqClient::new(base_url);

    let summary = client.get_analytics_summary().await.unwrap();

    assert_eq!(summary.total_jobs, 12);
    assert_eq!(summary.avg_confidence, 87.5);
    assert_eq!(summary.validation_pass_rate, 75.0);
    assert_eq!(summary.doc_type_breakdown.get("DischargeSummary"), Some(&30));
    assert_eq!(summary.status_breakdown.get("failed"), Some(&2));

    let _ = shutdown_tx.send(());
}
