use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use registration::{
    abstract_trait::MemberCommandRepositoryTrait,
    domain::{
        catalog::{Faculty, Major, StudyTime},
        requests::member::CreateMemberRequest,
    },
    repository::rest::RestMemberRepository,
};
use serde_json::{Value, json};
use shared::errors::RepositoryError;
use tokio::net::TcpListener;

async fn fake_insert(headers: HeaderMap, Json(rows): Json<Vec<Value>>) -> impl IntoResponse {
    if headers.get("prefer").and_then(|v| v.to_str().ok()) != Some("return=representation") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "missing prefer" })));
    }

    if headers.get("apikey").and_then(|v| v.to_str().ok()) == Some("revoked") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "code": "42501",
                "message": "new row violates row-level security policy for table \"members\""
            })),
        );
    }

    let row = &rows[0];
    match row["phone"].as_str() {
        Some("+6280000000000") => (
            StatusCode::CONFLICT,
            Json(json!({
                "code": "23505",
                "message": "duplicate key value violates unique constraint \"members_phone_key\""
            })),
        ),
        Some("+621234") => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "code": "23514",
                "message": "new row violates check constraint \"members_phone_format\""
            })),
        ),
        Some("+6289999999999") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "upstream exploded" })),
        ),
        _ => (
            StatusCode::CREATED,
            Json(json!([{
                "member_id": 7,
                "name": row["name"],
                "phone": row["phone"],
                "faculty": row["faculty"],
                "major": row["major"],
                "study_time": row["study_time"],
                "birth_date": null,
                "created_at": "2025-08-17T08:00:00Z"
            }])),
        ),
    }
}

async fn spawn_datastore() -> String {
    let app = Router::new().route("/rest/v1/members", post(fake_insert));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn record(phone: &str) -> CreateMemberRequest {
    CreateMemberRequest {
        name: "Budi Santoso".into(),
        phone: phone.into(),
        faculty: Faculty::Bisnis,
        major: Major::Akuntansi,
        study_time: Some(StudyTime::Malam),
        birth_date: None,
    }
}

fn repository(base_url: &str, api_key: &str) -> RestMemberRepository {
    RestMemberRepository::new(reqwest::Client::new(), base_url, "members", api_key)
}

#[tokio::test]
async fn stored_row_is_returned() {
    let base_url = spawn_datastore().await;
    let repo = repository(&base_url, "anon");

    let member = repo
        .create_member(&record("+6281234567890"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(member.member_id, 7);
    assert_eq!(member.name, "Budi Santoso");
    assert_eq!(member.faculty, "Bisnis");
    assert_eq!(member.study_time.as_deref(), Some("Malam"));
}

#[tokio::test]
async fn provider_errors_are_classified() {
    let base_url = spawn_datastore().await;
    let repo = repository(&base_url, "anon");

    assert!(matches!(
        repo.create_member(&record("+6280000000000")).await,
        Err(RepositoryError::Conflict(_))
    ));
    assert!(matches!(
        repo.create_member(&record("+621234")).await,
        Err(RepositoryError::Constraint(_))
    ));
    assert_eq!(
        repo.create_member(&record("+6289999999999")).await.unwrap_err(),
        RepositoryError::Unknown(Some("upstream exploded".into()))
    );

    let revoked = repository(&base_url, "revoked");
    assert!(matches!(
        revoked.create_member(&record("+6281234567890")).await,
        Err(RepositoryError::Forbidden(_))
    ));
}

#[tokio::test]
async fn unreachable_datastore_is_unknown() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let repo = repository(&format!("http://{addr}"), "anon");
    assert!(matches!(
        repo.create_member(&record("+6281234567890")).await,
        Err(RepositoryError::Unknown(Some(_)))
    ));
}
