mod common;

use common::{PanickingRepository, ScriptedRepository, app_state, budi, member_named};
use registration::domain::{
    catalog::{Faculty, Major},
    flow::{PHONE_ALREADY_REGISTERED, SubmitOutcome},
    form::{BirthDateField, FormVariant, MAJOR_REQUIRED, NAME_TOO_SHORT},
    notification::NotificationLevel,
    requests::session::{FormPatchRequest, ShareRequest},
    response::session::StepResponse,
    share::ShareAction,
};
use shared::errors::{RepositoryError, ServiceError};
use std::sync::Arc;
use tokio::sync::Notify;

#[tokio::test]
async fn budi_registers_and_lands_on_success() {
    let repo = ScriptedRepository::new(vec![Ok(Some(member_named("Budi Santoso")))]);
    let service = app_state(repo.clone(), FormVariant::default())
        .di_container
        .registration_service;

    let session = service.start_session().await.unwrap().data;
    assert_eq!(session.step, StepResponse::Welcome);

    let id = session.id;
    let session = service.advance(id).await.unwrap().data;
    assert_eq!(session.step, StepResponse::Form);

    service.update_form(id, budi()).await.unwrap();
    let submitted = service.submit(id).await.unwrap().data;

    assert_eq!(submitted.outcome, SubmitOutcome::Registered);
    assert_eq!(
        submitted.session.step,
        StepResponse::Success {
            created_name: "Budi Santoso".into(),
            group_link: "https://chat.example.com/invite/abc".into(),
        }
    );
    assert!(!submitted.session.submitting);
    assert_eq!(submitted.session.notifications.len(), 1);
    assert_eq!(
        submitted.session.notifications[0].level,
        NotificationLevel::Success
    );

    let inserted = repo.inserted();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].phone, "+6281234567890");
    assert_eq!(inserted[0].faculty, Faculty::Bisnis);
    assert_eq!(inserted[0].major, Major::Akuntansi);
    assert_eq!(inserted[0].study_time, None);
    assert_eq!(inserted[0].birth_date, None);
}

#[tokio::test]
async fn double_submit_inserts_exactly_once() {
    let gate = Arc::new(Notify::new());
    let repo = ScriptedRepository::gated(vec![Ok(None)], gate.clone());
    let service = app_state(repo.clone(), FormVariant::default())
        .di_container
        .registration_service;

    let id = service.start_session().await.unwrap().data.id;
    service.advance(id).await.unwrap();
    service.update_form(id, budi()).await.unwrap();

    let first = tokio::spawn({
        let service = service.clone();
        async move { service.submit(id).await }
    });

    while repo.calls() == 0 {
        tokio::task::yield_now().await;
    }

    let snapshot = service.get_session(id).await.unwrap().data;
    assert!(snapshot.submitting);

    let second = service.submit(id).await.unwrap().data;
    assert_eq!(second.outcome, SubmitOutcome::AlreadySubmitting);
    assert!(second.session.submitting);

    gate.notify_one();

    let first = first.await.unwrap().unwrap().data;
    assert_eq!(first.outcome, SubmitOutcome::Registered);
    assert_eq!(repo.calls(), 1);
    assert!(!first.session.submitting);
}

#[tokio::test]
async fn success_toast_goes_to_the_submit_response_only() {
    let gate = Arc::new(Notify::new());
    let repo = ScriptedRepository::gated(vec![Ok(None)], gate.clone());
    let state = app_state(repo.clone(), FormVariant::default());
    let service = state.di_container.registration_service.clone();

    let id = service.start_session().await.unwrap().data.id;
    service.advance(id).await.unwrap();
    service.update_form(id, budi()).await.unwrap();

    let first = tokio::spawn({
        let service = service.clone();
        async move { service.submit(id).await }
    });

    while repo.calls() == 0 {
        tokio::task::yield_now().await;
    }
    gate.notify_one();

    let flow = state.sessions.get(id).await.unwrap();
    while flow.lock().await.is_submitting() {
        tokio::task::yield_now().await;
    }

    let polled = service.get_session(id).await.unwrap().data;
    assert!(matches!(polled.step, StepResponse::Success { .. }));
    assert!(polled.notifications.is_empty());

    let submitted = first.await.unwrap().unwrap().data;
    assert_eq!(submitted.outcome, SubmitOutcome::Registered);
    assert_eq!(submitted.session.notifications.len(), 1);
    assert_eq!(
        submitted.session.notifications[0].title,
        "Registration complete"
    );
}

#[tokio::test]
async fn duplicate_phone_keeps_the_form_and_allows_a_retry() {
    let repo = ScriptedRepository::new(vec![
        Err(RepositoryError::Conflict(
            "duplicate key value violates unique constraint".into(),
        )),
        Ok(None),
    ]);
    let service = app_state(repo.clone(), FormVariant::default())
        .di_container
        .registration_service;

    let id = service.start_session().await.unwrap().data.id;
    service.advance(id).await.unwrap();
    service.update_form(id, budi()).await.unwrap();

    let rejected = service.submit(id).await.unwrap().data;
    assert_eq!(rejected.outcome, SubmitOutcome::DuplicatePhone);
    assert_eq!(rejected.session.step, StepResponse::Form);
    assert_eq!(
        rejected.session.errors.get("phone").map(String::as_str),
        Some(PHONE_ALREADY_REGISTERED)
    );
    assert_eq!(rejected.session.form.name, "Budi Santoso");
    assert!(!rejected.session.submitting);
    assert_eq!(
        rejected.session.notifications[0].level,
        NotificationLevel::Warning
    );

    service
        .update_form(
            id,
            FormPatchRequest {
                phone: Some("+6289876543210".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let accepted = service.submit(id).await.unwrap().data;
    assert_eq!(accepted.outcome, SubmitOutcome::Registered);
    assert_eq!(
        accepted.session.step,
        StepResponse::Success {
            created_name: "Budi Santoso".into(),
            group_link: "https://chat.example.com/invite/abc".into(),
        }
    );
    assert_eq!(repo.calls(), 2);
}

#[tokio::test]
async fn access_denied_and_unknown_failures_only_notify() {
    let repo = ScriptedRepository::new(vec![
        Err(RepositoryError::Forbidden(
            "new row violates row-level security policy".into(),
        )),
        Err(RepositoryError::Unknown(Some("connection reset".into()))),
    ]);
    let service = app_state(repo.clone(), FormVariant::default())
        .di_container
        .registration_service;

    let id = service.start_session().await.unwrap().data.id;
    service.advance(id).await.unwrap();
    service.update_form(id, budi()).await.unwrap();

    let denied = service.submit(id).await.unwrap().data;
    assert_eq!(denied.outcome, SubmitOutcome::AccessDenied);
    assert!(denied.session.errors.is_empty());
    assert_eq!(denied.session.notifications[0].title, "Access denied");

    let failed = service.submit(id).await.unwrap().data;
    assert_eq!(failed.outcome, SubmitOutcome::Failed);
    assert_eq!(
        failed.session.notifications[0].description.as_deref(),
        Some("connection reset")
    );
    assert_eq!(failed.session.step, StepResponse::Form);
    assert!(!failed.session.submitting);
}

#[tokio::test]
async fn invalid_form_never_reaches_the_datastore() {
    let repo = ScriptedRepository::new(vec![]);
    let service = app_state(repo.clone(), FormVariant::default())
        .di_container
        .registration_service;

    let id = service.start_session().await.unwrap().data.id;
    service.advance(id).await.unwrap();
    service
        .update_form(
            id,
            FormPatchRequest {
                name: Some("B".into()),
                faculty: Some("Bisnis".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let submitted = service.submit(id).await.unwrap().data;
    assert_eq!(submitted.outcome, SubmitOutcome::Invalid);
    assert_eq!(
        submitted.session.errors.get("name").map(String::as_str),
        Some(NAME_TOO_SHORT)
    );
    assert_eq!(
        submitted.session.errors.get("major").map(String::as_str),
        Some(MAJOR_REQUIRED)
    );
    assert!(submitted.session.errors.contains_key("phone"));
    assert!(!submitted.session.errors.contains_key("faculty"));
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn changing_faculty_clears_the_major() {
    let repo = ScriptedRepository::new(vec![]);
    let service = app_state(repo, FormVariant::default())
        .di_container
        .registration_service;

    let id = service.start_session().await.unwrap().data.id;
    service.advance(id).await.unwrap();

    let session = service
        .update_form(
            id,
            FormPatchRequest {
                faculty: Some("Sains & Teknologi".into()),
                major: Some("Teknik Informatika".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data;
    assert_eq!(session.form.major.as_deref(), Some("Teknik Informatika"));
    assert_eq!(session.major_options.len(), 5);

    let session = service
        .update_form(
            id,
            FormPatchRequest {
                faculty: Some("Bisnis".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .data;
    assert_eq!(session.form.major, None);
    assert_eq!(
        session.major_options,
        vec!["Akuntansi", "Manajemen", "Administrasi Bisnis"]
    );
}

#[tokio::test]
async fn gallery_variant_walks_every_image_before_the_form() {
    let repo = ScriptedRepository::new(vec![]);
    let variant = FormVariant {
        gallery: vec!["/img/1.jpg".into(), "/img/2.jpg".into()],
        birth_date: BirthDateField::Required,
    };
    let service = app_state(repo, variant).di_container.registration_service;

    assert_eq!(service.catalog().data.gallery_size, 2);
    assert_eq!(service.catalog().data.birth_date, BirthDateField::Required);

    let id = service.start_session().await.unwrap().data.id;

    let session = service.advance(id).await.unwrap().data;
    assert_eq!(
        session.step,
        StepResponse::Gallery {
            index: 0,
            total: 2,
            image: "/img/1.jpg".into(),
        }
    );
    service.advance(id).await.unwrap();
    assert_eq!(service.advance(id).await.unwrap().data.step, StepResponse::Form);

    let err = service.advance(id).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn crashed_insert_releases_the_guard() {
    let service = app_state(Arc::new(PanickingRepository), FormVariant::default())
        .di_container
        .registration_service;

    let id = service.start_session().await.unwrap().data.id;
    service.advance(id).await.unwrap();
    service.update_form(id, budi()).await.unwrap();

    let submitted = service.submit(id).await.unwrap().data;
    assert_eq!(submitted.outcome, SubmitOutcome::Failed);
    assert!(!submitted.session.submitting);
    assert_eq!(
        submitted.session.notifications[0].level,
        NotificationLevel::Error
    );
    assert_eq!(submitted.session.step, StepResponse::Form);
}

#[tokio::test]
async fn share_prefers_native_and_falls_back_to_clipboard() {
    let service = app_state(ScriptedRepository::new(vec![]), FormVariant::default())
        .di_container
        .registration_service;

    let id = service.start_session().await.unwrap().data.id;

    let native = service
        .share(id, &ShareRequest { native_share: true })
        .await
        .unwrap()
        .data;
    assert!(matches!(native.action, ShareAction::NativeShare { .. }));
    assert!(native.notifications.is_empty());

    let copied = service
        .share(id, &ShareRequest { native_share: false })
        .await
        .unwrap()
        .data;
    assert_eq!(
        copied.action,
        ShareAction::CopyToClipboard {
            url: "https://chat.example.com/invite/abc".into()
        }
    );
    assert_eq!(copied.notifications.len(), 1);
    assert_eq!(copied.notifications[0].title, "Link copied");
}

#[tokio::test]
async fn ended_sessions_are_gone() {
    let service = app_state(ScriptedRepository::new(vec![]), FormVariant::default())
        .di_container
        .registration_service;

    let id = service.start_session().await.unwrap().data.id;
    assert!(service.end_session(id).await.unwrap().data);

    assert!(matches!(
        service.get_session(id).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        service.end_session(id).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}
