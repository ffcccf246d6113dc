use crate::{
    abstract_trait::{DynMemberCommandRepository, RegistrationServiceTrait},
    domain::{
        flow::{FlowError, RegistrationFlow, SubmitOutcome, SubmitStart},
        form::FormVariant,
        notification::Notification,
        requests::session::{FormPatchRequest, ShareRequest},
        response::{
            catalog::CatalogResponse,
            session::{SessionResponse, ShareResponse, SubmitResponse},
        },
        share::Community,
    },
    service::session_store::{SessionStore, SharedFlow},
};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use prometheus_client::{
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};
use shared::{
    domain::responses::ApiResponse,
    errors::ServiceError,
    utils::{Method, Metrics, Status as StatusUtils, TracingContext},
};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct RegistrationServiceDeps {
    pub repository: DynMemberCommandRepository,
    pub sessions: Arc<SessionStore>,
    pub variant: Arc<FormVariant>,
    pub community: Arc<Community>,
}

#[derive(Clone)]
pub struct RegistrationService {
    repository: DynMemberCommandRepository,
    sessions: Arc<SessionStore>,
    variant: Arc<FormVariant>,
    community: Arc<Community>,
    metrics: Metrics,
    submit_outcomes: Family<Vec<(String, String)>, Counter>,
}

impl RegistrationService {
    pub fn new(deps: RegistrationServiceDeps, registry: &mut Registry) -> Self {
        let RegistrationServiceDeps {
            repository,
            sessions,
            variant,
            community,
        } = deps;

        let metrics = Metrics::new();
        metrics.register(registry, "registration_service", "RegistrationService");

        let submit_outcomes = Family::<Vec<(String, String)>, Counter>::default();
        registry.register(
            "registration_submit_outcome",
            "Submissions grouped by how they ended",
            submit_outcomes.clone(),
        );

        Self {
            repository,
            sessions,
            variant,
            community,
            metrics,
            submit_outcomes,
        }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("registration-service")
    }

    fn start_tracing(&self, operation_name: &str, attributes: Vec<KeyValue>) -> TracingContext {
        let start_time = Instant::now();
        let tracer = self.get_tracer();
        let mut span = tracer
            .span_builder(operation_name.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation_name}");

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation_name.to_string())],
        );

        let cx = Context::current_with_span(span);
        TracingContext { cx, start_time }
    }

    fn complete_tracing_success(&self, tracing_ctx: &TracingContext, method: Method, message: &str) {
        self.complete_tracing_internal(tracing_ctx, method, true, message);
    }

    fn complete_tracing_error(&self, tracing_ctx: &TracingContext, method: Method, message: &str) {
        self.complete_tracing_internal(tracing_ctx, method, false, message);
    }

    fn complete_tracing_internal(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        is_success: bool,
        message: &str,
    ) {
        let status_str = if is_success { "SUCCESS" } else { "ERROR" };
        let status = if is_success {
            StatusUtils::Success
        } else {
            StatusUtils::Error
        };
        let elapsed = tracing_ctx.start_time.elapsed().as_secs_f64();

        tracing_ctx.cx.span().add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", status_str),
                KeyValue::new("duration_secs", elapsed.to_string()),
                KeyValue::new("message", message.to_string()),
            ],
        );

        if is_success {
            info!("✅ Operation completed successfully: {message}");
        } else {
            error!("❌ Operation failed: {message}");
        }

        self.metrics.record(method, status, elapsed);

        tracing_ctx.cx.span().end();
    }

    async fn find_session(
        &self,
        id: Uuid,
        tracing_ctx: &TracingContext,
        method: Method,
    ) -> Result<SharedFlow, ServiceError> {
        match self.sessions.get(id).await {
            Some(flow) => Ok(flow),
            None => {
                let msg = format!("Session {id} not found");
                self.complete_tracing_error(tracing_ctx, method, &msg);
                Err(ServiceError::NotFound(msg))
            }
        }
    }

    fn flow_error(
        &self,
        err: FlowError,
        tracing_ctx: &TracingContext,
        method: Method,
    ) -> ServiceError {
        let msg = err.to_string();
        self.complete_tracing_error(tracing_ctx, method, &msg);
        ServiceError::InvalidState(msg)
    }

    /// Runs the insert on its own task so a dropped request cannot cancel a
    /// write that was already issued. The returned toast belongs to this
    /// submission only.
    async fn run_submission(
        &self,
        flow: &SharedFlow,
        start: SubmitStart,
    ) -> (SubmitOutcome, Option<Notification>) {
        let pending = match start {
            SubmitStart::AlreadySubmitting => return (SubmitOutcome::AlreadySubmitting, None),
            SubmitStart::Rejected(errors) => {
                info!("📝 [SUBMIT] Rejected by validation | Fields: {}", errors.len());
                return (SubmitOutcome::Invalid, None);
            }
            SubmitStart::Pending(pending) => pending,
        };

        let repository = self.repository.clone();
        let task_flow = flow.clone();

        let handle = tokio::spawn(async move {
            let result = repository
                .create_member(&pending.record)
                .await
                .map(|member| member.map(|m| m.name));

            if let Err(err) = &result {
                warn!("⚠️ [SUBMIT] Datastore refused the record: {err}");
            }

            let mut flow = task_flow.lock().await;
            flow.complete_submit(pending, result)
        });

        let (outcome, notification) = match handle.await {
            Ok(finished) => finished,
            Err(join_err) => {
                error!("💥 [SUBMIT] Submission task failed: {join_err}");
                RegistrationFlow::submit_interrupted("The registration could not be completed.")
            }
        };
        (outcome, Some(notification))
    }
}

#[async_trait]
impl RegistrationServiceTrait for RegistrationService {
    fn catalog(&self) -> ApiResponse<CatalogResponse> {
        ApiResponse::success(
            "Catalog retrieved successfully",
            CatalogResponse::build(self.variant.birth_date, self.variant.gallery.len()),
        )
    }

    async fn start_session(&self) -> Result<ApiResponse<SessionResponse>, ServiceError> {
        let method = Method::Post;
        let tracing_ctx = self.start_tracing(
            "StartSession",
            vec![KeyValue::new("component", "registration")],
        );

        let flow = RegistrationFlow::new(self.variant.clone(), self.community.clone());
        let (id, flow) = self.sessions.create(flow).await;
        let session = SessionResponse::from_flow(id, &mut *flow.lock().await);

        info!("🆕 [SESSION] Started | ID: {id}");
        self.complete_tracing_success(&tracing_ctx, method, "Session started");

        Ok(ApiResponse::success("Session started", session))
    }

    async fn get_session(&self, id: Uuid) -> Result<ApiResponse<SessionResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.start_tracing(
            "GetSession",
            vec![KeyValue::new("session.id", id.to_string())],
        );

        let flow = self.find_session(id, &tracing_ctx, method.clone()).await?;
        let session = SessionResponse::from_flow(id, &mut *flow.lock().await);

        self.complete_tracing_success(&tracing_ctx, method, "Session retrieved");
        Ok(ApiResponse::success("Session retrieved successfully", session))
    }

    async fn end_session(&self, id: Uuid) -> Result<ApiResponse<bool>, ServiceError> {
        let method = Method::Delete;
        let tracing_ctx = self.start_tracing(
            "EndSession",
            vec![KeyValue::new("session.id", id.to_string())],
        );

        if !self.sessions.remove(id).await {
            let msg = format!("Session {id} not found");
            self.complete_tracing_error(&tracing_ctx, method, &msg);
            return Err(ServiceError::NotFound(msg));
        }

        info!("🗑️ [SESSION] Ended | ID: {id}");
        self.complete_tracing_success(&tracing_ctx, method, "Session ended");
        Ok(ApiResponse::success("Session ended", true))
    }

    async fn advance(&self, id: Uuid) -> Result<ApiResponse<SessionResponse>, ServiceError> {
        let method = Method::Post;
        let tracing_ctx = self.start_tracing(
            "AdvanceSession",
            vec![KeyValue::new("session.id", id.to_string())],
        );

        let flow = self.find_session(id, &tracing_ctx, method.clone()).await?;
        let mut flow = flow.lock().await;

        let step = match flow.advance() {
            Ok(state) => state.name(),
            Err(err) => return Err(self.flow_error(err, &tracing_ctx, method)),
        };

        let session = SessionResponse::from_flow(id, &mut flow);
        self.complete_tracing_success(&tracing_ctx, method, &format!("Advanced to {step}"));

        Ok(ApiResponse::success("Session advanced", session))
    }

    async fn update_form(
        &self,
        id: Uuid,
        req: FormPatchRequest,
    ) -> Result<ApiResponse<SessionResponse>, ServiceError> {
        let method = Method::Patch;
        let tracing_ctx = self.start_tracing(
            "UpdateForm",
            vec![KeyValue::new("session.id", id.to_string())],
        );

        let flow = self.find_session(id, &tracing_ctx, method.clone()).await?;
        let mut flow = flow.lock().await;

        if let Err(err) = flow.update(req.into()) {
            return Err(self.flow_error(err, &tracing_ctx, method));
        }

        let session = SessionResponse::from_flow(id, &mut flow);
        self.complete_tracing_success(&tracing_ctx, method, "Form updated");

        Ok(ApiResponse::success("Form updated", session))
    }

    async fn submit(&self, id: Uuid) -> Result<ApiResponse<SubmitResponse>, ServiceError> {
        let method = Method::Post;
        let tracing_ctx = self.start_tracing(
            "SubmitRegistration",
            vec![
                KeyValue::new("component", "registration"),
                KeyValue::new("session.id", id.to_string()),
            ],
        );

        let flow = self.find_session(id, &tracing_ctx, method.clone()).await?;

        let start = {
            let mut guard = flow.lock().await;
            match guard.begin_submit(Self::today()) {
                Ok(start) => start,
                Err(err) => return Err(self.flow_error(err, &tracing_ctx, method)),
            }
        };

        let (outcome, notification) = self.run_submission(&flow, start).await;

        let outcome_label = serde_json::to_value(outcome)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        self.submit_outcomes
            .get_or_create(&vec![("outcome".to_string(), outcome_label.clone())])
            .inc();

        let mut session = SessionResponse::from_flow(id, &mut *flow.lock().await);
        session.notifications.extend(notification);

        let message = match outcome {
            SubmitOutcome::Registered => {
                info!("🎉 [SUBMIT] Member registered | Session: {id}");
                "Registration saved"
            }
            SubmitOutcome::Invalid => "Please fix the highlighted fields",
            SubmitOutcome::AlreadySubmitting => "A submission is already in progress",
            SubmitOutcome::DuplicatePhone => "Phone number already registered",
            SubmitOutcome::RejectedPhone => "Phone number format rejected",
            SubmitOutcome::AccessDenied => "Access denied",
            SubmitOutcome::Failed => "Failed to save registration",
        };

        let tracing_message = format!("Submit finished: {outcome_label}");
        match outcome {
            SubmitOutcome::Registered
            | SubmitOutcome::Invalid
            | SubmitOutcome::AlreadySubmitting => {
                self.complete_tracing_success(&tracing_ctx, method, &tracing_message)
            }
            _ => self.complete_tracing_error(&tracing_ctx, method, &tracing_message),
        }

        Ok(ApiResponse::success(
            message,
            SubmitResponse { outcome, session },
        ))
    }

    async fn share(
        &self,
        id: Uuid,
        req: &ShareRequest,
    ) -> Result<ApiResponse<ShareResponse>, ServiceError> {
        let method = Method::Post;
        let tracing_ctx = self.start_tracing(
            "ShareGroupLink",
            vec![
                KeyValue::new("session.id", id.to_string()),
                KeyValue::new("share.native", req.native_share),
            ],
        );

        let flow = self.find_session(id, &tracing_ctx, method.clone()).await?;
        let mut flow = flow.lock().await;

        let action = flow.share(req.native_share);
        let notifications = flow.take_notifications();

        self.complete_tracing_success(&tracing_ctx, method, "Share action prepared");
        Ok(ApiResponse::success(
            "Share action prepared",
            ShareResponse {
                action,
                notifications,
            },
        ))
    }
}
