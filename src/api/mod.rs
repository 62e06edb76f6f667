use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tracing::info;

use crate::core::{
    self, FireTargets, PlanField, PlanInput, PlanMode, SavingsPlan, Timeline,
};
use crate::report;
use crate::store::{FileStorage, PlanStore, permalink};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

type SharedStore = Arc<Mutex<PlanStore<FileStorage>>>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum ApiPlanMode {
    Income,
    Goal,
}

impl From<ApiPlanMode> for PlanMode {
    fn from(value: ApiPlanMode) -> Self {
        match value {
            ApiPlanMode::Income => PlanMode::Income,
            ApiPlanMode::Goal => PlanMode::Goal,
        }
    }
}

/// Stateless projection request: camelCase fields overlay the default
/// plan, so partial payloads are always usable.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    current_age: Option<f64>,
    current_corpus: Option<f64>,
    annual_income: Option<f64>,
    annual_expenses: Option<f64>,
    investment_return_rate: Option<f64>,
    inflation_rate: Option<f64>,
    target_corpus: Option<f64>,
    years_to_retire: Option<f64>,
    mode: Option<ApiPlanMode>,
}

#[derive(Debug, Deserialize)]
struct UpdatePayload {
    field: PlanField,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct ImportPayload {
    query: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReportQuery {
    mode: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanStateResponse {
    data: PlanInput,
    fire_numbers: FireTargets,
}

#[derive(Debug, Serialize)]
struct PermalinkResponse {
    query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioRow {
    scenario: &'static str,
    corpus: Option<f64>,
    years: Timeline,
    freedom_age: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    mode: ApiPlanMode,
    data: PlanInput,
    fire_numbers: FireTargets,
    savings_rate: f64,
    scenarios: Vec<ScenarioRow>,
    savings_plan: Option<SavingsPlan>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16, data_file: PathBuf) -> std::io::Result<()> {
    let storage = FileStorage::new(data_file);
    let store: SharedStore = Arc::new(Mutex::new(PlanStore::open(storage, None)));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/plan", get(plan_handler).post(plan_handler))
        .route("/api/plan/update", post(plan_update_handler))
        .route("/api/plan/reset", post(plan_reset_handler))
        .route("/api/plan/import", post(plan_import_handler))
        .route("/api/plan/permalink", get(plan_permalink_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/report", get(report_handler))
        .fallback(not_found_handler)
        .with_state(store);

    let listener = TcpListener::bind(addr).await?;
    info!("FIRE planner HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

fn lock_store(store: &SharedStore) -> MutexGuard<'_, PlanStore<FileStorage>> {
    match store.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn plan_handler(State(store): State<SharedStore>) -> Response {
    let store = lock_store(&store);
    json_response(StatusCode::OK, plan_state_response(&store))
}

async fn plan_update_handler(
    State(store): State<SharedStore>,
    Json(payload): Json<UpdatePayload>,
) -> Response {
    if !payload.value.is_finite() {
        return error_response(StatusCode::BAD_REQUEST, "value must be a finite number");
    }
    let mut store = lock_store(&store);
    store.set(payload.field, payload.value);
    json_response(StatusCode::OK, plan_state_response(&store))
}

async fn plan_reset_handler(State(store): State<SharedStore>) -> Response {
    let mut store = lock_store(&store);
    store.reset();
    json_response(StatusCode::OK, plan_state_response(&store))
}

async fn plan_import_handler(
    State(store): State<SharedStore>,
    Json(payload): Json<ImportPayload>,
) -> Response {
    let mut store = lock_store(&store);
    store.replace(permalink::decode(&payload.query));
    json_response(StatusCode::OK, plan_state_response(&store))
}

async fn plan_permalink_handler(State(store): State<SharedStore>) -> Response {
    let store = lock_store(&store);
    json_response(
        StatusCode::OK,
        PermalinkResponse {
            query: store.permalink(),
        },
    )
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    json_response(StatusCode::OK, project_response_from_payload(payload))
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    json_response(StatusCode::OK, project_response_from_payload(payload))
}

async fn report_handler(
    State(store): State<SharedStore>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let mode = match query.mode.as_deref() {
        None | Some("") | Some("income") => PlanMode::Income,
        Some("goal") => PlanMode::Goal,
        Some(other) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("mode must be income or goal, got {other}"),
            );
        }
    };

    // Snapshot under the lock; render outside it so an in-flight report
    // never observes later mutations.
    let snapshot = lock_store(&store).snapshot();
    with_cache_control((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        report::render_report(&snapshot, mode),
    ))
}

fn plan_state_response(store: &PlanStore<FileStorage>) -> PlanStateResponse {
    PlanStateResponse {
        data: *store.data(),
        fire_numbers: *store.targets(),
    }
}

fn plan_from_payload(payload: &ProjectPayload) -> PlanInput {
    let mut plan = PlanInput::default();
    let overlays = [
        (PlanField::CurrentAge, payload.current_age),
        (PlanField::CurrentCorpus, payload.current_corpus),
        (PlanField::AnnualIncome, payload.annual_income),
        (PlanField::AnnualExpenses, payload.annual_expenses),
        (PlanField::InvestmentReturnRate, payload.investment_return_rate),
        (PlanField::InflationRate, payload.inflation_rate),
        (PlanField::TargetCorpus, payload.target_corpus),
        (PlanField::YearsToRetire, payload.years_to_retire),
    ];
    for (field, value) in overlays {
        if let Some(value) = value {
            plan.apply(field, value);
        }
    }
    plan.normalized()
}

fn project_response_from_payload(payload: ProjectPayload) -> ProjectResponse {
    let mode = payload.mode.unwrap_or(ApiPlanMode::Income);
    let plan = plan_from_payload(&payload);

    let (targets, savings_plan, savings_override) = match mode {
        ApiPlanMode::Income => (core::fire_targets(&plan), None, None),
        ApiPlanMode::Goal => {
            let savings_plan = core::required_savings(&plan);
            // The goal grid assumes the solved savings pace is actually kept.
            let annual = savings_plan.monthly_savings * 12.0;
            (core::goal_targets(&plan), Some(savings_plan), Some(annual))
        }
    };

    let scenarios = targets
        .named()
        .into_iter()
        .map(|(scenario, corpus)| scenario_row(scenario, corpus, &plan, savings_override))
        .collect();

    let savings_rate = if plan.annual_income > 0.0 {
        plan.annual_savings() / plan.annual_income * 100.0
    } else {
        0.0
    };

    ProjectResponse {
        mode,
        data: plan,
        fire_numbers: targets,
        savings_rate,
        scenarios,
        savings_plan,
    }
}

fn scenario_row(
    scenario: &'static str,
    corpus: Option<f64>,
    plan: &PlanInput,
    savings_override: Option<f64>,
) -> ScenarioRow {
    let Some(corpus) = corpus else {
        return ScenarioRow {
            scenario,
            corpus: None,
            years: Timeline::Unreachable,
            freedom_age: None,
        };
    };

    let years = core::years_to_target(corpus, plan, savings_override);
    ScenarioRow {
        scenario,
        corpus: Some(corpus),
        years,
        freedom_age: years.years().map(|n| plan.current_age + n),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
