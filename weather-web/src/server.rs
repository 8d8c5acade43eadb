use rocket::{
    Build, FromForm, Rocket, State,
    form::Form,
    get,
    http::Status,
    post, routes,
    serde::json::Json,
};
use rocket_dyn_templates::{Template, tera};
use serde::Serialize;
use std::{collections::HashMap, path::PathBuf};
use weather_core::{
    ReportError, ServerConfig, WeatherProvider, WeatherReport, build_report, model::format_unix,
};

const BUNDLED_TEMPLATES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");

/// Request-independent state, built once at startup.
pub struct AppState {
    provider: Box<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

pub fn build(state: AppState, server: &ServerConfig) -> Rocket<Build> {
    let template_dir = server
        .template_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(BUNDLED_TEMPLATES));

    let figment = rocket::Config::figment()
        .merge(("address", server.address))
        .merge(("port", server.port))
        .merge(("template_dir", template_dir));

    rocket::custom(figment)
        .mount("/", routes![index, search, advisory, health])
        .attach(Template::custom(|engines| {
            engines.tera.register_filter("datetimeformat", datetimeformat);
        }))
        .manage(state)
}

pub async fn run(state: AppState, server: &ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Weather advisor listening on http://{}:{}", server.address, server.port);

    build(state, server)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {e}"))?;

    Ok(())
}

/// Unix seconds to `YYYY-MM-DD HH:MM:SS`; anything else is passed through.
fn datetimeformat(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    Ok(value
        .as_i64()
        .and_then(format_unix)
        .map(tera::Value::String)
        .unwrap_or_else(|| value.clone()))
}

#[derive(Debug, Default, Serialize)]
struct Page {
    city: String,
    report: Option<WeatherReport>,
    error: Option<String>,
}

#[derive(Debug, FromForm)]
struct CityForm {
    city: Option<String>,
}

#[get("/")]
fn index() -> Template {
    Template::render("index", Page::default())
}

#[post("/", data = "<form>")]
async fn search(form: Form<CityForm>, state: &State<AppState>) -> Template {
    let city = form.into_inner().city.unwrap_or_default();

    let page = match build_report(state.provider.as_ref(), &city).await {
        Ok(report) => Page {
            city: report.city.clone(),
            report: Some(report),
            error: None,
        },
        Err(e) => Page {
            city: city.trim().to_string(),
            report: None,
            error: Some(e.to_string()),
        },
    };

    Template::render("index", page)
}

#[derive(Debug, Serialize)]
struct ErrorMessage {
    code: u16,
    message: String,
}

type ApiError = (Status, Json<ErrorMessage>);

#[get("/api/advisory?<city>")]
async fn advisory(
    city: Option<String>,
    state: &State<AppState>,
) -> Result<Json<WeatherReport>, ApiError> {
    let city = city.unwrap_or_default();

    build_report(state.provider.as_ref(), &city)
        .await
        .map(Json)
        .map_err(|e| {
            let code = match e {
                ReportError::EmptyCity => Status::BadRequest,
                ReportError::Unavailable { .. } => Status::BadGateway,
            };
            (
                code,
                Json(ErrorMessage {
                    code: code.code,
                    message: e.to_string(),
                }),
            )
        })
}

#[get("/health")]
fn health() -> &'static str {
    "ok"
}
