//! HTTP handlers.
//!
//! Handlers parse JSON bodies, run them through the payload validator, and
//! hand the normalized arguments to the domain layer. Errors are rendered as
//! `{"error": "..."}` with 400 for invalid input, 401 for a missing or wrong
//! admin key, 404 for unknown records and 500 for everything else.

use crate::config::PropertyRegistry;
use crate::db::Database;
use crate::error::{TranslationError, ValidationError};
use crate::i18n::TranslationMetrics;
use crate::security::{is_authorized_admin, ADMIN_API_KEY_HEADER};
use crate::translation::services::get_and_cache_machine_translation;
use crate::translation::{
    contents_which_need_translations, ContentFormat, EntityTranslations, EntityType,
    MachineTranslation, MachineTranslator, TranslatableContent, TranslatableContentsCollection,
};
use crate::validation::{
    validate_and_normalize, validate_change_dict_for_blog_post,
    validate_new_config_property_values, ArgSchema, BlogPostChange, DefaultNormalizer,
    HandlerArgsSchema, Schema,
};
use crate::voiceover::{
    validate_language_codes_mapping, EntityVoiceovers, LanguageCodesMapping, VoiceoverAdminData,
};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub struct AppState<T> {
    pub db: Database,
    pub translator: Arc<T>,
    pub metrics: Arc<TranslationMetrics>,
    pub properties: Arc<RwLock<PropertyRegistry>>,
    pub admin_api_key: Option<String>,
}

impl<T> AppState<T> {
    pub fn new(
        db: Database,
        translator: T,
        properties: PropertyRegistry,
        admin_api_key: Option<String>,
    ) -> Self {
        Self {
            db,
            translator: Arc::new(translator),
            metrics: Arc::new(TranslationMetrics::new()),
            properties: Arc::new(RwLock::new(properties)),
            admin_api_key,
        }
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            translator: Arc::clone(&self.translator),
            metrics: Arc::clone(&self.metrics),
            properties: Arc::clone(&self.properties),
            admin_api_key: self.admin_api_key.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", .0.join("; "))]
    Payload(Vec<String>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<TranslationError> for AppError {
    fn from(e: TranslationError) -> Self {
        match e {
            TranslationError::Validation(e) => AppError::Validation(e),
            other => AppError::Validation(ValidationError::new(other.to_string())),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) | AppError::Payload(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match &self {
            AppError::Internal(e) => {
                error!("Request failed: {:#}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type HandlerResult = Result<Json<Value>, AppError>;

fn require_admin<T>(state: &AppState<T>, headers: &HeaderMap) -> Result<(), AppError> {
    let provided = headers
        .get(ADMIN_API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    if is_authorized_admin(state.admin_api_key.as_deref(), provided) {
        Ok(())
    } else {
        warn!("Rejected admin request with missing or invalid API key");
        Err(AppError::Unauthorized)
    }
}

fn validated_args(body: &Map<String, Value>, schema: &HandlerArgsSchema) -> Result<Map<String, Value>, AppError> {
    validate_and_normalize(body, schema, true, &DefaultNormalizer).map_err(AppError::Payload)
}

fn parse<D: DeserializeOwned>(what: &str, value: Value) -> Result<D, AppError> {
    serde_json::from_value(value)
        .map_err(|e| ValidationError::new(format!("Invalid {}: {}", what, e)).into())
}

fn parse_entity_type(entity_type: &str) -> Result<EntityType, AppError> {
    Ok(entity_type.parse::<EntityType>()?)
}

// ==================== Handlers ====================

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn machine_translation_args() -> HandlerArgsSchema {
    HandlerArgsSchema::new()
        .arg("source_language_code", ArgSchema::required(Schema::Unicode))
        .arg("target_language_code", ArgSchema::required(Schema::Unicode))
        .arg("source_text", ArgSchema::required(Schema::Unicode))
}

async fn machine_translation<T: MachineTranslator + 'static>(
    State(state): State<AppState<T>>,
    Json(body): Json<Map<String, Value>>,
) -> HandlerResult {
    let args = validated_args(&body, &machine_translation_args())?;
    let arg = |name: &str| args[name].as_str().unwrap_or_default().to_string();
    let request = MachineTranslation::new(
        arg("source_language_code"),
        arg("target_language_code"),
        arg("source_text"),
        "",
    );
    request.validate()?;

    let translated_text = get_and_cache_machine_translation(
        &state.db,
        state.translator.as_ref(),
        &state.metrics,
        &request.source_language_code,
        &request.target_language_code,
        &request.source_text,
    )
    .await?;
    Ok(Json(json!({ "translated_text": translated_text })))
}

async fn machine_translation_metrics<T>(State(state): State<AppState<T>>) -> HandlerResult {
    Ok(Json(serde_json::to_value(state.metrics.report()).map_err(anyhow::Error::from)?))
}

async fn get_entity_translations<T>(
    State(state): State<AppState<T>>,
    Path((entity_type, entity_id, version, language_code)): Path<(String, String, u32, String)>,
) -> HandlerResult {
    let entity_type = parse_entity_type(&entity_type)?;
    let record = state
        .db
        .get_entity_translations(entity_type, &entity_id, version, &language_code)?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Entity translations not found: {}",
                EntityTranslations::generate_id(entity_type, &entity_id, version, &language_code)
            ))
        })?;
    Ok(Json(serde_json::to_value(record).map_err(anyhow::Error::from)?))
}

fn translations_key_args() -> HandlerArgsSchema {
    HandlerArgsSchema::new()
        .arg("entity_type", ArgSchema::required(Schema::Unicode))
        .arg("entity_id", ArgSchema::required(Schema::Unicode))
        .arg("entity_version", ArgSchema::required(Schema::Int))
        .arg("language_code", ArgSchema::required(Schema::Unicode))
}

fn entity_translations_args() -> HandlerArgsSchema {
    translations_key_args().arg(
        "translations",
        ArgSchema::required(Schema::dict_of(Schema::Any)),
    )
}

async fn put_entity_translations<T>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> HandlerResult {
    require_admin(&state, &headers)?;
    let args = validated_args(&body, &entity_translations_args())?;
    let record: EntityTranslations = parse("entity translations", Value::Object(args))?;
    record.validate()?;
    state.db.put_entity_translations(&record)?;
    info!("Stored entity translations {}", record.id());
    Ok(Json(json!({ "id": record.id() })))
}

#[derive(Deserialize)]
struct GapsRequest {
    entity_type: EntityType,
    entity_id: String,
    entity_version: u32,
    language_code: String,
    contents: Vec<TranslatableContent>,
}

/// The submitted contents lacking an up-to-date translation. Repeated
/// contents are counted once.
fn translation_gaps_args() -> HandlerArgsSchema {
    translations_key_args().arg("contents", ArgSchema::required(Schema::list(Schema::Any)))
}

async fn entity_translation_gaps<T>(
    State(state): State<AppState<T>>,
    Json(body): Json<Map<String, Value>>,
) -> HandlerResult {
    let args = validated_args(&body, &translation_gaps_args())?;
    let request: GapsRequest = parse("translation gaps request", Value::Object(args))?;

    let mut collection = TranslatableContentsCollection::new();
    for content in request.contents {
        content.validate()?;
        let format: ContentFormat = content.content_format;
        collection.add_translatable_content(format, content)?;
    }

    let translations = state
        .db
        .get_entity_translations(
            request.entity_type,
            &request.entity_id,
            request.entity_version,
            &request.language_code,
        )?
        .unwrap_or_else(|| {
            EntityTranslations::create_empty(
                request.entity_type,
                &request.entity_id,
                request.entity_version,
                &request.language_code,
            )
        });

    let pending = contents_which_need_translations(collection.contents(), &translations);
    Ok(Json(json!({
        "total_count": collection.len(),
        "contents": pending,
    })))
}

async fn voiceover_admin_data<T>(State(state): State<AppState<T>>) -> HandlerResult {
    let data = VoiceoverAdminData::new(state.db.get_language_codes_mapping()?);
    Ok(Json(serde_json::to_value(data).map_err(anyhow::Error::from)?))
}

fn language_codes_mapping_args() -> HandlerArgsSchema {
    HandlerArgsSchema::new().arg(
        "language_codes_mapping",
        ArgSchema::required(Schema::dict_of(Schema::dict_of(Schema::Bool))),
    )
}

async fn put_language_codes_mapping<T>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> HandlerResult {
    require_admin(&state, &headers)?;
    let mut args = validated_args(&body, &language_codes_mapping_args())?;
    let mapping: LanguageCodesMapping = parse(
        "language codes mapping",
        args.remove("language_codes_mapping").unwrap_or_default(),
    )?;
    validate_language_codes_mapping(&mapping)?;
    state.db.put_language_codes_mapping(&mapping)?;
    info!("Updated voiceover language codes mapping ({} languages)", mapping.len());
    Ok(Json(json!({})))
}

async fn get_entity_voiceovers<T>(
    State(state): State<AppState<T>>,
    Path((entity_type, entity_id, version, language_accent_code)): Path<(String, String, u32, String)>,
) -> HandlerResult {
    let entity_type = parse_entity_type(&entity_type)?;
    let record = state
        .db
        .get_entity_voiceovers(entity_type, &entity_id, version, &language_accent_code)?
        .unwrap_or_else(|| {
            EntityVoiceovers::create_empty(entity_type, &entity_id, version, &language_accent_code)
        });
    Ok(Json(serde_json::to_value(record).map_err(anyhow::Error::from)?))
}

fn blog_post_change_args() -> HandlerArgsSchema {
    HandlerArgsSchema::new().arg("change_dict", ArgSchema::required(Schema::dict_of(Schema::Any)))
}

async fn blog_post_change<T>(
    State(state): State<AppState<T>>,
    Json(body): Json<Map<String, Value>>,
) -> HandlerResult {
    let mut args = validated_args(&body, &blog_post_change_args())?;
    let change: BlogPostChange = parse(
        "blog post change",
        args.remove("change_dict").unwrap_or_default(),
    )?;
    {
        let properties = state
            .properties
            .read()
            .map_err(|_| anyhow::anyhow!("Property registry lock was poisoned"))?;
        validate_change_dict_for_blog_post(&change, &*properties)?;
    }
    Ok(Json(json!({ "change_dict": change })))
}

fn config_properties_args() -> HandlerArgsSchema {
    HandlerArgsSchema::new().arg(
        "new_config_property_values",
        ArgSchema::required(Schema::dict_of(Schema::Any)),
    )
}

async fn put_config_properties<T>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> HandlerResult {
    require_admin(&state, &headers)?;
    let args = validated_args(&body, &config_properties_args())?;
    let values = args["new_config_property_values"]
        .as_object()
        .cloned()
        .unwrap_or_default();

    let mut properties = state
        .properties
        .write()
        .map_err(|_| anyhow::anyhow!("Property registry lock was poisoned"))?;
    let normalized = validate_new_config_property_values(&values, &*properties)?;
    for (name, value) in &normalized {
        properties.set_value(name, value)?;
        info!("Updated config property {}", name);
    }
    Ok(Json(Value::Object(normalized)))
}

pub fn build_router<T: MachineTranslator + 'static>(state: AppState<T>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/machine_translation", post(machine_translation::<T>))
        .route(
            "/machine_translation/metrics",
            get(machine_translation_metrics::<T>),
        )
        .route("/entity_translations", put(put_entity_translations::<T>))
        .route("/entity_translations/gaps", post(entity_translation_gaps::<T>))
        .route(
            "/entity_translations/:entity_type/:entity_id/:version/:language_code",
            get(get_entity_translations::<T>),
        )
        .route("/voiceover/admin_data", get(voiceover_admin_data::<T>))
        .route(
            "/voiceover/language_codes_mapping",
            put(put_language_codes_mapping::<T>),
        )
        .route(
            "/entity_voiceovers/:entity_type/:entity_id/:version/:language_accent_code",
            get(get_entity_voiceovers::<T>),
        )
        .route("/blog_post/change", put(blog_post_change::<T>))
        .route("/config_properties", put(put_config_properties::<T>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
