// File: ./src/client/core.rs
use crate::client::cert::tls_config;
use crate::client::error::ApiError;
use crate::model::{Meal, MealPlan, MealPlanId, Participant, User};
use crate::week::format_iso;

use chrono::NaiveDate;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use http::{Method, Request, StatusCode, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tower::ServiceExt;
use tower_http::auth::AddAuthorization;
use tracing::{debug, info, warn};
use validator::Validate;

type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Filter for `GET /meals`. Dates are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealQuery {
    pub meal_plan_id: MealPlanId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl MealQuery {
    pub fn for_plan(meal_plan_id: MealPlanId) -> Self {
        Self {
            meal_plan_id,
            start_date: None,
            end_date: None,
        }
    }

    pub fn between(meal_plan_id: MealPlanId, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            meal_plan_id,
            start_date: Some(start),
            end_date: Some(end),
        }
    }

    pub fn matches(&self, meal: &Meal) -> bool {
        meal.meal_plan_id == self.meal_plan_id
            && self.start_date.is_none_or(|start| meal.date >= start)
            && self.end_date.is_none_or(|end| meal.date <= end)
    }

    fn to_query_string(self) -> String {
        let mut parts = vec![format!("meal_plan_id={}", self.meal_plan_id)];
        if let Some(start) = self.start_date {
            parts.push(format!("start_date={}", format_iso(start)));
        }
        if let Some(end) = self.end_date {
            parts.push(format!("end_date={}", format_iso(end)));
        }
        parts.join("&")
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: HttpsClient,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>, insecure: bool) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let uri: Uri = base_url
            .parse()
            .map_err(|e: http::uri::InvalidUri| ApiError::InvalidUrl(e.to_string()))?;
        let https = match uri.scheme_str() {
            Some("https") => true,
            Some("http") => false,
            _ => return Err(ApiError::InvalidUrl(base_url)),
        };

        let token = token.map(str::trim).filter(|t| !t.is_empty());
        if let Some(t) = token {
            HeaderValue::from_str(&format!("Bearer {}", t)).map_err(|_| ApiError::InvalidToken)?;
        }

        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config(insecure, https)?)
            .https_or_http()
            .enable_http1()
            .build();
        let http = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            http,
            base_url,
            token: token.map(str::to_string),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_meal_plans(&self) -> Result<Vec<MealPlan>, ApiError> {
        let body = self.get("/meal_plans").await?;
        decode_list(&body)
    }

    pub async fn get_meal_plan(&self, id: MealPlanId) -> Result<MealPlan, ApiError> {
        let body = self.get(&format!("/meal_plans/{}", id)).await?;
        decode_one(&body)
    }

    pub async fn get_meals(&self, query: MealQuery) -> Result<Vec<Meal>, ApiError> {
        let body = self
            .get(&format!("/meals?{}", query.to_query_string()))
            .await?;
        decode_list(&body)
    }

    pub async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        let body = self.get("/users").await?;
        decode_list(&body)
    }

    pub async fn get_participants(&self, plan_id: MealPlanId) -> Result<Vec<Participant>, ApiError> {
        let body = self
            .get(&format!("/meal_plan_participants?meal_plan_id={}", plan_id))
            .await?;
        decode_list(&body)
    }

    async fn get(&self, path_and_query: &str) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let uri: Uri = url
            .parse()
            .map_err(|e: http::uri::InvalidUri| ApiError::InvalidUrl(e.to_string()))?;

        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(String::new())
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!("GET {}", url);
        let (status, bytes) = tokio::time::timeout(self.timeout, self.send(req))
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))??;

        if status.is_success() {
            info!("GET {} -> {} ({} bytes)", path_and_query, status, bytes.len());
            return Ok(bytes);
        }
        warn!("GET {} -> {}", path_and_query, status);
        Err(status_error(status, path_and_query, &bytes))
    }

    async fn send(&self, req: Request<String>) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let resp = match &self.token {
            Some(token) => AddAuthorization::bearer(self.http.clone(), token)
                .oneshot(req)
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?,
            None => self
                .http
                .request(req)
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?,
        };

        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .to_bytes();
        Ok((status, bytes.to_vec()))
    }
}

fn status_error(status: StatusCode, path: &str, body: &[u8]) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound(path.to_string()),
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        _ => {
            let message = serde_json::from_slice::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            ApiError::Status { status, message }
        }
    }
}

pub fn decode_one<T: DeserializeOwned + Validate>(body: &[u8]) -> Result<T, ApiError> {
    let item: T = serde_json::from_slice(body)?;
    item.validate()?;
    Ok(item)
}

pub fn decode_list<T: DeserializeOwned + Validate>(body: &[u8]) -> Result<Vec<T>, ApiError> {
    let items: Vec<T> = serde_json::from_slice(body)?;
    for item in &items {
        item.validate()?;
    }
    Ok(items)
}
