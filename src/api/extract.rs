//! Extractors that fail with a [`Fault`] instead of axum's plain-text
//! rejections, so extraction errors share the canonical error body.

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::{header, request::Parts, Uri},
    Json,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;

use crate::errors::{ConstraintViolation, Fault, FieldError};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Field-level checks run after a body deserializes
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Collects field errors in the order they are found
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field` unless `ok` holds
    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.0.push(FieldError::new(field, message));
        }
        self
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

/// Collects constraint violations on handler inputs
#[derive(Debug, Default)]
pub struct ConstraintViolations(Vec<ConstraintViolation>);

impl ConstraintViolations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, path: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.0.push(ConstraintViolation::new(path, message));
        }
        self
    }

    pub fn finish(self) -> Result<(), Fault> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Fault::ConstraintViolation(self.0))
        }
    }
}

/// JSON body that is deserialized and then validated
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Fault;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| json_rejection_to_fault(rejection, content_type))?;

        value.validate().map_err(Fault::Validation)?;
        Ok(Self(value))
    }
}

fn json_rejection_to_fault(rejection: JsonRejection, content_type: Option<String>) -> Fault {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => Fault::UnsupportedMediaType {
            content_type: content_type.unwrap_or_else(|| "none".to_string()),
            supported: vec![JSON_MEDIA_TYPE.to_string()],
        },
        JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
            Fault::MalformedJson(rejection.body_text())
        }
        other => Fault::Unknown(anyhow::anyhow!(other.body_text())),
    }
}

/// Query string parameters with typed, fault-raising accessors
#[derive(Debug, Clone, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn from_uri(uri: &Uri) -> Result<Self, Fault> {
        let Query(params) = Query::<HashMap<String, String>>::try_from_uri(uri)
            .map_err(|rejection| Fault::InvalidArgument(rejection.body_text()))?;
        Ok(Self(params))
    }

    /// Parse a parameter that must be present
    pub fn required<T: FromStr>(&self, name: &str) -> Result<T, Fault> {
        let raw = self
            .0
            .get(name)
            .ok_or_else(|| Fault::MissingParameter(name.to_string()))?;
        parse_param(name, raw)
    }

    pub fn optional<T: FromStr>(&self, name: &str) -> Result<Option<T>, Fault> {
        self.0
            .get(name)
            .map(|raw| parse_param(name, raw))
            .transpose()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Fault;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_uri(&parts.uri)
    }
}

fn parse_param<T: FromStr>(name: &str, raw: &str) -> Result<T, Fault> {
    raw.parse::<T>().map_err(|_| Fault::TypeMismatch {
        name: name.to_string(),
        expected: short_type_name::<T>(),
    })
}

/// Type name without module paths: `Option<alloc::string::String>` -> `Option<String>`
fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let mut short = String::with_capacity(full.len());
    let mut segment_start = 0;

    for (index, ch) in full.char_indices() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            short.push_str(last_path_segment(&full[segment_start..index]));
            short.push(ch);
            segment_start = index + ch.len_utf8();
        }
    }
    short.push_str(last_path_segment(&full[segment_start..]));
    short
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct NewBed {
        name: String,
        width_cm: i32,
    }

    impl Validate for NewBed {
        fn validate(&self) -> Result<(), Vec<FieldError>> {
            let mut errors = FieldErrors::new();
            errors
                .check("name", !self.name.trim().is_empty(), "must not be blank")
                .check("width_cm", self.width_cm > 0, "must be greater than 0");
            errors.finish()
        }
    }

    fn json_request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/beds");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_valid_json_accepts_valid_body() {
        let request = json_request(Some(JSON_MEDIA_TYPE), r#"{"name":"Herbs","width_cm":80}"#);
        let ValidJson(bed) = ValidJson::<NewBed>::from_request(request, &()).await.unwrap();
        assert_eq!(bed.name, "Herbs");
        assert_eq!(bed.width_cm, 80);
    }

    #[tokio::test]
    async fn test_valid_json_reports_all_field_errors() {
        let request = json_request(Some(JSON_MEDIA_TYPE), r#"{"name":" ","width_cm":0}"#);
        let fault = ValidJson::<NewBed>::from_request(request, &())
            .await
            .unwrap_err();

        match fault {
            Fault::Validation(errors) => {
                let lines: Vec<_> = errors.iter().map(ToString::to_string).collect();
                assert_eq!(
                    lines,
                    vec!["name: must not be blank", "width_cm: must be greater than 0"]
                );
            }
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_valid_json_rejects_plain_text() {
        let request = json_request(Some("text/plain"), r#"{"name":"Herbs","width_cm":80}"#);
        let fault = ValidJson::<NewBed>::from_request(request, &())
            .await
            .unwrap_err();

        match fault {
            Fault::UnsupportedMediaType {
                content_type,
                supported,
            } => {
                assert_eq!(content_type, "text/plain");
                assert_eq!(supported, vec![JSON_MEDIA_TYPE]);
            }
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_valid_json_without_content_type() {
        let request = json_request(None, "{}");
        let fault = ValidJson::<NewBed>::from_request(request, &())
            .await
            .unwrap_err();
        assert!(matches!(
            fault,
            Fault::UnsupportedMediaType { ref content_type, .. } if content_type == "none"
        ));
    }

    #[tokio::test]
    async fn test_valid_json_reports_malformed_body() {
        let request = json_request(Some(JSON_MEDIA_TYPE), r#"{"name": "Herbs""#);
        let fault = ValidJson::<NewBed>::from_request(request, &())
            .await
            .unwrap_err();
        assert!(matches!(fault, Fault::MalformedJson(_)));

        let request = json_request(Some(JSON_MEDIA_TYPE), r#"{"name":"Herbs","width_cm":"wide"}"#);
        let fault = ValidJson::<NewBed>::from_request(request, &())
            .await
            .unwrap_err();
        assert!(matches!(fault, Fault::MalformedJson(_)));
    }

    #[test]
    fn test_query_required_and_optional() {
        let params = QueryParams::from_uri(&"/plants?page=2&name=basil".parse().unwrap()).unwrap();

        assert_eq!(params.required::<u32>("page").unwrap(), 2);
        assert_eq!(params.required::<String>("name").unwrap(), "basil");
        assert_eq!(params.optional::<u32>("size").unwrap(), None);
    }

    #[test]
    fn test_query_missing_parameter() {
        let params = QueryParams::from_uri(&"/plants".parse().unwrap()).unwrap();
        let fault = params.required::<u32>("page").unwrap_err();
        assert!(matches!(fault, Fault::MissingParameter(ref name) if name == "page"));
    }

    #[test]
    fn test_query_type_mismatch() {
        let params = QueryParams::from_uri(&"/plants?page=two".parse().unwrap()).unwrap();
        let fault = params.optional::<i32>("page").unwrap_err();

        match fault {
            Fault::TypeMismatch { name, expected } => {
                assert_eq!(name, "page");
                assert_eq!(expected, "i32");
            }
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<String>(), "String");
        assert_eq!(short_type_name::<u64>(), "u64");
        assert_eq!(short_type_name::<Option<String>>(), "Option<String>");
        assert_eq!(
            short_type_name::<HashMap<String, Vec<u32>>>(),
            "HashMap<String, Vec<u32>>"
        );
    }

    #[test]
    fn test_constraint_violations_collector() {
        let mut violations = ConstraintViolations::new();
        violations
            .check("page", true, "must be at least 1")
            .check("size", false, "must be at most 100");

        match violations.finish().unwrap_err() {
            Fault::ConstraintViolation(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].to_string(), "size: must be at most 100");
            }
            other => panic!("unexpected fault: {other:?}"),
        }

        assert!(ConstraintViolations::new().finish().is_ok());
    }
}
