use utoipa::OpenApi;
use utoipa_swagger_ui::{SwaggerUi, Url};

use crate::api::handlers::{HealthResponse, InfoResponse, TextResponse};
use crate::errors::{ErrorCode, ErrorResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Twiggle API Documentation",
        version = "1.0",
        description = "API endpoints for Urban Garden Planner",
    ),
    paths(
        crate::api::handlers::test,
        crate::api::handlers::test_error,
        crate::api::handlers::test_server_error,
    ),
    components(schemas(TextResponse, ErrorResponse, ErrorCode)),
    tags(
        (name = "test", description = "Connectivity and error handling checks"),
    )
)]
pub struct ApplicationApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Actuator API Documentation",
        version = "1.0",
        description = "API endpoints for application monitoring and management",
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::info,
        crate::metrics::metrics_handler,
    ),
    components(schemas(HealthResponse, InfoResponse, ErrorResponse, ErrorCode)),
    tags(
        (name = "actuator", description = "Health, info and metrics"),
    )
)]
pub struct ActuatorApiDoc;

/// A separately published slice of the API
pub struct ApiGroup {
    pub name: &'static str,
    /// Every path in the group starts with this prefix
    pub path_prefix: &'static str,
    /// Where the group's document is served
    pub document_url: &'static str,
    pub openapi: fn() -> utoipa::openapi::OpenApi,
}

pub const APPLICATION_GROUP: ApiGroup = ApiGroup {
    name: "Application API",
    path_prefix: "/api/",
    document_url: "/api-docs/application.json",
    openapi: ApplicationApiDoc::openapi,
};

pub const ACTUATOR_GROUP: ApiGroup = ApiGroup {
    name: "Actuator API",
    path_prefix: "/actuator/",
    document_url: "/api-docs/actuator.json",
    openapi: ActuatorApiDoc::openapi,
};

pub fn api_groups() -> [ApiGroup; 2] {
    [APPLICATION_GROUP, ACTUATOR_GROUP]
}

/// Look a group up by name, case-insensitively, or by its short alias
pub fn find_group(name: &str) -> Option<ApiGroup> {
    api_groups().into_iter().find(|group| {
        group.name.eq_ignore_ascii_case(name)
            || group
                .path_prefix
                .trim_matches('/')
                .eq_ignore_ascii_case(name)
            || group
                .name
                .split_whitespace()
                .next()
                .is_some_and(|alias| alias.eq_ignore_ascii_case(name))
    })
}

/// Swagger UI with one entry per group
pub fn swagger_ui() -> SwaggerUi {
    let urls = api_groups()
        .into_iter()
        .map(|group| (Url::new(group.name, group.document_url), (group.openapi)()))
        .collect();

    SwaggerUi::new("/swagger-ui").urls(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_group_metadata() {
        let doc = ApplicationApiDoc::openapi();
        assert_eq!(doc.info.title, "Twiggle API Documentation");
        assert_eq!(
            doc.info.description.as_deref(),
            Some("API endpoints for Urban Garden Planner")
        );
        assert_eq!(doc.info.version, "1.0");
    }

    #[test]
    fn test_actuator_group_metadata() {
        let doc = ActuatorApiDoc::openapi();
        assert_eq!(doc.info.title, "Actuator API Documentation");
        assert_eq!(
            doc.info.description.as_deref(),
            Some("API endpoints for application monitoring and management")
        );
        assert_eq!(doc.info.version, "1.0");
    }

    #[test]
    fn test_groups_only_contain_their_paths() {
        for group in api_groups() {
            let doc = (group.openapi)();
            assert!(!doc.paths.paths.is_empty(), "{} is empty", group.name);
            for path in doc.paths.paths.keys() {
                assert!(
                    path.starts_with(group.path_prefix),
                    "{path} does not belong in {}",
                    group.name
                );
            }
        }
    }

    #[test]
    fn test_application_group_documents_test_endpoints() {
        let doc = ApplicationApiDoc::openapi();
        for path in ["/api/v1/test", "/api/v1/test-error", "/api/v1/test-server-error"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_find_group() {
        assert_eq!(find_group("Application API").unwrap().name, "Application API");
        assert_eq!(find_group("actuator").unwrap().name, "Actuator API");
        assert_eq!(find_group("application").unwrap().path_prefix, "/api/");
        assert_eq!(find_group("api").unwrap().name, "Application API");
        assert!(find_group("graphql").is_none());
    }
}
