//! Publication of the analysis result schema.

use axum::Router;
use axum::routing::get;
use flowsight_core::schema::json_schema;
use schemars::Schema;

use crate::extract::Json;
use crate::service::ServiceState;

/// Tracing target for schema requests.
const TRACING_TARGET: &str = "flowsight_server::handler::schema";

/// Returns the JSON Schema every analysis result is checked against.
async fn analysis_schema() -> Json<Schema> {
    tracing::debug!(target: TRACING_TARGET, "Analysis schema requested");
    Json(json_schema())
}

/// Returns a [`Router`] with the schema route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/api/schema", get(analysis_schema))
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::handler::test::create_test_server_with_state;
    use crate::service::ServiceState;

    #[tokio::test]
    async fn schema_describes_analysis_result() -> anyhow::Result<()> {
        let server = create_test_server_with_state(ServiceState::default())?;

        let response = server.get("/api/schema").await;
        response.assert_status_ok();
        assert_eq!(response.header("access-control-allow-origin"), "*");

        let schema = response.json::<Value>();
        let properties = schema["properties"].as_object().expect("object schema");
        for field in ["title", "states", "transitions", "gaps", "suggestions", "confidence"] {
            assert!(properties.contains_key(field), "missing {field}");
        }

        Ok(())
    }
}
