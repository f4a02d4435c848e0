//! Fetch a composed supergraph SDL from Apollo Studio.

use serde::Deserialize;
use serde_json::json;

use crate::config::UplinkSettings;
use crate::error::UplinkError;

const SUPERGRAPH_QUERY: &str = r#"query SupergraphFetchQuery($graph_id: ID!, $variant: String!) {
  frontendUrlRoot
  service(id: $graph_id) {
    variants {
      name
    }
    schemaTag(tag: $variant) {
      compositionResult {
        __typename
        supergraphSdl
        graphCompositionID
      }
    }
    mostRecentCompositionPublish(graphVariant: $variant) {
      errors {
        message
        code
      }
    }
  }
}
"#;

const OPERATION_NAME: &str = "SupergraphFetchQuery";

/// A graph ref split into `<graph>@<variant>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRef {
    pub graph_id: String,
    pub variant: String,
}

impl GraphRef {
    pub fn parse(graph_ref: &str) -> Result<Self, UplinkError> {
        match graph_ref.split('@').collect::<Vec<_>>().as_slice() {
            [graph_id, variant] if !graph_id.is_empty() && !variant.is_empty() => Ok(Self {
                graph_id: graph_id.to_string(),
                variant: variant.to_string(),
            }),
            _ => Err(UplinkError::InvalidGraphRef(graph_ref.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SupergraphResult {
    data: Option<SupergraphFetch>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SupergraphFetch {
    service: Option<ServiceResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceResult {
    schema_tag: Option<SchemaTag>,
    most_recent_composition_publish: Option<CompositionPublish>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaTag {
    composition_result: Option<CompositionResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompositionResult {
    supergraph_sdl: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompositionPublish {
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Download the supergraph SDL for `graph_ref` with a blocking client.
///
/// Must not be called from inside a tokio runtime.
pub fn fetch_supergraph(
    settings: &UplinkSettings,
    graph_ref: &str,
    api_key: &str,
) -> Result<String, UplinkError> {
    let graph = GraphRef::parse(graph_ref)?;
    tracing::debug!(graph_ref = %graph_ref, endpoint = %settings.endpoint, "Fetching supergraph");

    // reqwest is built without a default crypto provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let body = json!({
        "variables": {
            "graph_id": graph.graph_id,
            "variant": graph.variant,
        },
        "query": SUPERGRAPH_QUERY,
        "operationName": OPERATION_NAME,
    });

    let client = reqwest::blocking::Client::builder()
        .pool_max_idle_per_host(0)
        .build()?;
    let response = client
        .post(&settings.endpoint)
        .header("Accept", "*/*")
        .header("X-API-Key", api_key)
        .header("apollographql-client-name", &settings.client_name)
        .header("apollographql-client-version", &settings.client_version)
        .json(&body)
        .send()?
        .error_for_status()?;

    let result: SupergraphResult = response.json()?;
    extract_sdl(result, graph_ref)
}

fn extract_sdl(result: SupergraphResult, graph_ref: &str) -> Result<String, UplinkError> {
    if !result.errors.is_empty() {
        return Err(UplinkError::Api(join_messages(&result.errors)));
    }

    let service = result
        .data
        .and_then(|data| data.service)
        .ok_or_else(|| UplinkError::Api(format!("Graph {} not found or not accessible", graph_ref)))?;

    let sdl = service
        .schema_tag
        .and_then(|tag| tag.composition_result)
        .and_then(|result| result.supergraph_sdl);

    match sdl {
        Some(sdl) => Ok(sdl),
        None => match service.most_recent_composition_publish {
            Some(publish) if !publish.errors.is_empty() => {
                Err(UplinkError::Api(join_messages(&publish.errors)))
            }
            _ => Err(UplinkError::MissingSdl(graph_ref.to_string())),
        },
    }
}

fn join_messages(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> SupergraphResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_graph_ref() {
        assert_eq!(
            GraphRef::parse("my-graph@current").unwrap(),
            GraphRef {
                graph_id: "my-graph".to_string(),
                variant: "current".to_string()
            }
        );
        assert!(GraphRef::parse("my-graph").is_err());
        assert!(GraphRef::parse("a@b@c").is_err());
        assert!(GraphRef::parse("@current").is_err());
    }

    #[test]
    fn test_extract_sdl() {
        let result = parse(json!({
            "data": {
                "frontendUrlRoot": "https://studio.apollographql.com",
                "service": {
                    "schemaTag": {
                        "compositionResult": {
                            "__typename": "CompositionPublishResult",
                            "supergraphSdl": "type Query { a: String }",
                            "graphCompositionID": "abc"
                        }
                    },
                    "mostRecentCompositionPublish": { "errors": [] }
                }
            }
        }));
        assert_eq!(extract_sdl(result, "g@v").unwrap(), "type Query { a: String }");
    }

    #[test]
    fn test_extract_sdl_reports_composition_errors() {
        let result = parse(json!({
            "data": {
                "service": {
                    "schemaTag": null,
                    "mostRecentCompositionPublish": {
                        "errors": [{ "message": "boom", "code": "X" }]
                    }
                }
            }
        }));
        assert!(matches!(extract_sdl(result, "g@v"), Err(UplinkError::Api(msg)) if msg == "boom"));
    }

    #[test]
    fn test_extract_sdl_missing() {
        let result = parse(json!({
            "data": { "service": { "schemaTag": null, "mostRecentCompositionPublish": null } }
        }));
        assert!(matches!(extract_sdl(result, "g@v"), Err(UplinkError::MissingSdl(_))));

        let result = parse(json!({ "data": null, "errors": [{ "message": "unauthorized" }] }));
        assert!(matches!(extract_sdl(result, "g@v"), Err(UplinkError::Api(msg)) if msg == "unauthorized"));
    }
}
