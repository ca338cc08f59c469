#![forbid(unsafe_code)]

//! Share-link exchange.
//!
//! The document is POSTed as JSON to the share endpoint. A successful
//! response is an object with a string `url`; anything else is a
//! [`MindMapError::NetworkFailure`].

use mindmap_core::{MindMapError, Result};
use mindmap_model::MapNode;
use serde::{Deserialize, Serialize};

/// Request handed to the host's HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareRequest {
    pub endpoint: String,
    pub content_type: &'static str,
    pub body: String,
}

impl ShareRequest {
    pub fn new(endpoint: impl Into<String>, document: &MapNode) -> Self {
        Self {
            endpoint: endpoint.into(),
            content_type: "application/json",
            body: document.to_json(),
        }
    }
}

/// Successful share response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Interpret the HTTP status and body returned by the share endpoint.
pub fn parse_share_response(status: u16, body: &str) -> Result<ShareLink> {
    if !(200..300).contains(&status) {
        return Err(MindMapError::network(format!("share endpoint returned HTTP {status}")));
    }
    let link: ShareLink = serde_json::from_str(body)
        .map_err(|e| MindMapError::network(format!("unexpected share response: {e}")))?;
    if link.url.is_empty() {
        return Err(MindMapError::network("share response has an empty url"));
    }
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_compact_document() {
        let request = ShareRequest::new("/api/share", &MapNode::new("A"));
        assert_eq!(request.body, r#"{"name":"A"}"#);
        assert_eq!(request.content_type, "application/json");
    }

    #[test]
    fn accepts_url_and_token() {
        let link = parse_share_response(200, r#"{"url":"/view/abc","token":"abc"}"#).unwrap();
        assert_eq!(link.url, "/view/abc");
        assert_eq!(link.token.as_deref(), Some("abc"));
    }

    #[test]
    fn rejects_other_shapes() {
        for body in ["", "[]", r#"{"token":"abc"}"#, r#"{"url":42}"#, r#"{"url":""}"#] {
            assert!(matches!(
                parse_share_response(200, body),
                Err(MindMapError::NetworkFailure { .. })
            ));
        }
        assert!(matches!(
            parse_share_response(500, r#"{"url":"/x"}"#),
            Err(MindMapError::NetworkFailure { .. })
        ));
    }
}
