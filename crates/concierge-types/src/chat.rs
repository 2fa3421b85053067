//! Wire types for the `POST /chat` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A structured JSON object recovered from a model reply.
///
/// Fields are passed through exactly as the model produced them; nothing
/// beyond "is a JSON object" is enforced.
pub type Fragment = Map<String, Value>;

/// Request body for `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user utterance to forward to the model.
    pub message: String,
    /// Session to continue; a new one is started when absent.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for `POST /chat`.
///
/// Always returned with HTTP 200, including when the model call failed (the
/// failure is described in `reply`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
    pub booking: Option<Fragment>,
    pub map_data: Option<Fragment>,
    #[serde(default)]
    pub places_data: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_request_session_id_is_optional() {
        let req: ChatRequest = serde_json::from_value(json!({ "message": "hello" })).unwrap();
        assert_eq!(req.message, "hello");
        assert!(req.session_id.is_none());

        let req: ChatRequest =
            serde_json::from_value(json!({ "message": "hi", "session_id": null })).unwrap();
        assert!(req.session_id.is_none());
    }

    #[test]
    fn chat_request_requires_message() {
        let result = serde_json::from_value::<ChatRequest>(json!({ "session_id": "abc" }));
        assert!(result.is_err());
    }

    #[test]
    fn chat_response_serializes_unset_fragments_as_null() {
        let resp = ChatResponse {
            reply: "Namaste!".to_string(),
            session_id: "s-1".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json,
            json!({
                "reply": "Namaste!",
                "session_id": "s-1",
                "booking": null,
                "map_data": null,
                "places_data": [],
            })
        );
    }
}
