use serde::{Deserialize, Serialize};

use crate::contract::{EngineRequest, EngineResponse};
use crate::session::{Session, SessionError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: EngineResponse },
    Err { error: ErrorResponse },
}

pub fn handle_request(session: &mut Session, request: EngineRequest) -> TransportResponse {
    match session.handle_command(request) {
        Ok(response) => TransportResponse::Ok { response },
        Err(error) => TransportResponse::Err {
            error: map_session_error(error),
        },
    }
}

pub fn handle_json(session: &mut Session, payload: &str) -> String {
    let response = match serde_json::from_str::<EngineRequest>(payload) {
        Ok(request) => handle_request(session, request),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
        },
    };

    encode(&response)
}

fn encode(response: &TransportResponse) -> String {
    match serde_json::to_string(response) {
        Ok(encoded) => encoded,
        Err(error) => {
            tracing::error!(%error, "failed to encode transport response");
            r#"{"status":"err","error":{"code":"invalid_request","message":"unencodable response"}}"#
                .to_string()
        }
    }
}

fn map_session_error(error: SessionError) -> ErrorResponse {
    match error {
        SessionError::InvalidRequest(message) => ErrorResponse {
            code: ErrorCode::InvalidRequest,
            message,
        },
        SessionError::Config(message) => ErrorResponse {
            code: ErrorCode::Config,
            message,
        },
    }
}
