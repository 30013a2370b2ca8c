use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// 클라이언트 라이브러리 에러
#[derive(Debug, Error)]
pub enum ClientError {
    /// 리프레시 실패로 저장된 토큰이 삭제됨. 다시 로그인해야 합니다.
    #[error("재인증이 필요합니다")]
    ReauthenticationRequired,

    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    /// 서버가 `{"error", "message"}` 형식으로 돌려준 에러
    #[error("API 오류 ({status}): [{code}] {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl ClientError {
    /// 실패 응답 본문을 `ClientError::Api`로 변환합니다. JSON이 아니면 본문 전체를 메시지로 씁니다.
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => ClientError::Api {
                status: status.as_u16(),
                code: parsed.error,
                message: parsed.message,
            },
            Err(_) => ClientError::Api {
                status: status.as_u16(),
                code: "unknown".to_string(),
                message: body.to_string(),
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::ReauthenticationRequired => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_server_error_body() {
        let err = ClientError::from_response_body(
            StatusCode::CONFLICT,
            r#"{"error": "conflict", "message": "이미 대여 중인 게임입니다"}"#,
        );

        match err {
            ClientError::Api { status, code, message } => {
                assert_eq!(status, 409);
                assert_eq!(code, "conflict");
                assert_eq!(message, "이미 대여 중인 게임입니다");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_json_body_is_kept_as_message() {
        let err = ClientError::from_response_body(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("upstream down"));
    }
}
