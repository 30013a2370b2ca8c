//! 문자열 처리 유틸리티
//!
//! 요청 DTO 정리, 검색어 이스케이프, 업로드 파일 이름 정리에 사용하는 함수들입니다.

use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use crate::errors::AppError;

/// 필수 문자열을 검증하고 앞뒤 공백을 제거합니다.
///
/// # Errors
///
/// 공백만 있거나 비어 있으면 `AppError::ValidationError`
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            format!("{}은(는) 필수입니다", field_name)
        ));
    }
    Ok(trimmed.to_string())
}

/// 선택 문자열을 정리합니다. 공백뿐인 값은 `None`이 됩니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// `#[serde(deserialize_with = "...")]`용 선택 문자열 역직렬화기
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 경로/쿼리로 받은 16진수 ID를 `ObjectId`로 변환합니다.
///
/// # Errors
///
/// 24자리 16진수가 아니면 `AppError::ValidationError`
pub fn parse_object_id(value: &str, field_name: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(value.trim())
        .map_err(|_| AppError::ValidationError(format!("유효하지 않은 {} 형식입니다", field_name)))
}

/// MongoDB `$regex` 검색어에 들어갈 사용자 입력의 메타 문자를 이스케이프합니다.
pub fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 업로드 파일 이름에서 경로 구분자와 제어 문자를 제거합니다.
///
/// 결과가 비어 있으면 `"file"`을 반환합니다.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .trim_start_matches('.')
        .to_string();

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.chars().take(255).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex(), "게임 ID").unwrap(), id);
        assert!(matches!(
            parse_object_id("not-an-id", "게임 ID"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_required_string() {
        assert_eq!(validate_required_string("Zelda", "title").unwrap(), "Zelda");
        assert_eq!(validate_required_string("  Mario Kart  ", "title").unwrap(), "Mario Kart");

        assert!(validate_required_string("", "title").is_err());
        assert!(validate_required_string("\t\n", "title").is_err());
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  RPG  ".to_string())), Some("RPG".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct GenreHolder {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            genre: Option<String>,
        }

        let result: GenreHolder = serde_json::from_str(r#"{"genre": "  액션  "}"#).unwrap();
        assert_eq!(result.genre, Some("액션".to_string()));

        let result: GenreHolder = serde_json::from_str(r#"{"genre": "   "}"#).unwrap();
        assert_eq!(result.genre, None);

        let result: GenreHolder = serde_json::from_str(r#"{"genre": null}"#).unwrap();
        assert_eq!(result.genre, None);

        let result: GenreHolder = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(result.genre, None);
    }

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex("zelda"), "zelda");
        assert_eq!(escape_regex("F1 (2023)"), "F1 \\(2023\\)");
        assert_eq!(escape_regex(".*"), "\\.\\*");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("manual.pdf"), "manual.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\box art.png"), "box art.png");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name("  "), "file");
        assert_eq!(sanitize_file_name("dir/"), "file");
    }
}
