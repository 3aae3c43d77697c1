//! 예시 값 요약 모듈
//!
//! 필드별 예시로 보관할 값을 크기가 제한된 형태로 변환합니다.
//! 배열과 객체는 내용 없이 모양 정보만 남깁니다.

use serde::Serialize;
use serde_json::Value;

/// 객체 요약에 담는 최대 키 개수
pub const MAX_OBJECT_KEYS_IN_SUMMARY: usize = 20;

/// 값의 타입 태그 반환
///
/// `serde_json::Value`의 모든 변형을 다루므로 분류는 항상 성공합니다.
pub fn type_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 복합 값 요약의 종류 표식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Array,
    Object,
}

/// 배열 요약: 길이와 첫 요소의 타입만 보관
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayShape {
    #[serde(rename = "__kind__")]
    pub kind: ShapeKind,
    pub len: usize,
    pub sample_type: Option<&'static str>,
}

/// 객체 요약: 앞쪽 키 목록만 보관
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectShape {
    #[serde(rename = "__kind__")]
    pub kind: ShapeKind,
    pub keys: Vec<String>,
}

/// 예시로 저장되는 요약 값
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Summary {
    /// null / bool / number (원본 그대로)
    Scalar(Value),
    /// 문자열 (필요하면 잘림 표식 포함)
    Text(String),
    Array(ArrayShape),
    Object(ObjectShape),
}

/// 값을 예시용 요약으로 변환
///
/// # Arguments
/// * `value` - 원본 JSON 값
/// * `max_string_len` - 문자열 예시의 최대 문자 수
///
/// # Examples
/// ```
/// use jprofile::summary::{summarize, Summary};
/// use serde_json::json;
///
/// assert_eq!(summarize(&json!("hi"), 200), Summary::Text("hi".to_string()));
/// assert_eq!(
///     summarize(&json!("abcdef"), 3),
///     Summary::Text("abc...(truncated, original_len=6)".to_string())
/// );
/// ```
pub fn summarize(value: &Value, max_string_len: usize) -> Summary {
    match value {
        Value::String(s) => Summary::Text(truncate_string(s, max_string_len)),
        Value::Array(items) => Summary::Array(ArrayShape {
            kind: ShapeKind::Array,
            len: items.len(),
            sample_type: items.first().map(type_tag),
        }),
        Value::Object(map) => Summary::Object(ObjectShape {
            kind: ShapeKind::Object,
            keys: map
                .keys()
                .take(MAX_OBJECT_KEYS_IN_SUMMARY)
                .cloned()
                .collect(),
        }),
        scalar => Summary::Scalar(scalar.clone()),
    }
}

/// 문자 단위로 자르고 원래 길이를 표식으로 덧붙임
fn truncate_string(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        return s.to_string();
    }

    let head: String = s.chars().take(max_len).collect();
    format!("{}...(truncated, original_len={})", head, len)
}
