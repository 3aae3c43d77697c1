//! 에러 타입 정의 모듈
//!
//! jprofile에서 발생할 수 있는 모든 에러 타입을 정의합니다.

use std::path::PathBuf;
use thiserror::Error;

/// jprofile에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum ProfileError {
    /// 루트 경로가 존재하지 않음
    #[error("루트 경로를 찾을 수 없습니다: {path}")]
    RootNotFound { path: PathBuf },

    /// 입력 파일 열기 실패
    #[error("파일을 열 수 없습니다 ({file}): {reason}")]
    FileOpenError { file: PathBuf, reason: String },

    /// JSONL / JSON 어느 쪽으로도 파싱 불가
    #[error("JSON/JSONL 파싱 실패 ({file}): {reason}")]
    ParseError { file: PathBuf, reason: String },

    /// 최상위 값이 객체나 배열이 아님
    #[error("지원하지 않는 JSON 루트 타입 ({file}): {kind}")]
    UnsupportedRoot { file: PathBuf, kind: String },

    /// 유효하지 않은 패턴
    #[error("유효하지 않은 패턴: {pattern}")]
    InvalidPattern { pattern: String },

    /// 샘플링 비율이 [0, 1] 범위를 벗어남
    #[error("샘플링 비율은 0.0 이상 1.0 이하여야 합니다: {rate}")]
    InvalidSampleRate { rate: f64 },

    /// 리포트 직렬화 실패
    #[error("리포트 직렬화 실패: {reason}")]
    SerializeError { reason: String },

    /// 리포트 쓰기 실패
    #[error("리포트 쓰기 실패 ({path}): {reason}")]
    WriteError { path: PathBuf, reason: String },
}

/// jprofile 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ProfileError>;
