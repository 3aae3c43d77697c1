//! jprofile - JSON/JSONL SCHEMA PROFILER
//!
//! 폴더 내 JSON / JSONL 레코드를 읽어 필드 경로별 스키마 프로파일을 계산하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🌳 **중첩 경로 집계**: `message.role`, `messages[].content` 형태의 경로로 중첩 객체와 배열을 집계
//! - 📏 **비용 제한**: 최대 깊이와 배열당 요소 수로 순회 범위 제한
//! - 📊 **경로별 통계**: 개수, 커버리지, 타입 분포, 문자열 길이 통계
//! - 🔎 **예시 요약**: 긴 문자열은 잘라내고 배열/객체는 모양만 보관
//! - 🎲 **샘플링**: 레코드 단위 샘플링 (시드 지정 가능)
//! - 🔍 **패턴 필터링**: glob 형식의 파일 이름 필터링
//! - 🎨 **컬러 출력**: 진행률과 통계는 표준 에러, 리포트는 표준 출력
//!
//! # 예제
//!
//! ```bash
//! # 기본 사용법
//! jprofile -r ./logs
//!
//! # 파일로 저장
//! jprofile -r ./logs -o profile.json --label codex
//!
//! # 10% 샘플링
//! jprofile -r ./logs --sample-rate 0.1 --seed 42
//! ```

pub mod cli;
pub mod error;
pub mod filter;
pub mod profile;
pub mod report;
pub mod source;
pub mod stats;
pub mod summary;

// Re-exports for convenient access
pub use cli::Args;
pub use error::{ProfileError, Result};
pub use filter::FileFilter;
pub use profile::{profile_root, walk, FieldStore, ProfileOptions, ProfileRun, Profiler};
pub use report::{FieldReport, ProfileReport};
pub use stats::{format_bytes, RunStatistics};
pub use summary::{summarize, type_tag, Summary};
