//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::Parser;
use std::path::PathBuf;

use crate::profile::{
    ProfileOptions, DEFAULT_MAX_ARRAY_ITEMS, DEFAULT_MAX_DEPTH, DEFAULT_MAX_EXAMPLES_PER_KEY,
    DEFAULT_MAX_STRING_EXAMPLE_LEN,
};

/// jprofile CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "jprofile",
    author = "YourName <your@email.com>",
    version,
    about = "JSON/JSONL SCHEMA PROFILER - 필드 경로별 개수, 커버리지, 타입, 예시, 문자열 길이 통계",
    long_about = r#"
JSON/JSONL SCHEMA PROFILER
==========================

지정된 폴더 아래의 모든 .json / .jsonl 파일을 읽어
필드 경로별 스키마 프로파일을 JSON으로 출력합니다.

경로 예시:
  message.role          중첩 객체 키
  messages[].content    배열 요소 (인덱스 없이 한 경로로 집계)

예제:
  jprofile -r ./logs
  jprofile -r ./logs -o profile.json --label codex
  jprofile -r ./logs --sample-rate 0.1 --seed 42
  jprofile -r ./logs --max-depth 1 --max-array-items 10
"#
)]
pub struct Args {
    /// JSON/JSONL 파일들이 있는 루트 폴더 (또는 단일 파일)
    #[arg(short, long)]
    pub root: PathBuf,

    /// 리포트에 그대로 붙일 데이터셋 라벨
    #[arg(short, long)]
    pub label: Option<String>,

    /// 리포트 파일 경로 (없으면 표준 출력)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// 경로별 예시 최대 개수
    #[arg(long, default_value_t = DEFAULT_MAX_EXAMPLES_PER_KEY)]
    pub max_examples_per_key: usize,

    /// 문자열 예시 최대 문자 수 (초과분은 잘림)
    #[arg(long, default_value_t = DEFAULT_MAX_STRING_EXAMPLE_LEN)]
    pub max_string_example_len: usize,

    /// 레코드 샘플링 비율 [0, 1] (예: 0.1 = 10%)
    #[arg(long, default_value_t = 1.0)]
    pub sample_rate: f64,

    /// 최대 중첩 깊이 (0 = 최상위 필드만)
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// 배열 하나에서 따라가는 최대 요소 수
    #[arg(long, default_value_t = DEFAULT_MAX_ARRAY_ITEMS)]
    pub max_array_items: usize,

    /// 파일 이름 패턴 필터 (glob 형식, 예: "session-*.jsonl")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// 샘플링 난수 시드 (재현 가능한 샘플링)
    #[arg(long)]
    pub seed: Option<u64>,

    /// 한 줄 JSON 출력 (기본값: pretty)
    #[arg(long)]
    pub compact: bool,

    /// 헤더, 진행률, 요약 출력 생략
    #[arg(short, long)]
    pub quiet: bool,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 인자를 프로파일 옵션으로 변환
    pub fn profile_options(&self) -> ProfileOptions {
        ProfileOptions::new()
            .with_max_examples_per_key(self.max_examples_per_key)
            .with_max_string_example_len(self.max_string_example_len)
            .with_sample_rate(self.sample_rate)
            .with_max_depth(self.max_depth)
            .with_max_array_items(self.max_array_items)
            .with_seed(self.seed)
    }
}
