//! 레코드 소스 모듈
//!
//! 입력 파일 탐색과 JSONL / JSON 판별, 최상위 객체 레코드 추출을 담당합니다.

use memmap2::Mmap;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ProfileError, Result};
use crate::filter::FileFilter;
use crate::summary::type_tag;

/// 메모리 매핑 기본 임계값 (10MB)
pub const DEFAULT_MMAP_THRESHOLD: u64 = 10 * 1024 * 1024;

/// 하나의 레코드 (최상위 JSON 객체)
pub type Record = Map<String, Value>;

/// 파일 해석 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// 한 줄에 객체 하나
    Jsonl,
    /// 파일 전체가 하나의 JSON 문서
    Json,
}

/// 파일 하나에서 읽은 레코드
#[derive(Debug)]
pub struct FileRecords {
    /// 해석 방식
    pub format: SourceFormat,
    /// 추출된 레코드
    pub records: Vec<Record>,
    /// 배열 안에서 건너뛴 비객체 요소 수
    pub skipped: usize,
    /// 원본 파일 크기
    pub file_size: u64,
}

/// 루트 아래의 입력 파일 수집
///
/// 파일 이름 순으로 정렬된 결과를 반환합니다. 루트가 파일이면 그 파일만 검사합니다.
pub fn collect_input_files(root: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| filter.accepts(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// 파일에서 레코드 읽기
///
/// # Arguments
/// * `path` - 입력 파일 경로
/// * `mmap_threshold` - 이 크기 이상이면 메모리 매핑 사용
pub fn read_records(path: &Path, mmap_threshold: u64) -> Result<FileRecords> {
    let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    let text = if file_size >= mmap_threshold {
        read_with_mmap(path)?
    } else {
        read_with_reader(path)?
    };

    let (format, records, skipped) = parse_records(path, &text)?;

    Ok(FileRecords {
        format,
        records,
        skipped,
        file_size,
    })
}

/// 텍스트를 JSONL로 먼저 해석하고, 실패하면 전체 JSON으로 해석
pub fn parse_records(path: &Path, text: &str) -> Result<(SourceFormat, Vec<Record>, usize)> {
    if let Some(records) = parse_jsonl(text) {
        return Ok((SourceFormat::Jsonl, records, 0));
    }

    let value: Value = serde_json::from_str(text).map_err(|e| ProfileError::ParseError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Array(items) => {
            let total = items.len();
            let records: Vec<Record> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect();
            let skipped = total - records.len();
            Ok((SourceFormat::Json, records, skipped))
        }
        Value::Object(map) => Ok((SourceFormat::Json, vec![map], 0)),
        other => Err(ProfileError::UnsupportedRoot {
            file: path.to_path_buf(),
            kind: type_tag(&other).to_string(),
        }),
    }
}

/// 모든 비어 있지 않은 줄이 객체일 때만 레코드 반환
fn parse_jsonl(text: &str) -> Option<Vec<Record>> {
    let mut records = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => records.push(map),
            _ => return None,
        }
    }

    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}

/// 버퍼 리더로 파일 읽기
fn read_with_reader(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| open_error(path, e.to_string()))?;

    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| open_error(path, e.to_string()))?;

    Ok(decode_skipping_invalid(&bytes))
}

/// 메모리 매핑으로 파일 읽기 (대용량 파일용)
fn read_with_mmap(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| open_error(path, e.to_string()))?;

    let mmap = unsafe {
        Mmap::map(&file).map_err(|e| open_error(path, format!("메모리 매핑 실패: {}", e)))?
    };

    Ok(decode_skipping_invalid(&mmap))
}

/// UTF-8로 디코딩하면서 잘못된 바이트 시퀀스는 버림
pub fn decode_skipping_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

fn open_error(path: &Path, reason: String) -> ProfileError {
    ProfileError::FileOpenError {
        file: path.to_path_buf(),
        reason,
    }
}
