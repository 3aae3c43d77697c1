//! 리포트 모듈
//!
//! 경로별 누적 통계를 최종 리포트 형태(커버리지, 평균 문자열 길이)로 변환하고
//! JSON으로 출력합니다.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ProfileError, Result};
use crate::profile::{FieldAccumulator, FieldStore};
use crate::summary::Summary;

/// 문자열 길이 통계 (리포트용)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLengthReport {
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub avg: Option<f64>,
    pub count: u64,
}

/// 경로 하나의 리포트
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
    pub count: u64,
    pub coverage: f64,
    pub types: BTreeMap<String, u64>,
    pub examples: Vec<Summary>,
    pub string_length_stats: StringLengthReport,
}

impl FieldReport {
    /// 누적 통계에서 리포트 생성
    pub fn from_accumulator(acc: &FieldAccumulator, total_records: u64) -> Self {
        let sls = &acc.string_length_stats;
        let avg = if sls.count > 0 {
            Some(sls.sum as f64 / sls.count as f64)
        } else {
            None
        };

        Self {
            count: acc.count,
            coverage: coverage(acc.count, total_records),
            types: acc.type_counts.clone(),
            examples: acc.examples.clone(),
            string_length_stats: StringLengthReport {
                min: sls.min,
                max: sls.max,
                avg,
                count: sls.count,
            },
        }
    }
}

/// 전체 프로파일 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    /// 샘플링 후 레코드 수
    pub total_records: u64,
    /// 샘플링 전 레코드 수
    pub total_records_seen: u64,
    pub sample_rate: f64,
    pub max_depth: usize,
    pub max_array_items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// 경로 → 필드 리포트
    pub keys: BTreeMap<String, FieldReport>,
}

impl ProfileReport {
    /// JSON 문자열로 직렬화 (한글 등 비 ASCII 문자는 그대로 유지)
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
        .map_err(|e| ProfileError::SerializeError {
            reason: e.to_string(),
        })
    }

    /// 리포트를 파일로 저장
    pub fn write_to(&self, path: &Path, pretty: bool) -> Result<()> {
        let text = self.to_json(pretty)?;
        let write_error = |e: std::io::Error| ProfileError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let file = File::create(path).map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", text).map_err(write_error)?;
        writer.flush().map_err(write_error)?;
        Ok(())
    }
}

/// 누적 저장소 전체를 리포트 맵으로 변환
pub fn finalize(store: &FieldStore, total_records: u64) -> BTreeMap<String, FieldReport> {
    store
        .iter()
        .map(|(path, acc)| (path.clone(), FieldReport::from_accumulator(acc, total_records)))
        .collect()
}

/// 레코드가 없으면 0.0
fn coverage(count: u64, total_records: u64) -> f64 {
    if total_records > 0 {
        count as f64 / total_records as f64
    } else {
        0.0
    }
}
