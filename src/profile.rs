//! 경로 집계 모듈
//!
//! 레코드의 값 트리를 따라 내려가며 필드 경로를 만들고, 경로별 누적 통계를 갱신합니다.
//!
//! 경로 규칙:
//! - 객체 키 `k` → `부모.k` (최상위는 `k`)
//! - 배열 요소 → `부모[]` (인덱스는 지우고 모든 요소를 한 경로로 모음)

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ProfileError, Result};
use crate::filter::FileFilter;
use crate::report::{finalize, ProfileReport};
use crate::source::{
    collect_input_files, read_records, Record, SourceFormat, DEFAULT_MMAP_THRESHOLD,
};
use crate::summary::{summarize, type_tag, Summary};

/// 경로별 예시 최대 개수 기본값
pub const DEFAULT_MAX_EXAMPLES_PER_KEY: usize = 5;
/// 문자열 예시 최대 길이 기본값
pub const DEFAULT_MAX_STRING_EXAMPLE_LEN: usize = 200;
/// 최대 중첩 깊이 기본값
pub const DEFAULT_MAX_DEPTH: usize = 3;
/// 배열 하나에서 따라가는 최대 요소 수 기본값
pub const DEFAULT_MAX_ARRAY_ITEMS: usize = 5;

/// 프로파일 옵션
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOptions {
    /// 경로별 예시 최대 개수
    pub max_examples_per_key: usize,
    /// 문자열 예시 최대 문자 수
    pub max_string_example_len: usize,
    /// 레코드 샘플링 비율 [0, 1]
    pub sample_rate: f64,
    /// 최대 중첩 깊이 (0이면 최상위 필드만)
    pub max_depth: usize,
    /// 배열 하나에서 따라가는 최대 요소 수
    pub max_array_items: usize,
    /// 샘플링 난수 시드 (None이면 OS 엔트로피)
    pub seed: Option<u64>,
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            max_examples_per_key: DEFAULT_MAX_EXAMPLES_PER_KEY,
            max_string_example_len: DEFAULT_MAX_STRING_EXAMPLE_LEN,
            sample_rate: 1.0,
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_items: DEFAULT_MAX_ARRAY_ITEMS,
            seed: None,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
        }
    }
}

impl ProfileOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 경로별 예시 개수 설정
    pub fn with_max_examples_per_key(mut self, max: usize) -> Self {
        self.max_examples_per_key = max;
        self
    }

    /// 문자열 예시 길이 설정
    pub fn with_max_string_example_len(mut self, max: usize) -> Self {
        self.max_string_example_len = max;
        self
    }

    /// 샘플링 비율 설정
    pub fn with_sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = rate;
        self
    }

    /// 최대 깊이 설정
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// 배열 요소 수 제한 설정
    pub fn with_max_array_items(mut self, max: usize) -> Self {
        self.max_array_items = max;
        self
    }

    /// 샘플링 시드 설정
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// 메모리 매핑 임계값 설정
    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }

    /// 옵션 유효성 검사
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.sample_rate) {
            return Err(ProfileError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }
        Ok(())
    }
}

/// 문자열 길이 누적 통계 (문자 단위)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringLengthStats {
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub sum: u64,
    pub count: u64,
}

impl StringLengthStats {
    /// 문자열 길이 하나 반영
    pub fn record(&mut self, len: usize) {
        if self.min.map_or(true, |min| len < min) {
            self.min = Some(len);
        }
        if self.max.map_or(true, |max| len > max) {
            self.max = Some(len);
        }
        self.sum += len as u64;
        self.count += 1;
    }
}

/// 경로 하나의 누적 통계
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAccumulator {
    /// 관측 횟수
    pub count: u64,
    /// 타입 태그별 관측 횟수
    pub type_counts: BTreeMap<String, u64>,
    /// 요약된 예시 (최대 K개, 처음 관측된 순서)
    pub examples: Vec<Summary>,
    pub string_length_stats: StringLengthStats,
}

impl FieldAccumulator {
    /// 값 하나 관측
    pub fn observe(&mut self, value: &Value, max_examples: usize, max_string_len: usize) {
        self.count += 1;
        *self.type_counts.entry(type_tag(value).to_string()).or_insert(0) += 1;

        if let Value::String(s) = value {
            self.string_length_stats.record(s.chars().count());
        }

        if self.examples.len() < max_examples {
            self.examples.push(summarize(value, max_string_len));
        }
    }
}

/// 경로 → 누적 통계 저장소
pub type FieldStore = BTreeMap<String, FieldAccumulator>;

/// 값 트리를 따라가며 저장소 갱신
///
/// 현재 노드를 먼저 관측한 뒤 재귀 여부를 결정합니다. `depth == max_depth`인
/// 노드는 자신만 관측되고, `depth > max_depth`이면 아무것도 기록하지 않습니다.
///
/// # Arguments
/// * `store` - 경로별 누적 통계
/// * `path` - 현재 값의 경로
/// * `value` - 현재 값
/// * `depth` - 현재 깊이 (최상위 필드는 0)
/// * `options` - 깊이 / 배열 / 예시 제한
pub fn walk(
    store: &mut FieldStore,
    path: &str,
    value: &Value,
    depth: usize,
    options: &ProfileOptions,
) {
    if depth > options.max_depth {
        return;
    }

    store.entry(path.to_string()).or_default().observe(
        value,
        options.max_examples_per_key,
        options.max_string_example_len,
    );

    match value {
        Value::Object(map) => {
            if depth == options.max_depth {
                return;
            }
            for (key, child) in map {
                walk(store, &child_key_path(path, key), child, depth + 1, options);
            }
        }
        Value::Array(items) => {
            if depth == options.max_depth {
                return;
            }
            let child_path = array_item_path(path);
            for item in items.iter().take(options.max_array_items) {
                walk(store, &child_path, item, depth + 1, options);
            }
        }
        _ => {}
    }
}

/// 객체 키의 자식 경로
pub fn child_key_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// 배열 요소의 자식 경로
pub fn array_item_path(parent: &str) -> String {
    format!("{}[]", parent)
}

/// 파일 하나를 처리한 결과 요약
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub format: SourceFormat,
    /// 파일에서 읽은 레코드 수 (샘플링 전)
    pub records_seen: u64,
    /// 샘플링을 통과한 레코드 수
    pub records_sampled: u64,
    /// 배열 안에서 건너뛴 비객체 요소 수
    pub skipped: usize,
    pub file_size: u64,
}

/// 레코드 단위 프로파일러
///
/// 누적 저장소와 레코드 카운터, 샘플링 난수 생성기를 소유합니다.
#[derive(Debug)]
pub struct Profiler {
    options: ProfileOptions,
    fields: FieldStore,
    total_records: u64,
    total_records_seen: u64,
    rng: StdRng,
}

impl Profiler {
    /// 새 프로파일러 생성
    pub fn new(options: ProfileOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            options,
            fields: FieldStore::new(),
            total_records: 0,
            total_records_seen: 0,
            rng,
        }
    }

    /// 현재까지의 누적 저장소
    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    /// 샘플링 후 레코드 수
    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// 샘플링 전 레코드 수
    pub fn total_records_seen(&self) -> u64 {
        self.total_records_seen
    }

    /// 레코드 하나 관측
    ///
    /// 샘플링을 통과해 집계되었으면 true를 반환합니다.
    pub fn observe_record(&mut self, record: &Record) -> bool {
        self.total_records_seen += 1;

        if !self.keep_record() {
            return false;
        }
        self.total_records += 1;

        for (key, value) in record {
            walk(&mut self.fields, key, value, 0, &self.options);
        }
        true
    }

    fn keep_record(&mut self) -> bool {
        let rate = self.options.sample_rate;
        if rate >= 1.0 {
            return true;
        }
        if rate <= 0.0 {
            return false;
        }
        sample_keeps(self.rng.random::<f64>(), rate)
    }

    /// 파일 하나를 읽어 모든 레코드 관측
    pub fn ingest_file(&mut self, path: &Path) -> Result<FileSummary> {
        let file = read_records(path, self.options.mmap_threshold)?;

        let mut records_sampled = 0;
        for record in &file.records {
            if self.observe_record(record) {
                records_sampled += 1;
            }
        }

        Ok(FileSummary {
            format: file.format,
            records_seen: file.records.len() as u64,
            records_sampled,
            skipped: file.skipped,
            file_size: file.file_size,
        })
    }

    /// 누적 통계를 최종 리포트로 변환
    pub fn finish(self, label: Option<String>) -> ProfileReport {
        ProfileReport {
            total_records: self.total_records,
            total_records_seen: self.total_records_seen,
            sample_rate: self.options.sample_rate,
            max_depth: self.options.max_depth,
            max_array_items: self.options.max_array_items,
            label,
            keys: finalize(&self.fields, self.total_records),
        }
    }
}

/// 샘플링 판정: 난수가 비율 이하이면 유지
pub fn sample_keeps(draw: f64, rate: f64) -> bool {
    draw <= rate
}

/// 전체 실행 결과
#[derive(Debug)]
pub struct ProfileRun {
    pub report: ProfileReport,
    /// 처리한 파일 수
    pub files_processed: usize,
    /// 파싱에 실패한 파일과 에러
    pub failures: Vec<(PathBuf, ProfileError)>,
}

/// 파일 하나의 처리 결과 (진행 콜백용)
#[derive(Debug)]
pub enum FileOutcome<'a> {
    Parsed(&'a FileSummary),
    Failed(&'a ProfileError),
}

/// 루트 아래의 모든 입력 파일을 프로파일
///
/// 개별 파일 실패는 `failures`에 모으고 계속 진행합니다.
pub fn profile_root(
    root: &Path,
    options: ProfileOptions,
    filter: &FileFilter,
    label: Option<String>,
) -> Result<ProfileRun> {
    if !root.exists() {
        return Err(ProfileError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let files = collect_input_files(root, filter);
    profile_files(&files, options, label, |_, _| {})
}

/// 주어진 파일들을 순서대로 프로파일
///
/// 파일마다 `on_file`이 호출되므로 호출자가 진행률이나 통계를 갱신할 수 있습니다.
pub fn profile_files<F>(
    files: &[PathBuf],
    options: ProfileOptions,
    label: Option<String>,
    mut on_file: F,
) -> Result<ProfileRun>
where
    F: FnMut(&Path, FileOutcome<'_>),
{
    options.validate()?;

    let mut profiler = Profiler::new(options);
    let mut failures = Vec::new();

    for path in files {
        match profiler.ingest_file(path) {
            Ok(summary) => on_file(path.as_path(), FileOutcome::Parsed(&summary)),
            Err(e) => {
                on_file(path.as_path(), FileOutcome::Failed(&e));
                failures.push((path.clone(), e));
            }
        }
    }

    Ok(ProfileRun {
        report: profiler.finish(label),
        files_processed: files.len(),
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile_values(values: &[Value], options: ProfileOptions) -> Profiler {
        let mut profiler = Profiler::new(options);
        for value in values {
            let record = value.as_object().unwrap();
            profiler.observe_record(record);
        }
        profiler
    }

    fn paths(profiler: &Profiler) -> Vec<&str> {
        profiler.fields().keys().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_nested_paths() {
        let profiler = profile_values(
            &[json!({"message": {"role": "user", "content": [{"text": "hi"}]}})],
            ProfileOptions::new(),
        );

        assert_eq!(
            paths(&profiler),
            vec![
                "message",
                "message.content",
                "message.content[]",
                "message.content[].text",
                "message.role",
            ]
        );
    }

    #[test]
    fn test_max_depth_zero_only_top_level() {
        let profiler = profile_values(
            &[json!({"a": {"b": 1}, "c": [1, 2], "d": "x"})],
            ProfileOptions::new().with_max_depth(0),
        );

        assert_eq!(paths(&profiler), vec!["a", "c", "d"]);
        for path in paths(&profiler) {
            assert!(!path.contains('.') && !path.contains("[]"));
        }
        // 재귀하지 않아도 자기 자신은 관측됨
        assert_eq!(profiler.fields()["a"].type_counts["object"], 1);
    }

    #[test]
    fn test_max_depth_one_boundary() {
        let profiler = profile_values(
            &[json!({"a": {"b": {"c": 1}}, "l": [[1, 2]]})],
            ProfileOptions::new().with_max_depth(1),
        );

        assert_eq!(paths(&profiler), vec!["a", "a.b", "l", "l[]"]);
        assert_eq!(profiler.fields()["a.b"].type_counts["object"], 1);
        assert_eq!(profiler.fields()["l[]"].type_counts["array"], 1);
    }

    #[test]
    fn test_walk_beyond_max_depth_records_nothing() {
        let mut store = FieldStore::new();
        let options = ProfileOptions::new().with_max_depth(1);
        walk(&mut store, "deep", &json!({"x": 1}), 2, &options);
        assert!(store.is_empty());
    }

    #[test]
    fn test_walk_with_empty_path() {
        let mut store = FieldStore::new();
        walk(&mut store, "", &json!({"k": [1]}), 0, &ProfileOptions::new());
        let keys: Vec<_> = store.keys().cloned().collect();
        assert_eq!(keys, vec!["", "k", "k[]"]);

        let mut store = FieldStore::new();
        walk(&mut store, "", &json!([true]), 0, &ProfileOptions::new());
        assert!(store.contains_key("[]"));
    }

    #[test]
    fn test_array_path_collapsing() {
        let profiler = profile_values(&[json!({"a": [1, 2, 3]})], ProfileOptions::new());
        let item = &profiler.fields()["a[]"];
        assert_eq!(item.count, 3);
        assert_eq!(item.type_counts["number"], 3);
    }

    #[test]
    fn test_array_fan_out_bound() {
        let profiler = profile_values(
            &[json!({"a": [1, 2, 3, 4, 5]}), json!({"a": ["x", "y", "z"]})],
            ProfileOptions::new().with_max_array_items(2),
        );
        // 배열 인스턴스마다 2개씩
        let item = &profiler.fields()["a[]"];
        assert_eq!(item.count, 4);
        assert_eq!(item.type_counts["number"], 2);
        assert_eq!(item.type_counts["string"], 2);
    }

    #[test]
    fn test_heterogeneous_array_items() {
        let profiler = profile_values(
            &[json!({"m": [{"t": "a"}, "s", null]})],
            ProfileOptions::new(),
        );
        let item = &profiler.fields()["m[]"];
        assert_eq!(item.count, 3);
        assert_eq!(item.type_counts.len(), 3);
        assert_eq!(profiler.fields()["m[].t"].count, 1);
    }

    #[test]
    fn test_accumulator_invariants() {
        let profiler = profile_values(
            &[
                json!({"v": "abc", "n": null}),
                json!({"v": 1}),
                json!({"v": [1]}),
                json!({"v": "z"}),
            ],
            ProfileOptions::new().with_max_examples_per_key(2),
        );

        for acc in profiler.fields().values() {
            assert_eq!(acc.count, acc.type_counts.values().sum::<u64>());
            assert!(acc.string_length_stats.count <= acc.count);
            assert!(acc.examples.len() <= 2);
        }

        let v = &profiler.fields()["v"];
        assert_eq!(v.count, 4);
        assert_eq!(
            v.examples,
            vec![Summary::Text("abc".to_string()), Summary::Scalar(json!(1))]
        );
        assert_eq!(v.string_length_stats.min, Some(1));
        assert_eq!(v.string_length_stats.max, Some(3));
        assert_eq!(v.string_length_stats.sum, 4);
        assert_eq!(v.string_length_stats.count, 2);
    }

    #[test]
    fn test_no_string_observations() {
        let mut acc = FieldAccumulator::default();
        acc.observe(&json!(5), 5, 200);
        assert_eq!(acc.string_length_stats, StringLengthStats::default());
    }

    #[test]
    fn test_sampling_extremes() {
        let records = vec![json!({"a": 1}); 20];

        let all = profile_values(&records, ProfileOptions::new().with_sample_rate(1.0));
        assert_eq!(all.total_records(), 20);
        assert_eq!(all.total_records_seen(), 20);

        let none = profile_values(&records, ProfileOptions::new().with_sample_rate(0.0));
        assert_eq!(none.total_records(), 0);
        assert_eq!(none.total_records_seen(), 20);
        assert!(none.fields().is_empty());
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let records = vec![json!({"a": 1}); 200];
        let options = ProfileOptions::new().with_sample_rate(0.5).with_seed(Some(7));

        let first = profile_values(&records, options.clone());
        let second = profile_values(&records, options);
        assert_eq!(first.total_records(), second.total_records());
        assert!(first.total_records() > 0 && first.total_records() < 200);
    }

    #[test]
    fn test_ingest_file_summary() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("batch.json");
        std::fs::write(&path, r#"[{"a": "x"}, null, {"a": "yy"}]"#).unwrap();

        let mut profiler = Profiler::new(ProfileOptions::new().with_mmap_threshold(0));
        let summary = profiler.ingest_file(&path).unwrap();

        assert_eq!(summary.format, SourceFormat::Json);
        assert_eq!(summary.records_seen, 2);
        assert_eq!(summary.records_sampled, 2);
        assert_eq!(summary.skipped, 1);

        let report = profiler.finish(Some("batch".to_string()));
        assert_eq!(report.label.as_deref(), Some("batch"));
        assert_eq!(report.keys["a"].coverage, 1.0);
        assert_eq!(report.keys["a"].string_length_stats.avg, Some(1.5));
    }

    #[test]
    fn test_sample_keeps_boundary() {
        // 난수가 비율과 같으면 유지
        assert!(sample_keeps(0.25, 0.25));
        assert!(sample_keeps(0.0, 0.25));
        assert!(!sample_keeps(0.2500001, 0.25));
    }

    #[test]
    fn test_sample_rate_zero_never_keeps() {
        let options = ProfileOptions::new().with_sample_rate(0.0).with_seed(Some(3));
        let mut profiler = Profiler::new(options);
        let record = json!({"a": 1});
        for _ in 0..100 {
            assert!(!profiler.observe_record(record.as_object().unwrap()));
        }
    }

    #[test]
    fn test_profile_files_reports_each_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let good = temp_dir.path().join("good.jsonl");
        let bad = temp_dir.path().join("bad.json");
        std::fs::write(&good, "{\"a\": 1}\n{\"a\": 2}\n").unwrap();
        std::fs::write(&bad, "{broken").unwrap();

        let mut parsed = Vec::new();
        let mut failed = Vec::new();
        let run = profile_files(
            &[good.clone(), bad.clone()],
            ProfileOptions::new(),
            None,
            |path, outcome| match outcome {
                FileOutcome::Parsed(summary) => {
                    parsed.push((path.to_path_buf(), summary.records_seen))
                }
                FileOutcome::Failed(_) => failed.push(path.to_path_buf()),
            },
        )
        .unwrap();

        assert_eq!(parsed, vec![(good, 2)]);
        assert_eq!(failed, vec![bad.clone()]);
        assert_eq!(run.files_processed, 2);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].0, bad);
        assert_eq!(run.report.total_records, 2);
    }

    #[test]
    fn test_profile_files_rejects_invalid_rate() {
        let options = ProfileOptions::new().with_sample_rate(1.5);
        let result = profile_files(&[], options, None, |_, _| {});
        assert!(matches!(result, Err(ProfileError::InvalidSampleRate { .. })));
    }

    #[test]
    fn test_validate_sample_rate() {
        assert!(ProfileOptions::new().validate().is_ok());
        assert!(ProfileOptions::new().with_sample_rate(0.0).validate().is_ok());
        assert!(matches!(
            ProfileOptions::new().with_sample_rate(1.5).validate(),
            Err(ProfileError::InvalidSampleRate { .. })
        ));
        assert!(ProfileOptions::new().with_sample_rate(-0.1).validate().is_err());
        assert!(ProfileOptions::new().with_sample_rate(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_options_builder() {
        let options = ProfileOptions::new()
            .with_max_examples_per_key(3)
            .with_max_string_example_len(10)
            .with_max_depth(1)
            .with_max_array_items(7)
            .with_seed(Some(1));

        assert_eq!(options.max_examples_per_key, 3);
        assert_eq!(options.max_string_example_len, 10);
        assert_eq!(options.max_depth, 1);
        assert_eq!(options.max_array_items, 7);
        assert_eq!(options.seed, Some(1));
        assert_eq!(options.sample_rate, 1.0);
    }
}
