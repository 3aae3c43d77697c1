//! 입력 파일 필터 모듈
//!
//! 확장자(.json / .jsonl)와 glob 파일 이름 패턴으로 프로파일 대상을 고릅니다.

use glob::Pattern;
use std::path::Path;

use crate::error::{ProfileError, Result};

/// 프로파일 대상 확장자
pub const INPUT_EXTENSIONS: [&str; 2] = ["json", "jsonl"];

/// 입력 파일 필터
#[derive(Debug, Default)]
pub struct FileFilter {
    pattern: Option<Pattern>,
}

impl FileFilter {
    /// 새 필터 생성
    ///
    /// # Arguments
    /// * `pattern` - 파일 이름 글로브 패턴 (None이면 확장자만 검사)
    ///
    /// # Examples
    /// ```
    /// use jprofile::filter::FileFilter;
    /// use std::path::Path;
    ///
    /// let filter = FileFilter::new(Some("events_*".to_string())).unwrap();
    /// assert!(filter.accepts(Path::new("logs/events_01.jsonl")));
    /// assert!(!filter.accepts(Path::new("logs/other.jsonl")));
    /// assert!(!filter.accepts(Path::new("logs/events_01.csv")));
    /// ```
    pub fn new(pattern: Option<String>) -> Result<Self> {
        let compiled = match pattern {
            Some(ref p) => Some(
                Pattern::new(p).map_err(|_| ProfileError::InvalidPattern { pattern: p.clone() })?,
            ),
            None => None,
        };

        Ok(Self { pattern: compiled })
    }

    /// 경로가 프로파일 대상인지 확인
    pub fn accepts(&self, path: &Path) -> bool {
        has_input_extension(path)
            && path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|name| self.matches_name(name))
                .unwrap_or(false)
    }

    /// 파일 이름이 패턴과 일치하는지 확인 (패턴이 없으면 항상 true)
    pub fn matches_name(&self, file_name: &str) -> bool {
        match &self.pattern {
            Some(p) => p.matches(file_name),
            None => true,
        }
    }
}

fn has_input_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| INPUT_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter() {
        let filter = FileFilter::new(None).unwrap();
        assert!(filter.accepts(Path::new("a.json")));
        assert!(filter.accepts(Path::new("dir/b.jsonl")));
        assert!(filter.accepts(Path::new("C.JSONL")));
        assert!(!filter.accepts(Path::new("notes.txt")));
        assert!(!filter.accepts(Path::new("json")));
        assert!(!filter.accepts(Path::new("archive.json.gz")));
    }

    #[test]
    fn test_pattern_with_wildcard() {
        let filter = FileFilter::new(Some("session-*.jsonl".to_string())).unwrap();
        assert!(filter.accepts(Path::new("x/session-01.jsonl")));
        assert!(!filter.accepts(Path::new("x/session-01.json")));
        assert!(!filter.accepts(Path::new("x/other.jsonl")));
    }

    #[test]
    fn test_pattern_with_brackets() {
        let filter = FileFilter::new(Some("log[0-9].json".to_string())).unwrap();
        assert!(filter.matches_name("log1.json"));
        assert!(!filter.matches_name("logA.json"));
    }

    #[test]
    fn test_pattern_invalid() {
        let result = FileFilter::new(Some("[invalid".to_string()));
        assert!(matches!(result, Err(ProfileError::InvalidPattern { .. })));
    }
}
