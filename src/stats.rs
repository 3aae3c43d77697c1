//! 실행 통계 모듈
//!
//! 파일/레코드 처리 통계 수집 및 요약 출력을 담당합니다.
//! 표준 출력은 리포트 전용이므로 요약은 표준 에러로 출력합니다.

use colored::Colorize;
use std::time::{Duration, Instant};

use crate::profile::FileSummary;

/// 실행 통계 구조체
#[derive(Debug, Default)]
pub struct RunStatistics {
    /// 발견된 입력 파일 수
    pub total_files: usize,
    /// 파싱 성공 파일 수
    pub files_parsed: usize,
    /// 파싱 실패 파일 수
    pub files_failed: usize,
    /// 샘플링 전 레코드 수
    pub records_seen: u64,
    /// 샘플링 후 레코드 수
    pub records_sampled: u64,
    /// 건너뛴 비객체 배열 요소 수
    pub skipped_values: usize,
    /// 읽은 총 바이트
    pub bytes_read: u64,
    /// 처리 시작 시간
    start_time: Option<Instant>,
}

impl RunStatistics {
    /// 새 통계 인스턴스 생성
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 성공한 파일 결과 반영
    pub fn record_file(&mut self, summary: &FileSummary) {
        self.files_parsed += 1;
        self.records_seen += summary.records_seen;
        self.records_sampled += summary.records_sampled;
        self.skipped_values += summary.skipped;
        self.bytes_read += summary.file_size;
    }

    /// 실패한 파일 반영
    pub fn record_failure(&mut self) {
        self.files_failed += 1;
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// 처리 통계 요약 출력
    pub fn print_summary(&self, distinct_paths: usize) {
        eprintln!("\n{}", "═".repeat(50).bright_blue());
        eprintln!("{}", " 📊 프로파일 통계".bright_white().bold());
        eprintln!("{}", "═".repeat(50).bright_blue());

        eprintln!("  {} 전체 파일:    {}", "📁".bright_cyan(), self.total_files);
        eprintln!(
            "  {} 파싱 성공:    {}",
            "✅".bright_green(),
            self.files_parsed.to_string().green()
        );

        if self.files_failed > 0 {
            eprintln!(
                "  {} 파싱 실패:    {}",
                "❌".bright_red(),
                self.files_failed.to_string().red()
            );
        } else {
            eprintln!("  {} 파싱 실패:    {}", "✅".bright_green(), "0".green());
        }

        eprintln!(
            "  {} 레코드:       {} / {}",
            "🧾".bright_yellow(),
            self.records_sampled.to_string().bright_green(),
            self.records_seen
        );

        if self.skipped_values > 0 {
            eprintln!(
                "  {} 건너뛴 값:    {}",
                "⚠️".bright_yellow(),
                self.skipped_values.to_string().yellow()
            );
        }

        eprintln!("  {} 필드 경로:    {}", "🔑".bright_magenta(), distinct_paths);
        eprintln!(
            "  {} 입력 용량:    {}",
            "📥".bright_yellow(),
            format_bytes(self.bytes_read)
        );

        if self.records_seen > 0 {
            let rate = (self.records_sampled as f64 / self.records_seen as f64) * 100.0;
            eprintln!("  {} 샘플링 비율:  {:.1}%", "📈".bright_white(), rate);
        }

        eprintln!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        eprintln!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use jprofile::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 60 {
        format!("{}분 {}초", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
