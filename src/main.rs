//! jprofile - JSON/JSONL SCHEMA PROFILER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use jprofile::{
    cli::Args,
    error::ProfileError,
    filter::FileFilter,
    profile::{profile_files, FileOutcome, ProfileOptions},
    report::ProfileReport,
    source::collect_input_files,
    stats::RunStatistics,
};

fn main() -> Result<()> {
    let args = Args::parse();

    // 루트 경로 확인
    validate_input(&args)?;

    let options = args.profile_options();

    // 파일 필터 초기화
    let filter = FileFilter::new(args.pattern.clone())?;

    if !args.quiet {
        print_header(&args);
    }

    // 입력 파일 수집
    let files = collect_input_files(&args.root, &filter);

    if files.is_empty() {
        eprintln!("{}", "⚠️ 처리할 JSON/JSONL 파일이 없습니다.".yellow());
    } else if !args.quiet {
        eprintln!(
            "  {} 발견된 파일 수: {}",
            "📋".bright_white(),
            files.len().to_string().bright_green()
        );
    }

    let mut stats = RunStatistics::new(files.len());
    let report = run_profile(&args, options, &files, &mut stats)?;

    write_report(&args, &report)?;

    if !args.quiet {
        stats.print_summary(report.keys.len());
        if let Some(ref out) = args.out {
            eprintln!("\n{} 저장 완료: {:?}\n", "✅".bright_green(), out);
        }
    }

    Ok(())
}

/// 루트 경로 유효성 검사
fn validate_input(args: &Args) -> Result<()> {
    if !args.root.exists() {
        return Err(ProfileError::RootNotFound {
            path: args.root.clone(),
        }
        .into());
    }
    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args) {
    eprintln!("\n{}", "═".repeat(50).bright_blue());
    eprintln!("{}", " 🔬 JSON/JSONL SCHEMA PROFILER".bright_white().bold());
    eprintln!("{}", "═".repeat(50).bright_blue());
    eprintln!("  {} 루트 경로: {:?}", "📂".bright_cyan(), args.root);

    match args.out {
        Some(ref out) => eprintln!("  {} 출력 파일: {:?}", "📄".bright_green(), out),
        None => eprintln!("  {} 출력: 표준 출력", "📄".bright_green()),
    }

    if let Some(ref label) = args.label {
        eprintln!("  {} 라벨: {}", "🏷️".bright_magenta(), label);
    }

    if let Some(ref pattern) = args.pattern {
        eprintln!("  {} 패턴 필터: {}", "🔍".bright_magenta(), pattern);
    }

    eprintln!(
        "  {} 최대 깊이: {} / 배열 요소: {}",
        "📏".bright_white(),
        args.max_depth,
        args.max_array_items
    );

    if args.sample_rate < 1.0 {
        eprintln!(
            "  {} 샘플링 비율: {}",
            "🎲".bright_yellow(),
            args.sample_rate
        );
    }

    eprintln!("{}", "═".repeat(50).bright_blue());
    eprintln!("\n{}", "📁 파일 검색 중...".bright_cyan());
}

/// 파일을 하나씩 읽어 프로파일 수행
///
/// 개별 파일 실패는 경고만 출력하고 계속 진행합니다.
fn run_profile(
    args: &Args,
    options: ProfileOptions,
    files: &[PathBuf],
    stats: &mut RunStatistics,
) -> Result<ProfileReport> {
    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        create_progress_bar(files.len())
    };

    let run = profile_files(files, options, args.label.clone(), |path, outcome| {
        match outcome {
            FileOutcome::Parsed(summary) => {
                stats.record_file(summary);
                if args.verbose {
                    pb.suspend(|| {
                        eprintln!(
                            "  {} {:?} ({:?}, {} 레코드)",
                            "✓".green(),
                            path,
                            summary.format,
                            summary.records_seen
                        );
                    });
                }
            }
            FileOutcome::Failed(e) => {
                stats.record_failure();
                pb.suspend(|| print_file_error(path, e, args.verbose));
            }
        }
        pb.inc(1);
    })?;

    pb.finish_and_clear();

    Ok(run.report)
}

/// 파일 오류 출력
fn print_file_error(path: &Path, error: &ProfileError, verbose: bool) {
    eprintln!("  {} {:?}", "[WARN]".yellow(), path);
    if verbose {
        eprintln!("    {}", error.to_string().dimmed());
    }
}

/// 리포트 출력 (파일 또는 표준 출력)
fn write_report(args: &Args, report: &ProfileReport) -> Result<()> {
    let pretty = !args.compact;

    match args.out {
        Some(ref out) => report
            .write_to(out, pretty)
            .with_context(|| format!("리포트 저장 실패: {:?}", out))?,
        None => println!("{}", report.to_json(pretty)?),
    }

    Ok(())
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░"),
    );
    pb
}
