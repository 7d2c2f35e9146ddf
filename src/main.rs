//! aconvert - AUDIO FOLDER CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use aconvert::{
    cli::Args,
    config::RunConfig,
    engine::FfmpegEngine,
    error::AConvertError,
    init_logging,
    progress::ConsoleReporter,
    runner::ConversionRunner,
    signal::Shutdown,
    stats::{EXIT_FAILURE, EXIT_USAGE},
    task::{ConversionTask, TaskOutcome},
};

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose);

    match run(args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("\n{} {:#}", "❌".bright_red(), e);
            ExitCode::from(error_exit_code(&e))
        }
    }
}

/// 전체 실행 흐름, 성공 시 종료 코드 반환
fn run(args: Args) -> Result<u8> {
    // 설정 검증 (파일을 건드리기 전)
    let config = RunConfig::from_args(&args)?;

    // 헤더 출력
    print_header(&config);

    let shutdown = Shutdown::install().context("Ctrl+C 핸들러 등록 실패")?;
    let engine = FfmpegEngine::from_config(&config);
    let runner = ConversionRunner::new(&config, engine).with_shutdown(shutdown);

    // 변환 대상 수집
    let tasks = runner.collect_tasks()?;

    if tasks.is_empty() {
        let warning = AConvertError::NoFilesFound {
            ext: config.source_ext.clone(),
        };
        println!("{} {}", "⚠️".bright_yellow(), warning.to_string().yellow());
        return Ok(0);
    }

    println!(
        "  {} 발견된 파일 수: {}",
        "📋".bright_white(),
        tasks.len().to_string().bright_green()
    );

    // 드라이런 모드
    if config.dry_run {
        print_dry_run(&tasks);
        return Ok(0);
    }

    println!("\n{}", "🎵 변환 중...".bright_cyan());

    let reporter = ConsoleReporter::new(tasks.len(), config.verbose);
    let report = runner.run(tasks, &reporter);

    let failures: Vec<&TaskOutcome> = report.failures().collect();

    // 에러 출력
    print_errors(&failures, config.verbose);

    // 로그 파일 작성
    if let Some(ref log_path) = config.log {
        write_error_log(log_path, &failures)
            .with_context(|| format!("에러 로그 작성 실패: {:?}", log_path))?;
    }

    // 통계 출력
    report.stats.print_summary();

    if report.stats.interrupted {
        println!(
            "\n{} 중단되었습니다. 변환된 파일은 남아 있고 진행 중이던 파일의 원본은 보존되었습니다.\n",
            "🛑".bright_red()
        );
    } else if report.stats.failed > 0 {
        println!(
            "\n{} {} 개의 파일 변환에 실패했습니다. 원본은 보존되었습니다.\n",
            "⚠️".bright_yellow(),
            report.stats.failed.to_string().red()
        );
    } else {
        println!("\n{} 모든 작업이 끝났습니다.\n", "✅".bright_green());
    }

    Ok(report.stats.exit_code())
}

/// 에러 종류에 따른 종료 코드
fn error_exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<AConvertError>() {
        Some(e) if e.is_invalid_arguments() => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

/// 헤더 출력
fn print_header(config: &RunConfig) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🎵 AUDIO FOLDER CONVERTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!(
        "  {} 변환: .{} → .{}",
        "🔁".bright_cyan(),
        config.source_ext,
        config.target_ext
    );
    println!("  {} 작업 폴더: {:?}", "📂".bright_cyan(), config.directory);

    if config.delete_originals {
        println!(
            "  {} {}",
            "🗑".bright_red(),
            "변환에 성공한 원본 파일을 삭제합니다".red()
        );
    } else {
        println!("  {} 원본 파일 보존", "🛡️".bright_green());
    }

    println!("  {} 기존 파일: {}", "⚙️".bright_yellow(), config.on_existing);

    if let Some(ref pattern) = config.pattern {
        println!("  {} 패턴 필터: {}", "🔍".bright_magenta(), pattern);
    }

    if let Some(timeout) = config.timeout {
        println!(
            "  {} 제한 시간: 파일당 {}초",
            "⏱️".bright_white(),
            timeout.as_secs()
        );
    }

    if config.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변환 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!("\n{}", "📁 파일 검색 중...".bright_cyan());
}

/// 드라이런 출력
fn print_dry_run(tasks: &[ConversionTask]) {
    println!("\n{}", "📋 변환 예정 파일 목록:".bright_cyan());
    for (i, task) in tasks.iter().enumerate() {
        let exists = if task.target_path.exists() {
            " (이미 있음)".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "  {}. {} → {}{}",
            i + 1,
            task.source_name(),
            task.target_name(),
            exists
        );
    }
    println!(
        "\n{} 총 {} 개의 파일이 변환될 예정입니다.",
        "ℹ️".bright_blue(),
        tasks.len().to_string().bright_green()
    );
}

/// 실패 목록 출력
fn print_errors(failures: &[&TaskOutcome], verbose: bool) {
    if failures.is_empty() {
        return;
    }

    println!("\n{}", "❌ 변환 실패 파일:".bright_red());
    for outcome in failures {
        println!("  {} {}", "•".red(), outcome.task.source_name());
        if verbose {
            if let Some(ref error) = outcome.error {
                println!("    {}", error.dimmed());
            }
        }
    }
}

/// 에러 로그 파일 작성
fn write_error_log(log_path: &Path, failures: &[&TaskOutcome]) -> Result<()> {
    let mut log_file = File::create(log_path)?;

    writeln!(log_file, "aconvert 에러 로그")?;
    writeln!(log_file, "생성 시간: {}", unix_now())?;
    writeln!(log_file, "총 에러 수: {}", failures.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for outcome in failures {
        writeln!(log_file, "\n파일: {:?}", outcome.task.source_path)?;
        writeln!(
            log_file,
            "에러: {}",
            outcome.error.as_deref().unwrap_or("알 수 없음")
        )?;
    }

    println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);

    Ok(())
}

/// 현재 시간 문자열 반환
fn unix_now() -> String {
    use std::time::SystemTime;
    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", duration.as_secs())
}
