//! 통계 및 유틸리티 모듈
//!
//! 처리 통계 수집, 종료 코드 결정, 포맷팅을 담당합니다.

use colored::Colorize;
use std::time::{Duration, Instant};

use crate::task::{TaskOutcome, TaskStatus};

/// 변환 실패가 있을 때의 종료 코드
pub const EXIT_FAILURE: u8 = 1;
/// 잘못된 인자일 때의 종료 코드
pub const EXIT_USAGE: u8 = 2;
/// Ctrl+C로 중단되었을 때의 종료 코드
pub const EXIT_INTERRUPTED: u8 = 130;

/// 처리 통계 구조체
#[derive(Debug, Default)]
pub struct RunStats {
    /// 발견된 파일 수
    pub total_files: usize,
    /// 변환 성공 수
    pub converted: usize,
    /// 변환 실패 수
    pub failed: usize,
    /// 건너뛴 수
    pub skipped: usize,
    /// 삭제된 원본 수
    pub deleted: usize,
    /// 원본 삭제 실패 수
    pub delete_failed: usize,
    /// 변환된 원본의 총 바이트
    pub bytes_in: u64,
    /// 생성된 파일의 총 바이트
    pub bytes_out: u64,
    /// 중단 여부
    pub interrupted: bool,
    /// 처리 시작 시간
    start_time: Option<Instant>,
}

impl RunStats {
    /// 새 통계 인스턴스 생성
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 작업 결과 반영
    pub fn record(&mut self, outcome: &TaskOutcome) {
        match outcome.status {
            TaskStatus::Succeeded => {
                self.converted += 1;
                self.bytes_in += outcome.source_size;
                self.bytes_out += outcome.target_size;
            }
            TaskStatus::Failed => self.failed += 1,
            TaskStatus::Skipped => self.skipped += 1,
        }

        if outcome.deleted {
            self.deleted += 1;
        }
        if outcome.delete_error.is_some() {
            self.delete_failed += 1;
        }
    }

    /// 시도된 작업 수 (중단 시 전체보다 적을 수 있음)
    pub fn attempted(&self) -> usize {
        self.converted + self.failed + self.skipped
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// 프로세스 종료 코드
    ///
    /// 변환 실패가 하나라도 있으면 1, 중단되면 130입니다.
    /// 원본 삭제 실패는 종료 코드에 영향을 주지 않습니다.
    pub fn exit_code(&self) -> u8 {
        if self.interrupted {
            EXIT_INTERRUPTED
        } else if self.failed > 0 {
            EXIT_FAILURE
        } else {
            0
        }
    }

    /// 처리 통계 요약 출력
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 처리 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 전체 파일:    {}",
            "📁".bright_cyan(),
            self.total_files
        );
        println!(
            "  {} 성공:         {}",
            "✅".bright_green(),
            self.converted.to_string().green()
        );

        if self.failed > 0 {
            println!(
                "  {} 실패:         {}",
                "❌".bright_red(),
                self.failed.to_string().red()
            );
        } else {
            println!("  {} 실패:         {}", "✅".bright_green(), "0".green());
        }

        if self.skipped > 0 {
            println!(
                "  {} 건너뜀:       {}",
                "⏭".bright_yellow(),
                self.skipped.to_string().yellow()
            );
        }

        if self.interrupted {
            println!(
                "  {} 중단됨:       {}/{} 처리 후",
                "🛑".bright_red(),
                self.attempted(),
                self.total_files
            );
        }

        println!(
            "  {} 원본 삭제:    {}",
            "🗑".bright_magenta(),
            self.deleted
        );

        if self.delete_failed > 0 {
            println!(
                "  {} 삭제 실패:    {}",
                "⚠️".bright_yellow(),
                self.delete_failed.to_string().yellow()
            );
        }

        println!(
            "  {} 입력 용량:    {}",
            "📥".bright_yellow(),
            format_bytes(self.bytes_in)
        );
        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(self.bytes_out)
        );

        if self.total_files > 0 {
            let success_rate = (self.converted as f64 / self.total_files as f64) * 100.0;
            println!(
                "  {} 성공률:       {:.1}%",
                "📈".bright_white(),
                success_rate
            );
        }

        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Arguments
/// * `bytes` - 바이트 수
///
/// # Returns
/// 형식화된 문자열 (예: "1.25 MB")
///
/// # Examples
/// ```
/// use aconvert::stats::format_bytes;
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

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}시간 {}분", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}분 {}초", mins, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
