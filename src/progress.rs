//! 진행 상황 표시 모듈
//!
//! 파일별 상태 줄과 전체 진행률 바를 출력합니다.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::stats::format_bytes;
use crate::task::{ConversionTask, TaskOutcome, TaskStatus};

/// 러너가 보내는 작업 이벤트
#[derive(Debug)]
pub enum TaskEvent<'a> {
    /// 처리 순서가 정해짐
    Queued {
        index: usize,
        total: usize,
        task: &'a ConversionTask,
    },
    /// 엔진 호출 시작
    Converting { task: &'a ConversionTask },
    /// 작업 종료 (삭제 결과 포함)
    Finished { outcome: &'a TaskOutcome },
    /// 중단 요청으로 남은 작업을 시작하지 않음
    Interrupted { remaining: usize },
}

/// 진행 상황 수신자
pub trait Reporter {
    fn report(&self, event: TaskEvent<'_>);

    /// 일괄 처리 종료
    fn finish(&self) {}
}

/// 아무것도 출력하지 않는 수신자
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _event: TaskEvent<'_>) {}
}

/// 터미널 출력 수신자 (indicatif + colored)
pub struct ConsoleReporter {
    pb: ProgressBar,
    verbose: bool,
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: TaskEvent<'_>) {
        match event {
            TaskEvent::Queued { index, total, task } => {
                self.line(format!(
                    "  {} [{}/{}] {} → {}",
                    "📋".bright_white(),
                    index + 1,
                    total,
                    task.source_name().bright_white(),
                    task.target_name().bright_cyan()
                ));
            }
            TaskEvent::Converting { task } => {
                self.pb.set_message(format!("변환 중: {}", task.source_name()));
                if self.verbose {
                    self.line(format!("    {} 변환 중...", "🔄".bright_cyan()));
                }
            }
            TaskEvent::Finished { outcome } => {
                self.print_outcome(outcome);
                self.pb.inc(1);
            }
            TaskEvent::Interrupted { remaining } => {
                self.line(format!(
                    "  {} 중단됨: 남은 {} 개 파일은 처리하지 않습니다.",
                    "🛑".bright_red(),
                    remaining.to_string().yellow()
                ));
            }
        }
    }

    fn finish(&self) {
        self.pb.finish_with_message("완료!");
    }
}

impl ConsoleReporter {
    pub fn new(total: usize, verbose: bool) -> Self {
        Self {
            pb: create_progress_bar(total),
            verbose,
        }
    }

    /// 상태 줄 출력 (터미널이 아니면 진행률 바가 숨겨지므로 stdout으로 직접)
    fn line(&self, msg: String) {
        if self.pb.is_hidden() {
            println!("{}", msg);
        } else {
            self.pb.println(msg);
        }
    }

    fn print_outcome(&self, outcome: &TaskOutcome) {
        match outcome.status {
            TaskStatus::Succeeded => {
                self.line(format!(
                    "    {} 완료: {} ({})",
                    "✓".green(),
                    outcome.task.target_name(),
                    format_bytes(outcome.target_size)
                ));
            }
            TaskStatus::Failed => {
                self.line(format!("    {} 실패: 원본 보존", "✗".red()));
                if let Some(ref error) = outcome.error {
                    self.line(format!("      {}", error.dimmed()));
                }
            }
            TaskStatus::Skipped => {
                self.line(format!(
                    "    {} 건너뜀: {} 이(가) 이미 있습니다",
                    "⏭".yellow(),
                    outcome.task.target_name()
                ));
            }
        }

        if outcome.deleted {
            self.line(format!(
                "    {} 원본 삭제: {}",
                "🗑".bright_magenta(),
                outcome.task.source_name()
            ));
        }

        if let Some(ref error) = outcome.delete_error {
            self.line(format!(
                "    {} 원본 삭제 실패: {}",
                "⚠️".bright_yellow(),
                error.yellow()
            ));
        }
    }
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
