//! 일괄 변환 실행 모듈
//!
//! 작업 폴더에서 변환 대상 파일을 모으고, 한 파일씩 순서대로 변환한 뒤
//! 필요하면 원본을 삭제합니다. 파일 하나의 실패는 나머지 작업에 영향을 주지 않습니다.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::cli::OnExisting;
use crate::config::RunConfig;
use crate::engine::TranscodeEngine;
use crate::error::{AConvertError, Result};
use crate::pattern::FileFilter;
use crate::progress::{Reporter, TaskEvent};
use crate::signal::Shutdown;
use crate::stats::RunStats;
use crate::task::{is_work_file, ConversionTask, TaskOutcome, TaskStatus};

/// 일괄 실행 결과
#[derive(Debug)]
pub struct RunReport {
    pub stats: RunStats,
    /// 처리 순서대로 정렬된 작업 결과
    pub outcomes: Vec<TaskOutcome>,
}

impl RunReport {
    /// 변환에 실패한 작업들
    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == TaskStatus::Failed)
    }
}

/// 변환 실행기
pub struct ConversionRunner<'a, E: TranscodeEngine> {
    config: &'a RunConfig,
    engine: E,
    shutdown: Shutdown,
}

impl<'a, E: TranscodeEngine> ConversionRunner<'a, E> {
    pub fn new(config: &'a RunConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            shutdown: Shutdown::new(),
        }
    }

    /// 중단 플래그 지정 (기본값은 아무도 요청하지 않는 플래그)
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// 변환 대상 파일 수집
    ///
    /// 하위 폴더는 탐색하지 않으며, 일반 파일(또는 파일을 가리키는 링크)만 포함합니다.
    /// 중단된 실행이 남긴 임시 파일은 제외합니다. 결과는 파일 이름 순으로 정렬됩니다.
    pub fn collect_tasks(&self) -> Result<Vec<ConversionTask>> {
        let filter = FileFilter::new(&self.config.source_ext, self.config.pattern.clone())?;
        let mut tasks = Vec::new();

        if filter.has_pattern() {
            debug!("패턴 필터 적용: {:?}", self.config.pattern);
        }

        for entry in WalkDir::new(&self.config.directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| AConvertError::ReadDir {
                path: self.config.directory.clone(),
                reason: e.to_string(),
            })?;
            let path = entry.path();

            if !path.is_file() || !filter.matches(path) {
                continue;
            }

            if is_work_file(path) {
                debug!("임시 파일 제외: {}", path.display());
                continue;
            }

            tasks.push(ConversionTask::new(
                path,
                &self.config.source_ext,
                &self.config.target_ext,
            ));
        }

        debug!(
            "{:?}에서 .{} 파일 {}개 발견",
            self.config.directory,
            self.config.source_ext,
            tasks.len()
        );

        Ok(tasks)
    }

    /// 모든 작업을 순서대로 실행
    ///
    /// 중단 요청이 있으면 다음 작업을 시작하지 않습니다.
    /// 앞선 작업이 이미 차지한 대상 파일을 가리키는 작업은 원본을 남기고 실패 처리합니다.
    pub fn run(&self, tasks: Vec<ConversionTask>, reporter: &dyn Reporter) -> RunReport {
        let total = tasks.len();
        let mut stats = RunStats::new(total);
        let mut outcomes = Vec::with_capacity(total);
        // 대상 경로 → 그 경로를 먼저 차지한 원본
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

        for (index, task) in tasks.into_iter().enumerate() {
            if self.shutdown.is_requested() {
                reporter.report(TaskEvent::Interrupted {
                    remaining: total - index,
                });
                break;
            }

            reporter.report(TaskEvent::Queued {
                index,
                total,
                task: &task,
            });
            reporter.report(TaskEvent::Converting { task: &task });

            let outcome = match claimed.get(&task.target_path) {
                Some(first) => {
                    let error = AConvertError::DuplicateTarget {
                        path: task.target_path.clone(),
                        first: first.clone(),
                    };
                    warn!("{}", error);
                    let source_size = source_size_of(&task);
                    TaskOutcome::failed(task, error.to_string(), source_size)
                }
                None => {
                    claimed.insert(task.target_path.clone(), task.source_path.clone());
                    self.process_task(task)
                }
            };
            stats.record(&outcome);
            reporter.report(TaskEvent::Finished { outcome: &outcome });
            outcomes.push(outcome);
        }

        stats.interrupted = self.shutdown.is_requested();
        reporter.finish();

        info!(
            "변환 종료: 성공 {}, 실패 {}, 건너뜀 {}, 원본 삭제 {}",
            stats.converted, stats.failed, stats.skipped, stats.deleted
        );

        RunReport { stats, outcomes }
    }

    /// 작업 하나 처리
    ///
    /// 충돌 처리 → 엔진 호출(임시 파일) → 결과 확인 → 대상 이름으로 변경 → (선택) 원본 삭제
    /// 순서입니다. 실패하면 원본과 이미 있던 대상 파일은 그대로 남습니다.
    pub fn process_task(&self, task: ConversionTask) -> TaskOutcome {
        let source_size = source_size_of(&task);

        if task.target_path.exists() {
            match self.config.on_existing {
                OnExisting::Skip => {
                    debug!("{} 이미 있음, 건너뜀", task.target_path.display());
                    return TaskOutcome::skipped(task, source_size);
                }
                OnExisting::Error => {
                    let error = AConvertError::TargetExists {
                        path: task.target_path.clone(),
                    };
                    return TaskOutcome::failed(task, error.to_string(), source_size);
                }
                OnExisting::Overwrite => {
                    debug!("{} 덮어쓰기", task.target_path.display());
                }
            }
        }

        debug!("{}: {} → {}", self.engine.name(), task.source_name(), task.target_name());

        if let Err(e) = self.engine.convert(&task, &self.shutdown) {
            discard_work_file(&task);
            return TaskOutcome::failed(task, e.to_string(), source_size);
        }

        let target_size = match fs::metadata(&task.work_path) {
            Ok(meta) if meta.len() > 0 => meta.len(),
            _ => {
                discard_work_file(&task);
                let error = AConvertError::EmptyOutput {
                    path: task.target_path.clone(),
                };
                return TaskOutcome::failed(task, error.to_string(), source_size);
            }
        };

        if let Err(e) = fs::rename(&task.work_path, &task.target_path) {
            discard_work_file(&task);
            let error = AConvertError::Finalize {
                path: task.target_path.clone(),
                reason: e.to_string(),
            };
            return TaskOutcome::failed(task, error.to_string(), source_size);
        }

        let mut outcome = TaskOutcome::succeeded(task, source_size, target_size);

        if self.config.delete_originals {
            match fs::remove_file(&outcome.task.source_path) {
                Ok(()) => outcome.deleted = true,
                Err(e) => {
                    let error = AConvertError::DeleteFailed {
                        path: outcome.task.source_path.clone(),
                        reason: e.to_string(),
                    };
                    warn!("{}", error);
                    outcome.delete_error = Some(error.to_string());
                }
            }
        }

        outcome
    }
}

fn source_size_of(task: &ConversionTask) -> u64 {
    fs::metadata(&task.source_path)
        .map(|m| m.len())
        .unwrap_or(0)
}

/// 실패한 작업의 임시 파일 정리 (대상 파일은 건드리지 않음)
fn discard_work_file(task: &ConversionTask) {
    if !task.work_path.exists() {
        return;
    }

    match fs::remove_file(&task.work_path) {
        Ok(()) => debug!("미완성 파일 삭제: {}", task.work_path.display()),
        Err(e) => warn!(
            "미완성 파일 삭제 실패 ({}): {}",
            task.work_path.display(),
            e
        ),
    }
}
