//! 변환 작업 모듈
//!
//! 파일 하나에 대한 변환 작업과 그 처리 결과를 정의합니다.

use std::path::{Path, PathBuf};

/// 변환 중인 임시 파일 이름에 붙는 표식 (`a.aconvert-tmp.mp3`)
pub const WORK_MARKER: &str = "aconvert-tmp";

/// 원본 파일 하나를 대상 파일 하나로 바꾸는 작업
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTask {
    /// 원본 파일 경로
    pub source_path: PathBuf,
    /// 원본 확장자
    pub source_ext: String,
    /// 대상 확장자
    pub target_ext: String,
    /// 대상 파일 경로 (원본과 같은 폴더, 같은 이름, 새 확장자)
    pub target_path: PathBuf,
    /// 엔진이 실제로 쓰는 임시 파일 경로 (검증 후 `target_path`로 이름 변경)
    pub work_path: PathBuf,
}

impl ConversionTask {
    /// 새 작업 생성
    ///
    /// # Examples
    /// ```
    /// use aconvert::task::ConversionTask;
    /// use std::path::Path;
    ///
    /// let task = ConversionTask::new("music/song.live.webm", "webm", "mp3");
    /// assert_eq!(task.target_path, Path::new("music/song.live.mp3"));
    /// assert_eq!(task.work_path, Path::new("music/song.live.aconvert-tmp.mp3"));
    /// ```
    pub fn new(source_path: impl Into<PathBuf>, source_ext: &str, target_ext: &str) -> Self {
        let source_path = source_path.into();
        let target_path = source_path.with_extension(target_ext);
        // 확장자를 유지해야 FFmpeg가 출력 형식을 추론함
        let work_path = source_path.with_extension(format!("{}.{}", WORK_MARKER, target_ext));

        Self {
            source_path,
            source_ext: source_ext.to_string(),
            target_ext: target_ext.to_string(),
            target_path,
            work_path,
        }
    }

    /// 출력용 원본 파일 이름
    pub fn source_name(&self) -> String {
        file_name_of(&self.source_path)
    }

    /// 출력용 대상 파일 이름
    pub fn target_name(&self) -> String {
        file_name_of(&self.target_path)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 이전 실행이 남긴 임시 파일인지 확인
pub fn is_work_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| Path::new(stem).extension())
        .map_or(false, |ext| ext == WORK_MARKER)
}

/// 작업 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Succeeded,
    Failed,
    Skipped,
}

/// 작업 하나의 처리 결과
#[derive(Debug)]
pub struct TaskOutcome {
    /// 처리된 작업
    pub task: ConversionTask,
    /// 최종 상태
    pub status: TaskStatus,
    /// 에러 메시지 (실패 시)
    pub error: Option<String>,
    /// 원본 파일 크기
    pub source_size: u64,
    /// 대상 파일 크기 (성공 시)
    pub target_size: u64,
    /// 원본 삭제 여부
    pub deleted: bool,
    /// 원본 삭제 실패 메시지
    pub delete_error: Option<String>,
}

impl TaskOutcome {
    /// 성공 결과 생성
    pub fn succeeded(task: ConversionTask, source_size: u64, target_size: u64) -> Self {
        Self {
            task,
            status: TaskStatus::Succeeded,
            error: None,
            source_size,
            target_size,
            deleted: false,
            delete_error: None,
        }
    }

    /// 실패 결과 생성
    pub fn failed(task: ConversionTask, error: String, source_size: u64) -> Self {
        Self {
            task,
            status: TaskStatus::Failed,
            error: Some(error),
            source_size,
            target_size: 0,
            deleted: false,
            delete_error: None,
        }
    }

    /// 건너뜀 결과 생성
    pub fn skipped(task: ConversionTask, source_size: u64) -> Self {
        Self {
            task,
            status: TaskStatus::Skipped,
            error: None,
            source_size,
            target_size: 0,
            deleted: false,
            delete_error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Succeeded
    }
}
