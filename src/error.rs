//! 에러 타입 정의 모듈
//!
//! aconvert에서 발생할 수 있는 모든 에러 타입을 정의합니다.

use std::path::PathBuf;
use thiserror::Error;

/// aconvert에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum AConvertError {
    /// 확장자 형식이 잘못됨 (빈 문자열, 점 포함, 영숫자 외 문자)
    #[error("유효하지 않은 확장자입니다: {ext:?} (영문자와 숫자만, 점 없이 입력하세요)")]
    InvalidExtension { ext: String },

    /// 원본과 대상 확장자가 같음
    #[error("원본과 대상 확장자가 같습니다: {ext}")]
    SameExtension { ext: String },

    /// 작업 폴더가 존재하지 않음
    #[error("작업 폴더를 찾을 수 없습니다: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// 작업 경로가 폴더가 아님
    #[error("작업 경로가 폴더가 아닙니다: {path}")]
    NotADirectory { path: PathBuf },

    /// 유효하지 않은 패턴
    #[error("유효하지 않은 패턴: {pattern}")]
    InvalidPattern { pattern: String },

    /// 폴더 읽기 실패
    #[error("폴더를 읽을 수 없습니다 ({path}): {reason}")]
    ReadDir { path: PathBuf, reason: String },

    /// 처리할 파일 없음
    #[error("변환할 .{ext} 파일이 없습니다")]
    NoFilesFound { ext: String },

    /// 변환 프로그램을 찾을 수 없음
    #[error("변환 프로그램을 찾을 수 없습니다: {program} (PATH에 FFmpeg가 있는지 확인하세요)")]
    EngineNotFound { program: String },

    /// 변환 프로그램 실행 실패
    #[error("변환 프로그램 실행 실패 ({program}): {reason}")]
    EngineSpawn { program: String, reason: String },

    /// 변환 프로그램이 실패 코드로 종료
    #[error("변환 실패 ({file}), 종료 코드 {code:?}: {stderr}")]
    EngineFailed {
        file: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// 변환 결과 파일이 없거나 비어 있음
    #[error("변환 결과 파일이 없거나 비어 있습니다: {path}")]
    EmptyOutput { path: PathBuf },

    /// 제한 시간 초과
    #[error("변환 제한 시간 {secs}초 초과: {file}")]
    Timeout { file: PathBuf, secs: u64 },

    /// 사용자 중단
    #[error("사용자에 의해 중단되었습니다: {file}")]
    Interrupted { file: PathBuf },

    /// 대상 파일이 이미 존재 (Error 모드에서)
    #[error("대상 파일이 이미 존재합니다: {path}")]
    TargetExists { path: PathBuf },

    /// 같은 실행에서 앞선 원본이 이미 같은 대상 파일을 사용함 (확장자 대소문자만 다른 경우)
    #[error("대상 파일 {path} 은(는) 이미 {first} 의 변환 결과입니다")]
    DuplicateTarget { path: PathBuf, first: PathBuf },

    /// 임시 파일을 대상 파일 이름으로 바꾸지 못함
    #[error("결과 파일을 저장할 수 없습니다 ({path}): {reason}")]
    Finalize { path: PathBuf, reason: String },

    /// 원본 삭제 실패
    #[error("원본 파일 삭제 실패 ({path}): {reason}")]
    DeleteFailed { path: PathBuf, reason: String },
}

impl AConvertError {
    /// 인자 검증 단계의 에러인지 확인
    ///
    /// 인자 에러는 파일을 건드리기 전에 종료 코드 2로 끝납니다.
    pub fn is_invalid_arguments(&self) -> bool {
        matches!(
            self,
            AConvertError::InvalidExtension { .. }
                | AConvertError::SameExtension { .. }
                | AConvertError::DirectoryNotFound { .. }
                | AConvertError::NotADirectory { .. }
                | AConvertError::InvalidPattern { .. }
        )
    }
}

/// aconvert 결과 타입 별칭
pub type Result<T> = std::result::Result<T, AConvertError>;
