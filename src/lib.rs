//! aconvert - AUDIO FOLDER CONVERTER
//!
//! 폴더 내 오디오 파일들을 FFmpeg로 한 파일씩 다른 형식으로 변환하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🎵 **일괄 변환**: 원본 확장자를 가진 모든 파일을 대상 확장자로 변환
//! - 🛡️ **원본 보존**: 기본적으로 원본을 남기고, `--delete`일 때만 성공한 원본 삭제
//! - 📊 **진행률 표시**: 파일별 상태와 전체 진행률, 최종 통계
//! - 🔍 **패턴 필터링**: glob 형식의 추가 파일 이름 필터
//! - ⏱️ **제한 시간**: 멈춘 변환을 끊는 파일당 제한 시간
//! - 🛑 **안전한 중단**: Ctrl+C 시 미완성 결과 파일 정리, 원본 보존
//! - 🧪 **드라이런 모드**: 실제 변환 없이 처리될 파일 목록 확인
//!
//! # 예제
//!
//! ```bash
//! # 현재 폴더의 webm을 mp3로 (원본 보존)
//! aconvert webm mp3
//!
//! # 변환 후 원본 삭제
//! aconvert mp3 webm --delete
//!
//! # 다른 폴더, 이미 변환된 파일은 건너뛰기
//! aconvert flac ogg -C ./music --on-existing skip
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod pattern;
pub mod progress;
pub mod runner;
pub mod signal;
pub mod stats;
pub mod task;

// Re-exports for convenient access
pub use cli::{Args, OnExisting};
pub use config::RunConfig;
pub use engine::{FfmpegEngine, TranscodeEngine};
pub use error::{AConvertError, Result};
pub use pattern::FileFilter;
pub use progress::{ConsoleReporter, Reporter, SilentReporter, TaskEvent};
pub use runner::{ConversionRunner, RunReport};
pub use signal::Shutdown;
pub use stats::{format_bytes, RunStats};
pub use task::{ConversionTask, TaskOutcome, TaskStatus};

/// 로거 초기화
///
/// `RUST_LOG`가 있으면 그 값을 따르고, 없으면 `info` (`--verbose`일 때 `debug`)를 사용합니다.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init()
        .ok();
}
