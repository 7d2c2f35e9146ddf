//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 대상 파일이 이미 있을 때의 처리 방식
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OnExisting {
    /// 기존 파일을 덮어쓰기
    #[default]
    Overwrite,
    /// 해당 파일은 건너뛰기
    Skip,
    /// 해당 파일을 실패로 처리
    Error,
}

impl std::fmt::Display for OnExisting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnExisting::Overwrite => write!(f, "Overwrite"),
            OnExisting::Skip => write!(f, "Skip"),
            OnExisting::Error => write!(f, "Error"),
        }
    }
}

/// aconvert CLI 인자 구조체
#[derive(Parser, Debug, Clone)]
#[command(
    name = "aconvert",
    author = "YourName <your@email.com>",
    version,
    about = "AUDIO FOLDER CONVERTER - 폴더 내 오디오 파일들을 FFmpeg로 일괄 변환하는 CLI 도구",
    long_about = r#"
AUDIO FOLDER CONVERTER
======================

작업 폴더에서 원본 확장자를 가진 파일을 찾아
FFmpeg로 하나씩 대상 확장자로 변환합니다.

특징:
  • 파일마다 진행 상태 표시 및 최종 통계
  • 원본 파일은 기본적으로 보존 (-d 옵션으로 삭제)
  • 변환 실패 시 원본 보존 후 다음 파일 계속 처리
  • Ctrl+C 시 진행 중인 미완성 파일 정리

FFmpeg가 PATH에 있어야 합니다 (또는 --ffmpeg로 경로 지정).

예제:
  aconvert webm mp3
  aconvert webm mp3 --delete
  aconvert flac ogg -C ./music --on-existing skip
  aconvert wav mp3 --pattern "track_*" --dry-run
"#
)]
pub struct Args {
    /// 변환할 파일의 확장자 (점 없이, 예: webm)
    #[arg(value_name = "SOURCE_EXT")]
    pub source: String,

    /// 변환 결과 확장자 (점 없이, 예: mp3)
    #[arg(value_name = "TARGET_EXT")]
    pub target: String,

    /// 변환에 성공한 원본 파일 삭제 (기본값: 원본 보존)
    #[arg(short, long)]
    pub delete: bool,

    /// 작업 폴더 경로
    #[arg(short = 'C', long, default_value = ".")]
    pub dir: PathBuf,

    /// 대상 파일이 이미 있을 때의 처리 방식
    #[arg(short = 'e', long, value_enum, default_value_t = OnExisting::Overwrite)]
    pub on_existing: OnExisting,

    /// 파일 이름 패턴 필터 (glob 형식, 예: "track_*", "take?.*")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// FFmpeg 실행 파일 경로
    #[arg(long, default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// 파일당 최대 변환 시간 (초, 1 이상, 기본값: 제한 없음)
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,

    /// 실제 변환 없이 처리될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 에러 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_originals_by_default() {
        let args = Args::try_parse_from(["aconvert", "webm", "mp3"]).unwrap();
        assert!(!args.delete);
        assert_eq!(args.source, "webm");
        assert_eq!(args.target, "mp3");
        assert_eq!(args.dir, PathBuf::from("."));
        assert_eq!(args.on_existing, OnExisting::Overwrite);
        assert_eq!(args.timeout, None);
    }

    #[test]
    fn test_delete_flag() {
        let short = Args::try_parse_from(["aconvert", "mp3", "webm", "-d"]).unwrap();
        let long = Args::try_parse_from(["aconvert", "--delete", "mp3", "webm"]).unwrap();
        assert!(short.delete);
        assert!(long.delete);
    }

    #[test]
    fn test_extensions_are_required() {
        assert!(Args::try_parse_from(["aconvert"]).is_err());
        assert!(Args::try_parse_from(["aconvert", "webm"]).is_err());
    }

    #[test]
    fn test_timeout_must_be_positive() {
        assert!(Args::try_parse_from(["aconvert", "webm", "mp3", "--timeout", "0"]).is_err());

        let args = Args::try_parse_from(["aconvert", "webm", "mp3", "-t", "1"]).unwrap();
        assert_eq!(args.timeout, Some(1));
    }

    #[test]
    fn test_on_existing_value() {
        let args =
            Args::try_parse_from(["aconvert", "webm", "mp3", "--on-existing", "skip"]).unwrap();
        assert_eq!(args.on_existing, OnExisting::Skip);
        assert!(
            Args::try_parse_from(["aconvert", "webm", "mp3", "--on-existing", "maybe"]).is_err()
        );
    }
}
