//! 실행 설정 모듈
//!
//! CLI 인자를 검증하여 실행 동안 변하지 않는 `RunConfig`를 만듭니다.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Args, OnExisting};
use crate::error::{AConvertError, Result};

/// 한 번의 실행에 대한 설정
///
/// 생성 이후에는 수정되지 않으며 러너에 참조로 전달됩니다.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// 원본 확장자 (점 없음)
    pub source_ext: String,
    /// 대상 확장자 (점 없음)
    pub target_ext: String,
    /// 변환 성공 시 원본 삭제 여부
    pub delete_originals: bool,
    /// 작업 폴더
    pub directory: PathBuf,
    /// 대상 파일 충돌 시 처리 방식
    pub on_existing: OnExisting,
    /// 추가 파일 이름 필터
    pub pattern: Option<String>,
    /// FFmpeg 실행 파일
    pub ffmpeg: PathBuf,
    /// 파일당 제한 시간
    pub timeout: Option<Duration>,
    pub verbose: bool,
    pub dry_run: bool,
    /// 에러 로그 파일 경로
    pub log: Option<PathBuf>,
}

impl RunConfig {
    /// 원본/대상 확장자만으로 기본 설정 생성
    ///
    /// 작업 폴더는 현재 폴더, 원본은 보존합니다.
    pub fn new(source_ext: &str, target_ext: &str) -> Result<Self> {
        let (source_ext, target_ext) = validate_pair(source_ext, target_ext)?;

        Ok(Self {
            source_ext,
            target_ext,
            delete_originals: false,
            directory: PathBuf::from("."),
            on_existing: OnExisting::default(),
            pattern: None,
            ffmpeg: PathBuf::from("ffmpeg"),
            timeout: None,
            verbose: false,
            dry_run: false,
            log: None,
        })
    }

    /// CLI 인자로부터 설정 생성
    ///
    /// 확장자, 작업 폴더를 검증합니다. 파일은 전혀 건드리지 않습니다.
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = Self::new(&args.source, &args.target)?
            .with_delete_originals(args.delete)
            .with_directory(args.dir.clone())
            .with_on_existing(args.on_existing)
            .with_pattern(args.pattern.clone())
            .with_ffmpeg(args.ffmpeg.clone())
            .with_timeout(args.timeout.map(Duration::from_secs));

        validate_directory(&config.directory)?;

        Ok(Self {
            verbose: args.verbose,
            dry_run: args.dry_run,
            log: args.log.clone(),
            ..config
        })
    }

    /// 원본 삭제 여부 설정
    pub fn with_delete_originals(mut self, delete: bool) -> Self {
        self.delete_originals = delete;
        self
    }

    /// 작업 폴더 설정
    pub fn with_directory(mut self, directory: PathBuf) -> Self {
        self.directory = directory;
        self
    }

    /// 충돌 처리 방식 설정
    pub fn with_on_existing(mut self, on_existing: OnExisting) -> Self {
        self.on_existing = on_existing;
        self
    }

    /// 파일 이름 패턴 설정
    pub fn with_pattern(mut self, pattern: Option<String>) -> Self {
        self.pattern = pattern;
        self
    }

    /// FFmpeg 경로 설정
    pub fn with_ffmpeg(mut self, ffmpeg: PathBuf) -> Self {
        self.ffmpeg = ffmpeg;
        self
    }

    /// 파일당 제한 시간 설정
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// 확장자 형식 검사
///
/// 비어 있지 않은 ASCII 영숫자 문자열만 허용합니다. 앞의 점도 허용하지 않습니다.
///
/// # Examples
/// ```
/// use aconvert::config::validate_extension;
///
/// assert_eq!(validate_extension("mp3").unwrap(), "mp3");
/// assert!(validate_extension(".mp3").is_err());
/// assert!(validate_extension("").is_err());
/// ```
pub fn validate_extension(ext: &str) -> Result<String> {
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AConvertError::InvalidExtension {
            ext: ext.to_string(),
        });
    }
    Ok(ext.to_string())
}

/// 원본/대상 확장자 쌍 검사 (대소문자 무시하고 같으면 거부)
fn validate_pair(source: &str, target: &str) -> Result<(String, String)> {
    let source = validate_extension(source)?;
    let target = validate_extension(target)?;

    if source.eq_ignore_ascii_case(&target) {
        return Err(AConvertError::SameExtension { ext: source });
    }

    Ok((source, target))
}

/// 작업 폴더 검사
fn validate_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(AConvertError::DirectoryNotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_dir() {
        return Err(AConvertError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_validate_extension() {
        assert!(validate_extension("webm").is_ok());
        assert!(validate_extension("MP3").is_ok());
        assert!(validate_extension("m4a").is_ok());
        assert!(validate_extension("").is_err());
        assert!(validate_extension(".mp3").is_err());
        assert!(validate_extension("tar.gz").is_err());
        assert!(validate_extension("mp 3").is_err());
        assert!(validate_extension("ögg").is_err());
    }

    #[test]
    fn test_same_extension_rejected() {
        let err = RunConfig::new("mp3", "MP3").unwrap_err();
        assert!(matches!(err, AConvertError::SameExtension { .. }));
    }

    #[test]
    fn test_new_defaults() {
        let config = RunConfig::new("webm", "mp3").unwrap();
        assert_eq!(config.source_ext, "webm");
        assert_eq!(config.target_ext, "mp3");
        assert!(!config.delete_originals);
        assert_eq!(config.on_existing, OnExisting::Overwrite);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_from_args() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_str().unwrap();
        let args = Args::try_parse_from([
            "aconvert", "webm", "mp3", "-d", "-C", dir, "-t", "30", "--dry-run",
        ])
        .unwrap();

        let config = RunConfig::from_args(&args).unwrap();
        assert!(config.delete_originals);
        assert!(config.dry_run);
        assert_eq!(config.directory, temp_dir.path());
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_from_args_missing_directory() {
        let args =
            Args::try_parse_from(["aconvert", "webm", "mp3", "-C", "/nonexistent/aconvert"])
                .unwrap();
        let err = RunConfig::from_args(&args).unwrap_err();
        assert!(matches!(err, AConvertError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_from_args_file_as_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.webm");
        std::fs::write(&file, b"x").unwrap();

        let args =
            Args::try_parse_from(["aconvert", "webm", "mp3", "-C", file.to_str().unwrap()])
                .unwrap();
        let err = RunConfig::from_args(&args).unwrap_err();
        assert!(matches!(err, AConvertError::NotADirectory { .. }));
    }
}
