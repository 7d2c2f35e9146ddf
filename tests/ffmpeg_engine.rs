//! FFmpeg 엔진 통합 테스트
//!
//! 실제 FFmpeg 대신 같은 인자를 받는 셸 스크립트로 서브프로세스 처리를 검증합니다.
//! 스크립트 작성과 실행이 겹치지 않도록 테스트 함수 하나에서 모두 수행합니다.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

use aconvert::{
    AConvertError, ConversionRunner, ConversionTask, FfmpegEngine, RunConfig, Shutdown,
    SilentReporter, TranscodeEngine,
};

/// 마지막 인자(출력 경로)에 내용을 쓰는 가짜 ffmpeg
const OK_SCRIPT: &str = r#"#!/bin/sh
for arg in "$@"; do out="$arg"; done
printf 'encoded' > "$out"
"#;

/// 에러 메시지와 함께 실패하는 가짜 ffmpeg
const FAIL_SCRIPT: &str = r#"#!/bin/sh
echo "header noise" >&2
echo "Invalid data found when processing input" >&2
exit 1
"#;

/// 성공 코드로 끝나지만 빈 파일만 남기는 가짜 ffmpeg
const EMPTY_SCRIPT: &str = r#"#!/bin/sh
for arg in "$@"; do out="$arg"; done
: > "$out"
"#;

/// 일부만 쓰고 실패하는 가짜 ffmpeg
const PARTIAL_SCRIPT: &str = r#"#!/bin/sh
for arg in "$@"; do out="$arg"; done
printf 'PARTIAL' > "$out"
exit 1
"#;

/// 끝나지 않는 가짜 ffmpeg
const HANG_SCRIPT: &str = r#"#!/bin/sh
exec sleep 30
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn test_ffmpeg_engine_with_stub_scripts() {
    let bin_dir = TempDir::new().unwrap();
    let ok = write_script(bin_dir.path(), "ffmpeg-ok", OK_SCRIPT);
    let fail = write_script(bin_dir.path(), "ffmpeg-fail", FAIL_SCRIPT);
    let empty = write_script(bin_dir.path(), "ffmpeg-empty", EMPTY_SCRIPT);
    let hang = write_script(bin_dir.path(), "ffmpeg-hang", HANG_SCRIPT);
    let partial = write_script(bin_dir.path(), "ffmpeg-partial", PARTIAL_SCRIPT);

    let work = TempDir::new().unwrap();
    let source = work.path().join("a.webm");
    fs::write(&source, b"webm data").unwrap();
    let task = ConversionTask::new(&source, "webm", "mp3");
    let shutdown = Shutdown::new();

    // 성공: 결과는 임시 파일에 기록
    FfmpegEngine::new(&ok).convert(&task, &shutdown).unwrap();
    assert_eq!(fs::read(&task.work_path).unwrap(), b"encoded");
    assert!(!task.target_path.exists());
    fs::remove_file(&task.work_path).unwrap();

    // 실패 코드와 stderr 전달
    let err = FfmpegEngine::new(&fail)
        .convert(&task, &shutdown)
        .unwrap_err();
    match err {
        AConvertError::EngineFailed { code, stderr, .. } => {
            assert_eq!(code, Some(1));
            assert!(stderr.contains("Invalid data found"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // 제한 시간 초과
    let started = Instant::now();
    let err = FfmpegEngine::new(&hang)
        .with_timeout(Some(Duration::from_millis(300)))
        .convert(&task, &shutdown)
        .unwrap_err();
    assert!(matches!(err, AConvertError::Timeout { .. }));
    assert!(started.elapsed() < Duration::from_secs(10));

    // 중단 요청
    let interrupted = Shutdown::new();
    interrupted.request();
    let err = FfmpegEngine::new(&hang)
        .convert(&task, &interrupted)
        .unwrap_err();
    assert!(matches!(err, AConvertError::Interrupted { .. }));

    // 러너: 실패한 덮어쓰기는 기존 결과를 건드리지 않음
    fs::write(&task.target_path, b"old run output").unwrap();
    let config = RunConfig::new("webm", "mp3")
        .unwrap()
        .with_directory(work.path().to_path_buf())
        .with_delete_originals(true)
        .with_ffmpeg(partial);
    let runner = ConversionRunner::new(&config, FfmpegEngine::from_config(&config));
    let report = runner.run(runner.collect_tasks().unwrap(), &SilentReporter);
    assert_eq!(report.stats.failed, 1);
    assert!(source.exists());
    assert_eq!(fs::read(&task.target_path).unwrap(), b"old run output");
    assert!(!task.work_path.exists());
    fs::remove_file(&task.target_path).unwrap();

    // 러너: 빈 결과는 실패, 원본 보존, 빈 파일 정리
    let config = config.clone().with_ffmpeg(empty.clone());
    let runner = ConversionRunner::new(&config, FfmpegEngine::from_config(&config));
    let report = runner.run(runner.collect_tasks().unwrap(), &SilentReporter);
    assert_eq!(report.stats.failed, 1);
    assert!(source.exists());
    assert!(!task.target_path.exists());
    assert!(!task.work_path.exists());

    // 러너: 성공 후 원본 삭제
    let config = config.clone().with_ffmpeg(ok.clone());
    let runner = ConversionRunner::new(&config, FfmpegEngine::from_config(&config));
    let report = runner.run(runner.collect_tasks().unwrap(), &SilentReporter);
    assert_eq!(report.stats.converted, 1);
    assert_eq!(report.stats.deleted, 1);
    assert!(!source.exists());
    assert_eq!(fs::read(&task.target_path).unwrap(), b"encoded");
    assert!(!task.work_path.exists());
}
