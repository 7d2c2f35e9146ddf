//! 변환 엔진 모듈
//!
//! 실제 오디오 변환을 수행하는 외부 프로그램(FFmpeg) 호출을 담당합니다.

use log::{debug, warn};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::RunConfig;
use crate::error::{AConvertError, Result};
use crate::signal::Shutdown;
use crate::task::ConversionTask;

/// 자식 프로세스 상태 확인 주기
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 에러 메시지에 남길 stderr 마지막 줄 수
const STDERR_TAIL_LINES: usize = 5;

/// 오디오 변환 엔진
///
/// 입력 파일을 변환해 `task.work_path`에 결과 파일을 만듭니다.
/// 결과 파일 확인과 `target_path`로의 이름 변경은 러너가 담당합니다.
pub trait TranscodeEngine {
    /// 출력용 엔진 이름
    fn name(&self) -> &str;

    /// 작업 하나를 변환 (완료될 때까지 블로킹)
    fn convert(&self, task: &ConversionTask, shutdown: &Shutdown) -> Result<()>;
}

/// FFmpeg 서브프로세스 엔진
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegEngine {
    /// 새 엔진 생성 (제한 시간 없음)
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// 실행 설정으로부터 엔진 생성
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.ffmpeg.clone()).with_timeout(config.timeout)
    }

    /// 제한 시간 설정
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// 작업에 대한 FFmpeg 명령 생성
    ///
    /// 출력은 임시 파일이므로 항상 `-y`로 덮어씁니다. 대상 파일 충돌은 러너가 처리합니다.
    pub fn build_command(&self, task: &ConversionTask) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["-hide_banner", "-nostdin", "-loglevel", "error"])
            .arg("-y")
            .arg("-i")
            .arg(&task.source_path)
            .arg(&task.work_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn spawn(&self, task: &ConversionTask) -> Result<Child> {
        let mut command = self.build_command(task);
        debug!("실행: {:?}", command);

        command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AConvertError::EngineNotFound {
                    program: self.program_name(),
                }
            } else {
                AConvertError::EngineSpawn {
                    program: self.program_name(),
                    reason: e.to_string(),
                }
            }
        })
    }
}

impl TranscodeEngine for FfmpegEngine {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn convert(&self, task: &ConversionTask, shutdown: &Shutdown) -> Result<()> {
        let mut child = self.spawn(task)?;
        let stderr_reader = drain_stderr(&mut child);
        let started = Instant::now();

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    kill_child(&mut child);
                    return Err(AConvertError::EngineSpawn {
                        program: self.program_name(),
                        reason: e.to_string(),
                    });
                }
            }

            if shutdown.is_requested() {
                kill_child(&mut child);
                return Err(AConvertError::Interrupted {
                    file: task.source_path.clone(),
                });
            }

            if let Some(limit) = self.timeout {
                if started.elapsed() >= limit {
                    warn!(
                        "{} 변환이 {}초를 넘어 중단합니다",
                        task.source_name(),
                        limit.as_secs()
                    );
                    kill_child(&mut child);
                    return Err(AConvertError::Timeout {
                        file: task.source_path.clone(),
                        secs: limit.as_secs(),
                    });
                }
            }

            thread::sleep(POLL_INTERVAL);
        };

        debug!(
            "{} 종료: {} ({:.2}초)",
            self.program_name(),
            status,
            started.elapsed().as_secs_f64()
        );

        if status.success() {
            return Ok(());
        }

        // Ctrl+C는 FFmpeg에도 전달되므로 실패 종료를 중단으로 취급
        if shutdown.is_requested() {
            return Err(AConvertError::Interrupted {
                file: task.source_path.clone(),
            });
        }

        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        Err(AConvertError::EngineFailed {
            file: task.source_path.clone(),
            code: status.code(),
            stderr: stderr_tail(&stderr, STDERR_TAIL_LINES),
        })
    }
}

/// stderr를 별도 스레드에서 끝까지 읽기
///
/// 파이프 버퍼가 가득 차 자식 프로세스가 멈추는 것을 막습니다.
fn drain_stderr(child: &mut Child) -> Option<JoinHandle<String>> {
    child.stderr.take().map(|mut stderr| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn kill_child(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("자식 프로세스 종료 실패: {}", e);
    }
    let _ = child.wait();
}

/// 비어 있지 않은 마지막 `max_lines` 줄을 " | "로 연결
fn stderr_tail(stderr: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_build_command_args() {
        let engine = FfmpegEngine::new("/opt/ffmpeg/bin/ffmpeg");
        let task = ConversionTask::new("/music/a.webm", "webm", "mp3");
        let command = engine.build_command(&task);

        assert_eq!(command.get_program(), OsStr::new("/opt/ffmpeg/bin/ffmpeg"));
        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(
            args,
            [
                "-hide_banner",
                "-nostdin",
                "-loglevel",
                "error",
                "-y",
                "-i",
                "/music/a.webm",
                "/music/a.aconvert-tmp.mp3"
            ]
            .map(OsStr::new)
        );
    }

    #[test]
    fn test_never_writes_target_directly() {
        let config = RunConfig::new("webm", "mp3")
            .unwrap()
            .with_on_existing(crate::cli::OnExisting::Error);
        let engine = FfmpegEngine::from_config(&config);
        let task = ConversionTask::new("a.webm", "webm", "mp3");
        let command = engine.build_command(&task);

        assert!(command.get_args().any(|a| a == "-y"));
        assert!(!command.get_args().any(|a| a == task.target_path.as_os_str()));
        assert_eq!(command.get_args().last(), Some(task.work_path.as_os_str()));
    }

    #[test]
    fn test_missing_program() {
        let engine = FfmpegEngine::new("/nonexistent/aconvert-ffmpeg");
        let task = ConversionTask::new("a.webm", "webm", "mp3");
        let err = engine.convert(&task, &Shutdown::new()).unwrap_err();
        assert!(matches!(err, AConvertError::EngineNotFound { .. }));
    }

    #[test]
    fn test_stderr_tail() {
        let stderr = "line1\n\nline2\nline3\n  line4  \n";
        assert_eq!(stderr_tail(stderr, 2), "line3 | line4");
        assert_eq!(stderr_tail(stderr, 10), "line1 | line2 | line3 | line4");
        assert_eq!(stderr_tail("", 3), "");
    }
}
