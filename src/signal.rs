//! 중단 처리 모듈
//!
//! Ctrl+C 입력을 받아 다음 파일로 넘어가기 전에 일괄 처리를 멈추도록 합니다.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use colored::Colorize;

/// 중단 요청 플래그
///
/// 첫 Ctrl+C는 플래그만 세우고, 두 번째 Ctrl+C는 즉시 종료합니다.
#[derive(Clone, Debug)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
}

impl Shutdown {
    /// Ctrl+C 핸들러를 등록한 인스턴스 생성
    pub fn install() -> Result<Self, ctrlc::Error> {
        let shutdown = Self::new();
        let requested = shutdown.requested.clone();

        ctrlc::set_handler(move || {
            if !requested.swap(true, Ordering::SeqCst) {
                eprintln!(
                    "\n{}",
                    "🛑 중단 요청됨: 현재 파일을 정리하고 멈춥니다... (다시 누르면 강제 종료)"
                        .yellow()
                );
            } else {
                eprintln!("\n{}", "💀 강제 종료".red());
                std::process::exit(130);
            }
        })?;

        Ok(shutdown)
    }

    /// 핸들러 없는 인스턴스 생성 (테스트 및 라이브러리 사용용)
    pub fn new() -> Self {
        Self {
            requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 중단 요청
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// 중단 요청 여부
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_shared_between_clones() {
        let shutdown = Shutdown::new();
        let clone = shutdown.clone();
        assert!(!clone.is_requested());

        shutdown.request();
        assert!(clone.is_requested());
    }
}
