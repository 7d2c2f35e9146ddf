//! 파일 필터 모듈
//!
//! 확장자 일치와 glob 패턴을 사용한 파일 이름 필터링을 담당합니다.

use glob::Pattern;
use std::path::Path;

use crate::error::{AConvertError, Result};

/// 변환 대상 파일 판별기
///
/// 확장자는 대소문자를 구분하지 않고 비교합니다 (`A.WEBM`도 `webm`에 해당).
pub struct FileFilter {
    extension: String,
    pattern: Option<Pattern>,
}

impl FileFilter {
    /// 새 필터 생성
    ///
    /// # Arguments
    /// * `extension` - 원본 확장자 (점 없음)
    /// * `pattern` - 추가 glob 패턴 (None이면 확장자만 검사)
    ///
    /// # Examples
    /// ```
    /// use aconvert::pattern::FileFilter;
    /// use std::path::Path;
    ///
    /// let filter = FileFilter::new("webm", Some("track_*".to_string())).unwrap();
    /// assert!(filter.matches(Path::new("track_01.webm")));
    /// assert!(!filter.matches(Path::new("intro.webm")));
    /// ```
    pub fn new(extension: &str, pattern: Option<String>) -> Result<Self> {
        let compiled = match pattern {
            Some(ref p) => Some(
                Pattern::new(p)
                    .map_err(|_| AConvertError::InvalidPattern { pattern: p.clone() })?,
            ),
            None => None,
        };

        Ok(Self {
            extension: extension.to_string(),
            pattern: compiled,
        })
    }

    /// 파일 경로가 변환 대상인지 확인
    ///
    /// 이름만 검사하며 파일 종류(일반 파일 여부)는 호출하는 쪽에서 확인합니다.
    pub fn matches(&self, path: &Path) -> bool {
        let ext_matches = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false);

        if !ext_matches {
            return false;
        }

        match &self.pattern {
            Some(p) => path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|s| p.matches(s))
                .unwrap_or(false),
            None => true,
        }
    }

    /// 패턴이 설정되어 있는지 확인
    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }
}
