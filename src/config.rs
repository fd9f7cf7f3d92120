use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::electrical::PhaseMode;
use crate::number_format::FormatPolicy;

/// 기본 설정 파일 경로.
pub const CONFIG_FILE: &str = "config.toml";

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드 (auto/en-us/ko-kr/de-de)
    pub language: String,
    /// 추가 언어팩 디렉터리
    pub language_pack_dir: Option<String>,
    /// 시작 시 상 선택
    pub default_phase: PhaseMode,
    /// GUI 창 투명도
    pub window_alpha: f32,
    /// 결과 숫자 표시 규칙
    pub format: FormatPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            language_pack_dir: None,
            default_phase: PhaseMode::Single,
            window_alpha: 1.0,
            format: FormatPolicy::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ConfigError::Serde(e) => write!(f, "설정 파싱 오류: {e}"),
            ConfigError::Serialize(e) => write!(f, "설정 직렬화 오류: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_from(Path::new(CONFIG_FILE))
}

/// 지정한 경로의 설정을 로드한다. 파일이 없으면 기본값을 저장한 뒤 반환한다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Path::new(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg: Config = toml::from_str("language = \"de-de\"\n[format]\ngrouping = false\n")
            .expect("partial config");
        assert_eq!(cfg.language, "de-de");
        assert!(!cfg.format.grouping);
        assert_eq!(cfg.format.max_fraction_digits, 3);
        assert_eq!(cfg.default_phase, PhaseMode::Single);
        assert_eq!(cfg.window_alpha, 1.0);
    }

    #[test]
    fn phase_is_stored_by_name() {
        let cfg = Config {
            default_phase: PhaseMode::Three,
            ..Config::default()
        };
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        assert!(text.contains("default_phase = \"Three\""), "{text}");
    }

    #[test]
    fn load_from_missing_path_writes_defaults() {
        let dir = std::env::temp_dir().join(format!("lcc_config_{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("config.toml");
        let _ = fs::remove_file(&path);

        let cfg = load_from(&path).expect("load");
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let again = load_from(&path).expect("reload");
        assert_eq!(again, cfg);
        let _ = fs::remove_dir_all(&dir);
    }
}
