use std::io;

use crate::calculator::{LoadCurrentCalculator, LoadCurrentReading};
use crate::config::Config;
use crate::electrical::PhaseMode;
use crate::i18n::{self, Translator};
use crate::ui_cli::{self, MenuChoice, Prompter};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 입출력 오류
    Io(std::io::Error),
    /// 설정 저장/로드 오류
    Config(crate::config::ConfigError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "입출력 오류: {e}"),
            AppError::Config(e) => write!(f, "설정 오류: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(value: crate::config::ConfigError) -> Self {
        AppError::Config(value)
    }
}

/// 결과 한 줄("Load current: 10 A")을 만든다.
pub fn result_line(tr: &Translator, reading: &LoadCurrentReading) -> String {
    i18n::fill_template(
        tr.t(i18n::keys::CALC_RESULT),
        &[("current", reading.text.clone())],
    )
}

/// 명령행에서 지정한 상이 있으면 그것을, 없으면 설정의 기본 상을 쓴다.
pub fn choose_phase(explicit: Option<PhaseMode>, config: &Config) -> PhaseMode {
    explicit.unwrap_or(config.default_phase)
}

/// 명령행 인자로 받은 값으로 한 번만 계산한다.
/// 전압이 0이면 결과 아래 줄에 전압 입력 안내를 덧붙인다.
pub fn run_once(
    config: &Config,
    tr: &Translator,
    power_text: &str,
    voltage_text: &str,
    phase: PhaseMode,
) -> String {
    let calc = LoadCurrentCalculator::from_config(config, tr);
    let reading = calc.evaluate(power_text, voltage_text, phase);
    let line = result_line(tr, &reading);
    if reading.voltage_missing {
        format!("{line}\n{}", tr.t(i18n::keys::CALC_VOLTAGE_MISSING))
    } else {
        line
    }
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(config: &mut Config, tr: &Translator) -> Result<(), AppError> {
    let stdin = io::stdin();
    let mut console = Prompter::new(stdin.lock(), io::stdout());
    loop {
        match ui_cli::main_menu(tr, &mut console)? {
            MenuChoice::Calculate => ui_cli::handle_calculation(tr, config, &mut console)?,
            MenuChoice::Settings => {
                ui_cli::handle_settings(tr, config, &mut console)?;
                config.save()?;
                console.say(tr.t(i18n::keys::SETTINGS_SAVED))?;
            }
            MenuChoice::Exit => {
                config.save()?;
                console.say(tr.t(i18n::keys::APP_EXIT))?;
                break;
            }
        }
    }
    Ok(())
}
