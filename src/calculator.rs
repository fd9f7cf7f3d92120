//! 입력 문자열 → 부하 전류 문자열 변환 경계.
//!
//! UI는 입력이 바뀔 때마다 [`LoadCurrentCalculator::calculate`]를 동기적으로 호출하고
//! 돌려받은 문자열을 그대로 표시한다.

use crate::config::Config;
use crate::electrical::{load_current, PhaseMode};
use crate::i18n::Translator;
use crate::number_format::{format_number, FormatPolicy, NumberLocale};

/// 사용자 입력 문자열을 실수로 해석한다. 숫자가 아니면 0으로 처리한다.
///
/// 소수점은 표시 로케일과 무관하게 `.`만 인정한다. `inf`/`NaN`처럼 유한하지 않은 값도 0이다.
pub fn parse_input(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// 한 번의 계산 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadCurrentReading {
    pub load_power_w: f64,
    pub source_voltage_v: f64,
    pub phase: PhaseMode,
    pub current_a: f64,
    /// 전원 전압이 0(또는 해석 불가)이라 전류가 계산되지 않은 상태
    pub voltage_missing: bool,
    /// 로케일 규칙으로 표시한 전류 값
    pub text: String,
}

/// 표시 로케일과 자릿수 정책을 묶어 둔 계산기. 내부 상태는 바뀌지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadCurrentCalculator {
    locale: NumberLocale,
    policy: FormatPolicy,
}

impl LoadCurrentCalculator {
    pub fn new(locale: NumberLocale, policy: FormatPolicy) -> Self {
        Self { locale, policy }
    }

    pub fn from_config(config: &Config, tr: &Translator) -> Self {
        Self::new(tr.number_locale(), config.format)
    }

    pub fn evaluate(&self, power_text: &str, voltage_text: &str, phase: PhaseMode) -> LoadCurrentReading {
        let load_power_w = parse_input(power_text);
        let source_voltage_v = parse_input(voltage_text);
        let current_a = load_current(load_power_w, source_voltage_v, phase);
        LoadCurrentReading {
            load_power_w,
            source_voltage_v,
            phase,
            current_a,
            voltage_missing: source_voltage_v == 0.0,
            text: format_number(current_a, self.locale, self.policy),
        }
    }

    /// 세 입력값으로 표시용 전류 문자열을 만든다.
    pub fn calculate(&self, power_text: &str, voltage_text: &str, phase: PhaseMode) -> String {
        self.evaluate(power_text, voltage_text, phase).text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_numbers() {
        assert_eq!(parse_input("2300"), 2300.0);
        assert_eq!(parse_input(" 230.5 "), 230.5);
        assert_eq!(parse_input("2.3e3"), 2300.0);
        assert_eq!(parse_input("-12"), -12.0);
    }

    #[test]
    fn parse_failures_become_zero() {
        for text in ["", "abc", "12,5", "1.2.3", "inf", "NaN", "   "] {
            assert_eq!(parse_input(text), 0.0, "{text:?}");
        }
    }

    #[test]
    fn empty_voltage_is_reported_missing() {
        let calc = LoadCurrentCalculator::default();
        let reading = calc.evaluate("100", "", PhaseMode::Single);
        assert!(reading.voltage_missing);
        assert_eq!(reading.current_a, 0.0);
        assert_eq!(reading.text, "0");
    }

    #[test]
    fn from_config_uses_translator_locale() {
        let tr = Translator::new("de-de");
        let calc = LoadCurrentCalculator::from_config(&Config::default(), &tr);
        assert_eq!(calc.calculate("2300", "230", PhaseMode::Three), "5,774");
    }
}
