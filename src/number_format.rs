//! 로케일별 숫자 표시 규칙.
//!
//! 호스트 환경의 기본 숫자 포맷에 의존하지 않고, 로케일과 소수 자릿수 정책을
//! 명시적으로 받아 항상 같은 문자열을 만든다.

use serde::{Deserialize, Serialize};

/// 허용하는 최대 소수 자릿수.
pub const MAX_FRACTION_DIGITS: u8 = 15;

/// 구분 기호 규칙을 결정하는 표시 로케일.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberLocale {
    #[default]
    EnUs,
    KoKr,
    DeDe,
}

impl NumberLocale {
    /// 언어 코드(en-us, ko, de-de 등)에서 로케일을 고른다. 알 수 없으면 en-us.
    pub fn from_language_code(code: &str) -> Self {
        let c = code.trim().to_lowercase();
        if c.starts_with("de") {
            NumberLocale::DeDe
        } else if c.starts_with("ko") {
            NumberLocale::KoKr
        } else {
            NumberLocale::EnUs
        }
    }

    pub fn decimal_separator(&self) -> char {
        match self {
            NumberLocale::EnUs | NumberLocale::KoKr => '.',
            NumberLocale::DeDe => ',',
        }
    }

    pub fn grouping_separator(&self) -> char {
        match self {
            NumberLocale::EnUs | NumberLocale::KoKr => ',',
            NumberLocale::DeDe => '.',
        }
    }
}

/// 소수 자릿수와 자릿수 묶음 여부.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatPolicy {
    /// 표시할 최대 소수 자릿수. 뒤쪽 0은 잘라낸다.
    pub max_fraction_digits: u8,
    /// 정수부를 세 자리씩 묶을지 여부.
    pub grouping: bool,
}

impl Default for FormatPolicy {
    fn default() -> Self {
        Self {
            max_fraction_digits: 3,
            grouping: true,
        }
    }
}

impl FormatPolicy {
    pub fn fraction_digits(&self) -> u8 {
        self.max_fraction_digits.min(MAX_FRACTION_DIGITS)
    }
}

/// 값을 로케일 규칙에 맞춰 문자열로 만든다.
///
/// 반올림 후 0이 되는 값은 부호 없이 `0`으로 표시하고, 유한하지 않은 값도 `0`으로 표시한다.
pub fn format_number(value: f64, locale: NumberLocale, policy: FormatPolicy) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let digits = policy.fraction_digits() as usize;
    let fixed = format!("{:.*}", digits, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };
    let is_zero = frac_part.is_empty() && int_part.bytes().all(|b| b == b'0');

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    if policy.grouping {
        push_grouped(&mut out, int_part, locale.grouping_separator());
    } else {
        out.push_str(int_part);
    }
    if !frac_part.is_empty() {
        out.push(locale.decimal_separator());
        out.push_str(frac_part);
    }
    out
}

fn push_grouped(out: &mut String, digits: &str, sep: char) {
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en(v: f64) -> String {
        format_number(v, NumberLocale::EnUs, FormatPolicy::default())
    }

    #[test]
    fn trims_trailing_zeros() {
        assert_eq!(en(10.0), "10");
        assert_eq!(en(2.5), "2.5");
        assert_eq!(en(0.1 + 0.2), "0.3");
    }

    #[test]
    fn groups_integer_part() {
        assert_eq!(en(999.0), "999");
        assert_eq!(en(1000.0), "1,000");
        assert_eq!(en(1_234_567.891), "1,234,567.891");
    }

    #[test]
    fn german_swaps_separators() {
        let s = format_number(1_234.5678, NumberLocale::DeDe, FormatPolicy::default());
        assert_eq!(s, "1.234,568");
    }

    #[test]
    fn negative_zero_is_plain_zero() {
        assert_eq!(en(-0.0), "0");
        assert_eq!(en(-0.0001), "0");
        assert_eq!(en(-0.4347826), "-0.435");
    }

    #[test]
    fn non_finite_renders_zero() {
        assert_eq!(en(f64::INFINITY), "0");
        assert_eq!(en(f64::NAN), "0");
    }

    #[test]
    fn policy_controls_precision_and_grouping() {
        let policy = FormatPolicy {
            max_fraction_digits: 1,
            grouping: false,
        };
        assert_eq!(format_number(12_345.67, NumberLocale::EnUs, policy), "12345.7");
        let whole = FormatPolicy {
            max_fraction_digits: 0,
            grouping: true,
        };
        assert_eq!(format_number(12_345.67, NumberLocale::KoKr, whole), "12,346");
    }

    #[test]
    fn fraction_digits_are_clamped() {
        let policy = FormatPolicy {
            max_fraction_digits: 200,
            grouping: true,
        };
        assert_eq!(policy.fraction_digits(), MAX_FRACTION_DIGITS);
    }

    #[test]
    fn locale_from_language_code() {
        assert_eq!(NumberLocale::from_language_code("de"), NumberLocale::DeDe);
        assert_eq!(NumberLocale::from_language_code("ko-kr"), NumberLocale::KoKr);
        assert_eq!(NumberLocale::from_language_code("en-uk"), NumberLocale::EnUs);
        assert_eq!(NumberLocale::from_language_code("xx"), NumberLocale::EnUs);
    }
}
