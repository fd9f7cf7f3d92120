use std::io::{BufRead, Write};

use crate::app::{self, AppError};
use crate::calculator::LoadCurrentCalculator;
use crate::config::Config;
use crate::electrical::PhaseMode;
use crate::i18n::{self, keys, Translator};
use crate::number_format::MAX_FRACTION_DIGITS;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Calculate,
    Settings,
    Exit,
}

/// 터미널 입출력을 묶는다. 테스트에서는 메모리 버퍼를 넣는다.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 프롬프트를 출력하고 한 줄을 읽는다. 입력이 끝났으면 None.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn say(&mut self, line: &str) -> Result<(), AppError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu<R: BufRead, W: Write>(
    tr: &Translator,
    console: &mut Prompter<R, W>,
) -> Result<MenuChoice, AppError> {
    for key in [
        keys::MAIN_MENU_TITLE,
        keys::MAIN_MENU_CALCULATE,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        console.say(tr.t(key))?;
    }
    loop {
        let Some(sel) = console.read_line(tr.t(keys::PROMPT_MENU_SELECT))? else {
            return Ok(MenuChoice::Exit);
        };
        match sel.trim() {
            "1" => return Ok(MenuChoice::Calculate),
            "2" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => console.say(tr.t(keys::INVALID_SELECTION_RETRY))?,
        }
    }
}

/// 부하 전류 계산 메뉴를 처리한다. 숫자가 아닌 입력은 다시 묻지 않고 0으로 계산한다.
pub fn handle_calculation<R: BufRead, W: Write>(
    tr: &Translator,
    cfg: &Config,
    console: &mut Prompter<R, W>,
) -> Result<(), AppError> {
    console.say(&format!("\n-- {} --", tr.t(keys::CALC_HEADING)))?;
    console.say(tr.t(keys::HELP_CALCULATE))?;
    let power = console
        .read_line(&format!("{}: ", tr.t(keys::CALC_LOAD_POWER)))?
        .unwrap_or_default();
    let voltage = console
        .read_line(&format!("{}: ", tr.t(keys::CALC_SOURCE_VOLTAGE)))?
        .unwrap_or_default();
    let answer = console.read_line(&format!(
        "{}{}",
        tr.t(keys::CALC_THREE_PHASE),
        tr.t(keys::PROMPT_YES_NO)
    ))?;
    let phase = answer
        .as_deref()
        .and_then(parse_yes_no)
        .map(PhaseMode::from)
        .unwrap_or(cfg.default_phase);

    let calc = LoadCurrentCalculator::from_config(cfg, tr);
    let reading = calc.evaluate(&power, &voltage, phase);
    console.say(&app::result_line(tr, &reading))?;
    if reading.voltage_missing {
        console.say(tr.t(keys::CALC_VOLTAGE_MISSING))?;
    }
    Ok(())
}

/// 설정 메뉴를 처리한다. 빈 입력은 기존 값을 유지한다.
pub fn handle_settings<R: BufRead, W: Write>(
    tr: &Translator,
    cfg: &mut Config,
    console: &mut Prompter<R, W>,
) -> Result<(), AppError> {
    console.say(&format!("\n-- {} --", tr.t(keys::SETTINGS_HEADING)))?;
    console.say(tr.t(keys::HELP_SETTINGS))?;
    console.say(&i18n::fill_template(
        tr.t(keys::SETTINGS_CURRENT),
        &[
            ("digits", cfg.format.max_fraction_digits.to_string()),
            ("grouping", cfg.format.grouping.to_string()),
            ("phase", format!("{:?}", cfg.default_phase)),
        ],
    ))?;

    let digits = console.read_line(tr.t(keys::SETTINGS_PROMPT_DIGITS))?;
    match digits.as_deref().map(str::trim) {
        None | Some("") => {}
        Some(s) => match s.parse::<u8>() {
            Ok(n) if n <= MAX_FRACTION_DIGITS => cfg.format.max_fraction_digits = n,
            _ => console.say(tr.t(keys::SETTINGS_INVALID))?,
        },
    }

    if let Some(grouping) = read_toggle(tr, console, keys::SETTINGS_PROMPT_GROUPING)? {
        cfg.format.grouping = grouping;
    }
    if let Some(three) = read_toggle(tr, console, keys::SETTINGS_PROMPT_PHASE)? {
        cfg.default_phase = PhaseMode::from(three);
    }
    Ok(())
}

fn read_toggle<R: BufRead, W: Write>(
    tr: &Translator,
    console: &mut Prompter<R, W>,
    prompt_key: &str,
) -> Result<Option<bool>, AppError> {
    let answer = console.read_line(tr.t(prompt_key))?;
    match answer.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            let parsed = parse_yes_no(s);
            if parsed.is_none() {
                console.say(tr.t(keys::SETTINGS_INVALID))?;
            }
            Ok(parsed)
        }
    }
}

/// 예/아니오 응답을 해석한다 (en/ko/de).
pub fn parse_yes_no(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "y" | "yes" | "j" | "ja" | "1" | "예" | "네" => Some(true),
        "n" | "no" | "nein" | "0" | "아니오" | "아니요" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_with<F>(input: &str, f: F) -> String
    where
        F: FnOnce(&mut Prompter<Cursor<Vec<u8>>, Vec<u8>>),
    {
        let mut console = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        f(&mut console);
        String::from_utf8(console.into_output()).expect("utf8 output")
    }

    #[test]
    fn calculation_prints_result_line() {
        let tr = Translator::new("en-us");
        let cfg = Config::default();
        let out = run_with("2300\n230\ny\n", |c| {
            handle_calculation(&tr, &cfg, c).expect("calc");
        });
        assert!(out.contains("Load current: 5.774 A"), "{out}");
        assert!(!out.contains("Enter a source voltage"), "{out}");
    }

    #[test]
    fn calculation_treats_garbage_as_zero_and_hints_missing_voltage() {
        let tr = Translator::new("en-us");
        let cfg = Config::default();
        let out = run_with("100\nabc\n\n", |c| {
            handle_calculation(&tr, &cfg, c).expect("calc");
        });
        assert!(out.contains("Load current: 0 A"), "{out}");
        assert!(out.contains("Enter a source voltage"), "{out}");
    }

    #[test]
    fn blank_phase_answer_uses_configured_default() {
        let tr = Translator::new("en-us");
        let cfg = Config {
            default_phase: PhaseMode::Three,
            ..Config::default()
        };
        let out = run_with("2300\n230\n\n", |c| {
            handle_calculation(&tr, &cfg, c).expect("calc");
        });
        assert!(out.contains("Load current: 5.774 A"), "{out}");
    }

    #[test]
    fn menu_retries_then_exits_on_eof() {
        let tr = Translator::new("en-us");
        let mut choice = None;
        let out = run_with("9\n", |c| {
            choice = Some(main_menu(&tr, c).expect("menu"));
        });
        assert_eq!(choice, Some(MenuChoice::Exit));
        assert!(out.contains("Invalid input"), "{out}");
    }

    #[test]
    fn settings_update_and_keep_values() {
        let tr = Translator::new("en-us");
        let mut cfg = Config::default();
        run_with("1\nn\n\n", |c| {
            handle_settings(&tr, &mut cfg, c).expect("settings");
        });
        assert_eq!(cfg.format.max_fraction_digits, 1);
        assert!(!cfg.format.grouping);
        assert_eq!(cfg.default_phase, PhaseMode::Single);
    }

    #[test]
    fn settings_reject_out_of_range_digits() {
        let tr = Translator::new("en-us");
        let mut cfg = Config::default();
        let out = run_with("99\n\nja\n", |c| {
            handle_settings(&tr, &mut cfg, c).expect("settings");
        });
        assert_eq!(cfg.format.max_fraction_digits, 3);
        assert_eq!(cfg.default_phase, PhaseMode::Three);
        assert!(out.contains("Invalid input; value unchanged."), "{out}");
    }

    #[test]
    fn yes_no_in_three_languages() {
        assert_eq!(parse_yes_no("Y"), Some(true));
        assert_eq!(parse_yes_no("예"), Some(true));
        assert_eq!(parse_yes_no("nein"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }
}
