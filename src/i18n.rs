use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

use crate::number_format::NumberLocale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_CALCULATE: &str = "main_menu.calculate";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const CALC_HEADING: &str = "calc.heading";
    pub const CALC_LOAD_POWER: &str = "calc.load_power";
    pub const CALC_SOURCE_VOLTAGE: &str = "calc.source_voltage";
    pub const CALC_THREE_PHASE: &str = "calc.three_phase";
    pub const CALC_RESULT: &str = "calc.result";
    pub const CALC_VOLTAGE_MISSING: &str = "calc.voltage_missing";
    pub const PROMPT_YES_NO: &str = "prompt.yes_no";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT: &str = "settings.current";
    pub const SETTINGS_PROMPT_DIGITS: &str = "settings.prompt_digits";
    pub const SETTINGS_PROMPT_GROUPING: &str = "settings.prompt_grouping";
    pub const SETTINGS_PROMPT_PHASE: &str = "settings.prompt_phase";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const HELP_CALCULATE: &str = "help.calculate";
    pub const HELP_SETTINGS: &str = "help.settings";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Language {
    En,
    Ko,
    De,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else if c.starts_with("de") {
            Language::De
        } else {
            Language::En
        }
    }

    fn as_code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ko => "ko",
            Language::De => "de",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드에 따라 내장 언어팩만으로 번역기를 생성한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: built_in_pack(lang_code),
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 외부 언어팩은 같은 언어의 내장 언어팩 위에 덮어쓴다. 디렉터리나 파일이
    /// 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let mut merged = built_in_pack(lang_code).unwrap_or_default();
        if let Some(external) = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code))
        {
            merged.extend(external);
        }
        let overrides = if merged.is_empty() { None } else { Some(merged) };
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    /// 결과 숫자 표시에 쓸 로케일.
    pub fn number_locale(&self) -> NumberLocale {
        NumberLocale::from_language_code(self.lang.as_code())
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides
            .as_ref()
            .and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 언어팩에 없으면 코드에 내장된 영어 문자열로 폴백한다.
    pub fn t(&self, key: &str) -> &str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        en(key).unwrap_or("[missing translation]")
    }
}

/// `{name}` 형태의 자리표시자를 값으로 채운다.
pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "ko" | "ko-kr" => Some("ko-kr".into()),
        "en" | "en-us" | "en-uk" => Some("en-us".into()),
        "de" | "de-de" => Some("de-de".into()),
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko-kr".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        other if other.starts_with("de") => Some("de-de".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko-kr".into()),
        "en" => Some("en-us".into()),
        "de" => Some("de-de".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LANG", "LC_ALL"] {
        if let Ok(lang) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&lang) {
                return Some(code);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., de-de)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., de)
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함).
fn built_in_pack(lang: &str) -> Option<HashMap<String, String>> {
    match Language::from_code(lang.trim()) {
        Language::En => parse_toml_to_map(include_str!("../locales/en-us.toml")),
        Language::Ko => parse_toml_to_map(include_str!("../locales/ko-kr.toml")),
        Language::De => parse_toml_to_map(include_str!("../locales/de-de.toml")),
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting application.",
        MAIN_MENU_TITLE => "\n=== Load Current Calculator ===",
        MAIN_MENU_CALCULATE => "1) Calculate load current",
        MAIN_MENU_SETTINGS => "2) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        CALC_HEADING => "Calculate load",
        CALC_LOAD_POWER => "Load power [W]",
        CALC_SOURCE_VOLTAGE => "Source voltage [V]",
        CALC_THREE_PHASE => "Three phase?",
        CALC_RESULT => "Load current: {current} A",
        CALC_VOLTAGE_MISSING => "Enter a source voltage to compute the current.",
        PROMPT_YES_NO => " (y/n): ",
        SETTINGS_HEADING => "Settings",
        SETTINGS_CURRENT => "Fraction digits: {digits}, grouping: {grouping}, default phase: {phase}",
        SETTINGS_PROMPT_DIGITS => "Fraction digits 0-15 (enter to keep): ",
        SETTINGS_PROMPT_GROUPING => "Group digits? (y/n, enter to keep): ",
        SETTINGS_PROMPT_PHASE => "Start in three phase? (y/n, enter to keep): ",
        SETTINGS_INVALID => "Invalid input; value unchanged.",
        SETTINGS_SAVED => "Settings saved.",
        HELP_CALCULATE => "Help: enter load power [W] and source voltage [V]. Text that is not a number counts as 0.",
        HELP_SETTINGS => "Help: fraction digits and grouping change how the result is displayed.",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_cli_then_config() {
        assert_eq!(resolve_language("de", Some("ko")), "de-de");
        assert_eq!(resolve_language("auto", Some("ko")), "ko-kr");
        assert_eq!(resolve_language("EN-UK", None), "en-us");
    }

    #[test]
    fn locale_string_base_language() {
        assert_eq!(normalize_locale_string("de_DE.UTF-8").as_deref(), Some("de-de"));
        assert_eq!(normalize_locale_string("ko-KR").as_deref(), Some("ko-kr"));
        assert_eq!(normalize_locale_string("fr_FR"), None);
    }

    #[test]
    fn built_in_packs_cover_english_table() {
        for code in ["en-us", "ko-kr", "de-de"] {
            let tr = Translator::new(code);
            for key in [
                keys::CALC_HEADING,
                keys::CALC_LOAD_POWER,
                keys::CALC_SOURCE_VOLTAGE,
                keys::CALC_THREE_PHASE,
                keys::CALC_RESULT,
            ] {
                assert!(tr.lookup(key).is_some(), "{code} missing {key}");
            }
        }
    }

    #[test]
    fn result_template_keeps_placeholder() {
        for code in ["en-us", "ko-kr", "de-de"] {
            let tr = Translator::new(code);
            assert!(tr.t(keys::CALC_RESULT).contains("{current}"), "{code}");
        }
    }

    #[test]
    fn unknown_key_falls_back() {
        let tr = Translator::new("en-us");
        assert_eq!(tr.t("no.such.key"), "[missing translation]");
    }

    #[test]
    fn nested_tables_flatten_to_dotted_keys() {
        let map = parse_toml_to_map("[calc]\nheading = \"X\"\n[gui.nav]\napp_title = \"Y\"\n")
            .expect("map");
        assert_eq!(map.get("calc.heading").map(String::as_str), Some("X"));
        assert_eq!(map.get("gui.nav.app_title").map(String::as_str), Some("Y"));
    }

    #[test]
    fn number_locale_follows_language() {
        assert_eq!(Translator::new("de-de").number_locale(), NumberLocale::DeDe);
        assert_eq!(Translator::new("ko").number_locale(), NumberLocale::KoKr);
    }

    #[test]
    fn template_fill() {
        let s = fill_template("Load current: {current} A", &[("current", "10".into())]);
        assert_eq!(s, "Load current: 10 A");
    }
}
