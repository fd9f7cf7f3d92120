use clap::{Parser, ValueEnum};
use load_current_calculator::electrical::PhaseMode;
use load_current_calculator::{app, config, i18n};

/// 부하 전력과 전원 전압으로 부하 전류를 계산한다.
#[derive(Debug, Parser)]
#[command(name = "load_current_calculator_cli", version, about)]
struct Cli {
    /// 부하 전력 [W]. 숫자가 아니면 0으로 계산한다.
    #[arg(short = 'p', long, allow_hyphen_values = true)]
    power: Option<String>,
    /// 전원 전압 [V]. 숫자가 아니면 0으로 계산한다.
    #[arg(short = 'u', long, allow_hyphen_values = true)]
    voltage: Option<String>,
    /// 회로 상 (single/three). 생략하면 config.toml의 default_phase
    #[arg(long, value_enum)]
    phase: Option<PhaseArg>,
    /// `--phase three`와 같다
    #[arg(long, conflicts_with = "phase")]
    three_phase: bool,
    /// 언어 코드 (auto/en-us/ko-kr/de-de)
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,
    /// 표시할 최대 소수 자릿수 (단발 실행)
    #[arg(long)]
    digits: Option<u8>,
    /// 자릿수 구분 기호 없이 표시 (단발 실행)
    #[arg(long)]
    no_grouping: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PhaseArg {
    Single,
    Three,
}

impl From<PhaseArg> for PhaseMode {
    fn from(value: PhaseArg) -> Self {
        match value {
            PhaseArg::Single => PhaseMode::Single,
            PhaseArg::Three => PhaseMode::Three,
        }
    }
}

impl Cli {
    /// 명령행에서 명시한 상. 아무 옵션도 없으면 None.
    fn explicit_phase(&self) -> Option<PhaseMode> {
        if self.three_phase {
            Some(PhaseMode::Three)
        } else {
            self.phase.map(PhaseMode::from)
        }
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    let cli = Cli::parse();
    let lang = i18n::resolve_language(&cli.lang, None);
    if let Err(err) = try_run(cli) {
        let tr = i18n::Translator::new(&lang);
        eprintln!("{}: {err}", tr.t(i18n::keys::ERROR_PREFIX));
        std::process::exit(1);
    }
}

fn try_run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = config::load_or_default()?;
    let lang_code = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = i18n::Translator::new_with_pack(&lang_code, cfg.language_pack_dir.as_deref());

    if cli.power.is_some() || cli.voltage.is_some() {
        // 단발 실행 옵션은 config.toml에 저장하지 않는다.
        if let Some(digits) = cli.digits {
            cfg.format.max_fraction_digits = digits;
        }
        if cli.no_grouping {
            cfg.format.grouping = false;
        }
        let phase = app::choose_phase(cli.explicit_phase(), &cfg);
        let line = app::run_once(
            &cfg,
            &tr,
            cli.power.as_deref().unwrap_or_default(),
            cli.voltage.as_deref().unwrap_or_default(),
            phase,
        );
        println!("{line}");
        return Ok(());
    }

    app::run(&mut cfg, &tr)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use load_current_calculator::config::Config;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("load_current_calculator_cli").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("parse args")
    }

    #[test]
    fn phase_option_overrides_saved_default() {
        let cfg = Config {
            default_phase: PhaseMode::Three,
            ..Config::default()
        };
        let cli = parse(&["--power", "2300", "--voltage", "230", "--phase", "single"]);
        let phase = app::choose_phase(cli.explicit_phase(), &cfg);
        assert_eq!(phase, PhaseMode::Single);

        let tr = i18n::Translator::new("en-us");
        let line = app::run_once(&cfg, &tr, "2300", "230", phase);
        assert_eq!(line, "Load current: 10 A");
    }

    #[test]
    fn missing_phase_option_uses_config() {
        let cfg = Config {
            default_phase: PhaseMode::Three,
            ..Config::default()
        };
        let cli = parse(&["-p", "2300", "-u", "230"]);
        assert_eq!(cli.explicit_phase(), None);
        assert_eq!(app::choose_phase(cli.explicit_phase(), &cfg), PhaseMode::Three);
    }

    #[test]
    fn three_phase_shorthand() {
        let cli = parse(&["-p", "2300", "-u", "230", "--three-phase"]);
        assert_eq!(cli.explicit_phase(), Some(PhaseMode::Three));
        let cli = parse(&["-p", "2300", "-u", "230", "--phase", "three"]);
        assert_eq!(cli.explicit_phase(), Some(PhaseMode::Three));
    }

    #[test]
    fn three_phase_flag_conflicts_with_phase_option() {
        let args = ["load_current_calculator_cli", "--three-phase", "--phase", "single"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
