#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::{env, fs, path::Path};
use load_current_calculator::{
    app,
    calculator::{LoadCurrentCalculator, LoadCurrentReading},
    config,
    electrical::PhaseMode,
    i18n::{self, keys},
    number_format::MAX_FRACTION_DIGITS,
};

fn main() -> Result<(), eframe::Error> {
    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/en-us/ko-kr/de-de)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if a == "--lang" || a == "-L" {
            if i + 1 < args.len() {
                cli_lang = Some(args[i + 1].clone());
                i += 1;
            }
        }
        i += 1;
    }

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([420.0, 560.0])
        .with_transparent(true);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = config::load_or_default().unwrap_or_else(|e| {
        eprintln!("Config error, using defaults: {e}");
        config::Config::default()
    });
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "Load Current Calculator",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                eprintln!("Font error: {e}");
            }
            Box::new(GuiApp::new(app_cfg))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["edc_icon.png", "icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 입력 폼 위에 표시할 회로도 이미지 후보 경로.
const CIRCUIT_IMAGE_PATHS: [&str; 3] = [
    "assets/circuit.png",
    "../assets/circuit.png",
    "circuit.png",
];

/// 후보 경로에서 회로도 이미지를 찾아 디코딩한다. 없으면 배너 없이 표시한다.
fn load_circuit_image(paths: &[&str]) -> Option<egui::ColorImage> {
    let path = paths.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    decode_color_image(&bytes)
}

fn decode_color_image(bytes: &[u8]) -> Option<egui::ColorImage> {
    let img = image::load_from_memory(bytes).ok()?;
    let (w, h) = img.dimensions();
    let rgba = img.to_rgba8();
    Some(egui::ColorImage::from_rgba_unmultiplied(
        [w as usize, h as usize],
        rgba.as_raw(),
    ))
}

fn heading_with_tip(ui: &mut egui::Ui, text: &str, tip: &str) -> egui::Response {
    ui.heading(text).on_hover_text(tip)
}

/// 공통: 바이너리 폰트 바이트를 egui에 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .insert(0, font_name);
    ctx.set_fonts(fonts);
}

/// 한글 표시용 폰트를 찾는다.
/// 1) assets/fonts/ 아래 프로젝트 폰트
/// 2) 시스템 폰트 (Windows/macOS/Linux)
/// 3) 모두 실패 시 Err를 반환해 사용자 지정 폰트 로드를 유도한다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates: Vec<std::path::PathBuf> = vec![
        "assets/fonts/malgun.ttf".into(),
        "assets/fonts/NanumGothic.ttf".into(),
    ];
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        for cand in ["malgun.ttf", "gulim.ttc"] {
            candidates.push(fonts.join(cand));
        }
    }
    candidates.push("/System/Library/Fonts/AppleSDGothicNeo.ttc".into());
    candidates.push("/usr/share/fonts/truetype/nanum/NanumGothic.ttf".into());
    candidates.push("/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc".into());

    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read font ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }
    Err("Font not found. Please set a user font (.ttf/.ttc) in settings.".into())
}

/// 사용자가 선택한 경로의 폰트를 egui에 등록한다.
fn load_custom_font(ctx: &egui::Context, path: &str) -> Result<(), String> {
    let p = Path::new(path);
    if !p.exists() {
        return Err(format!("Font file not found: {path}"));
    }
    let bytes = fs::read(p).map_err(|e| format!("Failed to read font file: {e}"))?;
    apply_font_bytes(ctx, bytes, "user_font");
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ThemeChoice {
    System,
    Light,
    Dark,
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    calc: LoadCurrentCalculator,
    // 입력
    power_input: String,
    voltage_input: String,
    three_phase: bool,
    // 설정
    lang_input: String,
    lang_save_status: Option<String>,
    window_alpha: f32,
    ui_scale: f32,
    always_on_top: bool,
    theme: ThemeChoice,
    custom_font_path: String,
    font_load_error: Option<String>,
    // 회로도 배너 (첫 프레임에 한 번만 로드)
    circuit_texture: Option<egui::TextureHandle>,
    circuit_checked: bool,
    show_settings_modal: bool,
    show_help_modal: bool,
    show_formula_modal: bool,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        let has_overrides = tr.lookup("gui.nav.app_title").is_some();
        eprintln!("GUI language resolved: {lang_code}, overrides_loaded={has_overrides}");
        let calc = LoadCurrentCalculator::from_config(&config, &tr);
        Self {
            lang_input: config.language.clone(),
            lang_save_status: None,
            window_alpha: config.window_alpha.clamp(0.3, 1.0),
            ui_scale: 1.0,
            always_on_top: false,
            theme: ThemeChoice::System,
            custom_font_path: String::new(),
            font_load_error: None,
            circuit_texture: None,
            circuit_checked: false,
            show_settings_modal: false,
            show_help_modal: false,
            show_formula_modal: false,
            power_input: String::new(),
            voltage_input: String::new(),
            three_phase: config.default_phase.is_three_phase(),
            calc,
            tr,
            config,
        }
    }

    /// 현재 입력값으로 다시 계산한다. 입력이 바뀔 때마다(매 프레임) 호출된다.
    fn reading(&self) -> LoadCurrentReading {
        self.calc.evaluate(
            &self.power_input,
            &self.voltage_input,
            PhaseMode::from(self.three_phase),
        )
    }

    /// 언어/표시 설정이 바뀐 뒤 번역기와 계산기를 다시 만든다.
    fn apply_settings(&mut self) {
        self.config.window_alpha = self.window_alpha;
        let resolved = i18n::resolve_language("auto", Some(self.config.language.as_str()));
        self.tr = i18n::Translator::new_with_pack(&resolved, self.config.language_pack_dir.as_deref());
        self.calc = LoadCurrentCalculator::from_config(&self.config, &self.tr);
    }

    fn apply_visuals(&self, ctx: &egui::Context, frame: &Frame) {
        let mut visuals = match self.theme {
            ThemeChoice::System => frame
                .info()
                .system_theme
                .unwrap_or(eframe::Theme::Dark)
                .egui_visuals(),
            ThemeChoice::Light => egui::Visuals::light(),
            ThemeChoice::Dark => egui::Visuals::dark(),
        };
        visuals.window_fill = visuals.window_fill.linear_multiply(self.window_alpha);
        visuals.panel_fill = visuals.panel_fill.linear_multiply(self.window_alpha);
        ctx.set_visuals(visuals);
    }

    fn ui_calculator(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let txt = |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        if !self.circuit_checked {
            self.circuit_checked = true;
            self.circuit_texture = load_circuit_image(&CIRCUIT_IMAGE_PATHS).map(|img| {
                ui.ctx()
                    .load_texture("circuit_diagram", img, egui::TextureOptions::LINEAR)
            });
        }
        if let Some(texture) = &self.circuit_texture {
            ui.vertical_centered(|ui| {
                ui.add(
                    egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                        .max_width(ui.available_width())
                        .maintain_aspect_ratio(true),
                );
            });
            ui.add_space(8.0);
        }
        ui.vertical_centered(|ui| {
            heading_with_tip(
                ui,
                tr.t(keys::CALC_HEADING),
                &txt("gui.calc.tip", "The result updates as you type."),
            );
        });
        ui.add_space(12.0);

        for (key, value) in [
            (keys::CALC_LOAD_POWER, &mut self.power_input),
            (keys::CALC_SOURCE_VOLTAGE, &mut self.voltage_input),
        ] {
            ui.label(tr.t(key));
            ui.add(
                egui::TextEdit::singleline(value)
                    .hint_text("0")
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(8.0);
        }
        ui.checkbox(&mut self.three_phase, tr.t(keys::CALC_THREE_PHASE));

        ui.add_space(16.0);
        ui.separator();
        let reading = self.reading();
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(app::result_line(&tr, &reading)).size(26.0).strong());
            if reading.voltage_missing {
                ui.small(tr.t(keys::CALC_VOLTAGE_MISSING));
            }
        });
    }

    fn ui_settings_window(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let txt = |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        let mut open = self.show_settings_modal;
        let mut save_clicked = false;
        let mut three_phase_default = self.config.default_phase.is_three_phase();
        egui::Window::new(txt("gui.settings.title", "Settings"))
            .collapsible(false)
            .resizable(true)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.heading(txt("gui.settings.format", "Result format"));
                ui.horizontal(|ui| {
                    ui.label(txt("gui.settings.digits", "Fraction digits"));
                    ui.add(
                        egui::DragValue::new(&mut self.config.format.max_fraction_digits)
                            .clamp_range(0..=MAX_FRACTION_DIGITS),
                    );
                });
                ui.checkbox(&mut self.config.format.grouping, txt("gui.settings.grouping", "Group digits"));
                ui.checkbox(
                    &mut three_phase_default,
                    txt("gui.settings.default_phase", "Start in three phase"),
                );

                ui.separator();
                ui.heading(txt("gui.settings.general", "General"));
                ui.label(txt("gui.settings.ui_scale", "UI scale"));
                let scale_slider = egui::Slider::new(&mut self.ui_scale, 0.8..=1.6).suffix(" x");
                if ui.add(scale_slider).changed() {
                    ctx.set_pixels_per_point(self.ui_scale);
                }
                ui.checkbox(&mut self.always_on_top, txt("gui.settings.always_on_top", "Always on top"));
                ui.label(txt("gui.settings.alpha", "Window transparency"));
                ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));
                ui.label(txt("gui.settings.theme", "Theme"));
                ui.horizontal(|ui| {
                    for (choice, key, default) in [
                        (ThemeChoice::System, "gui.settings.theme_choice.system", "System"),
                        (ThemeChoice::Light, "gui.settings.theme_choice.light", "Light"),
                        (ThemeChoice::Dark, "gui.settings.theme_choice.dark", "Dark"),
                    ] {
                        ui.selectable_value(&mut self.theme, choice, txt(key, default));
                    }
                });

                ui.separator();
                ui.label(txt("gui.settings.lang", "Language"));
                egui::ComboBox::from_id_source("lang_choice")
                    .selected_text(self.lang_input.clone())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.lang_input,
                            "auto".into(),
                            txt("gui.settings.lang_choice.auto", "System"),
                        );
                        ui.selectable_value(&mut self.lang_input, "en-us".into(), "English (US)");
                        ui.selectable_value(&mut self.lang_input, "ko-kr".into(), "한국어");
                        ui.selectable_value(&mut self.lang_input, "de-de".into(), "Deutsch");
                    });

                ui.separator();
                ui.label(txt("gui.settings.font", "Custom font"));
                ui.horizontal(|ui| {
                    let edit = ui.text_edit_singleline(&mut self.custom_font_path);
                    if edit.lost_focus() && !self.custom_font_path.trim().is_empty() {
                        self.font_load_error =
                            load_custom_font(ctx, self.custom_font_path.trim()).err();
                    }
                    if ui.button(txt("gui.settings.font_pick", "Choose font file...")).clicked() {
                        if let Some(path) = FileDialog::new()
                            .add_filter("Font", &["ttf", "ttc", "otf"])
                            .pick_file()
                        {
                            self.custom_font_path = path.display().to_string();
                            self.font_load_error = load_custom_font(ctx, &self.custom_font_path).err();
                        }
                    }
                });
                if let Some(err) = &self.font_load_error {
                    ui.colored_label(egui::Color32::RED, err.as_str());
                }

                ui.separator();
                if ui.button(txt("gui.settings.save", "Save settings")).clicked() {
                    save_clicked = true;
                }
                if let Some(msg) = &self.lang_save_status {
                    ui.label(msg.as_str());
                }
            });
        self.show_settings_modal = open;
        self.config.default_phase = PhaseMode::from(three_phase_default);

        if save_clicked {
            self.config.language = self.lang_input.clone();
            self.apply_settings();
            self.lang_save_status = Some(match self.config.save() {
                Ok(()) => txt("gui.settings.saved", "Saved."),
                Err(e) => format!("{}: {e}", txt("gui.settings.save_error", "Save error")),
            });
        } else {
            self.calc = LoadCurrentCalculator::from_config(&self.config, &self.tr);
        }
    }

    fn ui_help_window(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let txt = |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        egui::Window::new(txt("gui.about.title", "Help / About"))
            .collapsible(false)
            .resizable(true)
            .open(&mut self.show_help_modal)
            .show(ctx, |ui| {
                ui.heading(txt(
                    "gui.about.app",
                    "Load current calculator for single- and three-phase circuits",
                ));
                ui.label(txt("gui.about.version", "Version: 1.0.0"));
                ui.separator();
                ui.label(tr.t(keys::HELP_CALCULATE));
                ui.label(txt(
                    "gui.about.hint",
                    "Text that is not a number counts as 0. A source voltage of 0 shows a current of 0.",
                ));
            });
    }

    fn ui_formula_window(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let txt = |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        egui::Window::new(txt("gui.formula.title", "Formula reference"))
            .collapsible(true)
            .resizable(true)
            .open(&mut self.show_formula_modal)
            .show(ctx, |ui| {
                ui.label(txt("gui.formula.single", "Single phase: I = P / U"));
                ui.label(txt(
                    "gui.formula.three",
                    "Three phase: I = P / (U * sqrt(3)), sqrt(3) = 1.732050808",
                ));
                ui.separator();
                ui.label(txt("gui.formula.zero", "U = 0: the current is shown as 0."));
            });
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut Frame) {
        ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(if self.always_on_top {
            egui::WindowLevel::AlwaysOnTop
        } else {
            egui::WindowLevel::Normal
        }));
        self.apply_visuals(ctx, frame);

        let tr = self.tr.clone();
        let txt = move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());

        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong(txt("gui.nav.app_title", "Load Current Calculator"));
                ui.separator();
                if ui.button(txt("gui.formula.button", "Formula reference")).clicked() {
                    self.show_formula_modal = true;
                }
                if ui.button(txt("gui.settings.title", "Settings")).clicked() {
                    self.show_settings_modal = true;
                }
                if ui.button(txt("gui.about.title", "Help / About")).clicked() {
                    self.show_help_modal = true;
                }
            });
        });

        if self.show_settings_modal {
            self.ui_settings_window(ctx);
        }
        if self.show_help_modal {
            self.ui_help_window(ctx);
        }
        if self.show_formula_modal {
            self.ui_formula_window(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| self.ui_calculator(ui));
        });
    }
}
