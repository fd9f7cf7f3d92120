//! 핵심 계산 로직을 라이브러리로 분리하여 CLI와 GUI가 같은 계산기를 쓰도록 한다.

pub mod app;
pub mod calculator;
pub mod config;
pub mod electrical;
pub mod i18n;
pub mod number_format;
pub mod ui_cli;
