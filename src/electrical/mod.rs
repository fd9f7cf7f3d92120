//! 전기 관련 계산 모듈 모음.

pub mod load_current;

pub use load_current::*;
