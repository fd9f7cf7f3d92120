use serde::{Deserialize, Serialize};

/// 3상 계산에 쓰는 √3. 기존 계산 결과와 자릿수까지 맞추기 위해 고정값을 사용한다.
pub const SQRT_3: f64 = 1.732050808;

/// 전원 전압이 0일 때 돌려주는 부하 전류 값.
pub const ZERO_VOLTAGE_CURRENT: f64 = 0.0;

/// 단상/3상 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhaseMode {
    #[default]
    Single,
    Three,
}

impl PhaseMode {
    pub fn is_three_phase(self) -> bool {
        matches!(self, PhaseMode::Three)
    }

    /// 전압에 곱해지는 상 계수 (단상 1, 3상 √3).
    pub fn voltage_factor(self) -> f64 {
        match self {
            PhaseMode::Single => 1.0,
            PhaseMode::Three => SQRT_3,
        }
    }
}

impl From<bool> for PhaseMode {
    fn from(three_phase: bool) -> Self {
        if three_phase {
            PhaseMode::Three
        } else {
            PhaseMode::Single
        }
    }
}

/// 부하 전력[W]과 전원 전압[V]으로 부하 전류[A]를 계산한다.
///
/// - 단상: I = P / V
/// - 3상: I = P / (V · √3)
///
/// 전압이 0이면 [`ZERO_VOLTAGE_CURRENT`]를 반환한다. 결과가 유한하지 않은 경우
/// (극단적인 입력으로 인한 overflow 등)도 같은 값으로 돌려 UI에 inf/NaN이
/// 나타나지 않게 한다.
pub fn load_current(power_w: f64, voltage_v: f64, phase: PhaseMode) -> f64 {
    if voltage_v == 0.0 {
        return ZERO_VOLTAGE_CURRENT;
    }
    let current = power_w / (voltage_v * phase.voltage_factor());
    if current.is_finite() {
        current
    } else {
        ZERO_VOLTAGE_CURRENT
    }
}
