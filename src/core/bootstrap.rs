//! # Bootstrap - 컨테이너 지연 활성화
//!
//! 부트스트래퍼는 오브젝트에 붙어서 그 오브젝트의 컨테이너를
//! 글로벌 슬롯 또는 씬 맵에 바인딩합니다.
//!
//! ```text
//! Uninitialized ──bootstrap_on_demand()──▶ Bootstrapped
//!                                         (두 번째 호출은 no-op)
//! ```
//!
//! 활성화(`on_attach`) 시 자동으로, 혹은 로케이터가 아직 활성화되지 않은
//! 컨테이너를 필요로 할 때 on-demand로 실행됩니다.
//! 실제 바인딩은 [`crate::host::SceneGraph`]가 수행합니다.

use serde::Serialize;

/// 부트스트랩 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapKind {
    /// `persistent`이면 씬이 언로드되어도 파괴되지 않음
    Global { persistent: bool },
    Scene,
}

#[derive(Debug, Clone)]
pub struct Bootstrapper {
    kind: BootstrapKind,
    bootstrapped: bool,
}

impl Bootstrapper {
    pub fn global(persistent: bool) -> Self {
        Self {
            kind: BootstrapKind::Global { persistent },
            bootstrapped: false,
        }
    }

    pub fn scene() -> Self {
        Self {
            kind: BootstrapKind::Scene,
            bootstrapped: false,
        }
    }

    pub fn kind(&self) -> BootstrapKind {
        self.kind
    }

    pub fn is_global(&self) -> bool {
        matches!(self.kind, BootstrapKind::Global { .. })
    }

    pub fn is_scene(&self) -> bool {
        self.kind == BootstrapKind::Scene
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    /// 상태를 `Bootstrapped`로 전이합니다.
    ///
    /// 이번 호출에서 전이가 일어났으면 `true`, 이미 부트스트랩된 상태면 `false`.
    pub fn bootstrap_on_demand(&mut self) -> bool {
        if self.bootstrapped {
            return false;
        }
        self.bootstrapped = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_is_one_way_and_idempotent() {
        let mut bootstrapper = Bootstrapper::scene();
        assert!(!bootstrapper.is_bootstrapped());

        assert!(bootstrapper.bootstrap_on_demand());
        assert!(bootstrapper.is_bootstrapped());

        assert!(!bootstrapper.bootstrap_on_demand());
        assert!(bootstrapper.is_bootstrapped());
    }

    #[test]
    fn test_kinds() {
        let global = Bootstrapper::global(true);
        assert!(global.is_global());
        assert!(!global.is_scene());
        assert_eq!(global.kind(), BootstrapKind::Global { persistent: true });

        assert!(Bootstrapper::scene().is_scene());
    }
}
