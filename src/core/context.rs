//! # Locator Context - 프로세스 전역 컨테이너 레지스트리
//!
//! 글로벌 슬롯(최대 하나)과 씬별 컨테이너 맵(씬당 최대 하나)을 보관합니다.
//! 두 레지스트리 모두 컨테이너를 소유하지 않고 소유 오브젝트의 ID만 기억하므로,
//! 오브젝트가 파괴될 때 반드시 [`LocatorContext::release`]가 호출되어야 합니다.
//!
//! 호스트가 정적 메모리를 재사용하는 경우(도메인 리로드)를 위해
//! [`LocatorContext::reset`]으로 명시적으로 비울 수 있습니다.
//!
//! ## 중복 설정 처리
//!
//! | 상황 | 결과 |
//! |------|------|
//! | 같은 컨테이너를 다시 글로벌로 설정 | 경고, 변경 없음 |
//! | 다른 글로벌이 이미 존재 | 에러 로그, 요청 무시 |
//! | 씬에 이미 컨테이너가 존재 | 에러 로그, 요청 무시 |

use std::collections::HashMap;

use log::{debug, error, warn};

use crate::host::{ObjectId, SceneId};

/// 글로벌/씬 설정 요청의 결과
///
/// 충돌은 호출자에게 에러로 전파되지 않고 이 값으로만 보고됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureOutcome {
    Configured,
    AlreadyConfigured,
    /// 다른 컨테이너가 이미 자리를 차지하고 있어 무시됨
    Rejected { existing: ObjectId },
}

impl ConfigureOutcome {
    pub fn is_configured(&self) -> bool {
        matches!(self, ConfigureOutcome::Configured)
    }
}

#[derive(Debug, Default)]
pub struct LocatorContext {
    global: Option<ObjectId>,
    scenes: HashMap<SceneId, ObjectId>,
}

impl LocatorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(&self) -> Option<ObjectId> {
        self.global
    }

    pub fn is_global(&self, owner: ObjectId) -> bool {
        self.global == Some(owner)
    }

    pub fn scene_container(&self, scene: SceneId) -> Option<ObjectId> {
        self.scenes.get(&scene).copied()
    }

    /// 씬 ID 순으로 정렬된 씬 컨테이너 목록
    pub fn scene_containers(&self) -> Vec<(SceneId, ObjectId)> {
        let mut entries: Vec<_> = self.scenes.iter().map(|(s, o)| (*s, *o)).collect();
        entries.sort_unstable();
        entries
    }

    pub fn configure_as_global(&mut self, owner: ObjectId) -> ConfigureOutcome {
        match self.global {
            Some(current) if current == owner => {
                warn!(
                    "LocatorContext.configure_as_global: {} is already configured as global",
                    owner
                );
                ConfigureOutcome::AlreadyConfigured
            }
            Some(current) => {
                error!(
                    "LocatorContext.configure_as_global: {} rejected, {} is already configured as global",
                    owner, current
                );
                ConfigureOutcome::Rejected { existing: current }
            }
            None => {
                debug!("Global container bound to {}", owner);
                self.global = Some(owner);
                ConfigureOutcome::Configured
            }
        }
    }

    pub fn configure_for_scene(&mut self, scene: SceneId, owner: ObjectId) -> ConfigureOutcome {
        match self.scenes.get(&scene).copied() {
            Some(current) if current == owner => {
                warn!(
                    "LocatorContext.configure_for_scene: {} is already registered for {}",
                    owner, scene
                );
                ConfigureOutcome::AlreadyConfigured
            }
            Some(current) => {
                error!(
                    "LocatorContext.configure_for_scene: {} rejected, {} is already registered for {}",
                    owner, current, scene
                );
                ConfigureOutcome::Rejected { existing: current }
            }
            None => {
                debug!("Scene container for {} bound to {}", scene, owner);
                self.scenes.insert(scene, owner);
                ConfigureOutcome::Configured
            }
        }
    }

    /// 파괴된 오브젝트를 레지스트리에서 제거합니다.
    ///
    /// 제거되었으면 `true`.
    pub fn release(&mut self, owner: ObjectId) -> bool {
        if self.global == Some(owner) {
            self.global = None;
            debug!("Global container {} released", owner);
            return true;
        }

        let before = self.scenes.len();
        self.scenes.retain(|_, registered| *registered != owner);
        let removed = self.scenes.len() != before;
        if removed {
            debug!("Scene container {} released", owner);
        }
        removed
    }

    pub fn reset(&mut self) {
        self.global = None;
        self.scenes.clear();
    }
}
