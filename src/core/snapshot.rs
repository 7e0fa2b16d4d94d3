//! 진단용 로케이터 스냅샷
//!
//! 어떤 컨테이너가 어떤 스코프로 바인딩되어 있고 어떤 서비스를 가지고 있는지
//! 한 번에 확인하기 위한 직렬화 가능한 뷰입니다.

use serde::Serialize;

use crate::core::container::Scope;
use crate::host::{ObjectId, SceneGraph, SceneId};

#[derive(Debug, Clone, Serialize)]
pub struct LocatorSnapshot {
    pub global: Option<ObjectId>,
    pub scenes: Vec<SceneSnapshot>,
    pub containers: Vec<ContainerSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub scene: SceneId,
    pub name: String,
    pub container: Option<ObjectId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContainerSnapshot {
    pub owner: ObjectId,
    pub name: String,
    pub scene: SceneId,
    pub scope: Scope,
    /// 부트스트래퍼가 없으면 `None`
    pub bootstrapped: Option<bool>,
    pub services: Vec<String>,
}

impl LocatorSnapshot {
    /// (global, scene, local) 스코프별 컨테이너 수
    pub fn scope_counts(&self) -> (usize, usize, usize) {
        self.containers
            .iter()
            .fold((0, 0, 0), |(g, s, l), container| match container.scope {
                Scope::Global => (g + 1, s, l),
                Scope::Scene(_) => (g, s + 1, l),
                Scope::Local => (g, s, l + 1),
            })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl SceneGraph {
    pub fn snapshot(&self) -> LocatorSnapshot {
        let scenes = self
            .loaded_scenes()
            .into_iter()
            .map(|scene| SceneSnapshot {
                scene,
                name: self.scene_name(scene).unwrap_or_default().to_string(),
                container: self.context().scene_container(scene),
            })
            .collect();

        let containers = self
            .objects
            .iter()
            .filter_map(|(owner, record)| {
                let container = record.container.as_ref()?;
                Some(ContainerSnapshot {
                    owner: *owner,
                    name: record.name.clone(),
                    scene: record.scene,
                    scope: container.scope(),
                    bootstrapped: record.bootstrapper.as_ref().map(|b| b.is_bootstrapped()),
                    services: container
                        .registry()
                        .service_names()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                })
            })
            .collect();

        LocatorSnapshot {
            global: self.context().global(),
            scenes,
            containers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Audio;

    #[test]
    fn test_snapshot_lists_containers_by_scope() {
        let mut graph = SceneGraph::new();
        let scene = graph.load_scene("Level1");
        let scene_locator = graph.spawn_scene_locator(scene).unwrap();
        graph.on_attach(scene_locator).unwrap();
        let player = graph.spawn("Player", scene).unwrap();
        graph.attach_container(player).unwrap();
        graph.global_locator().register(Arc::new(Audio));

        let snapshot = graph.snapshot();

        assert_eq!(snapshot.scope_counts(), (1, 1, 1));
        assert!(snapshot.global.is_some());
        let global = snapshot
            .containers
            .iter()
            .find(|c| Some(c.owner) == snapshot.global)
            .unwrap();
        assert_eq!(global.services.len(), 1);
        assert!(global.services[0].ends_with("Audio"));

        let level = snapshot.scenes.iter().find(|s| s.scene == scene).unwrap();
        assert_eq!(level.container, Some(scene_locator));
        assert_eq!(level.name, "Level1");
    }

    #[test]
    fn test_snapshot_json() {
        let mut graph = SceneGraph::new();
        graph.load_scene("Level1");
        graph.global_container();

        let json = graph.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["containers"][0]["scope"]["kind"], "global");
        assert_eq!(value["containers"][0]["bootstrapped"], true);
        assert_eq!(value["scenes"][0]["name"], "DontDestroyOnLoad");
    }
}
