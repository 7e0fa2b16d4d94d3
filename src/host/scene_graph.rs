//! # Scene Graph - 호스트 오브젝트 그래프
//!
//! 씬, 오브젝트 트리, 오브젝트에 붙은 컨테이너/부트스트래퍼, 그리고
//! [`LocatorContext`]를 소유합니다. 엔진 대신 이 그래프가 생명주기 알림을
//! 명시적으로 전달합니다.
//!
//! 씬은 생성 시점부터 존재하는 영속 씬(`DontDestroyOnLoad`)과
//! [`SceneGraph::load_scene`]으로 로드되는 일반 씬으로 나뉩니다.
//! 처음 로드된 일반 씬이 활성 씬이 됩니다.
//!
//! ```rust
//! use std::sync::Arc;
//! use scene_service_locator::host::SceneGraph;
//!
//! struct Score(u32);
//!
//! let mut graph = SceneGraph::new();
//! let level = graph.load_scene("Level1");
//! let player = graph.spawn("Player", level).unwrap();
//!
//! graph.global_locator().register(Arc::new(Score(10)));
//!
//! let score = graph.locator_for(player).unwrap().get::<Score>().unwrap();
//! assert_eq!(score.0, 10);
//! ```

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::config::LocatorConfig;
use crate::core::bootstrap::{BootstrapKind, Bootstrapper};
use crate::core::container::{Container, Scope};
use crate::core::context::{ConfigureOutcome, LocatorContext};
use crate::core::errors::{LocatorError, LocatorResult};
use crate::host::ids::{ObjectId, SceneId};

pub const PERSISTENT_SCENE_NAME: &str = "DontDestroyOnLoad";

#[derive(Debug)]
struct SceneRecord {
    name: String,
    roots: Vec<ObjectId>,
}

#[derive(Debug)]
pub(crate) struct ObjectRecord {
    pub(crate) name: String,
    pub(crate) scene: SceneId,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
    pub(crate) container: Option<Container>,
    pub(crate) bootstrapper: Option<Bootstrapper>,
}

#[derive(Debug)]
pub struct SceneGraph {
    config: LocatorConfig,
    context: LocatorContext,
    scenes: BTreeMap<SceneId, SceneRecord>,
    pub(crate) objects: BTreeMap<ObjectId, ObjectRecord>,
    persistent_scene: SceneId,
    active_scene: Option<SceneId>,
    next_scene: u64,
    next_object: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::with_config(LocatorConfig::default())
    }

    pub fn with_config(config: LocatorConfig) -> Self {
        let persistent_scene = SceneId::new(0);
        let mut scenes = BTreeMap::new();
        scenes.insert(
            persistent_scene,
            SceneRecord {
                name: PERSISTENT_SCENE_NAME.to_string(),
                roots: Vec::new(),
            },
        );

        Self {
            config,
            context: LocatorContext::new(),
            scenes,
            objects: BTreeMap::new(),
            persistent_scene,
            active_scene: None,
            next_scene: 1,
            next_object: 1,
        }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn context(&self) -> &LocatorContext {
        &self.context
    }

    // ---------------------------------------------------------------------
    // 씬
    // ---------------------------------------------------------------------

    pub fn load_scene(&mut self, name: &str) -> SceneId {
        let scene = SceneId::new(self.next_scene);
        self.next_scene += 1;
        self.scenes.insert(
            scene,
            SceneRecord {
                name: name.to_string(),
                roots: Vec::new(),
            },
        );
        if self.active_scene.is_none() {
            self.active_scene = Some(scene);
        }
        info!("🎬 Scene loaded: {} ({})", name, scene);
        scene
    }

    pub fn persistent_scene(&self) -> SceneId {
        self.persistent_scene
    }

    pub fn active_scene(&self) -> Option<SceneId> {
        self.active_scene
    }

    pub fn set_active_scene(&mut self, scene: SceneId) -> LocatorResult<()> {
        self.ensure_scene(scene)?;
        if scene == self.persistent_scene {
            warn!("SceneGraph.set_active_scene: the persistent scene cannot be active");
            return Ok(());
        }
        self.active_scene = Some(scene);
        Ok(())
    }

    pub fn is_loaded(&self, scene: SceneId) -> bool {
        self.scenes.contains_key(&scene)
    }

    pub fn scene_name(&self, scene: SceneId) -> LocatorResult<&str> {
        self.scenes
            .get(&scene)
            .map(|record| record.name.as_str())
            .ok_or(LocatorError::UnknownScene(scene))
    }

    /// 영속 씬을 포함한 로드된 씬 목록
    pub fn loaded_scenes(&self) -> Vec<SceneId> {
        self.scenes.keys().copied().collect()
    }

    /// 씬의 루트 오브젝트 (생성 순서)
    pub fn roots_of(&self, scene: SceneId) -> LocatorResult<&[ObjectId]> {
        self.scenes
            .get(&scene)
            .map(|record| record.roots.as_slice())
            .ok_or(LocatorError::UnknownScene(scene))
    }

    /// 씬을 언로드하고 파괴된 오브젝트 수를 반환합니다.
    ///
    /// 영속 씬은 언로드할 수 없습니다.
    pub fn unload_scene(&mut self, scene: SceneId) -> LocatorResult<usize> {
        self.ensure_scene(scene)?;
        if scene == self.persistent_scene {
            warn!("SceneGraph.unload_scene: the persistent scene cannot be unloaded");
            return Ok(0);
        }

        let roots = self.roots_of(scene)?.to_vec();
        let mut destroyed = 0;
        for root in roots {
            destroyed += self.destroy_subtree(root);
        }
        self.scenes.remove(&scene);

        if self.active_scene == Some(scene) {
            self.active_scene = self
                .scenes
                .keys()
                .copied()
                .find(|id| *id != self.persistent_scene);
        }

        info!("🎬 Scene unloaded: {} ({} objects destroyed)", scene, destroyed);
        Ok(destroyed)
    }

    // ---------------------------------------------------------------------
    // 오브젝트
    // ---------------------------------------------------------------------

    pub fn spawn(&mut self, name: &str, scene: SceneId) -> LocatorResult<ObjectId> {
        self.ensure_scene(scene)?;
        Ok(self.insert_object(name, scene, None))
    }

    pub fn spawn_child(&mut self, name: &str, parent: ObjectId) -> LocatorResult<ObjectId> {
        let scene = self.scene_of(parent)?;
        Ok(self.insert_object(name, scene, Some(parent)))
    }

    pub(crate) fn insert_object(
        &mut self,
        name: &str,
        scene: SceneId,
        parent: Option<ObjectId>,
    ) -> ObjectId {
        let id = ObjectId::new(self.next_object);
        self.next_object += 1;

        match parent.and_then(|p| self.objects.get_mut(&p)) {
            Some(parent_record) => parent_record.children.push(id),
            None => {
                if let Some(record) = self.scenes.get_mut(&scene) {
                    record.roots.push(id);
                }
            }
        }

        self.objects.insert(
            id,
            ObjectRecord {
                name: name.to_string(),
                scene,
                parent,
                children: Vec::new(),
                container: None,
                bootstrapper: None,
            },
        );
        debug!("Spawned '{}' as {} in {}", name, id, scene);
        id
    }

    pub fn exists(&self, object: ObjectId) -> bool {
        self.objects.contains_key(&object)
    }

    pub fn name_of(&self, object: ObjectId) -> LocatorResult<&str> {
        Ok(self.record(object)?.name.as_str())
    }

    pub fn scene_of(&self, object: ObjectId) -> LocatorResult<SceneId> {
        Ok(self.record(object)?.scene)
    }

    pub fn parent_of(&self, object: ObjectId) -> LocatorResult<Option<ObjectId>> {
        Ok(self.record(object)?.parent)
    }

    pub fn children_of(&self, object: ObjectId) -> LocatorResult<&[ObjectId]> {
        Ok(self.record(object)?.children.as_slice())
    }

    pub fn has_container(&self, object: ObjectId) -> bool {
        self.objects
            .get(&object)
            .is_some_and(|record| record.container.is_some())
    }

    pub fn container(&self, object: ObjectId) -> LocatorResult<&Container> {
        self.record(object)?
            .container
            .as_ref()
            .ok_or(LocatorError::NoContainer(object))
    }

    pub fn bootstrapper(&self, object: ObjectId) -> LocatorResult<Option<&Bootstrapper>> {
        Ok(self.record(object)?.bootstrapper.as_ref())
    }

    /// 오브젝트에 컨테이너를 붙입니다. 이미 있으면 그대로 둡니다.
    pub fn attach_container(&mut self, object: ObjectId) -> LocatorResult<()> {
        let record = self.record_mut(object)?;
        if record.container.is_none() {
            record.container = Some(Container::new());
            debug!("Container attached to '{}' ({})", record.name, object);
        }
        Ok(())
    }

    pub fn attach_global_bootstrapper(
        &mut self,
        object: ObjectId,
        persistent: bool,
    ) -> LocatorResult<()> {
        self.attach_bootstrapper(object, Bootstrapper::global(persistent))
    }

    pub fn attach_scene_bootstrapper(&mut self, object: ObjectId) -> LocatorResult<()> {
        self.attach_bootstrapper(object, Bootstrapper::scene())
    }

    /// 부트스트래퍼는 오브젝트당 하나이며 컨테이너를 함께 붙입니다.
    fn attach_bootstrapper(
        &mut self,
        object: ObjectId,
        bootstrapper: Bootstrapper,
    ) -> LocatorResult<()> {
        self.attach_container(object)?;
        let record = self.record_mut(object)?;
        match &record.bootstrapper {
            Some(existing) => warn!(
                "SceneGraph.attach_bootstrapper: '{}' ({}) already has a {:?} bootstrapper",
                record.name,
                object,
                existing.kind()
            ),
            None => record.bootstrapper = Some(bootstrapper),
        }
        Ok(())
    }

    /// 글로벌 부트스트래퍼를 가진 오브젝트를 생성합니다. 활성화는 `on_attach`로 합니다.
    pub fn spawn_global_locator(
        &mut self,
        scene: SceneId,
        persistent: bool,
    ) -> LocatorResult<ObjectId> {
        let name = self.config.global_name.clone();
        let object = self.spawn(&name, scene)?;
        self.attach_global_bootstrapper(object, persistent)?;
        Ok(object)
    }

    /// 씬 부트스트래퍼를 가진 오브젝트를 생성합니다. 활성화는 `on_attach`로 합니다.
    pub fn spawn_scene_locator(&mut self, scene: SceneId) -> LocatorResult<ObjectId> {
        let name = self.config.scene_name.clone();
        let object = self.spawn(&name, scene)?;
        self.attach_scene_bootstrapper(object)?;
        Ok(object)
    }

    // ---------------------------------------------------------------------
    // 생명주기
    // ---------------------------------------------------------------------

    /// 오브젝트 활성화 알림
    ///
    /// 부트스트래퍼가 있고 아직 실행되지 않았다면 부트스트랩하며,
    /// 그 결과를 반환합니다.
    pub fn on_attach(&mut self, object: ObjectId) -> LocatorResult<Option<ConfigureOutcome>> {
        self.bootstrap_on_demand(object)
    }

    pub fn bootstrap_on_demand(
        &mut self,
        object: ObjectId,
    ) -> LocatorResult<Option<ConfigureOutcome>> {
        self.ensure_object(object)?;
        Ok(self.run_bootstrap(object))
    }

    pub(crate) fn run_bootstrap(&mut self, object: ObjectId) -> Option<ConfigureOutcome> {
        let record = self.objects.get_mut(&object)?;
        let kind = {
            let bootstrapper = record.bootstrapper.as_mut()?;
            if !bootstrapper.bootstrap_on_demand() {
                return None;
            }
            bootstrapper.kind()
        };
        let scene = record.scene;
        info!("🔄 Bootstrapping '{}' ({}) as {:?}", record.name, object, kind);

        let (outcome, scope) = match kind {
            BootstrapKind::Global { .. } => {
                (self.context.configure_as_global(object), Scope::Global)
            }
            BootstrapKind::Scene => (
                self.context.configure_for_scene(scene, object),
                Scope::Scene(scene),
            ),
        };

        if outcome.is_configured() {
            if let Some(container) = self
                .objects
                .get_mut(&object)
                .and_then(|record| record.container.as_mut())
            {
                container.set_scope(scope);
            }
            if let BootstrapKind::Global { persistent: true } = kind {
                self.dont_destroy_on_load(object);
            }
        }
        Some(outcome)
    }

    /// 루트 오브젝트를 영속 씬으로 옮깁니다.
    pub fn dont_destroy_on_load(&mut self, object: ObjectId) -> bool {
        let Some(record) = self.objects.get(&object) else {
            return false;
        };
        if record.parent.is_some() {
            warn!(
                "SceneGraph.dont_destroy_on_load: '{}' ({}) is not a root object",
                record.name, object
            );
            return false;
        }
        let from = record.scene;
        if from == self.persistent_scene {
            return true;
        }

        if let Some(scene) = self.scenes.get_mut(&from) {
            scene.roots.retain(|root| *root != object);
        }
        if let Some(scene) = self.scenes.get_mut(&self.persistent_scene) {
            scene.roots.push(object);
        }
        for id in self.subtree(object) {
            if let Some(record) = self.objects.get_mut(&id) {
                record.scene = self.persistent_scene;
            }
        }
        debug!("{} moved from {} to the persistent scene", object, from);
        true
    }

    /// 오브젝트와 하위 트리를 파괴합니다.
    pub fn destroy(&mut self, object: ObjectId) -> LocatorResult<usize> {
        let record = self.record(object)?;
        let (parent, scene) = (record.parent, record.scene);

        match parent.and_then(|p| self.objects.get_mut(&p)) {
            Some(parent_record) => parent_record.children.retain(|child| *child != object),
            None => {
                if let Some(record) = self.scenes.get_mut(&scene) {
                    record.roots.retain(|root| *root != object);
                }
            }
        }

        Ok(self.destroy_subtree(object))
    }

    fn destroy_subtree(&mut self, object: ObjectId) -> usize {
        let mut order = self.subtree(object);
        order.reverse();
        let count = order.len();
        for id in order {
            self.on_detach(id);
            self.objects.remove(&id);
        }
        count
    }

    /// 오브젝트 파괴 알림. 컨테이너를 레지스트리에서 해제합니다.
    fn on_detach(&mut self, object: ObjectId) {
        if self.has_container(object) && self.context.release(object) {
            info!("🧹 Container {} deregistered on destroy", object);
        }
    }

    /// 도메인 리로드 알림. 정적 레지스트리를 비웁니다.
    ///
    /// 바인딩이 사라지므로 모든 컨테이너의 스코프도 `Local`로 되돌립니다.
    pub fn on_domain_reload(&mut self) {
        info!("♻️ Domain reload: locator context reset");
        self.context.reset();
        for container in self
            .objects
            .values_mut()
            .filter_map(|record| record.container.as_mut())
        {
            container.set_scope(Scope::Local);
        }
    }

    // ---------------------------------------------------------------------
    // 내부 헬퍼
    // ---------------------------------------------------------------------

    /// 전위 순회한 하위 트리 (자기 자신 포함)
    fn subtree(&self, object: ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack = vec![object];
        while let Some(id) = stack.pop() {
            if let Some(record) = self.objects.get(&id) {
                out.push(id);
                stack.extend(record.children.iter().rev().copied());
            }
        }
        out
    }

    pub(crate) fn record(&self, object: ObjectId) -> LocatorResult<&ObjectRecord> {
        self.objects
            .get(&object)
            .ok_or(LocatorError::UnknownObject(object))
    }

    pub(crate) fn record_mut(&mut self, object: ObjectId) -> LocatorResult<&mut ObjectRecord> {
        self.objects
            .get_mut(&object)
            .ok_or(LocatorError::UnknownObject(object))
    }

    fn ensure_object(&self, object: ObjectId) -> LocatorResult<()> {
        self.record(object).map(|_| ())
    }

    fn ensure_scene(&self, scene: SceneId) -> LocatorResult<()> {
        if self.scenes.contains_key(&scene) {
            Ok(())
        } else {
            Err(LocatorError::UnknownScene(scene))
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_loaded_scene_becomes_active() {
        let mut graph = SceneGraph::new();
        assert_eq!(graph.active_scene(), None);

        let first = graph.load_scene("Menu");
        let second = graph.load_scene("Level");

        assert_eq!(graph.active_scene(), Some(first));
        graph.set_active_scene(second).unwrap();
        assert_eq!(graph.active_scene(), Some(second));
        assert_eq!(graph.scene_name(first).unwrap(), "Menu");
    }

    #[test]
    fn test_spawn_child_inherits_scene() {
        let mut graph = SceneGraph::new();
        let scene = graph.load_scene("Level");
        let parent = graph.spawn("Enemies", scene).unwrap();
        let child = graph.spawn_child("Goblin", parent).unwrap();

        assert_eq!(graph.scene_of(child).unwrap(), scene);
        assert_eq!(graph.parent_of(child).unwrap(), Some(parent));
        assert_eq!(graph.children_of(parent).unwrap(), &[child]);
        assert_eq!(graph.roots_of(scene).unwrap(), &[parent]);
    }

    #[test]
    fn test_spawn_in_unknown_scene_fails() {
        let mut graph = SceneGraph::new();

        assert_eq!(
            graph.spawn("Ghost", SceneId::new(42)),
            Err(LocatorError::UnknownScene(SceneId::new(42)))
        );
    }

    #[test]
    fn test_attach_bootstrapper_adds_container_once() {
        let mut graph = SceneGraph::new();
        let scene = graph.load_scene("Level");
        let object = graph.spawn("Services", scene).unwrap();

        graph.attach_scene_bootstrapper(object).unwrap();
        graph.attach_global_bootstrapper(object, true).unwrap();

        assert!(graph.has_container(object));
        assert!(graph.bootstrapper(object).unwrap().unwrap().is_scene());
    }

    #[test]
    fn test_on_attach_bootstraps_only_once() {
        let mut graph = SceneGraph::new();
        let scene = graph.load_scene("Level");
        let locator = graph.spawn_scene_locator(scene).unwrap();

        assert_eq!(
            graph.on_attach(locator).unwrap(),
            Some(ConfigureOutcome::Configured)
        );
        assert_eq!(graph.on_attach(locator).unwrap(), None);
        assert_eq!(graph.context().scene_container(scene), Some(locator));
        assert_eq!(graph.container(locator).unwrap().scope(), Scope::Scene(scene));
    }

    #[test]
    fn test_persistent_global_survives_scene_unload() {
        let mut graph = SceneGraph::new();
        let scene = graph.load_scene("Level");
        let global = graph.spawn_global_locator(scene, true).unwrap();
        graph.spawn("Player", scene).unwrap();
        graph.on_attach(global).unwrap();

        assert_eq!(graph.scene_of(global).unwrap(), graph.persistent_scene());
        assert_eq!(graph.unload_scene(scene).unwrap(), 1);
        assert!(graph.exists(global));
        assert_eq!(graph.context().global(), Some(global));
        assert!(!graph.is_loaded(scene));
        assert_eq!(graph.active_scene(), None);
    }

    #[test]
    fn test_non_persistent_global_destroyed_with_scene() {
        let mut graph = SceneGraph::new();
        let scene = graph.load_scene("Level");
        let global = graph.spawn_global_locator(scene, false).unwrap();
        graph.on_attach(global).unwrap();

        graph.unload_scene(scene).unwrap();

        assert!(!graph.exists(global));
        assert_eq!(graph.context().global(), None);
    }

    #[test]
    fn test_destroy_removes_subtree_and_releases_containers() {
        let mut graph = SceneGraph::new();
        let scene = graph.load_scene("Level");
        let root = graph.spawn("Root", scene).unwrap();
        let locator = graph.spawn_child("Scene Services", root).unwrap();
        graph.attach_scene_bootstrapper(locator).unwrap();
        graph.on_attach(locator).unwrap();
        let leaf = graph.spawn_child("Leaf", locator).unwrap();

        assert_eq!(graph.destroy(root).unwrap(), 3);
        assert!(!graph.exists(leaf));
        assert_eq!(graph.context().scene_container(scene), None);
        assert!(graph.roots_of(scene).unwrap().is_empty());
    }

    #[test]
    fn test_dont_destroy_on_load_requires_root() {
        let mut graph = SceneGraph::new();
        let scene = graph.load_scene("Level");
        let root = graph.spawn("Root", scene).unwrap();
        let child = graph.spawn_child("Child", root).unwrap();

        assert!(!graph.dont_destroy_on_load(child));
        assert!(graph.dont_destroy_on_load(root));
        assert_eq!(graph.scene_of(child).unwrap(), graph.persistent_scene());
    }

    #[test]
    fn test_domain_reload_resets_context_but_keeps_objects() {
        let mut graph = SceneGraph::new();
        let scene = graph.load_scene("Level");
        let locator = graph.spawn_scene_locator(scene).unwrap();
        graph.on_attach(locator).unwrap();

        graph.on_domain_reload();

        assert!(graph.exists(locator));
        assert_eq!(graph.context().scene_container(scene), None);
        assert!(graph.bootstrapper(locator).unwrap().unwrap().is_bootstrapped());
    }

    #[test]
    fn test_domain_reload_demotes_scopes_to_local() {
        let mut graph = SceneGraph::new();
        let scene = graph.load_scene("Level");
        let locator = graph.spawn_scene_locator(scene).unwrap();
        graph.on_attach(locator).unwrap();
        let old_global = graph.global_container();

        graph.on_domain_reload();
        let new_global = graph.global_container();

        assert_ne!(old_global, new_global);
        assert_eq!(graph.container(old_global).unwrap().scope(), Scope::Local);
        assert_eq!(graph.container(locator).unwrap().scope(), Scope::Local);
        assert_eq!(graph.container(new_global).unwrap().scope(), Scope::Global);
        assert_eq!(graph.snapshot().scope_counts(), (1, 0, 2));
    }

    #[test]
    fn test_destroying_rejected_scene_duplicate_keeps_original() {
        let mut graph = SceneGraph::new();
        let scene = graph.load_scene("Level");
        let original = graph.spawn_scene_locator(scene).unwrap();
        graph.on_attach(original).unwrap();
        let duplicate = graph.spawn_scene_locator(scene).unwrap();

        assert_eq!(
            graph.on_attach(duplicate).unwrap(),
            Some(ConfigureOutcome::Rejected { existing: original })
        );
        graph.destroy(duplicate).unwrap();

        assert!(!graph.exists(duplicate));
        assert_eq!(graph.context().scene_container(scene), Some(original));
        assert_eq!(graph.container(original).unwrap().scope(), Scope::Scene(scene));
    }

    #[test]
    fn test_persistent_scene_cannot_be_unloaded() {
        let mut graph = SceneGraph::new();
        let persistent = graph.persistent_scene();

        assert_eq!(graph.unload_scene(persistent).unwrap(), 0);
        assert!(graph.is_loaded(persistent));
    }
}
