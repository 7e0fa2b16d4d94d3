//! # Locator Resolution - 계층 탐색
//!
//! 요청자의 위치에서 가장 가까운 컨테이너를 찾고, 서비스를 찾지 못하면
//! 바깥쪽 컨테이너로 이동하며 다시 조회합니다.
//!
//! ## 컨테이너 탐색 (`nearest_container`)
//!
//! 1. 요청자 자신 또는 조상 오브젝트의 컨테이너
//! 2. 요청자 씬의 씬 컨테이너. 아직 등록되지 않았다면 씬 루트 오브젝트 중
//!    씬 부트스트래퍼를 가진 오브젝트를 on-demand로 부트스트랩
//! 3. 글로벌 컨테이너 (없으면 생성)
//!
//! ## 서비스 조회 (`Locator::get`)
//!
//! 1. 자기 레지스트리
//! 2. 글로벌이 아니라면 "다음 바깥쪽 컨테이너": 부모 계층의 컨테이너,
//!    없으면 자기 씬의 씬 컨테이너
//! 3. 글로벌까지 실패하면 `NotFound`
//!
//! 컨테이너는 절대 자기 자신으로 해석되지 않습니다. 방문한 컨테이너를 다시
//! 만나면 (씬 컨테이너가 로컬 컨테이너 아래에 있는 경우 등) 글로벌 컨테이너로
//! 한 번 건너뛰며, 글로벌까지 확인한 뒤에만 탐색 실패로 처리합니다.

use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::bootstrap::Bootstrapper;
use crate::core::container::{Container, Scope};
use crate::core::errors::{LocatorError, LocatorResult};
use crate::core::registry::{ServiceInstance, ServiceKey};
use crate::host::{ObjectId, SceneGraph};

impl SceneGraph {
    /// 글로벌 컨테이너를 반환합니다. 없으면 만들어서 부트스트랩합니다.
    ///
    /// 아직 부트스트랩되지 않은 글로벌 부트스트래퍼가 있으면 (생성 순서상 첫 번째)
    /// 그것을 먼저 활성화합니다.
    pub fn global_container(&mut self) -> ObjectId {
        if let Some(global) = self.context().global() {
            return global;
        }

        if let Some(found) = self.first_pending(Bootstrapper::is_global) {
            self.run_bootstrap(found);
            if let Some(global) = self.context().global() {
                return global;
            }
        }

        let scene = self.active_scene().unwrap_or(self.persistent_scene());
        let name = self.config().global_name.clone();
        let persistent = self.config().persist_global;
        let owner = self.insert_object(&name, scene, None);
        if let Some(record) = self.objects.get_mut(&owner) {
            record.container = Some(Container::new());
            record.bootstrapper = Some(Bootstrapper::global(persistent));
        }
        info!("🌐 Created global container '{}' ({})", name, owner);
        self.run_bootstrap(owner);
        owner
    }

    /// 요청자 씬의 컨테이너를 반환합니다. 없으면 글로벌 컨테이너로 폴백합니다.
    pub fn container_for_scene_of(&mut self, requester: ObjectId) -> LocatorResult<ObjectId> {
        let scene = self.scene_of(requester)?;

        match self.context().scene_container(scene) {
            Some(container) if container != requester => return Ok(container),
            Some(_) => return Ok(self.global_container()),
            None => {}
        }

        let declared = self.roots_of(scene)?.iter().copied().find(|root| {
            *root != requester
                && self
                    .objects
                    .get(root)
                    .and_then(|record| record.bootstrapper.as_ref())
                    .is_some_and(Bootstrapper::is_scene)
        });

        if let Some(root) = declared {
            debug!("Scene {} has no container yet, bootstrapping {}", scene, root);
            self.run_bootstrap(root);
            return Ok(root);
        }

        Ok(self.global_container())
    }

    /// 요청자에게 가장 가까운 컨테이너
    pub fn nearest_container(&mut self, requester: ObjectId) -> LocatorResult<ObjectId> {
        self.record(requester)?;
        match self.container_in_ancestors(Some(requester)) {
            Some(container) => Ok(container),
            None => self.container_for_scene_of(requester),
        }
    }

    /// `owner` 컨테이너 다음으로 조회할 바깥쪽 컨테이너
    ///
    /// 글로벌 컨테이너이거나 다음이 자기 자신이면 `None`.
    pub fn next_in_hierarchy(&mut self, owner: ObjectId) -> LocatorResult<Option<ObjectId>> {
        if self.context().is_global(owner) {
            return Ok(None);
        }

        let parent = self.parent_of(owner)?;
        let next = match self.container_in_ancestors(parent) {
            Some(container) => container,
            None => self.container_for_scene_of(owner)?,
        };

        Ok((next != owner).then_some(next))
    }

    /// `owner`에 붙은 컨테이너의 로케이터 핸들
    pub fn locator(&mut self, owner: ObjectId) -> LocatorResult<Locator<'_>> {
        self.container(owner)?;
        Ok(Locator { graph: self, owner })
    }

    /// 요청자에게 가장 가까운 컨테이너의 로케이터 핸들
    pub fn locator_for(&mut self, requester: ObjectId) -> LocatorResult<Locator<'_>> {
        let owner = self.nearest_container(requester)?;
        self.locator(owner)
    }

    pub fn global_locator(&mut self) -> Locator<'_> {
        let owner = self.global_container();
        Locator { graph: self, owner }
    }

    /// 서비스를 찾을 때까지 바깥쪽으로 탐색합니다.
    fn resolve<T: Any + Send + Sync>(&mut self, owner: ObjectId) -> LocatorResult<Option<Arc<T>>> {
        let mut visited = HashSet::new();
        let mut current = owner;

        loop {
            if !visited.insert(current) {
                let global = self.global_container();
                if visited.contains(&global) {
                    return Ok(None);
                }
                warn!(
                    "Locator cycle detected at {} while resolving '{}', falling back to global {}",
                    current,
                    std::any::type_name::<T>(),
                    global
                );
                current = global;
                continue;
            }

            if let Some(service) = self.container(current)?.registry().lookup::<T>()? {
                return Ok(Some(service));
            }

            match self.next_in_hierarchy(current)? {
                Some(next) => {
                    debug!(
                        "'{}' not in {}, trying {}",
                        std::any::type_name::<T>(),
                        current,
                        next
                    );
                    current = next;
                }
                None => return Ok(None),
            }
        }
    }

    fn container_in_ancestors(&self, start: Option<ObjectId>) -> Option<ObjectId> {
        let mut cursor = start;
        while let Some(id) = cursor {
            let record = self.objects.get(&id)?;
            if record.container.is_some() {
                return Some(id);
            }
            cursor = record.parent;
        }
        None
    }

    fn first_pending(&self, matches: fn(&Bootstrapper) -> bool) -> Option<ObjectId> {
        self.objects.iter().find_map(|(id, record)| {
            record
                .bootstrapper
                .as_ref()
                .filter(|b| matches(b) && !b.is_bootstrapped())
                .map(|_| *id)
        })
    }
}

/// 컨테이너 하나에 대한 fluent 핸들
///
/// ```rust
/// use std::sync::Arc;
/// use scene_service_locator::host::SceneGraph;
///
/// struct Input;
/// struct Audio;
///
/// let mut graph = SceneGraph::new();
/// let mut input = None;
/// graph
///     .global_locator()
///     .register(Arc::new(Input))
///     .register(Arc::new(Audio))
///     .fetch::<Input>(&mut input)
///     .unwrap();
/// assert!(input.is_some());
/// ```
pub struct Locator<'g> {
    graph: &'g mut SceneGraph,
    owner: ObjectId,
}

impl<'g> Locator<'g> {
    /// 이 핸들이 가리키는 컨테이너의 소유 오브젝트
    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    /// 컨테이너의 현재 스코프
    pub fn scope(&self) -> Scope {
        self.graph
            .container(self.owner)
            .map(Container::scope)
            .unwrap_or(Scope::Local)
    }

    /// 서비스를 이 컨테이너에 자신의 타입으로 등록합니다.
    ///
    /// 같은 타입이 이미 있으면 조용히 덮어씁니다. 체이닝을 위해 핸들을 돌려줍니다.
    ///
    /// # Arguments
    ///
    /// * `service` - 공유할 서비스 인스턴스
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use scene_service_locator::host::SceneGraph;
    ///
    /// struct Audio;
    /// struct Input;
    ///
    /// let mut graph = SceneGraph::new();
    /// let locator = graph
    ///     .global_locator()
    ///     .register(Arc::new(Audio))
    ///     .register(Arc::new(Input));
    /// assert!(locator.contains_local::<Audio>());
    /// ```
    pub fn register<T: Any + Send + Sync>(self, service: Arc<T>) -> Self {
        self.register_dyn(ServiceKey::of::<T>(), service)
    }

    /// 런타임 키로 서비스를 등록합니다.
    ///
    /// # Arguments
    ///
    /// * `key` - 등록에 사용할 타입 식별자 ([`ServiceKey::of`])
    /// * `service` - 타입 소거된 인스턴스. 실제 타입이 `key`와 다르면
    ///   이후 `get`이 `TypeMismatch`를 반환합니다.
    pub fn register_dyn(self, key: ServiceKey, service: ServiceInstance) -> Self {
        if let Some(container) = self
            .graph
            .objects
            .get_mut(&self.owner)
            .and_then(|record| record.container.as_mut())
        {
            container.registry_mut().register_dyn(key, service);
        }
        self
    }

    /// 계층을 따라 서비스를 찾습니다.
    ///
    /// 자기 레지스트리 → 부모 계층 컨테이너 → 씬 컨테이너 → 글로벌 순으로
    /// 조회하며, 글로벌까지 없으면 완전한 타입 이름을 담은 `NotFound`를 반환합니다.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use scene_service_locator::core::LocatorError;
    /// use scene_service_locator::host::SceneGraph;
    ///
    /// struct Clock(u32);
    /// struct Missing;
    ///
    /// let mut graph = SceneGraph::new();
    /// let level = graph.load_scene("Level1");
    /// let player = graph.spawn("Player", level).unwrap();
    /// graph.global_locator().register(Arc::new(Clock(60)));
    ///
    /// let mut locator = graph.locator_for(player).unwrap();
    /// assert_eq!(locator.get::<Clock>().unwrap().0, 60);
    /// assert!(matches!(locator.get::<Missing>(), Err(LocatorError::NotFound { .. })));
    /// ```
    pub fn get<T: Any + Send + Sync>(&mut self) -> LocatorResult<Arc<T>> {
        self.graph
            .resolve::<T>(self.owner)?
            .ok_or_else(|| LocatorError::not_found(std::any::type_name::<T>()))
    }

    /// 계층을 따라 서비스를 찾습니다. 실패하지 않습니다.
    ///
    /// 해석 순서는 [`Locator::get`]과 같으며, 찾지 못하거나 타입이 맞지 않으면 `None`.
    pub fn try_get<T: Any + Send + Sync>(&mut self) -> Option<Arc<T>> {
        self.graph.resolve::<T>(self.owner).ok().flatten()
    }

    /// `get`의 out-parameter 형태. 체이닝을 위해 자신을 돌려줍니다.
    ///
    /// # Arguments
    ///
    /// * `out` - 찾은 서비스를 담을 슬롯. 실패하면 건드리지 않습니다.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use scene_service_locator::host::SceneGraph;
    ///
    /// struct Audio;
    /// struct Input;
    ///
    /// let mut graph = SceneGraph::new();
    /// let (mut audio, mut input) = (None, None);
    /// graph
    ///     .global_locator()
    ///     .register(Arc::new(Audio))
    ///     .register(Arc::new(Input))
    ///     .fetch::<Audio>(&mut audio)
    ///     .and_then(|locator| locator.fetch::<Input>(&mut input))
    ///     .unwrap();
    /// assert!(audio.is_some() && input.is_some());
    /// ```
    pub fn fetch<T: Any + Send + Sync>(mut self, out: &mut Option<Arc<T>>) -> LocatorResult<Self> {
        *out = Some(self.get::<T>()?);
        Ok(self)
    }

    /// 자기 레지스트리만 확인합니다 (계층 탐색 없음).
    pub fn contains_local<T: Any>(&self) -> bool {
        self.graph
            .container(self.owner)
            .is_ok_and(|container| container.registry().contains::<T>())
    }
}
