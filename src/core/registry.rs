//! # Service Registry - 컨테이너별 타입 레지스트리
//!
//! 하나의 컨테이너가 소유하는 `TypeId` → 인스턴스 매핑입니다.
//! 계층 탐색은 하지 않으며, 자기 자신에 등록된 서비스만 다룹니다.
//! 바깥쪽 컨테이너로의 폴백은 [`crate::core::locator`]가 담당합니다.
//!
//! ## 불변 조건
//!
//! - 타입당 최대 하나의 인스턴스
//! - 같은 타입을 다시 등록하면 조용히 덮어씀 (에러 없음)
//! - 키는 타입 식별자이며 인스턴스가 아님
//!
//! ## 사용 예제
//!
//! ```rust
//! use std::sync::Arc;
//! use scene_service_locator::core::registry::ServiceRegistry;
//!
//! struct Clock(u32);
//!
//! let mut registry = ServiceRegistry::new();
//! registry.register(Arc::new(Clock(60)));
//!
//! let clock = registry.get::<Clock>().unwrap();
//! assert_eq!(clock.0, 60);
//! assert!(registry.try_get::<String>().is_none());
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::core::errors::{LocatorError, LocatorResult};

/// 레지스트리에 저장되는 타입 소거된 서비스 인스턴스
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// 서비스 타입 식별자
///
/// `TypeId`는 비교/해싱에, `type_name`은 진단 메시지에 사용됩니다.
#[derive(Clone, Copy)]
pub struct ServiceKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl ServiceKey {
    /// 타입 `T`의 키를 만듭니다.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scene_service_locator::core::registry::ServiceKey;
    ///
    /// let key = ServiceKey::of::<String>();
    /// assert_eq!(key.type_name(), "alloc::string::String");
    /// assert_eq!(key.short_name(), "String");
    /// ```
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 완전한 타입 경로 (예: `my_game::audio::AudioService`)
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 모듈 경로를 제외한 짧은 이름
    pub fn short_name(&self) -> &'static str {
        match self.type_name.rfind("::") {
            Some(pos) if !self.type_name.contains('<') => &self.type_name[pos + 2..],
            _ => self.type_name,
        }
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ServiceKey {}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceKey").field(&self.type_name).finish()
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// 컨테이너 하나가 소유하는 서비스 매핑
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<TypeId, (ServiceKey, ServiceInstance)>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 서비스를 자신의 타입으로 등록합니다. 기존 값은 덮어씁니다.
    ///
    /// # Arguments
    ///
    /// * `service` - 등록할 인스턴스. 키는 `T`의 `TypeId`입니다.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use scene_service_locator::core::registry::ServiceRegistry;
    ///
    /// struct Volume(u8);
    ///
    /// let mut registry = ServiceRegistry::new();
    /// registry.register(Arc::new(Volume(3)));
    /// registry.register(Arc::new(Volume(7)));
    ///
    /// assert_eq!(registry.len(), 1);
    /// assert_eq!(registry.get::<Volume>().unwrap().0, 7);
    /// ```
    pub fn register<T: Any + Send + Sync>(&mut self, service: Arc<T>) {
        self.register_dyn(ServiceKey::of::<T>(), service);
    }

    /// 런타임 키로 서비스를 등록합니다.
    ///
    /// 값의 실제 타입이 키와 다르면 이후의 타입 지정 조회가
    /// `TypeMismatch`를 반환합니다.
    ///
    /// # Arguments
    ///
    /// * `key` - 타입 식별자
    /// * `service` - 타입 소거된 인스턴스
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use scene_service_locator::core::registry::{ServiceKey, ServiceRegistry};
    ///
    /// struct Volume(u8);
    ///
    /// let mut registry = ServiceRegistry::new();
    /// registry.register_dyn(ServiceKey::of::<Volume>(), Arc::new(Volume(5)));
    /// assert_eq!(registry.get::<Volume>().unwrap().0, 5);
    /// ```
    pub fn register_dyn(&mut self, key: ServiceKey, service: ServiceInstance) {
        debug!("📦 Registering: {}", key.short_name());
        if self.services.insert(key.type_id, (key, service)).is_some() {
            debug!("   ├─ {} replaced previous instance", key.short_name());
        }
    }

    /// 등록된 인스턴스를 찾습니다. 없으면 `Ok(None)`.
    ///
    /// 키는 있지만 값의 타입이 다르면 `TypeMismatch`입니다.
    pub fn lookup<T: Any + Send + Sync>(&self) -> LocatorResult<Option<Arc<T>>> {
        match self.services.get(&TypeId::of::<T>()) {
            None => Ok(None),
            Some((key, instance)) => instance
                .clone()
                .downcast::<T>()
                .map(Some)
                .map_err(|_| LocatorError::type_mismatch(key.type_name())),
        }
    }

    /// 자기 레지스트리에서만 찾습니다. 없거나 타입이 맞지 않으면 `None`.
    pub fn try_get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.lookup::<T>().ok().flatten()
    }

    /// 자기 레지스트리에서만 찾습니다.
    ///
    /// 없으면 `std::any::type_name::<T>()`를 담은 `NotFound`를 반환합니다.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scene_service_locator::core::errors::LocatorError;
    /// use scene_service_locator::core::registry::ServiceRegistry;
    ///
    /// let registry = ServiceRegistry::new();
    /// let error = registry.get::<String>().unwrap_err();
    /// assert_eq!(error, LocatorError::not_found("alloc::string::String"));
    /// ```
    pub fn get<T: Any + Send + Sync>(&self) -> LocatorResult<Arc<T>> {
        self.lookup::<T>()?
            .ok_or_else(|| LocatorError::not_found(std::any::type_name::<T>()))
    }

    /// 런타임 키로 타입 소거된 인스턴스를 찾습니다.
    pub fn get_dyn(&self, key: &ServiceKey) -> Option<ServiceInstance> {
        self.services
            .get(&key.type_id)
            .map(|(_, instance)| instance.clone())
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    pub fn contains_key(&self, key: &ServiceKey) -> bool {
        self.services.contains_key(&key.type_id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// 등록된 서비스의 타입 이름 목록 (정렬됨)
    pub fn service_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .services
            .values()
            .map(|(key, _)| key.type_name())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn clear(&mut self) {
        self.services.clear();
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.service_names()).finish()
    }
}
