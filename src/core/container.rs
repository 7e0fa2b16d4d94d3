//! 서비스 컨테이너와 스코프

use std::fmt;

use serde::Serialize;

use crate::core::registry::ServiceRegistry;
use crate::host::SceneId;

/// 컨테이너의 해석 범위
///
/// 새로 붙인 컨테이너는 `Local`이며, 부트스트랩이 성공하면
/// `Global` 또는 `Scene`으로 승격됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "scene", rename_all = "lowercase")]
pub enum Scope {
    Global,
    Scene(SceneId),
    Local,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Scene(_) => "scene",
            Scope::Local => "local",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Scene(scene) => write!(f, "scene({})", scene),
            other => f.write_str(other.as_str()),
        }
    }
}

/// 오브젝트에 붙는 서비스 컨테이너
#[derive(Debug)]
pub struct Container {
    scope: Scope,
    registry: ServiceRegistry,
}

impl Container {
    pub fn new() -> Self {
        Self {
            scope: Scope::Local,
            registry: ServiceRegistry::new(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub(crate) fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ServiceRegistry {
        &mut self.registry
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_container_is_local_and_empty() {
        let container = Container::new();

        assert_eq!(container.scope(), Scope::Local);
        assert!(container.registry().is_empty());
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Global.to_string(), "global");
        assert_eq!(Scope::Local.to_string(), "local");
        assert_eq!(Scope::Scene(SceneId::new(3)).to_string(), "scene(scene#3)");
    }

    #[test]
    fn test_scope_serialization() {
        let json = serde_json::to_string(&Scope::Scene(SceneId::new(2))).unwrap();
        assert_eq!(json, r#"{"kind":"scene","scene":2}"#);

        let json = serde_json::to_string(&Scope::Global).unwrap();
        assert_eq!(json, r#"{"kind":"global"}"#);
    }
}
