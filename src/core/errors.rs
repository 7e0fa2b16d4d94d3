//! # Locator Error Handling
//!
//! 서비스 로케이터에서 발생할 수 있는 에러를 정의합니다.
//!
//! ## 에러 분류
//!
//! | LocatorError | 발생 시나리오 |
//! |--------------|---------------|
//! | `NotFound` | 해석 체인(로컬 → 씬 → 글로벌) 어디에도 타입이 등록되지 않음 |
//! | `TypeMismatch` | 런타임 키로 등록된 값의 실제 타입이 키와 다름 |
//! | `UnknownObject` | 존재하지 않거나 이미 파괴된 오브젝트 ID |
//! | `UnknownScene` | 존재하지 않는 씬 ID |
//! | `NoContainer` | 컨테이너가 붙어있지 않은 오브젝트를 컨테이너로 사용 |
//!
//! 중복 등록(글로벌/씬 충돌)은 에러 값으로 전파되지 않습니다.
//! 로그로 남기고 기존 상태를 유지하며, 결과는 `ConfigureOutcome`으로 보고됩니다.
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use scene_service_locator::core::errors::LocatorError;
//!
//! match graph.locator_for(player)?.get::<AudioService>() {
//!     Ok(audio) => audio.play("jump"),
//!     Err(LocatorError::NotFound { type_name }) => log::warn!("missing {}", type_name),
//!     Err(e) => return Err(e),
//! }
//! ```

use thiserror::Error;

use crate::host::{ObjectId, SceneId};

/// 로케이터 전역 에러 타입
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// 요청한 타입이 해석 체인 전체에 등록되어 있지 않음
    ///
    /// 디버깅을 위해 항상 완전한 타입 경로(`std::any::type_name`)를 포함합니다.
    #[error("Could not resolve type '{type_name}'")]
    NotFound { type_name: String },

    /// 런타임 키와 실제 값의 타입 불일치
    #[error("Service registered as '{type_name}' has a different concrete type")]
    TypeMismatch { type_name: String },

    #[error("Unknown object: {0}")]
    UnknownObject(ObjectId),

    #[error("Unknown scene: {0}")]
    UnknownScene(SceneId),

    /// 컨테이너가 없는 오브젝트
    #[error("Object {0} has no service container attached")]
    NoContainer(ObjectId),
}

impl LocatorError {
    pub fn not_found(type_name: &str) -> Self {
        LocatorError::NotFound {
            type_name: type_name.to_string(),
        }
    }

    pub fn type_mismatch(type_name: &str) -> Self {
        LocatorError::TypeMismatch {
            type_name: type_name.to_string(),
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type LocatorResult<T> = Result<T, LocatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_contains_type_name() {
        let error = LocatorError::not_found("game::audio::AudioService");

        assert_eq!(
            error.to_string(),
            "Could not resolve type 'game::audio::AudioService'"
        );
    }

    #[test]
    fn test_type_mismatch_message() {
        let error = LocatorError::type_mismatch("alloc::string::String");

        assert!(error.to_string().contains("alloc::string::String"));
    }

    #[test]
    fn test_unknown_object_message() {
        let error = LocatorError::UnknownObject(ObjectId::new(7));

        assert_eq!(error.to_string(), "Unknown object: object#7");
    }
}
