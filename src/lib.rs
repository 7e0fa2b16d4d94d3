//! # scene_service_locator
//!
//! 씬 그래프 위에서 동작하는 계층형 서비스 로케이터입니다.
//! 서비스는 오브젝트에 붙은 컨테이너에 타입 단위로 등록되고,
//! 조회는 로컬 → 씬 → 글로벌 순으로 바깥쪽을 향해 진행됩니다.
//!
//! - [`core`]: 레지스트리, 컨테이너, 부트스트랩, 계층 탐색
//! - [`host`]: 오브젝트 그래프와 생명주기 훅
//! - [`config`]: 환경 변수 기반 설정
//! - [`utils`]: 터미널 출력

pub mod config;
pub mod core;
pub mod host;
pub mod utils;
