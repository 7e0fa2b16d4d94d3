//! # Core - 계층형 서비스 로케이터
//!
//! 서비스 등록/조회와 계층 탐색의 핵심을 담당합니다.
//!
//! ## 해석 순서
//!
//! ```text
//! 요청자 ─▶ 가장 가까운 조상 컨테이너 (Local)
//!             │ 없으면
//!             ▼
//!           씬 컨테이너 (Scene) ── 미등록이면 씬 루트의 부트스트래퍼를 on-demand 실행
//!             │ 없으면
//!             ▼
//!           글로벌 컨테이너 (Global) ── 없으면 생성 후 부트스트랩
//! ```
//!
//! ## 주요 구성 요소
//!
//! - [`registry`]: 컨테이너 하나의 `TypeId` → 인스턴스 매핑
//! - [`container`]: 스코프 태그와 레지스트리를 가진 컨테이너
//! - [`context`]: 글로벌 슬롯과 씬 맵 (정적 레지스트리 대체)
//! - [`bootstrap`]: 1회성 활성화 상태 머신
//! - [`locator`]: 계층 탐색과 fluent 조회 API
//! - [`snapshot`]: 진단용 직렬화 가능 스냅샷

pub mod bootstrap;
pub mod container;
pub mod context;
pub mod errors;
pub mod locator;
pub mod registry;
pub mod snapshot;

pub use bootstrap::*;
pub use container::*;
pub use context::*;
pub use errors::*;
pub use locator::*;
pub use registry::*;
pub use snapshot::*;
