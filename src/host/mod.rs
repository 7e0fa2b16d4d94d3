//! # Host - 오브젝트 그래프와 생명주기 훅
//!
//! 로케이터가 탐색하는 구조(씬 → 루트 오브젝트 → 자식 오브젝트)와
//! 호스트가 전달하는 생명주기 알림을 모델링합니다.
//!
//! | 훅 | 효과 |
//! |----|------|
//! | [`SceneGraph::on_attach`] | 부트스트래퍼가 있으면 부트스트랩 |
//! | [`SceneGraph::destroy`] | 하위 트리를 파괴하며 컨테이너를 레지스트리에서 해제 |
//! | [`SceneGraph::unload_scene`] | 씬의 모든 오브젝트 파괴 (영속 오브젝트 제외) |
//! | [`SceneGraph::on_domain_reload`] | 글로벌 슬롯과 씬 맵 초기화 |

pub mod ids;
pub mod scene_graph;

pub use ids::*;
pub use scene_graph::*;
