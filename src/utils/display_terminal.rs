//! 터미널 출력 포맷팅 유틸리티
//!
//! 로케이터 스냅샷을 사람이 읽기 좋은 형태로 출력합니다.
//!
//! ```text
//! ╔══════════════════════════════════════════════════╗
//! ║               SERVICE LOCATOR TREE               ║
//! ╚══════════════════════════════════════════════════╝
//! → Scene scene#1: Level1
//!    ├─ Service Locator Scene (object#2): scene, 1 services
//! ```

use crate::core::snapshot::{ContainerSnapshot, LocatorSnapshot};

/// 박스 형태로 둘러싸인 제목 (50칸, 중앙 정렬)
pub fn print_boxed_title(title: &str) {
    let content_width = 50;
    let border = "═".repeat(content_width);

    println!("╔{}╗", border);
    println!("║{:^50}║", title);
    println!("╚{}╝", border);
}

pub fn print_section(label: &str, name: &str) {
    println!("→ {}: {}", label, name);
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

pub fn print_final_summary(globals: usize, scenes: usize, locals: usize) {
    println!();
    println!("   🌐 Global containers: {}", globals);
    println!("   🎬 Scene containers: {}", scenes);
    println!("   📦 Local containers: {}", locals);
    println!("   🚀 Total: {}", globals + scenes + locals);
    println!();
}

fn describe(container: &ContainerSnapshot) -> String {
    let mut status = format!("{}, {} services", container.scope, container.services.len());
    if container.bootstrapped == Some(false) {
        status.push_str(", not bootstrapped");
    }
    status
}

/// 씬별로 컨테이너와 등록된 서비스를 출력합니다.
pub fn print_snapshot(snapshot: &LocatorSnapshot) {
    print_boxed_title("SERVICE LOCATOR TREE");

    for scene in &snapshot.scenes {
        print_section(&format!("Scene {}", scene.scene), &scene.name);
        for container in snapshot.containers.iter().filter(|c| c.scene == scene.scene) {
            print_sub_task(
                &format!("{} ({})", container.name, container.owner),
                &describe(container),
            );
            for service in &container.services {
                println!("   │    · {}", service);
            }
        }
    }

    let (globals, scenes, locals) = snapshot.scope_counts();
    print_final_summary(globals, scenes, locals);
}
