use std::sync::Arc;

use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use scene_service_locator::config::{Environment, LocatorConfig};
use scene_service_locator::core::errors::LocatorResult;
use scene_service_locator::host::SceneGraph;
use scene_service_locator::utils::display_terminal::print_snapshot;

#[derive(Debug)]
struct GameLogger {
    channel: &'static str,
}

#[derive(Debug)]
struct LevelRules {
    gravity: f32,
}

#[derive(Debug)]
struct Inventory {
    slots: usize,
}

fn main() {
    load_env_file();
    init_logging();

    info!("🚀 서비스 로케이터 데모 시작중...");

    if let Err(e) = run_demo() {
        error!("데모 실행 실패: {}", e);
        std::process::exit(1);
    }
}

fn run_demo() -> LocatorResult<()> {
    let mut graph = SceneGraph::with_config(LocatorConfig::process_default().clone());

    let menu = graph.load_scene("MainMenu");
    let level = graph.load_scene("Level1");

    let global = graph.spawn_global_locator(menu, true)?;
    graph.on_attach(global)?;
    graph
        .locator(global)?
        .register(Arc::new(GameLogger { channel: "game" }));

    let level_services = graph.spawn_scene_locator(level)?;
    graph
        .locator(level_services)?
        .register(Arc::new(LevelRules { gravity: -9.81 }));

    let player = graph.spawn("Player", level)?;
    graph.attach_container(player)?;
    graph
        .locator(player)?
        .register(Arc::new(Inventory { slots: 24 }));
    let sword = graph.spawn_child("Sword", player)?;

    let mut locator = graph.locator_for(sword)?;
    let logger = locator.get::<GameLogger>()?;
    let rules = locator.get::<LevelRules>()?;
    let inventory = locator.get::<Inventory>()?;
    info!(
        "⚔️ Sword resolved logger '{}', gravity {}, {} inventory slots",
        logger.channel, rules.gravity, inventory.slots
    );

    graph.unload_scene(menu)?;
    info!(
        "✅ Global container survived menu unload: {}",
        graph.exists(global)
    );

    let snapshot = graph.snapshot();
    print_snapshot(&snapshot);
    match snapshot.to_json() {
        Ok(json) => info!("Snapshot:\n{}", json),
        Err(e) => error!("스냅샷 직렬화 실패: {}", e),
    }

    Ok(())
}

fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

fn init_logging() {
    let environment = Environment::current();
    env_logger::init_from_env(Env::default().default_filter_or(environment.default_log_filter()));
    info!("Current environment: {:?}", environment);
}
