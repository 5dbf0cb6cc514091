mod common;
use common::rng;
use sonarpool_core::config::AppConfig;
use sonarpool_core::{Navigator, Pool};
use sonarpool_io::{from_json, parse_grid, to_json, TrajectoryRecord};
use sonarpool_lib::app::render::render_layer;
use std::sync::Arc;

const TERRAIN: &str = "
0 0 0 0 0 0
0 2 2 2 2 0
0 0 0 0 2 0
1 1 0 0 0 0
";

const CONFIG: &str = r#"
seed = 7
deterministic = true

[source]
intensity = 800.0
mode = "Fast"
x = 0
y = 0

[navigator]
x = 5
y = 3
z = 2
"#;

fn run(config: &AppConfig) -> TrajectoryRecord {
    let field = parse_grid(TERRAIN).unwrap();
    let mut rng = rng(config.seed.unwrap());
    let mut pool = Pool::with_headroom(&field).unwrap();
    pool.place_source(
        config.source.placement(),
        config.source.intensity,
        config.source.mode,
        &mut rng,
    )
    .unwrap();
    let pool = Arc::new(pool);

    let mut nav = Navigator::spawn(Arc::clone(&pool), config.navigator.placement(), &mut rng).unwrap();
    let trajectory = nav.advance(config.navigator.steps()).unwrap();
    let arrived = nav.has_arrived().unwrap();
    TrajectoryRecord::new(nav.id(), pool.source().map(|s| s.coord), trajectory, arrived)
}

#[test]
fn test_config_to_trajectory() {
    let config = AppConfig::from_toml(CONFIG).unwrap();
    let record = run(&config);

    assert_eq!(record.trajectory.first().map(|c| (c.x, c.y, c.z)), Some((5, 3, 2)));
    assert!(record.arrived);
    assert!(record.moves() > 0);

    let json = to_json(&record).unwrap();
    let restored: TrajectoryRecord = from_json(&json).unwrap();
    assert_eq!(restored.trajectory, record.trajectory);
}

#[test]
fn test_same_seed_same_trajectory() {
    let config = AppConfig::from_toml(CONFIG).unwrap();
    assert_eq!(run(&config).trajectory, run(&config).trajectory);
}

#[test]
fn test_rendered_slice_shows_ridge() {
    let field = parse_grid(TERRAIN).unwrap();
    let pool = Pool::with_headroom(&field).unwrap();
    let slice = render_layer(&pool, 1, &[]).unwrap();
    assert_eq!(slice, "~~~~~~\n~####~\n~~~~#~\n~~~~~~\n");
}
