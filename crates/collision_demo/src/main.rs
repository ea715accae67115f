//! Collision grid demo
//!
//! Spawns a field of drifting asteroids and ships in a bounded arena and
//! reports the collisions the chunked grid finds each tick. Pass a `.toml` or
//! `.ron` configuration file as the first argument to override the defaults.

use engine2d::config::ConfigError;
use engine2d::foundation::logging;
use engine2d::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ARENA_SIZE: f32 = 2048.0;
const ASTEROID_COUNT: usize = 48;
const SHIP_COUNT: usize = 8;
const TICKS: u32 = 240;
const TIME_STEP: f32 = 1.0 / 60.0;
const SEED: u64 = 0x5EED;

/// A moving actor
struct Drifter {
    actor: ActorId,
    velocity: Vec2,
}

/// Headless application driving one level
struct DemoApp {
    level: Level,
    drifters: Vec<Drifter>,
    rng: StdRng,
}

impl DemoApp {
    fn new(config: &ApplicationConfig) -> Result<Self, SceneError> {
        log::info!("Creating collision demo level...");
        let mut app = Self {
            level: Level::new("demo", config)?,
            drifters: Vec::new(),
            rng: StdRng::seed_from_u64(SEED),
        };

        for _ in 0..ASTEROID_COUNT {
            let radius = app.rng.gen_range(10.0..60.0);
            let desc = ColliderDesc::circle(radius)
                .with_layers(CollisionLayers::ENEMY, CollisionLayers::PLAYER | CollisionLayers::PROJECTILE);
            app.spawn_drifter(desc, 80.0)?;
        }

        for _ in 0..SHIP_COUNT {
            let hull = ColliderDesc::rect(Vec2::new(40.0, 24.0))
                .with_layers(CollisionLayers::PLAYER, CollisionLayers::ENEMY);
            let ship = app.spawn_drifter(hull, 200.0)?;

            // Every ship is clickable for selection
            app.level
                .add_clickable(ship, Vec2::new(48.0, 32.0), Transform2D::identity())?;
        }

        log::info!(
            "Spawned {} actors into {} collision chunks",
            app.drifters.len(),
            app.level.collision().grid().chunk_count()
        );
        Ok(app)
    }

    fn spawn_drifter(&mut self, desc: ColliderDesc, max_speed: f32) -> Result<ActorId, SceneError> {
        let position = Vec2::new(
            self.rng.gen_range(0.0..ARENA_SIZE),
            self.rng.gen_range(0.0..ARENA_SIZE),
        );
        let velocity = Vec2::new(
            self.rng.gen_range(-max_speed..max_speed),
            self.rng.gen_range(-max_speed..max_speed),
        );

        let actor = self.level.spawn_actor(Transform2D::from_position(position));
        self.level.add_collider(actor, desc)?;
        self.drifters.push(Drifter { actor, velocity });
        Ok(actor)
    }

    /// Advance every actor one step, bouncing off the arena walls
    fn tick(&mut self) -> Result<(), SceneError> {
        for drifter in &mut self.drifters {
            let Some(actor) = self.level.actor(drifter.actor) else {
                continue;
            };
            let mut position = actor.transform().position + drifter.velocity * TIME_STEP;

            if !(0.0..=ARENA_SIZE).contains(&position.x) {
                drifter.velocity.x = -drifter.velocity.x;
                position.x = position.x.clamp(0.0, ARENA_SIZE);
            }
            if !(0.0..=ARENA_SIZE).contains(&position.y) {
                drifter.velocity.y = -drifter.velocity.y;
                position.y = position.y.clamp(0.0, ARENA_SIZE);
            }

            self.level.set_actor_position(drifter.actor, position)?;
        }

        self.level.detect_collisions();
        Ok(())
    }

    fn run(&mut self, ticks: u32) -> Result<(), SceneError> {
        let mut total_entered = 0;

        for frame in 0..ticks {
            self.tick()?;

            let entered = self.level.collisions_entered();
            let exited = self.level.collisions_exited();
            total_entered += entered.len();

            for pair in &entered {
                log::debug!("Frame {}: {:?} hit {:?}", frame, pair.collider_a, pair.collider_b);
            }
            if !entered.is_empty() || !exited.is_empty() {
                log::info!(
                    "Frame {}: {} collisions started, {} ended",
                    frame,
                    entered.len(),
                    exited.len()
                );
            }

            if frame % 60 == 0 {
                let center = Vec2::new(ARENA_SIZE * 0.5, ARENA_SIZE * 0.5);
                let selected = self.level.clickables_at(center);
                log::info!("Frame {}: {} ships under the arena center", frame, selected.len());
                self.level.dump_grids();
            }
        }

        log::info!(
            "Finished {} ticks: {} collisions started, {} chunks allocated",
            ticks,
            total_entered,
            self.level.collision().grid().chunk_count()
        );
        Ok(())
    }
}

fn load_config() -> Result<ApplicationConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => ApplicationConfig::load_from_file(path),
        None => Ok(ApplicationConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init(&config.engine.log_level);

    let mut app = DemoApp::new(&config)?;
    app.run(TICKS)?;

    println!("Final collision grid occupancy:{}", app.level.collision().grid());
    Ok(())
}
