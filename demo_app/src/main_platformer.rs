//! Headless Platformer Demo
//!
//! Drives the collision core through a small platformer scene without a
//! window:
//! - Ground line, static platforms and a pickup trigger
//! - Falling boxes and balls pushed out of the level with MTVs
//! - Jittered frame times feeding the fixed-timestep loop
//! - Periodic raycast, area and point queries against the snapshot
//!
//! Usage: `platformer_demo [physics.toml|physics.ron]`

use engine2d::config::{Config, ConfigError};
use engine2d::foundation::collections::BodyHandle;
use engine2d::foundation::logging;
use engine2d::foundation::math::{Transform2D, Vec2};
use engine2d::foundation::time::Stopwatch;
use engine2d::physics::{
    BodySet, Collider, ColliderShape, CollisionBody, CollisionEventArgs, CollisionLayers, PhysicsBody, PhysicsConfig,
    PhysicsMaterial, PhysicsModule, ShapeError,
};
use engine2d::spatial::BoundingArea;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

// Simulation settings
const FRAME_COUNT: u32 = 600;
const TARGET_FRAME_TIME: f32 = 1.0 / 60.0;
const FRAME_JITTER: f32 = 0.006;
const GRAVITY: f32 = -20.0;
const RNG_SEED: u64 = 0x5eed;

// Spawned actors
const NUM_BOXES: usize = 12;
const NUM_BALLS: usize = 12;
const SPAWN_HEIGHT: std::ops::Range<f32> = 8.0..30.0;
const SPAWN_SPREAD: f32 = 18.0;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("Failed to load physics config: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid level geometry: {0}")]
    Shape(#[from] ShapeError),
}

/// What an actor does in the level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorKind {
    /// Never moves
    Static,
    /// Falls under gravity and is pushed out of solid geometry
    Dynamic,
    /// Overlap-only volume
    Pickup,
}

/// Scene object: a collision body plus the state the demo integrates
struct Actor {
    body: CollisionBody,
    kind: ActorKind,
    velocity: Vec2,
    name: String,
}

impl Actor {
    fn new(name: impl Into<String>, kind: ActorKind, body: CollisionBody) -> Self {
        Self {
            body,
            kind,
            velocity: Vec2::zeros(),
            name: name.into(),
        }
    }

    /// Push out of solid contacts and bounce off floors
    fn resolve_contacts(&mut self) {
        let bounciness = self.body.material().bounciness;
        for event in self.body.drain_events() {
            if self.kind != ActorKind::Dynamic || event.is_trigger {
                continue;
            }
            let push = event.minimum_translation_vector;
            self.body.translate(push);

            // Cancel velocity into the contact surface
            let into_surface = self.velocity.dot(&event.normal);
            if into_surface < 0.0 {
                self.velocity -= event.normal * into_surface * (1.0 + bounciness);
            }
        }
    }

    fn integrate(&mut self, dt: f32) {
        if self.kind != ActorKind::Dynamic {
            return;
        }
        self.velocity.y += GRAVITY * dt;
        self.body.translate(self.velocity * dt);
    }
}

impl PhysicsBody for Actor {
    fn colliders(&self) -> &[Collider] {
        self.body.colliders()
    }

    fn is_trigger(&self) -> bool {
        self.kind == ActorKind::Pickup
    }

    fn material(&self) -> PhysicsMaterial {
        self.body.material()
    }

    fn on_collision(&mut self, event: &CollisionEventArgs) {
        self.body.on_collision(event);
    }
}

struct PlatformerDemo {
    physics: PhysicsModule,
    scene: BodySet<Actor>,
    rng: StdRng,
    pickup: Option<BodyHandle>,
    /// Bodies overlapping the pickup as of the last tick
    touching_pickup: HashSet<BodyHandle>,
    pickup_hits: usize,
}

impl PlatformerDemo {
    fn new(config: PhysicsConfig) -> Result<Self, DemoError> {
        let mut demo = Self {
            physics: PhysicsModule::new(config),
            scene: BodySet::new(),
            rng: StdRng::seed_from_u64(RNG_SEED),
            pickup: None,
            touching_pickup: HashSet::new(),
            pickup_hits: 0,
        };
        demo.build_level()?;
        demo.spawn_actors()?;
        info!("Scene ready with {} bodies", demo.scene.len());
        Ok(demo)
    }

    fn build_level(&mut self) -> Result<(), DemoError> {
        let level = CollisionLayers::ENVIRONMENT | CollisionLayers::PLATFORM;

        let ground = CollisionBody::at(Vec2::zeros()).with_collider(
            Collider::new(ColliderShape::line(Vec2::new(-40.0, 0.0), Vec2::new(40.0, 0.0))?).with_layers(level),
        );
        self.scene.insert(Actor::new("ground", ActorKind::Static, ground));

        for (i, (x, y, width)) in [(-10.0, 6.0, 8.0), (9.0, 10.0, 6.0), (0.0, 16.0, 10.0)].into_iter().enumerate() {
            let platform = CollisionBody::at(Vec2::new(x, y))
                .with_collider(Collider::new(ColliderShape::rectangle(width, 1.0)?).with_layers(level));
            self.scene.insert(Actor::new(format!("platform_{i}"), ActorKind::Static, platform));
        }

        let ramp = CollisionBody::new(Transform2D::from_position_rotation(Vec2::new(20.0, 2.0), 0.3)).with_collider(
            Collider::new(ColliderShape::polygon(vec![
                Vec2::new(-6.0, -2.0),
                Vec2::new(6.0, -2.0),
                Vec2::new(6.0, 2.0),
            ])?)
            .with_layers(level),
        );
        self.scene.insert(Actor::new("ramp", ActorKind::Static, ramp));

        let pickup = CollisionBody::at(Vec2::new(-10.0, 8.0)).with_collider(
            Collider::new(ColliderShape::circle(1.5)?).with_layers(CollisionLayers::PICKUP | CollisionLayers::DEBRIS),
        );
        self.pickup = Some(self.scene.insert(Actor::new("pickup", ActorKind::Pickup, pickup)));
        Ok(())
    }

    fn spawn_actors(&mut self) -> Result<(), DemoError> {
        let layers = CollisionLayers::DEBRIS | CollisionLayers::ENVIRONMENT;
        let bouncy = PhysicsMaterial {
            bounciness: 0.4,
            ..PhysicsMaterial::default()
        };

        for i in 0..NUM_BOXES + NUM_BALLS {
            let position = Vec2::new(
                self.rng.gen_range(-SPAWN_SPREAD..SPAWN_SPREAD),
                self.rng.gen_range(SPAWN_HEIGHT),
            );
            let (name, shape, material) = if i < NUM_BOXES {
                (format!("box_{i}"), ColliderShape::rectangle(1.0, 1.0)?, PhysicsMaterial::default())
            } else {
                (format!("ball_{i}"), ColliderShape::circle(0.5)?, bouncy)
            };

            let body = CollisionBody::at(position)
                .with_material(material)
                .with_collider(Collider::new(shape).with_layers(layers));
            self.scene.insert(Actor::new(name, ActorKind::Dynamic, body));
        }
        Ok(())
    }

    fn run(&mut self) {
        let stopwatch = Stopwatch::start_new();
        let mut ticks = 0;

        for frame in 0..FRAME_COUNT {
            let elapsed = TARGET_FRAME_TIME + self.rng.gen_range(-FRAME_JITTER..FRAME_JITTER);
            let dt = self.physics.time_step();
            let pickup = self.pickup;
            let touching = &mut self.touching_pickup;
            let mut pickup_hits = 0;

            ticks += self.physics.update(elapsed, &mut self.scene, |scene, events| {
                pickup_hits += count_pickup_touches(scene, events, pickup, touching);
                for (_, actor) in scene.iter_mut() {
                    actor.resolve_contacts();
                    actor.integrate(dt);
                }
            });

            self.pickup_hits += pickup_hits;
            self.log_entered_pairs();
            if frame % 120 == 0 {
                self.report(frame);
            }
        }

        info!(
            "Simulated {FRAME_COUNT} frames ({ticks} physics ticks) in {:.1}ms; pickup touched {} times",
            stopwatch.elapsed_millis(),
            self.pickup_hits
        );
    }

    /// Pairs that started touching in the most recent tick
    fn log_entered_pairs(&self) {
        for pair in self.physics.collisions_entered() {
            let names: Vec<&str> = [pair.collider_a.body, pair.collider_b.body]
                .iter()
                .filter_map(|&handle| self.scene.get(handle))
                .map(|actor| actor.name.as_str())
                .collect();
            debug!("Contact began: {names:?}");
        }
    }

    fn report(&self, frame: u32) {
        let stats = self.physics.stats();
        info!(
            "Frame {frame}: {} colliders, {} nodes, {} candidates, {} collisions",
            stats.colliders, stats.tree_nodes, stats.candidate_pairs, stats.collisions
        );

        let solid = CollisionLayers::ENVIRONMENT | CollisionLayers::PLATFORM;
        for (_, actor) in self.scene.iter().filter(|(_, actor)| actor.kind == ActorKind::Dynamic).take(3) {
            let origin = actor.body.position();
            let hits = self.physics.raycast_all(origin, -Vec2::y(), 50.0, solid);
            match self.physics.try_raycast(origin, -Vec2::y(), 50.0, solid) {
                Some(hit) => debug!(
                    "{} is {:.2} above {:?} ({} surfaces below)",
                    actor.name,
                    hit.distance,
                    self.scene.get(hit.collider.body).map(|target| target.name.as_str()),
                    hits.len()
                ),
                None => warn!("{} has no ground below it", actor.name),
            }
        }

        let spawn_zone = BoundingArea::new(Vec2::new(-SPAWN_SPREAD, 0.0), Vec2::new(SPAWN_SPREAD, 4.0));
        let near_floor = self.physics.query_area(&spawn_zone, CollisionLayers::DEBRIS);
        let under_cursor = self.physics.overlap_point(Vec2::new(0.0, 0.5), CollisionLayers::ALL);
        debug!(
            "{} debris near the floor, {} colliders under the cursor",
            near_floor.len(),
            under_cursor.len()
        );
    }
}

/// Bodies that started overlapping the pickup this tick
///
/// `touching` carries the overlapping set from one tick to the next.
fn count_pickup_touches(
    scene: &BodySet<Actor>,
    events: &[CollisionEventArgs],
    pickup: Option<BodyHandle>,
    touching: &mut HashSet<BodyHandle>,
) -> usize {
    let Some(pickup) = pickup else {
        return 0;
    };
    let current: HashSet<BodyHandle> = events
        .iter()
        .filter(|event| event.is_trigger)
        .filter_map(|event| {
            if event.first.body == pickup {
                Some(event.second.body)
            } else if event.second.body == pickup {
                Some(event.first.body)
            } else {
                None
            }
        })
        .collect();

    let mut entered = 0;
    for handle in current.difference(touching) {
        entered += 1;
        if let Some(actor) = scene.get(*handle) {
            debug!("Pickup touched by {}", actor.name);
        }
    }
    *touching = current;
    entered
}

fn load_config() -> Result<PhysicsConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading physics config from {path}");
            Ok(PhysicsConfig::load_from_file(&path)?)
        }
        None => Ok(PhysicsConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = load_config()?;
    let mut demo = PlatformerDemo::new(config)?;
    demo.run();
    Ok(())
}
