//! Fixed-timestep physics orchestrator
//!
//! Each fixed tick the module discards its quad tree, harvests every enabled
//! body's colliders from the scene into a world-space snapshot, and rebuilds
//! the tree over that snapshot. Collision detection, raycasts and area
//! queries all read the snapshot, so every query issued after a tick sees a
//! consistent picture of the world until the next tick runs.
//!
//! The collision pass follows the usual two phases:
//! - Broad phase: quad tree retrieval, same-body and layer filtering
//! - Narrow phase: exact shape tests producing [`CollisionEventArgs`]
//!
//! Confirmed collisions are delivered synchronously to both owning bodies,
//! each seeing its own collider as `first`.

use crate::config::Config;
use crate::foundation::math::{Vec2, EPSILON};
use crate::foundation::time::{FixedTimestep, Stopwatch, MIN_TIME_STEP};
use crate::physics::body::PhysicsScene;
use crate::physics::collision::{collide, LineSegment, Ray, WorldShape};
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::events::{ColliderId, CollisionEventArgs, CollisionPair, RaycastHit};
use crate::spatial::{Bounded, BoundingArea, QuadTree, QuadTreeConfig};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Physics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed tick length in seconds
    pub time_step: f32,

    /// Catch-up ceiling; time beyond this many ticks per frame is dropped
    pub max_steps_per_frame: u32,

    /// Broad-phase tuning
    pub quad_tree: QuadTreeConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            max_steps_per_frame: 8,
            quad_tree: QuadTreeConfig::default(),
        }
    }
}

impl Config for PhysicsConfig {}

impl PhysicsConfig {
    /// Return a copy with every out-of-range value clamped
    #[must_use]
    pub fn validated(mut self) -> Self {
        if !self.time_step.is_finite() || self.time_step < MIN_TIME_STEP {
            log::warn!("Physics time step {} is invalid; clamping to {MIN_TIME_STEP}", self.time_step);
            self.time_step = MIN_TIME_STEP;
        }
        if self.max_steps_per_frame == 0 {
            log::warn!("max_steps_per_frame must be at least 1; using 1");
            self.max_steps_per_frame = 1;
        }
        self.quad_tree = self.quad_tree.validated();
        self
    }
}

/// Module state within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsState {
    /// Snapshot is consistent; queries are allowed
    Idle,
    /// Tree is being rebuilt
    Rebuilding,
}

/// World-space copy of one collider, taken at rebuild time
#[derive(Debug, Clone)]
pub struct ColliderProxy {
    /// Which collider this is
    pub id: ColliderId,
    /// World bounds at rebuild time
    pub bounds: BoundingArea,
    /// World shape at rebuild time
    pub shape: WorldShape,
    /// Layer mask
    pub layers: CollisionLayers,
    /// Collider or owning body is a trigger
    pub is_trigger: bool,
}

/// Quad tree item: an index into the snapshot plus its bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeEntry {
    /// Position in the snapshot (harvest order)
    pub index: usize,
    /// Bounds of the proxy
    pub bounds: BoundingArea,
}

impl Bounded for TreeEntry {
    fn bounding_area(&self) -> BoundingArea {
        self.bounds
    }
}

/// Per-tick counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickStats {
    /// Bodies that contributed colliders
    pub bodies: usize,
    /// Colliders inserted into the tree
    pub colliders: usize,
    /// Quad tree nodes after rebuild
    pub tree_nodes: usize,
    /// Pairs that passed the broad phase and layer filter
    pub candidate_pairs: usize,
    /// Pairs confirmed by the narrow phase
    pub collisions: usize,
    /// Wall-clock duration of the tick in milliseconds
    pub duration_ms: f32,
}

/// Fixed-timestep physics orchestrator
#[derive(Debug)]
pub struct PhysicsModule {
    /// Broad-phase index over `snapshot`
    tree: QuadTree<TreeEntry>,

    /// Colliders harvested in the last rebuild, in harvest order
    snapshot: Vec<ColliderProxy>,

    /// Snapshot position of each collider
    lookup: HashMap<ColliderId, usize>,

    timestep: FixedTimestep,
    state: PhysicsState,

    /// Collision pairs from the current tick
    current_pairs: HashSet<CollisionPair>,

    /// Collision pairs from the previous tick
    previous_pairs: HashSet<CollisionPair>,

    stats: TickStats,
}

impl Default for PhysicsModule {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl PhysicsModule {
    /// Create a module from (validated) configuration
    pub fn new(config: PhysicsConfig) -> Self {
        let config = config.validated();
        log::info!(
            "Physics module: time step {:.4}s, max {} steps/frame, node capacity {}, max depth {}",
            config.time_step,
            config.max_steps_per_frame,
            config.quad_tree.max_items_per_node,
            config.quad_tree.max_depth
        );

        Self {
            tree: QuadTree::new(config.quad_tree),
            snapshot: Vec::new(),
            lookup: HashMap::new(),
            timestep: FixedTimestep::new(config.time_step, config.max_steps_per_frame),
            state: PhysicsState::Idle,
            current_pairs: HashSet::new(),
            previous_pairs: HashSet::new(),
            stats: TickStats::default(),
        }
    }

    /// Fixed tick length in seconds
    pub fn time_step(&self) -> f32 {
        self.timestep.time_step()
    }

    /// Change the tick length (invalid values are clamped)
    pub fn set_time_step(&mut self, time_step: f32) {
        self.timestep.set_time_step(time_step);
    }

    /// Interpolation factor between the last tick and the next
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    /// Ticks executed since creation
    pub fn total_ticks(&self) -> u64 {
        self.timestep.total_steps()
    }

    /// Current state (always `Idle` between calls)
    pub fn state(&self) -> PhysicsState {
        self.state
    }

    /// Counters from the most recent tick
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// The broad-phase tree built by the last rebuild
    pub fn tree(&self) -> &QuadTree<TreeEntry> {
        &self.tree
    }

    /// Colliders captured by the last rebuild, in harvest order
    pub fn colliders(&self) -> &[ColliderProxy] {
        &self.snapshot
    }

    /// World bounds of a collider as of the last rebuild
    pub fn collider_bounds(&self, id: ColliderId) -> Option<BoundingArea> {
        self.proxy(id).map(|proxy| proxy.bounds)
    }

    fn proxy(&self, id: ColliderId) -> Option<&ColliderProxy> {
        self.lookup.get(&id).and_then(|&index| self.snapshot.get(index))
    }

    /// Advance by a frame's elapsed time
    ///
    /// Runs zero or more fixed ticks. After each tick `on_tick` receives the
    /// scene and that tick's collisions (one record per pair, from the first
    /// body's side), so gameplay code can resolve and integrate before the
    /// next tick. Returns the number of ticks run.
    pub fn update<S, F>(&mut self, elapsed: f32, scene: &mut S, mut on_tick: F) -> u32
    where
        S: PhysicsScene + ?Sized,
        F: FnMut(&mut S, &[CollisionEventArgs]),
    {
        let steps = self.timestep.accumulate(elapsed);
        for _ in 0..steps {
            let events = self.fixed_update(scene);
            on_tick(scene, &events);
        }
        steps
    }

    /// Run exactly one tick: rebuild, detect, deliver
    pub fn fixed_update<S>(&mut self, scene: &mut S) -> Vec<CollisionEventArgs>
    where
        S: PhysicsScene + ?Sized,
    {
        let stopwatch = Stopwatch::start_new();

        self.rebuild(&*scene);
        let events = self.detect_collisions();

        for event in &events {
            if let Some(body) = scene.body_mut(event.first.body) {
                body.on_collision(event);
            }
            if let Some(body) = scene.body_mut(event.second.body) {
                body.on_collision(&event.swapped());
            }
        }

        self.stats.duration_ms = stopwatch.elapsed_millis();
        log::trace!(
            "Physics tick: {} bodies, {} colliders, {} nodes, {} candidates, {} collisions in {:.3}ms",
            self.stats.bodies,
            self.stats.colliders,
            self.stats.tree_nodes,
            self.stats.candidate_pairs,
            self.stats.collisions,
            self.stats.duration_ms
        );
        events
    }

    /// Clear the tree and re-insert every collider from the scene
    ///
    /// Disabled bodies, bodies without colliders and colliders with empty
    /// bounds contribute nothing.
    pub fn rebuild<S>(&mut self, scene: &S)
    where
        S: PhysicsScene + ?Sized,
    {
        self.state = PhysicsState::Rebuilding;
        self.tree.clear();
        self.snapshot.clear();
        self.lookup.clear();

        let snapshot = &mut self.snapshot;
        let mut bodies = 0;
        scene.visit_bodies(&mut |handle, body| {
            if !body.is_enabled() || !body.has_collider() {
                return;
            }
            bodies += 1;

            let body_is_trigger = body.is_trigger();
            for (index, collider) in body.colliders().iter().enumerate() {
                let bounds = collider.bounding_area();
                if bounds.is_empty() {
                    continue;
                }
                snapshot.push(ColliderProxy {
                    id: ColliderId::new(handle, index),
                    bounds,
                    shape: collider.world_shape(),
                    layers: collider.layers(),
                    is_trigger: body_is_trigger || collider.is_trigger(),
                });
            }
        });

        self.lookup
            .extend(self.snapshot.iter().enumerate().map(|(index, proxy)| (proxy.id, index)));
        let inserted = self.tree.insert_many(
            self.snapshot
                .iter()
                .enumerate()
                .map(|(index, proxy)| TreeEntry { index, bounds: proxy.bounds }),
        );
        debug_assert_eq!(inserted, self.snapshot.len());

        self.stats = TickStats {
            bodies,
            colliders: inserted,
            tree_nodes: self.tree.node_count(),
            ..TickStats::default()
        };
        self.state = PhysicsState::Idle;
        log::debug!(
            "Rebuilt quad tree: {} colliders from {} bodies, depth {}",
            inserted,
            bodies,
            self.tree.depth()
        );
    }

    /// Find every colliding pair in the current snapshot
    ///
    /// Each pair is reported once, in harvest order, with the earlier
    /// collider as `first`. Also rolls the current/previous pair sets.
    pub fn detect_collisions(&mut self) -> Vec<CollisionEventArgs> {
        debug_assert_eq!(self.state, PhysicsState::Idle);

        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();

        let mut events = Vec::new();
        let mut candidate_pairs = 0;
        let mut candidates = Vec::new();

        for (i, proxy) in self.snapshot.iter().enumerate() {
            candidates.clear();
            self.tree.retrieve_into(&proxy.bounds, &mut candidates);
            candidates.sort_unstable_by_key(|entry| entry.index);

            for entry in &candidates {
                if entry.index <= i {
                    continue;
                }
                let Some(other) = self.snapshot.get(entry.index) else {
                    continue;
                };
                if other.id.body == proxy.id.body || !proxy.layers.interacts_with(other.layers) {
                    continue;
                }
                candidate_pairs += 1;

                if !proxy.bounds.overlaps(&other.bounds) {
                    continue;
                }
                if let Some(contact) = collide(&proxy.shape, &other.shape) {
                    let event = CollisionEventArgs {
                        first: proxy.id,
                        second: other.id,
                        normal: contact.normal,
                        minimum_translation_vector: contact.minimum_translation_vector(),
                        first_contains_second: contact.first_contains_second,
                        second_contains_first: contact.second_contains_first,
                        is_trigger: proxy.is_trigger || other.is_trigger,
                    };
                    self.current_pairs.insert(event.pair());
                    events.push(event);
                }
            }
        }

        self.stats.candidate_pairs = candidate_pairs;
        self.stats.collisions = events.len();
        events
    }

    /// Pairs colliding this tick that were not colliding last tick
    pub fn collisions_entered(&self) -> Vec<CollisionPair> {
        sorted(self.current_pairs.difference(&self.previous_pairs))
    }

    /// Pairs colliding last tick that are no longer colliding
    pub fn collisions_exited(&self) -> Vec<CollisionPair> {
        sorted(self.previous_pairs.difference(&self.current_pairs))
    }

    /// Every pair colliding this tick
    pub fn current_collisions(&self) -> Vec<CollisionPair> {
        sorted(self.current_pairs.iter())
    }

    /// Check whether a pair collided in the last tick
    pub fn is_colliding(&self, a: ColliderId, b: ColliderId) -> bool {
        self.current_pairs.contains(&CollisionPair::new(a, b))
    }

    /// Every collider struck by a bounded ray, in harvest order
    ///
    /// A zero direction, non-positive distance or empty layer mask yields no
    /// hits. Each hit is the point where the ray enters the collider; a ray
    /// starting inside a collider hits it at `start`.
    pub fn raycast_all(&self, start: Vec2, direction: Vec2, distance: f32, layers: CollisionLayers) -> Vec<RaycastHit> {
        if layers.is_empty() {
            return Vec::new();
        }
        let Some(ray) = Ray::new(start, direction, distance) else {
            return Vec::new();
        };

        let segment = ray.segment();
        self.candidates(&ray.bounding_area())
            .into_iter()
            .filter(|proxy| proxy.layers.interacts_with(layers))
            .filter_map(|proxy| {
                let hit = proxy.shape.intersect_segment(&segment)?;
                Some(RaycastHit {
                    point: hit.point,
                    distance: (hit.point - start).magnitude(),
                    normal: hit.normal,
                    collider: proxy.id,
                })
            })
            .collect()
    }

    /// The nearest raycast hit, if any
    ///
    /// Equal distances resolve to the smaller [`ColliderId`], so the result
    /// does not depend on broad-phase order.
    pub fn try_raycast(&self, start: Vec2, direction: Vec2, distance: f32, layers: CollisionLayers) -> Option<RaycastHit> {
        self.raycast_all(start, direction, distance, layers)
            .into_iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance).then_with(|| a.collider.cmp(&b.collider)))
    }

    /// Colliders on `layers` whose shape overlaps `area`
    pub fn query_area(&self, area: &BoundingArea, layers: CollisionLayers) -> Vec<ColliderId> {
        if area.is_empty() || layers.is_empty() {
            return Vec::new();
        }
        if area.width() < EPSILON && area.height() < EPSILON {
            return self.overlap_point(area.center(), layers);
        }

        let probe = area_shape(area);
        self.candidates(area)
            .into_iter()
            .filter(|proxy| proxy.layers.interacts_with(layers) && proxy.bounds.overlaps(area))
            .filter(|proxy| collide(&probe, &proxy.shape).is_some())
            .map(|proxy| proxy.id)
            .collect()
    }

    /// Colliders on `layers` whose shape contains `point`
    pub fn overlap_point(&self, point: Vec2, layers: CollisionLayers) -> Vec<ColliderId> {
        if layers.is_empty() {
            return Vec::new();
        }

        self.candidates(&BoundingArea::from_corners(point, point))
            .into_iter()
            .filter(|proxy| proxy.layers.interacts_with(layers))
            .filter(|proxy| proxy.bounds.contains(point) && proxy.shape.contains_point(point))
            .map(|proxy| proxy.id)
            .collect()
    }

    /// Broad-phase candidates for `area`, in harvest order
    fn candidates(&self, area: &BoundingArea) -> Vec<&ColliderProxy> {
        debug_assert_eq!(self.state, PhysicsState::Idle);

        let mut entries = self.tree.retrieve_potential_collisions(area);
        entries.sort_unstable_by_key(|entry| entry.index);
        entries
            .into_iter()
            .filter_map(|entry| self.snapshot.get(entry.index))
            .collect()
    }
}

fn sorted<'a>(pairs: impl Iterator<Item = &'a CollisionPair>) -> Vec<CollisionPair> {
    let mut pairs: Vec<_> = pairs.copied().collect();
    pairs.sort_unstable();
    pairs
}

/// World shape for an area query; flat areas become a segment
fn area_shape(area: &BoundingArea) -> WorldShape {
    let (min, max) = (area.minimum, area.maximum);
    let rectangle = WorldShape::polygon(vec![min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)]);
    if rectangle.is_degenerate() {
        WorldShape::Segment(LineSegment::new(min, max))
    } else {
        rectangle
    }
}
