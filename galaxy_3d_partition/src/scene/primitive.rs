/// Scene object types seen by the spatial partition.
///
/// An Actor groups Primitives (the renderable, pickable parts). The
/// partition indexes primitives; actors only matter for ownership,
/// hidden state and the actor-level convenience API.

use bitflags::bitflags;
use glam::{Mat4, Vec3};
use slotmap::new_key_type;
use crate::bounds::{AABB, Ray};

// ===== SLOT MAP KEYS =====

new_key_type! {
    /// Stable generational key for a Primitive within a Scene.
    ///
    /// A key is never reused for another primitive: once its primitive is
    /// removed, lookups with the old key fail instead of aliasing.
    pub struct PrimitiveKey;

    /// Stable generational key for an Actor within a Scene.
    pub struct ActorKey;
}

// ===== FLAGS =====

bitflags! {
    /// Per-primitive capability and state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PrimitiveFlags: u32 {
        /// Primitive takes part in the spatial partition (static-mesh-like)
        const INDEXABLE = 1 << 0;
        /// Set by the culler when the primitive passed the frustum test this frame
        const VISIBLE   = 1 << 1;
    }
}

impl Default for PrimitiveFlags {
    fn default() -> Self {
        PrimitiveFlags::INDEXABLE
    }
}

// ===== HIT SHAPE =====

/// Shape used by the reference narrow-phase hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitShape {
    /// The world-space bounding box itself
    #[default]
    Box,
    /// Sphere inscribed in the world-space bounding box
    Sphere,
}

impl HitShape {
    /// Distance along `ray` to the first hit with this shape fitted in `bounds`.
    pub fn hit_distance(&self, bounds: &AABB, ray: &Ray) -> Option<f32> {
        match self {
            HitShape::Box => bounds.ray_intersect(ray).map(|(t_enter, _)| t_enter),
            HitShape::Sphere => {
                let radius = bounds.extent().min_element();
                ray_sphere(ray, bounds.center(), radius)
            }
        }
    }
}

fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let a = ray.direction.length_squared();
    if a <= 0.0 {
        return (ray.origin.distance_squared(center) <= radius * radius).then_some(0.0);
    }

    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t_far = (-b + sqrt_d) / a;
    if t_far < 0.0 {
        return None;
    }
    let t_near = (-b - sqrt_d) / a;
    Some(t_near.max(0.0))
}

// ===== ACTOR =====

/// Owner of a set of primitives.
#[derive(Debug, Clone)]
pub struct Actor {
    name: String,
    hidden: bool,
    primitives: Vec<PrimitiveKey>,
}

impl Actor {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            hidden: false,
            primitives: Vec::new(),
        }
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hidden actors are skipped by picking
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Primitives owned by this actor
    pub fn primitives(&self) -> &[PrimitiveKey] {
        &self.primitives
    }

    pub(crate) fn primitives_mut(&mut self) -> &mut Vec<PrimitiveKey> {
        &mut self.primitives
    }
}

// ===== PRIMITIVE =====

/// A renderable, pickable part of an actor.
///
/// Bounds are stored in local space and transformed by the world matrix
/// whenever the partition asks for them.
#[derive(Debug, Clone)]
pub struct Primitive {
    owner: ActorKey,
    local_bounds: AABB,
    world_matrix: Mat4,
    flags: PrimitiveFlags,
    hit_shape: HitShape,
}

impl Primitive {
    pub(crate) fn new(
        owner: ActorKey,
        local_bounds: AABB,
        world_matrix: Mat4,
        flags: PrimitiveFlags,
        hit_shape: HitShape,
    ) -> Self {
        Self { owner, local_bounds, world_matrix, flags, hit_shape }
    }

    /// Owning actor
    pub fn owner(&self) -> ActorKey {
        self.owner
    }

    /// Bounds in local space
    pub fn local_bounds(&self) -> &AABB {
        &self.local_bounds
    }

    /// Local-to-world transform
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    pub(crate) fn set_world_matrix(&mut self, matrix: Mat4) {
        self.world_matrix = matrix;
    }

    /// Bounds in world space
    pub fn world_bounds(&self) -> AABB {
        self.local_bounds.transformed(&self.world_matrix)
    }

    pub fn flags(&self) -> PrimitiveFlags {
        self.flags
    }

    pub(crate) fn flags_mut(&mut self) -> &mut PrimitiveFlags {
        &mut self.flags
    }

    pub fn hit_shape(&self) -> HitShape {
        self.hit_shape
    }

    pub fn is_indexable(&self) -> bool {
        self.flags.contains(PrimitiveFlags::INDEXABLE)
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(PrimitiveFlags::VISIBLE)
    }
}
