use bevy::prelude::*;

/// Type tag of a scene node, used by picking and by scene queries.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Mesh,
    Points,
    Group,
    AmbientLight,
    DirectionalLight,
    Gizmo,
}

/// Local-space axis-aligned bounds of a mesh node. Meshes without bounds
/// cannot be hit by picking rays.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MeshBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl MeshBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Scene container. Nodes are ECS entities; `roots` keeps the top-level
/// nodes in insertion order, which is the order picking walks them in.
pub struct SceneGraph {
    world: World,
    roots: Vec<Entity>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            roots: Vec::new(),
        }
    }

    /// Spawn a top-level node.
    pub fn add(&mut self, kind: NodeKind, transform: Transform, extra: impl Bundle) -> Entity {
        let entity = self.world.spawn((kind, transform, extra)).id();
        self.roots.push(entity);
        entity
    }

    /// Spawn a node under `parent`. Children are removed with their parent.
    pub fn add_child(
        &mut self,
        parent: Entity,
        kind: NodeKind,
        transform: Transform,
        extra: impl Bundle,
    ) -> Option<Entity> {
        if !self.contains(parent) {
            return None;
        }
        Some(
            self.world
                .spawn((kind, transform, ChildOf(parent), extra))
                .id(),
        )
    }

    /// Remove a top-level node and everything under it. Returns `false` if
    /// `entity` is not a top-level node of this scene.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let Some(index) = self.roots.iter().position(|e| *e == entity) else {
            return false;
        };
        self.roots.remove(index);
        self.world.despawn(entity)
    }

    pub fn roots(&self) -> &[Entity] {
        &self.roots
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.get::<NodeKind>(entity).is_some()
    }

    pub fn node_kind(&self, entity: Entity) -> Option<NodeKind> {
        self.world.get::<NodeKind>(entity).copied()
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.world.get::<T>(entity)
    }

    pub fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.world.get::<Transform>(entity)
    }

    pub fn transform_mut(&mut self, entity: Entity) -> Option<Mut<'_, Transform>> {
        self.world.get_mut::<Transform>(entity)
    }

    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        self.world
            .get::<Children>(entity)
            .map(|children| children.to_vec())
            .unwrap_or_default()
    }

    /// `entity` followed by all of its descendants, depth first.
    pub fn subtree(&self, entity: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack = vec![entity];
        while let Some(next) = stack.pop() {
            if !self.contains(next) {
                continue;
            }
            out.push(next);
            let children = self.children(next);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Model-to-world matrix, composing parent transforms.
    pub fn world_matrix(&self, entity: Entity) -> Option<Mat4> {
        let mut matrix = self.transform(entity)?.compute_matrix();
        let mut current = entity;
        while let Some(parent) = self.world.get::<ChildOf>(current).map(|c| c.0) {
            let parent_matrix = self.transform(parent)?.compute_matrix();
            matrix = parent_matrix * matrix;
            current = parent;
        }
        Some(matrix)
    }

    pub fn world_translation(&self, entity: Entity) -> Option<Vec3> {
        self.world_matrix(entity).map(|m| m.w_axis.truncate())
    }

    /// Number of top-level nodes of `kind`.
    pub fn count_roots_of_kind(&self, kind: NodeKind) -> usize {
        self.roots
            .iter()
            .filter(|e| self.node_kind(**e) == Some(kind))
            .count()
    }

    /// Number of nodes of `kind` anywhere in the scene.
    pub fn count_kind(&mut self, kind: NodeKind) -> usize {
        let mut query = self.world.query::<&NodeKind>();
        query.iter(&self.world).filter(|k| **k == kind).count()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
