use super::{Camera, LightEntity, RenderConfig, ShapeEntity};

/// Scene-graph capability consumed by the collector.
///
/// Implementors enumerate their live entities in a deterministic discovery
/// order; the collector takes care of ordering shapes for evaluation.
pub trait SceneProvider {
    fn shapes(&self) -> impl Iterator<Item = &ShapeEntity>;

    fn lights(&self) -> impl Iterator<Item = &LightEntity>;

    fn camera(&self) -> Camera;

    fn render_config(&self) -> RenderConfig {
        RenderConfig::default()
    }
}

/// Stable identifier of a registered entity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EntityId(u64);

/// Explicit entity registry.
///
/// Enumeration order is registration order. Removing an entity keeps the
/// relative order of the remaining ones.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    shapes: Vec<(EntityId, ShapeEntity)>,
    lights: Vec<(EntityId, LightEntity)>,
    camera: Camera,
    config: RenderConfig,
    next_id: u64,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_shape(&mut self, shape: ShapeEntity) -> EntityId {
        let id = self.allocate_id();
        self.shapes.push((id, shape));
        id
    }

    pub fn add_light(&mut self, light: LightEntity) -> EntityId {
        let id = self.allocate_id();
        self.lights.push((id, light));
        id
    }

    /// Removes a shape or light. Returns `false` for unknown ids.
    pub fn remove(&mut self, id: EntityId) -> bool {
        if let Some(i) = self.shapes.iter().position(|(e, _)| *e == id) {
            self.shapes.remove(i);
            return true;
        }
        if let Some(i) = self.lights.iter().position(|(e, _)| *e == id) {
            self.lights.remove(i);
            return true;
        }
        false
    }

    pub fn shape_mut(&mut self, id: EntityId) -> Option<&mut ShapeEntity> {
        self.shapes
            .iter_mut()
            .find_map(|(e, s)| (*e == id).then_some(s))
    }

    pub fn light_mut(&mut self, id: EntityId) -> Option<&mut LightEntity> {
        self.lights
            .iter_mut()
            .find_map(|(e, l)| (*e == id).then_some(l))
    }

    /// Toggles whether an entity takes part in rendering.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> bool {
        if let Some(s) = self.shape_mut(id) {
            s.active = active;
            return true;
        }
        if let Some(l) = self.light_mut(id) {
            l.active = active;
            return true;
        }
        false
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn set_render_config(&mut self, config: RenderConfig) {
        self.config = config;
    }
}

impl SceneProvider for SceneRegistry {
    fn shapes(&self) -> impl Iterator<Item = &ShapeEntity> {
        self.shapes.iter().map(|(_, s)| s)
    }

    fn lights(&self) -> impl Iterator<Item = &LightEntity> {
        self.lights.iter().map(|(_, l)| l)
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn render_config(&self) -> RenderConfig {
        self.config
    }
}
