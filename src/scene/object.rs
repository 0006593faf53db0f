use glam::Vec3;

/// Index of a node in the scene's object arena.
///
/// Children of a blend node are always inserted before their parent, so a
/// node only ever refers to lower indices and the arena stays acyclic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// 1-based position of a top-level object; `0` is the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectId(u32);

impl ObjectId {
    /// No surface was hit.
    pub const BACKGROUND: ObjectId = ObjectId(0);

    /// Id of the top-level object stored at `index` (0-based).
    pub fn from_index(index: usize) -> Self {
        ObjectId(index as u32 + 1)
    }

    /// 0-based top-level index, or `None` for the background.
    pub fn index(self) -> Option<usize> {
        self.0.checked_sub(1).map(|i| i as usize)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_background(self) -> bool {
        self.0 == 0
    }
}

/// Geometry of a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere {
        radius: f32,
    },
    /// Axis-aligned box centred on the object point, with rounded edges.
    Box {
        half_extents: Vec3,
        corner_radius: f32,
    },
    /// Infinite horizontal plane at height `y`.
    Plane {
        y: f32,
    },
    /// Smooth minimum of two child nodes with blend radius `smoothness`.
    SmoothUnion {
        left: NodeId,
        right: NodeId,
        smoothness: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Object {
    pub point: Vec3,
    pub material: usize,
    pub shape: Shape,
}

impl Object {
    pub fn is_blend(&self) -> bool {
        matches!(self.shape, Shape::SmoothUnion { .. })
    }
}
