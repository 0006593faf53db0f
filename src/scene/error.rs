use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("object node {node} uses material {material}, but the scene only defines {count}")]
    InvalidMaterial {
        node: usize,
        material: usize,
        count: usize,
    },

    #[error("camera direction must be non-zero and not parallel to the world up axis")]
    DegenerateCamera,

    #[error("failed to parse scene description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read scene description: {0}")]
    Io(#[from] std::io::Error),
}
