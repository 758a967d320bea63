mod material;
mod mesh;
pub mod shapes;
mod texture;
mod vertex;

pub use material::Material;
pub use mesh::Mesh;
pub use shapes::MeshData;
pub use texture::{checkerboard_image, diffuse_image, load_rgba, DepthTexture, Texture};
pub use vertex::ModelVertex;
