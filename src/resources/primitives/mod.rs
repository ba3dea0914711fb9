pub mod box_shape;
pub mod edges;
pub mod tube;

pub use box_shape::create_box;
pub use edges::create_edges;
pub use tube::{create_tube, TubeOptions};
