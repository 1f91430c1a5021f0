pub mod coordinate;
pub mod image;
pub mod keypoints;
pub mod model;
