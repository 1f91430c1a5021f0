pub mod landmark_helper;
pub mod measurement;
