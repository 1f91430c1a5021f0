pub mod command_detector;
pub mod detector;
pub mod precomputed_detector;
