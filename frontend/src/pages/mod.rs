pub mod analyze;
pub mod landing;

pub use analyze::AnalyzePage;
pub use landing::Landing;
