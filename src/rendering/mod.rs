pub mod engine;
pub mod headless;

pub use engine::RenderEngine;
pub use headless::HeadlessEngine;
