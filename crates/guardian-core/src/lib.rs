pub mod audio;
pub mod constants;
pub mod narration;
pub mod particles;
pub mod puzzles;
pub mod scene;
pub mod session;
pub mod stage;
pub mod visualizer;

pub use audio::*;
pub use narration::*;
pub use particles::*;
pub use scene::*;
pub use session::*;
pub use stage::*;
pub use visualizer::*;
