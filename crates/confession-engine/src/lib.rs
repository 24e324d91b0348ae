pub mod api;
pub mod core;
pub mod input;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::PageConfig;
pub use api::page::PageController;
pub use api::types::{AudioError, PageLayout, PageView, Rect, TextSlot};
pub use crate::core::clock::{format_celebration_date, Clock, LocalStamp};
pub use crate::core::duration::format_duration;
pub use crate::core::scheduler::{ManualScheduler, Scheduler, Task, TaskHandle};
pub use input::event::{Button, PageEvent, WheelOutcome};
pub use systems::counter::Counter;
pub use systems::fireworks::{FireworksConfig, FireworksState, Particle, ParticleInstance, SparkPhysics};
pub use systems::navigation::{WheelInput, WheelNav};
pub use systems::reveal::RevealState;
pub use systems::typewriter::{Typewriter, TypewriterPhase};
