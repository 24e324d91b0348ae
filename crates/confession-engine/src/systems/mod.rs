pub mod counter;
pub mod fireworks;
pub mod navigation;
pub mod reveal;
pub mod typewriter;
