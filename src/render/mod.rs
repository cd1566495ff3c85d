pub mod animator;
pub mod camera;
pub mod edges;
pub mod layout;
pub mod marquee;
