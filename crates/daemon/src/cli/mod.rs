pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Collection, Daemon, Health, Init, Login, Version};
