pub mod engine;
pub mod verify;
