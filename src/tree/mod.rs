pub mod extract;
pub mod node;
pub mod record;
