pub mod lookup;
pub mod offsets;
