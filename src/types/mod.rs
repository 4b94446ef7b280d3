pub mod job;
pub mod material;
pub mod protocol;
pub mod serialisable;
pub mod states;
