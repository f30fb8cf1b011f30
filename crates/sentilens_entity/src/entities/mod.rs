pub mod prelude;

pub mod analysis;
