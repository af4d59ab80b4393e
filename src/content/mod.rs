pub mod levels;

pub use levels::seed_levels;
