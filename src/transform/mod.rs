pub mod models;
pub mod reducer;

pub use models::AllSpark;
pub use reducer::optimus_prime;
