pub mod entities;
pub mod repositories;
pub mod telegram;
pub mod traits;
