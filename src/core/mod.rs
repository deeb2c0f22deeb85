pub mod assistant;
pub mod error;
pub mod parser;
pub mod quota;
pub mod services;
pub mod session;
pub mod traits;
pub mod viewer;
