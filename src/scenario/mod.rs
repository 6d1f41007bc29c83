pub mod demo;
pub mod random;
pub mod scenario;
