pub mod gateways;
pub mod product;
pub mod validation;

pub use gateways::*;
pub use product::*;
pub use validation::*;
