mod config;
mod field;
mod reading;
mod rules;
mod variant;

pub use config::*;
pub use field::*;
pub use reading::*;
pub use rules::*;
pub use variant::*;
