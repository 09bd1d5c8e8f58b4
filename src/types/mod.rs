
pub mod coin;
pub mod sync;

pub use coin::*;
pub use sync::*;
