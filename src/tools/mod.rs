pub mod correct;
pub mod search;
pub mod suggest;

pub use correct::*;
pub use search::*;
pub use suggest::*;
