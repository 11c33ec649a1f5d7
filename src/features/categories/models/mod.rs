mod category;

pub use category::*;
