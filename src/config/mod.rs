mod r#impl;
mod structs;

pub use r#impl::DEFAULT_JWT_SECRET;
pub use structs::*;
