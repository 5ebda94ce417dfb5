pub mod convert;
pub mod locate;
pub mod probe;
