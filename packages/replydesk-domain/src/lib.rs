pub mod lead;
pub mod prompt;
pub mod signature;
