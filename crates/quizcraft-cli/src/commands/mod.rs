pub mod evaluate;
pub mod generate;
pub mod validate;
