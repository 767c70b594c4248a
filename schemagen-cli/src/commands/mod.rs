pub mod describe;
pub mod generate;
