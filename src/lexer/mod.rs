pub mod cpu;
pub mod statements;
pub mod tables;
