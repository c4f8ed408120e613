pub mod print;

pub use print::PrintResponse;
