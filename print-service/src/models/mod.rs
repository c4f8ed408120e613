pub mod artifacts;
pub mod print_request;
pub mod receipt;

pub use artifacts::ArtifactPair;
pub use print_request::{
    is_decimal_digits, PrintRequest, RangeBound, MAX_NUMBER, MIN_NUMBER,
};
pub use receipt::PrintReceipt;
