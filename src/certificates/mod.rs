// Certificates module - Chain interception and certificate parsing

pub mod interceptor;
pub mod parser;

pub use interceptor::{CapturedChain, ChainInterceptor};
pub use parser::Certificate;
