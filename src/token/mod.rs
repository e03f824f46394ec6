mod header;
#[allow(clippy::module_inception)]
mod token;

pub use header::Header;
pub use token::Token;
