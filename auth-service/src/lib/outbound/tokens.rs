pub mod jwt;

pub use jwt::JwtTokenSigner;
