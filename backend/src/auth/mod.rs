//! Authentication: JWT tokens, Argon2 password hashing and the bearer extractor

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenLifetimes, TokenType};
pub use middleware::{bearer_token, AuthUser};
pub use password::PasswordService;
