/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id hashing and login verification
/// - [`jwt`]: Session token signing and validation
/// - [`middleware`]: Token extraction and the per-request [`middleware::AuthContext`]
/// - [`authorization`]: Role allow-lists and access decisions
///
/// # Example
///
/// ```no_run
/// use medgas_shared::auth::jwt::{create_token, Claims};
/// use medgas_shared::auth::middleware::authenticate;
/// use medgas_shared::models::user::Role;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-that-is-at-least-32-bytes!!";
/// let claims = Claims::new(1, "ana", "ana@example.org", Role::Admin, chrono::Duration::hours(8));
/// let token = create_token(&claims, secret)?;
///
/// let auth = authenticate(Some(&token), secret)?;
/// assert_eq!(auth.user_id, 1);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
