// src/services/auth.rs

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::{
    common::error::AppError,
    models::auth::{Claims, CurrentUser},
};

// Sign-in lives in the external auth service; here we only check the
// signature and expiry of the tokens it hands out.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(jwt_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Audience differs between deployments of the auth service.
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<CurrentUser, AppError> {
        let token_data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|_| AppError::InvalidToken)?;

        Ok(CurrentUser {
            id: token_data.claims.sub,
            email: token_data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    fn token_for(sub: Uuid, secret: &str, expires_in_secs: i64) -> String {
        let claims = Claims {
            sub,
            exp: (Utc::now().timestamp() + expires_in_secs) as usize,
            email: Some("owner@toko.id".into()),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .expect("encode token")
    }

    #[test]
    fn accepts_a_token_signed_with_the_shared_secret() {
        let verifier = TokenVerifier::new("rahasia");
        let user_id = Uuid::new_v4();

        let user = verifier.verify(&token_for(user_id, "rahasia", 3600)).expect("valid token");
        assert_eq!(user.id, user_id);
        assert_eq!(user.email.as_deref(), Some("owner@toko.id"));
    }

    #[test]
    fn rejects_foreign_and_expired_tokens() {
        let verifier = TokenVerifier::new("rahasia");

        let foreign = token_for(Uuid::new_v4(), "lain", 3600);
        assert!(matches!(verifier.verify(&foreign), Err(AppError::InvalidToken)));

        let expired = token_for(Uuid::new_v4(), "rahasia", -3600);
        assert!(matches!(verifier.verify(&expired), Err(AppError::InvalidToken)));

        assert!(matches!(verifier.verify("not-a-jwt"), Err(AppError::InvalidToken)));
    }
}
