//! Authenticated user decoded from the identity token issued by the auth service.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{Error, FromRequest, HttpRequest, web};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::permissions::{Capabilities, check_role};
use crate::models::config::ServerConfig;

/// Claims carried by the identity token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn has_role(&self, role: &str) -> bool {
        check_role(role, &self.roles)
    }

    /// Capability set for this session, derived from the token roles.
    ///
    /// `None` for users holding only the access role.
    pub fn capabilities(&self) -> Option<Capabilities> {
        Capabilities::from_session_roles(&self.roles)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            log::error!("ServerConfig is not registered as app data");
            return ready(Err(ErrorInternalServerError("server misconfigured")));
        };

        let token = req.get_identity().ok().and_then(|identity| identity.id().ok());
        let Some(token) = token else {
            return ready(Err(ErrorUnauthorized("not signed in")));
        };

        ready(Self::from_jwt(&token, &config.secret).map_err(|e| {
            log::warn!("Rejected identity token: {e}");
            ErrorUnauthorized("invalid identity token")
        }))
    }
}
