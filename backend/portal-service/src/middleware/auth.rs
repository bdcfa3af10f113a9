/// JWT authentication middleware for Bearer token validation.
/// Verifies the token, loads the account, rejects inactive accounts and
/// adds the authenticated identity to request extensions.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use mongodb::bson::oid::ObjectId;
use mongodb::Database;
use std::rc::Rc;

use crate::db::user_repo;
use crate::error::AppError;
use crate::models::{UserPermission, UserRole, UserStatus};
use crate::security::jwt;

/// Authenticated identity extracted from the JWT and the account record.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub permissions: Vec<UserPermission>,
}

impl AuthUser {
    /// Access control used by the protected routes: admins pass, listed
    /// roles pass, and any of the listed permissions passes. With both
    /// lists empty this is authentication only.
    pub fn authorize(
        &self,
        roles: &[UserRole],
        permissions: &[UserPermission],
    ) -> Result<(), AppError> {
        if self.role == UserRole::Admin {
            return Ok(());
        }
        if roles.is_empty() && permissions.is_empty() {
            return Ok(());
        }
        if roles.contains(&self.role) {
            return Ok(());
        }
        if permissions.iter().any(|p| self.permissions.contains(p)) {
            return Ok(());
        }
        Err(AppError::Authorization(
            "You do not have permission to perform this action".to_string(),
        ))
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// JWT authentication middleware factory
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // Extract header data as owned strings before any mutable
            // access to the request extensions.
            let auth_header = match req.headers().get("Authorization") {
                Some(header) => match header.to_str() {
                    Ok(h) => h.to_string(),
                    Err(_) => {
                        return Err(ErrorUnauthorized("Invalid Authorization header"));
                    }
                },
                None => {
                    return Err(ErrorUnauthorized(
                        "You are not logged in! Please log in to get access.",
                    ));
                }
            };

            let token = match auth_header.strip_prefix("Bearer ") {
                Some(t) => t,
                None => {
                    return Err(ErrorUnauthorized(
                        "Invalid Authorization scheme, expected Bearer",
                    ));
                }
            };

            let user_id = match jwt::validate_access_token(token) {
                Ok(token_data) => match ObjectId::parse_str(&token_data.claims.sub) {
                    Ok(id) => id,
                    Err(_) => {
                        return Err(ErrorUnauthorized("Invalid user ID in token"));
                    }
                },
                Err(e) => {
                    tracing::debug!("Token validation failed: {}", e);
                    return Err(ErrorUnauthorized("Invalid token or token expired."));
                }
            };

            // The token alone is not enough: the account must still exist
            // and be active.
            let db = match req.app_data::<web::Data<Database>>() {
                Some(db) => db.clone(),
                None => {
                    return Err(actix_web::error::ErrorInternalServerError(
                        "Database handle missing",
                    ));
                }
            };

            let user = match user_repo::find_by_id(db.get_ref(), user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    return Err(ErrorUnauthorized(
                        "The user belonging to this token no longer exists.",
                    ));
                }
                Err(e) => {
                    tracing::error!("Auth lookup failed: {}", e);
                    return Err(actix_web::error::ErrorInternalServerError("Database error"));
                }
            };

            if user.status != UserStatus::Active {
                return Err(ErrorUnauthorized("Your account is not active."));
            }

            req.extensions_mut().insert(AuthUser {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
                permissions: user.permissions,
            });

            let res = service.call(req).await?;
            Ok(res)
        })
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => ready(Err(ErrorUnauthorized(
                "Authenticated user missing in request extensions",
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: UserRole, permissions: Vec<UserPermission>) -> AuthUser {
        AuthUser {
            id: ObjectId::new(),
            name: "Test".into(),
            email: "t@example.com".into(),
            role,
            permissions,
        }
    }

    #[test]
    fn test_admin_passes_everything() {
        let admin = user_with(UserRole::Admin, vec![]);
        assert!(admin
            .authorize(&[UserRole::Teacher], &[UserPermission::ManageWork])
            .is_ok());
    }

    #[test]
    fn test_listed_role_passes() {
        let teacher = user_with(UserRole::Teacher, vec![]);
        assert!(teacher.authorize(&[UserRole::Teacher], &[]).is_ok());
        assert!(teacher.authorize(&[UserRole::Student], &[]).is_err());
    }

    #[test]
    fn test_permission_grants_access_outside_role_list() {
        let student = user_with(UserRole::Student, vec![UserPermission::ManageNotices]);
        assert!(student
            .authorize(&[UserRole::Teacher], &[UserPermission::ManageNotices])
            .is_ok());
    }

    #[test]
    fn test_empty_lists_mean_authentication_only() {
        let student = user_with(UserRole::Student, vec![]);
        assert!(student.authorize(&[], &[]).is_ok());
    }
}
