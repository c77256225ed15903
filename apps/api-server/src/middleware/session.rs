//! Session middleware - cookie verification and opportunistic token renewal.
//!
//! Runs on every request. A missing, malformed, or expired `access_token`
//! cookie downgrades the request to anonymous instead of rejecting it;
//! route-level guards decide whether anonymous is acceptable. When a
//! verified token has less than half its lifetime left, the authoritative
//! user record is fetched and a fresh cookie rides out on the response.

use actix_web::{
    Error, HttpMessage,
    cookie::{Cookie, time::Duration as CookieDuration},
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use quill_core::ports::{TokenClaims, TokenService, UserRepository};

use super::auth::Identity;

/// Name of the session cookie.
pub static ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Outcome of inspecting the session cookie.
///
/// Every verification failure folds into `Anonymous` by design: a bad token
/// must behave exactly like no token at all, so probing with forged cookies
/// reveals nothing.
#[derive(Debug, Clone)]
pub enum AuthState {
    Anonymous,
    Identified(TokenClaims),
}

impl AuthState {
    fn from_cookie(tokens: &dyn TokenService, raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return AuthState::Anonymous;
        };

        match tokens.verify_token(raw) {
            Ok(claims) => AuthState::Identified(claims),
            Err(err) => {
                tracing::debug!(error = %err, "Session token rejected; continuing anonymously");
                AuthState::Anonymous
            }
        }
    }
}

/// Build the session cookie carrying `token`.
pub fn session_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

/// Build the cookie that clears the session on the client.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(ACCESS_TOKEN_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// Middleware that resolves the session cookie into an [`Identity`] and
/// renews tokens nearing expiry.
pub struct SessionMiddleware {
    tokens: Arc<dyn TokenService>,
    users: Arc<dyn UserRepository>,
}

impl SessionMiddleware {
    pub fn new(tokens: Arc<dyn TokenService>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionService {
            service,
            tokens: self.tokens.clone(),
            users: self.users.clone(),
        }))
    }
}

pub struct SessionService<S> {
    service: S,
    tokens: Arc<dyn TokenService>,
    users: Arc<dyn UserRepository>,
}

impl<S, B> Service<ServiceRequest> for SessionService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let raw = req.cookie(ACCESS_TOKEN_COOKIE);
        let state = AuthState::from_cookie(self.tokens.as_ref(), raw.as_ref().map(|c| c.value()));

        let renewal = match &state {
            AuthState::Identified(claims) => {
                req.extensions_mut().insert(Identity::from(claims.clone()));
                let now = chrono::Utc::now().timestamp();
                needs_renewal(self.tokens.as_ref(), claims, now).then(|| claims.clone())
            }
            AuthState::Anonymous => None,
        };

        let tokens = self.tokens.clone();
        let users = self.users.clone();
        let fut = self.service.call(req);

        Box::pin(async move {
            // Renewal resolves before the handler runs, same as issuing it
            // inline would.
            let fresh = match renewal {
                Some(claims) => reissue(tokens.as_ref(), users.as_ref(), &claims).await,
                None => None,
            };

            let mut res = fut.await?;

            if let Some(cookie) = fresh {
                if let Err(err) = res.response_mut().add_cookie(&cookie) {
                    tracing::error!(error = %err, "Failed to attach renewed session cookie");
                }
            }

            Ok(res)
        })
    }
}

fn needs_renewal(tokens: &dyn TokenService, claims: &TokenClaims, now: i64) -> bool {
    claims.remaining_seconds(now) < tokens.renewal_threshold_seconds()
}

/// Mint a replacement token from the authoritative user record.
///
/// `None` when the user has vanished or a lookup failed. The request keeps
/// its verified identity either way; only the renewal is skipped.
async fn reissue(
    tokens: &dyn TokenService,
    users: &dyn UserRepository,
    claims: &TokenClaims,
) -> Option<Cookie<'static>> {
    let user = match users.find_by_id(claims.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id = %claims.user_id, "Skipping token renewal: user no longer exists");
            return None;
        }
        Err(err) => {
            tracing::warn!(error = %err, "Skipping token renewal: user lookup failed");
            return None;
        }
    };

    match tokens.issue_token(user.id, &user.username) {
        Ok(token) => Some(session_cookie(token, tokens.lifetime_seconds())),
        Err(err) => {
            tracing::warn!(error = %err, "Skipping token renewal: issuing failed");
            None
        }
    }
}
