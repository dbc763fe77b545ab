use actix_web::{
  Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
  body::EitherBody,
  dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header,
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use super::request_id::RequestIdExt;
use crate::{
  adapters::http::errors::ApiError,
  domain::auth::{AuthClaims, AuthError, TokenVerifier},
};

/// Bearer-token gate for protected resources.
///
/// Verifies the `Authorization: Bearer <jwt>` header and stores the decoded
/// `AuthClaims` in request extensions. Requests without a usable token are
/// answered with 403 before reaching the handler.
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use donut_diaries::domain::auth::TokenVerifier;
/// # use donut_diaries::adapters::http::middleware::auth::JwtAuthMiddleware;
///
/// # fn example(verifier: Arc<dyn TokenVerifier>) {
/// let app = App::new().service(
///   web::resource("/api/consumer/me")
///     .wrap(JwtAuthMiddleware::new(verifier))
///     .route(web::get().to(|| async { "me" })),
/// );
/// # }
/// ```
#[derive(Clone)]
pub struct JwtAuthMiddleware {
  verifier: Arc<dyn TokenVerifier>,
}

impl JwtAuthMiddleware {
  pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
    Self { verifier }
  }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = JwtAuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(JwtAuthMiddlewareService {
      service: Rc::new(service),
      verifier: self.verifier.clone(),
    }))
  }
}

pub struct JwtAuthMiddlewareService<S> {
  service: Rc<S>,
  verifier: Arc<dyn TokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let verifier = self.verifier.clone();

    Box::pin(async move {
      let verified = extract_bearer_token(&req).and_then(|token| verifier.verify(token));
      let claims = match verified {
        Ok(claims) => claims,
        Err(e) => {
          tracing::debug!(
            request_id = ?req.request().request_id(),
            path = %req.path(),
            "Rejected credentials: {}",
            e
          );
          let (request, _) = req.into_parts();
          let response = ApiError::from(e).error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      req.extensions_mut().insert(claims);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Token from the Authorization header; the scheme is matched case-insensitively
fn extract_bearer_token(req: &ServiceRequest) -> Result<&str, AuthError> {
  let value = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|h| h.to_str().ok())
    .ok_or(AuthError::MissingCredentials)?;

  let (scheme, token) = value.split_once(' ').ok_or(AuthError::MissingCredentials)?;
  if !scheme.eq_ignore_ascii_case("bearer") {
    return Err(AuthError::InvalidScheme);
  }

  let token = token.trim();
  if token.is_empty() {
    return Err(AuthError::MissingCredentials);
  }
  Ok(token)
}

/// Claims of the caller, available behind `JwtAuthMiddleware`
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthClaims);

impl FromRequest for Authenticated {
  type Error = ApiError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(
      req
        .auth_claims()
        .map(Authenticated)
        .ok_or_else(|| AuthError::MissingCredentials.into()),
    )
  }
}

/// Extension trait to read the verified claims from a request
pub trait AuthClaimsExt {
  /// Returns None when the request did not pass through `JwtAuthMiddleware`
  fn auth_claims(&self) -> Option<AuthClaims>;
}

impl AuthClaimsExt for HttpRequest {
  fn auth_claims(&self) -> Option<AuthClaims> {
    self.extensions().get::<AuthClaims>().cloned()
  }
}
