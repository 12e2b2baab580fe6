use actix_web::{
  Error,
  body::MessageBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header::{HeaderName, HeaderValue},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
};

const SECURITY_HEADERS: [(&str, &str); 3] = [
  ("x-content-type-options", "nosniff"),
  ("x-xss-protection", "1; mode=block"),
  ("content-security-policy", "default-src 'self'"),
];

/// Middleware that adds hardening headers to every response
///
/// - `X-Content-Type-Options: nosniff`
/// - `X-XSS-Protection: 1; mode=block`
/// - `Content-Security-Policy: default-src 'self'`
///
/// Headers already set by a handler are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SecurityHeadersMiddleware;

impl SecurityHeadersMiddleware {
  pub fn new() -> Self {
    Self
  }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeadersMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = SecurityHeadersMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(SecurityHeadersMiddlewareService {
      service: Rc::new(service),
    }))
  }
}

pub struct SecurityHeadersMiddlewareService<S> {
  service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);

    Box::pin(async move {
      let mut res = service.call(req).await?;

      let headers = res.headers_mut();
      for (name, value) in SECURITY_HEADERS {
        let name = HeaderName::from_static(name);
        if !headers.contains_key(&name) {
          headers.insert(name, HeaderValue::from_static(value));
        }
      }

      Ok(res)
    })
  }
}
