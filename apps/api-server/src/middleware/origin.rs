//! Cross-origin allow-list middleware.
//!
//! Requests without an `Origin` header pass untouched. Requests from an allowed
//! origin pass and get CORS response headers; their preflights are answered
//! here. Anything else is rejected before it reaches a handler.

use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::{
        Method,
        header::{self, HeaderValue},
    },
};
use std::collections::HashSet;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use crate::middleware::error::AppError;
use crate::observability::RequestId;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const DEFAULT_ALLOWED_HEADERS: &str = "Content-Type, X-Request-ID";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Origin allow-list middleware factory.
#[derive(Clone)]
pub struct OriginGuard {
    allowed: Arc<HashSet<String>>,
}

impl OriginGuard {
    pub fn new<I>(origins: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            allowed: Arc::new(origins.into_iter().collect()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for OriginGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = OriginGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OriginGuardService {
            service,
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct OriginGuardService<S> {
    service: S,
    allowed: Arc<HashSet<String>>,
}

impl<S, B> Service<ServiceRequest> for OriginGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(origin) = req.headers().get(header::ORIGIN).cloned() else {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        };

        let origin_text = origin.to_str().unwrap_or_default().to_string();
        if !self.allowed.contains(&origin_text) {
            tracing::warn!(origin = %origin_text, path = %req.path(), "Origin rejected");

            let mut problem = AppError::OriginRejected(origin_text).to_problem();
            problem = problem.with_instance(req.path());
            if let Some(request_id) = req.extensions().get::<RequestId>() {
                problem = problem.with_request_id(request_id.as_str());
            }
            let response = HttpResponse::BadRequest().json(problem);

            let (http_req, _payload) = req.into_parts();
            let srv_response = ServiceResponse::new(http_req, response);
            return Box::pin(async move { Ok(srv_response.map_into_right_body()) });
        }

        let is_preflight = req.method() == Method::OPTIONS
            && req.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);
        if is_preflight {
            let allowed_headers = req
                .headers()
                .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOWED_HEADERS));
            let response = HttpResponse::NoContent()
                .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, origin))
                .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
                .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers))
                .insert_header((header::ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE))
                .insert_header((header::VARY, "Origin"))
                .finish();

            let (http_req, _payload) = req.into_parts();
            let srv_response = ServiceResponse::new(http_req, response);
            return Box::pin(async move { Ok(srv_response.map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            let headers = res.headers_mut();
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            headers.insert(header::VARY, HeaderValue::from_static("Origin"));
            Ok(res.map_into_left_body())
        })
    }
}
