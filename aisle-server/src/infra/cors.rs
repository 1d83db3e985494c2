use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use aisle_config::CorsConfig;
use axum::body::Body;
use axum::http::header::ACCESS_CONTROL_REQUEST_METHOD;
use axum::http::{HeaderName, HeaderValue, Method, Request, Response};
use tower::{Layer, Service};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Cors, CorsLayer};

use crate::hateoas::X_PAGINATION;

/// Permissive in dev mode, allow-list otherwise. Entries were validated when
/// the configuration loaded; anything unparsable is skipped.
pub fn cors_layer(cors: &CorsConfig, dev_mode: bool) -> PreflightCorsLayer {
    PreflightCorsLayer::new(build_cors(cors, dev_mode))
}

fn build_cors(cors: &CorsConfig, dev_mode: bool) -> CorsLayer {
    if dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();

    let headers: Vec<HeaderName> = cors
        .allowed_headers
        .iter()
        .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers))
        .expose_headers([HeaderName::from_static(X_PAGINATION)])
}

/// Wraps a [`CorsLayer`] so that only real preflights (`OPTIONS` carrying
/// `Access-Control-Request-Method`) are answered by CORS. A plain `OPTIONS`
/// falls through to the route, which advertises its `Allow` header.
#[derive(Clone, Debug)]
pub struct PreflightCorsLayer {
    cors: CorsLayer,
}

impl PreflightCorsLayer {
    pub fn new(cors: CorsLayer) -> Self {
        Self { cors }
    }
}

impl<S: Clone> Layer<S> for PreflightCorsLayer {
    type Service = PreflightCors<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PreflightCors {
            cors: self.cors.layer(inner.clone()),
            inner,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PreflightCors<S> {
    cors: Cors<S>,
    inner: S,
}

fn is_plain_options<B>(req: &Request<B>) -> bool {
    req.method() == Method::OPTIONS && !req.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

impl<S> Service<Request<Body>> for PreflightCors<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        if is_plain_options(&req) {
            let mut inner = self.inner.clone();
            Box::pin(async move { inner.call(req).await })
        } else {
            let mut cors = self.cors.clone();
            Box::pin(async move { cors.call(req).await })
        }
    }
}
