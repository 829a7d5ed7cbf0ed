//! Set base URI of requests.
use http::{uri, Request};
use tower::{Layer, Service};

/// Layer that applies [`BaseUri`] which makes all requests relative to the URI.
///
/// Path in the base URI is preseved.
#[derive(Debug, Clone)]
pub struct BaseUriLayer {
    uri: http::Uri,
}

impl BaseUriLayer {
    /// Set base URI of requests.
    pub fn new(uri: http::Uri) -> Self {
        Self { uri }
    }
}

impl<S> Layer<S> for BaseUriLayer {
    type Service = BaseUri<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BaseUri {
            uri: self.uri.clone(),
            inner,
        }
    }
}

/// Middleware that sets base URI so that all requests are relative to it.
#[derive(Debug, Clone)]
pub struct BaseUri<S> {
    uri: http::Uri,
    inner: S,
}

impl<S, ReqBody> Service<Request<ReqBody>> for BaseUri<S>
where
    S: Service<Request<ReqBody>>,
{
    type Error = S::Error;
    type Future = S::Future;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let (mut parts, body) = req.into_parts();
        match join(&self.uri, parts.uri.path_and_query()) {
            Ok(joined) => parts.uri = joined,
            Err(err) => tracing::warn!("keeping request uri {}: {}", parts.uri, err),
        }
        self.inner.call(Request::from_parts(parts, body))
    }
}

// Join the base uri with the request path and query.
fn join(base: &http::Uri, req_pandq: Option<&uri::PathAndQuery>) -> Result<http::Uri, http::Error> {
    let mut builder = uri::Builder::new();
    if let Some(scheme) = base.scheme() {
        builder = builder.scheme(scheme.as_str());
    }
    if let Some(authority) = base.authority() {
        builder = builder.authority(authority.as_str());
    }
    let base_path = base.path().trim_end_matches('/');
    builder = match req_pandq {
        Some(pandq) => builder.path_and_query(format!("{base_path}{pandq}")),
        None if base_path.is_empty() => builder.path_and_query("/"),
        None => builder.path_and_query(base_path),
    };
    builder.build()
}
