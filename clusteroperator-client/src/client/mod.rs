//! A basic API client for interacting with the cluster operator API
//!
//! The [`Client`] uses standard error handling and carries the
//! [`ParameterCodec`] used to encode option objects for every request it sends.
//!
//! This client can be used on its own or in conjuction with the [`Api`][crate::api::Api]
//! type for more structured interaction with the API.
use std::sync::Arc;

use futures::{future::BoxFuture, Stream, StreamExt, TryStreamExt};
use http::{self, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::{
    codec::{FramedRead, LinesCodec, LinesCodecError},
    io::StreamReader,
};
use tower::{buffer::Buffer, util::BoxService, BoxError, Layer, Service, ServiceExt};
use tower_http::map_response_body::MapResponseBodyLayer;

use crate::{error::ErrorResponse, Config, Error, Result};
use clusteroperator_core::{ParameterCodec, QueryParameterCodec, WatchEvent};

mod body;
mod builder;
mod config_ext;
pub mod middleware;

pub use body::{Body, BodyDataStream};
pub use builder::{ClientBuilder, DynBody, GenericService};
pub use config_ext::ConfigExt;

/// Client for connecting with the api server.
///
/// The easiest way to instantiate the client is either by
/// inferring the configuration from the environment using
/// [`Client::try_default`] or with an existing [`Config`]
/// using [`Client::try_from`].
#[derive(Clone)]
pub struct Client {
    // - `Buffer` for cheap clone
    // - `BoxFuture` for dynamic response future type
    inner: Buffer<Request<Body>, BoxFuture<'static, Result<Response<Body>, BoxError>>>,
    default_ns: String,
    codec: Arc<dyn ParameterCodec>,
}

impl Client {
    /// Create a [`Client`] using a custom `Service` stack.
    ///
    /// [`ConfigExt`](crate::client::ConfigExt) provides extensions for
    /// building a custom stack.
    ///
    /// To create with the default stack with a [`Config`], use
    /// [`Client::try_from`].
    ///
    /// To create with the default stack with an inferred [`Config`], use
    /// [`Client::try_default`].
    ///
    /// # Example
    ///
    /// ```rust
    /// # async fn doc() -> Result<(), Box<dyn std::error::Error>> {
    /// use clusteroperator_client::{client::{Body, ConfigExt}, Client, Config};
    /// use hyper_util::rt::TokioExecutor;
    /// use tower::{BoxError, ServiceBuilder};
    ///
    /// let config = Config::infer()?;
    /// let service = ServiceBuilder::new()
    ///     .layer(config.base_uri_layer())
    ///     .map_err(BoxError::from)
    ///     .service(hyper_util::client::legacy::Client::builder(TokioExecutor::new()).build_http::<Body>());
    /// let client = Client::new(service, config.default_namespace);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<S, B, T>(service: S, default_namespace: T) -> Self
    where
        S: Service<Request<Body>, Response = Response<B>> + Send + 'static,
        S::Future: Send + 'static,
        S::Error: Into<BoxError>,
        B: http_body::Body<Data = bytes::Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
        T: Into<String>,
    {
        // Transform response body to `crate::client::Body` and use type erased error to avoid type parameters.
        let service = MapResponseBodyLayer::new(Body::wrap_body)
            .layer(service)
            .map_err(|e| e.into());
        Self {
            inner: Buffer::new(BoxService::new(service), 1024),
            default_ns: default_namespace.into(),
            codec: Arc::new(QueryParameterCodec),
        }
    }

    /// Replace the [`ParameterCodec`] used by every [`Api`](crate::Api) built from this client
    pub fn with_parameter_codec(mut self, codec: Arc<dyn ParameterCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Create and initialize a [`Client`] using the inferred configuration.
    ///
    /// Will use [`Config::infer`] which reads the cluster url and namespace
    /// from the environment.
    ///
    /// If you already have a [`Config`] then use [`Client::try_from`](Self::try_from)
    /// instead.
    pub async fn try_default() -> Result<Self> {
        Self::try_from(Config::infer().map_err(Error::InferConfig)?)
    }

    /// The namespace handles created through [`Api::default_namespaced`](crate::Api::default_namespaced) use
    pub fn default_namespace(&self) -> &str {
        &self.default_ns
    }

    /// The codec option objects are encoded with
    pub fn parameter_codec(&self) -> &dyn ParameterCodec {
        self.codec.as_ref()
    }

    /// Perform a raw HTTP request against the API and return the raw response back.
    pub async fn send(&self, request: Request<Body>) -> Result<Response<Body>> {
        let mut svc = self.inner.clone();
        let res = svc
            .ready()
            .await
            .map_err(Error::Service)?
            .call(request)
            .await
            .map_err(|err| {
                // Error decorating request
                err.downcast::<Error>()
                    .map(|e| *e)
                    // Error requesting or from another middleware
                    .unwrap_or_else(Error::Service)
            })?;
        Ok(res)
    }

    /// Perform a raw HTTP request against the API and deserialize the response
    /// as JSON to some known type.
    pub async fn request<T>(&self, request: Request<Vec<u8>>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let text = self.request_text(request).await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!("{}, {:?}", text, e);
            Error::SerdeError(e)
        })
    }

    /// Perform a raw HTTP request against the API and get back the response
    /// as a string
    pub async fn request_text(&self, request: Request<Vec<u8>>) -> Result<String> {
        let res = self.send(request.map(Body::from)).await?;
        let status = res.status();
        let body_bytes = res.into_body().collect_bytes().await?;
        let text = String::from_utf8(body_bytes.to_vec()).map_err(Error::FromUtf8)?;
        handle_api_errors(&text, status)?;

        Ok(text)
    }

    /// Perform a raw request and get back a stream of [`WatchEvent`] objects
    ///
    /// A failing status on the initial response is returned as an error before any event.
    pub async fn request_events<T>(
        &self,
        request: Request<Vec<u8>>,
    ) -> Result<impl Stream<Item = Result<WatchEvent<T>>>>
    where
        T: DeserializeOwned,
    {
        let res = self.send(request.map(Body::from)).await?;
        let status = res.status();
        tracing::trace!("headers: {:?}", res.headers());
        if status.is_client_error() || status.is_server_error() {
            let body_bytes = res.into_body().collect_bytes().await?;
            let text = String::from_utf8(body_bytes.to_vec()).map_err(Error::FromUtf8)?;
            return Err(api_error(&text, status));
        }

        let frames = FramedRead::new(
            StreamReader::new(res.into_body().into_data_stream().map_err(|e| {
                // Client timeout. This will be ignored.
                if is_timeout(&e) {
                    return std::io::Error::new(std::io::ErrorKind::TimedOut, e);
                }
                // Unexpected EOF from chunked decoder.
                // Tends to happen when watching for 300+s. This will be ignored.
                if e.to_string().contains("unexpected EOF during chunk") {
                    return std::io::Error::new(std::io::ErrorKind::UnexpectedEof, e);
                }
                std::io::Error::other(e)
            })),
            LinesCodec::new(),
        );

        Ok(frames.filter_map(|res| async {
            match res {
                Ok(line) => match serde_json::from_str::<WatchEvent<T>>(&line) {
                    Ok(event) => Some(Ok(event)),
                    Err(e) => {
                        // Ignore EOF error that can happen for incomplete line from `decode_eof`.
                        if e.is_eof() {
                            return None;
                        }

                        // Got general error response
                        if let Ok(e_resp) = serde_json::from_str::<ErrorResponse>(&line) {
                            return Some(Err(Error::Api(e_resp)));
                        }
                        // Parsing error
                        tracing::warn!("failed to decode watch event {}: {:?}", line, e);
                        Some(Err(Error::SerdeError(e)))
                    }
                },

                Err(LinesCodecError::Io(e)) => match e.kind() {
                    // Client timeout
                    std::io::ErrorKind::TimedOut => {
                        tracing::warn!("timeout in poll: {}", e); // our client timeout
                        None
                    }
                    // Unexpected EOF from chunked decoder.
                    // Tends to happen after 300+s of watching.
                    std::io::ErrorKind::UnexpectedEof => {
                        tracing::warn!("eof in poll: {}", e);
                        None
                    }
                    _ => Some(Err(Error::ReadEvents(e))),
                },

                // Reached the maximum line length without finding a newline.
                // This should never happen because we're using the default `usize::MAX`.
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    Some(Err(Error::LinesCodecMaxLineLengthExceeded))
                }
            }
        }))
    }
}

fn is_timeout(err: &Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        if let Some(h) = e.downcast_ref::<hyper::Error>() {
            if h.is_timeout() {
                return true;
            }
        }
        source = e.source();
    }
    false
}

/// Api server returned error handling
///
/// Either the server returned an explicit `Status` object,
/// or it somehow returned something we couldn't parse as one.
///
/// In either case, present an ApiError upstream.
/// The latter is probably a bug if encountered.
fn handle_api_errors(text: &str, s: StatusCode) -> Result<()> {
    if s.is_client_error() || s.is_server_error() {
        Err(api_error(text, s))
    } else {
        Ok(())
    }
}

fn api_error(text: &str, s: StatusCode) -> Error {
    if let Ok(errdata) = serde_json::from_str::<ErrorResponse>(text) {
        tracing::debug!("Unsuccessful: {:?}", errdata);
        Error::Api(errdata)
    } else {
        tracing::warn!("Unsuccessful data error parse: {}", text);
        let ae = ErrorResponse {
            status: s.to_string(),
            code: s.as_u16(),
            message: format!("{text:?}"),
            reason: "Failed to parse error data".into(),
            details: None,
        };
        tracing::debug!("Unsuccessful: {:?} (reconstruct)", ae);
        Error::Api(ae)
    }
}

impl TryFrom<Config> for Client {
    type Error = Error;

    /// Builds a default [`Client`] from a [`Config`], see [`ClientBuilder`] if more customization is required
    fn try_from(config: Config) -> Result<Self> {
        Ok(ClientBuilder::try_from(config)?.build())
    }
}

#[cfg(test)]
mod tests {
    use super::{handle_api_errors, Body};
    use crate::{Client, Error};
    use clusteroperator_core::{MachineSet, WatchEvent};

    use futures::{pin_mut, StreamExt};
    use http::{Request, Response, StatusCode};
    use tower_test::mock;

    #[test]
    fn unparsable_error_is_reconstructed() {
        let err = handle_api_errors("upstream connect error", StatusCode::BAD_GATEWAY).unwrap_err();
        match err {
            Error::Api(ae) => {
                assert_eq!(ae.code, 502);
                assert_eq!(ae.reason, "Failed to parse error data");
                assert!(ae.message.contains("upstream connect error"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(handle_api_errors("", StatusCode::OK).is_ok());
    }

    #[tokio::test]
    async fn request_decodes_body() {
        let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
        let spawned = tokio::spawn(async move {
            pin_mut!(handle);
            let (request, send) = handle.next_request().await.expect("service not called");
            assert_eq!(request.method(), http::Method::GET);
            assert_eq!(request.extensions().get::<&'static str>(), Some(&"get"));
            send.send_response(
                Response::builder()
                    .body(Body::from(
                        r#"{"metadata":{"name":"ms-1"},"spec":{"size":1}}"#,
                    ))
                    .unwrap(),
            );
        });

        let client = Client::new(mock_service, "default");
        let mut req = Request::get("/apis/clusteroperator.openshift.io/v1alpha1/namespaces/default/machinesets/ms-1")
            .body(vec![])
            .unwrap();
        req.extensions_mut().insert("get");
        let ms: MachineSet = client.request(req).await.unwrap();
        assert_eq!(ms.metadata.name.as_deref(), Some("ms-1"));
        spawned.await.unwrap();
    }

    #[tokio::test]
    async fn request_surfaces_undecodable_body() {
        let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
        let spawned = tokio::spawn(async move {
            pin_mut!(handle);
            let (_request, send) = handle.next_request().await.expect("service not called");
            send.send_response(Response::builder().body(Body::from("not json")).unwrap());
        });
        let client = Client::new(mock_service, "default");
        let err = client
            .request::<MachineSet>(Request::get("/").body(vec![]).unwrap())
            .await
            .unwrap_err();
        assert!(err.is_decode());
        spawned.await.unwrap();
    }

    #[tokio::test]
    async fn events_are_decoded_line_by_line() {
        let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
        let spawned = tokio::spawn(async move {
            pin_mut!(handle);
            let (_request, send) = handle.next_request().await.expect("service not called");
            let lines = concat!(
                r#"{"type":"ADDED","object":{"metadata":{"name":"ms-1"}}}"#,
                "\n",
                r#"{"type":"ERROR","object":{"status":"Failure","message":"gone","reason":"Expired","code":410}}"#,
                "\n",
                "garbage\n",
            );
            send.send_response(Response::builder().body(Body::from(lines)).unwrap());
        });
        let client = Client::new(mock_service, "default");
        let stream = client
            .request_events::<MachineSet>(Request::get("/").body(vec![]).unwrap())
            .await
            .unwrap();
        pin_mut!(stream);
        assert!(matches!(stream.next().await, Some(Ok(WatchEvent::Added(_)))));
        assert!(matches!(stream.next().await, Some(Ok(WatchEvent::Error(e))) if e.code == 410));
        assert!(matches!(stream.next().await, Some(Err(Error::SerdeError(_)))));
        assert!(stream.next().await.is_none());
        spawned.await.unwrap();
    }

    #[tokio::test]
    async fn events_fail_on_error_status() {
        let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
        let spawned = tokio::spawn(async move {
            pin_mut!(handle);
            let (_request, send) = handle.next_request().await.expect("service not called");
            send.send_response(
                Response::builder()
                    .status(403)
                    .body(Body::from(
                        r#"{"status":"Failure","message":"forbidden","reason":"Forbidden","code":403}"#,
                    ))
                    .unwrap(),
            );
        });
        let client = Client::new(mock_service, "default");
        let res = client
            .request_events::<MachineSet>(Request::get("/").body(vec![]).unwrap())
            .await;
        match res {
            Err(err) => assert_eq!(err.status(), Some(StatusCode::FORBIDDEN)),
            Ok(_) => panic!("expected an error"),
        }
        spawned.await.unwrap();
    }

    #[tokio::test]
    async fn transport_errors_are_classified() {
        let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
        let spawned = tokio::spawn(async move {
            pin_mut!(handle);
            let (_request, send) = handle.next_request().await.expect("service not called");
            send.send_error(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"));
        });
        let client = Client::new(mock_service, "default");
        let err = client.request_text(Request::get("/").body(vec![]).unwrap()).await.unwrap_err();
        assert!(err.is_transport(), "{err:?}");
        spawned.await.unwrap();
    }
}
