//! Request builder type for arbitrary api types
use crate::{codec::ParameterCodec, params::PatchType, Error, Result};
use http::{header, Method};
use serde::Serialize;

const JSON_MIME: &str = "application/json";

/// A single-use request builder
///
/// Assembles a request one step at a time, in api convention order:
/// verb, namespace, resource collection, optional instance name and subresources,
/// then either query parameters or a body. [`Request::build`] consumes the builder,
/// so an assembled request is handed to the transport at most once.
///
/// The first invalid step is recorded and every later step becomes a no-op;
/// the recorded error is returned from `build`.
///
/// ```
/// use clusteroperator_core::{params::GetOptions, QueryParameterCodec, Request};
/// let req = Request::get("/apis/clusteroperator.openshift.io/v1alpha1")
///     .namespace("ns")
///     .resource("machinesets")
///     .name("ms-1")
///     .params(&GetOptions::default(), &QueryParameterCodec)
///     .build()
///     .unwrap();
/// assert_eq!(
///     req.uri(),
///     "/apis/clusteroperator.openshift.io/v1alpha1/namespaces/ns/machinesets/ms-1"
/// );
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    api_root: String,
    patch_type: Option<PatchType>,
    namespace: Option<String>,
    resource: Option<String>,
    name: Option<String>,
    subresources: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    err: Option<Error>,
}

impl Request {
    /// New request for a verb against an api root such as `/apis/{group}/{version}`
    pub fn new<S: Into<String>>(method: Method, api_root: S) -> Self {
        let mut api_root = api_root.into();
        while api_root.ends_with('/') {
            api_root.pop();
        }
        Self {
            method,
            api_root,
            patch_type: None,
            namespace: None,
            resource: None,
            name: None,
            subresources: vec![],
            query: vec![],
            body: None,
            err: None,
        }
    }

    /// A GET request
    pub fn get<S: Into<String>>(api_root: S) -> Self {
        Self::new(Method::GET, api_root)
    }

    /// A POST request
    pub fn post<S: Into<String>>(api_root: S) -> Self {
        Self::new(Method::POST, api_root)
    }

    /// A PUT request
    pub fn put<S: Into<String>>(api_root: S) -> Self {
        Self::new(Method::PUT, api_root)
    }

    /// A DELETE request
    pub fn delete<S: Into<String>>(api_root: S) -> Self {
        Self::new(Method::DELETE, api_root)
    }

    /// A PATCH request whose body is interpreted according to `patch_type`
    pub fn patch<S: Into<String>>(api_root: S, patch_type: PatchType) -> Self {
        let mut req = Self::new(Method::PATCH, api_root);
        req.patch_type = Some(patch_type);
        req
    }

    /// Scope the request to a namespace
    pub fn namespace(mut self, namespace: &str) -> Self {
        if self.err.is_none() {
            match validate_segment("namespace", namespace) {
                Ok(()) if self.namespace.is_some() => {
                    self.err = Some(Error::Validation("namespace already set".into()));
                }
                Ok(()) => self.namespace = Some(namespace.to_string()),
                Err(e) => self.err = Some(e),
            }
        }
        self
    }

    /// Select the resource collection by its plural name
    pub fn resource(mut self, resource: &str) -> Self {
        if self.err.is_none() {
            match validate_segment("resource", resource) {
                Ok(()) if self.resource.is_some() => {
                    self.err = Some(Error::Validation("resource already set".into()));
                }
                Ok(()) => self.resource = Some(resource.to_string()),
                Err(e) => self.err = Some(e),
            }
        }
        self
    }

    /// Select a single instance of the collection
    pub fn name(mut self, name: &str) -> Self {
        if self.err.is_none() {
            match validate_segment("name", name) {
                Ok(()) if self.name.is_some() => {
                    self.err = Some(Error::Validation("name already set".into()));
                }
                Ok(()) => self.name = Some(name.to_string()),
                Err(e) => self.err = Some(e),
            }
        }
        self
    }

    /// Append subresource segments after the instance name, in order
    pub fn subresource<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for seg in segments {
            if self.err.is_some() {
                break;
            }
            let seg = seg.as_ref();
            match validate_segment("subresource", seg) {
                Ok(()) => self.subresources.push(seg.to_string()),
                Err(e) => self.err = Some(e),
            }
        }
        self
    }

    /// Attach an options object as query parameters, encoded through `codec`
    pub fn params<P: Serialize + ?Sized>(mut self, params: &P, codec: &dyn ParameterCodec) -> Self {
        if self.err.is_none() {
            match crate::codec::encode(codec, params) {
                Ok(pairs) => self.query.extend(pairs),
                Err(e) => self.err = Some(e),
            }
        }
        self
    }

    /// Attach a pre-encoded body
    pub fn body(mut self, body: Vec<u8>) -> Self {
        if self.err.is_none() {
            self.body = Some(body);
        }
        self
    }

    /// Attach a body by serializing `data` as json
    pub fn json_body<T: Serialize + ?Sized>(mut self, data: &T) -> Self {
        if self.err.is_none() {
            match serde_json::to_vec(data) {
                Ok(body) => self.body = Some(body),
                Err(e) => self.err = Some(Error::SerdeJson(e)),
            }
        }
        self
    }

    /// The path and query the request will target
    pub fn url(&self) -> String {
        let mut url = self.api_root.clone();
        if let Some(ns) = &self.namespace {
            url.push_str("/namespaces/");
            url.push_str(ns);
        }
        for seg in self
            .resource
            .iter()
            .chain(self.name.iter())
            .chain(self.subresources.iter())
        {
            url.push('/');
            url.push_str(seg);
        }
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Consume the builder into an http request
    pub fn build(mut self) -> Result<http::Request<Vec<u8>>> {
        if let Some(err) = self.err.take() {
            return Err(err);
        }
        if self.resource.is_none() {
            return Err(Error::Validation("resource must be set".into()));
        }
        let mut req = http::Request::builder()
            .method(self.method.clone())
            .uri(self.url())
            .header(header::ACCEPT, JSON_MIME);
        if self.body.is_some() {
            let content_type = self.patch_type.map_or(JSON_MIME, |pt| pt.content_type());
            req = req.header(header::CONTENT_TYPE, content_type);
        }
        req.body(self.body.unwrap_or_default()).map_err(Error::Http)
    }
}

fn validate_segment(what: &str, segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::Validation(format!("{what} may not be empty")));
    }
    if segment == "." || segment == ".." {
        return Err(Error::Validation(format!("{what} may not be '{segment}'")));
    }
    // segments are copied into the path verbatim
    if let Some(c) = segment
        .chars()
        .find(|c| matches!(c, '/' | '%' | '?' | '#') || c.is_whitespace() || c.is_control())
    {
        return Err(Error::Validation(format!("{what} {segment:?} may not contain {c:?}")));
    }
    Ok(())
}
