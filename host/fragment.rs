use crate::*;
use axum::body::to_bytes;
use std::task::{Context, Poll};

pub type FragmentWrapper = fn(Markup) -> Markup;

/// Layer that serves page handlers both ways: requests marked as fragment
/// requests (`X-Requested-With: XMLHttpRequest` from the modal loader, or
/// `HX-Request`) receive the handler's markup as-is, plain navigation gets it
/// wrapped into the full page layout.
#[derive(Clone)]
pub struct Fragmentify {
    pub wrapper: FragmentWrapper,
}

impl Fragmentify {
    pub fn wrap(wrapper: FragmentWrapper) -> Self {
        Self { wrapper }
    }
}

impl<S> Layer<S> for Fragmentify {
    type Service = FragmentMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FragmentMiddleware {
            wrapper: self.wrapper,
            inner,
        }
    }
}

#[derive(Clone)]
pub struct FragmentMiddleware<S> {
    wrapper: FragmentWrapper,
    inner: S,
}

/// Requests marked by the content loader or htmx expect a bare fragment back
pub fn is_fragment_request(headers: &HeaderMap) -> bool {
    headers
        .get(XHR_HEADER.0)
        .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(XHR_HEADER.1.as_bytes()))
        || headers.contains_key("hx-request")
}

impl<S> Service<Request<Body>> for FragmentMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let bare_fragment = is_fragment_request(request.headers());
        let future = self.inner.call(request);
        let wrapper = self.wrapper;
        Box::pin(async move {
            let response: Response = future.await?;
            // redirects and error pages pass through as the handler shaped them
            if bare_fragment || !response.status().is_success() {
                return Ok(response);
            }
            let (mut parts, body) = response.into_parts();
            let bytes = match to_bytes(body, usize::MAX).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    error!("failed to buffer a fragment response: {e}");
                    return Ok((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        crate::html::internal_error_page(),
                    )
                        .into_response());
                }
            };
            let content = match String::from_utf8(bytes.to_vec()) {
                Ok(content) => content,
                // non-HTML bodies are left alone
                Err(e) => {
                    return Ok(Response::from_parts(parts, Body::from(e.into_bytes())));
                }
            };
            let content = wrapper(PreEscaped(content));
            parts.headers.remove(header::CONTENT_LENGTH);
            parts.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            Ok(Response::from_parts(parts, Body::from(content.0)))
        })
    }
}
