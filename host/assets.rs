use crate::*;

/// Styles plus the wasm content loader emitted into `assets/` by the build
#[derive(rust_embed::RustEmbed)]
#[folder = "assets"]
struct Assets;

pub async fn static_handler(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');
    let mut response = Response::builder();
    match Assets::get(path) {
        Some(content) => {
            let etag = hex::encode(content.metadata.sha256_hash());
            if let Some(mime) = mime_guess::from_path(path).first() {
                response = response.header(header::CONTENT_TYPE, mime.as_ref());
            }
            response
                .header(header::ETAG, etag)
                .body(Body::from(content.data))
                .unwrap()
        }
        None => response
            .status(StatusCode::NOT_FOUND)
            .body(Body::empty())
            .unwrap(),
    }
}
