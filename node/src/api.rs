//! Liveness endpoint.
//!
//! One unauthenticated route, `GET /api`, answering a fixed JSON greeting.
//! A probe only: it never reflects relay health and carries no state.

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use std::net::SocketAddr;

const GREETING: &str = r#"{"message":"An API for use with your Dapp!"}"#;

/// Serves the endpoint until the server fails or the task is dropped.
pub async fn serve(addr: SocketAddr) -> anyhow::Result<()> {
    let make_svc =
        make_service_fn(|_conn| async { Ok::<_, hyper::Error>(service_fn(handle_request)) });
    Server::bind(&addr).serve(make_svc).await?;
    Ok(())
}

async fn handle_request(req: Request<Body>) -> Result<Response<Body>, hyper::Error> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/api") => {
            let response = Response::builder()
                .header("content-type", "application/json")
                .body(Body::from(GREETING))
                .unwrap_or_else(|_| Response::new(Body::from(GREETING)));
            Ok(response)
        }
        _ => {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::NOT_FOUND;
            Ok(response)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn greeting_body_is_fixed_json() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/api")
            .body(Body::empty())
            .unwrap();

        let resp = handle_request(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "An API for use with your Dapp!");
    }

    #[tokio::test]
    async fn other_routes_are_not_found() {
        for (method, path) in [
            (Method::GET, "/"),
            (Method::GET, "/api/oracles"),
            (Method::POST, "/api"),
        ] {
            let req = Request::builder()
                .method(method)
                .uri(path)
                .body(Body::empty())
                .unwrap();
            let resp = handle_request(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
    }
}
