use std::time::Duration;

use actix_web::dev::ServiceRequest;
use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::core::Collector;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, TextEncoder};

/// Route label for requests that matched no resource, so path scans do not
/// create a series per URL.
pub const UNMATCHED_ROUTE: &str = "unmatched";

fn register<C: Collector + Clone + 'static>(collector: C) -> C {
    prometheus::default_registry()
        .register(Box::new(collector.clone()))
        .expect("failed to register book-recommender metric");
    collector
}

static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register(
        IntCounterVec::new(
            Opts::new(
                "book_recommender_http_requests_total",
                "HTTP requests by route pattern and status",
            ),
            &["method", "route", "status"],
        )
        .expect("valid http request counter"),
    )
});

static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register(
        HistogramVec::new(
            HistogramOpts::new(
                "book_recommender_http_request_duration_seconds",
                "HTTP request latency by route pattern",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            &["method", "route", "status"],
        )
        .expect("valid http latency histogram"),
    )
});

static LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register(
        IntCounterVec::new(
            Opts::new(
                "book_recommender_lookups_total",
                "Recommendation lookups by outcome",
            ),
            &["outcome"],
        )
        .expect("valid lookup counter"),
    )
});

// one lookup is a single scan over the ratings matrix
static LOOKUP_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register(
        HistogramVec::new(
            HistogramOpts::new(
                "book_recommender_lookup_duration_seconds",
                "Time to resolve a title into recommendations, by outcome",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
            &["outcome"],
        )
        .expect("valid lookup latency histogram"),
    )
});

/// Matched route pattern (`/books/{index}`), or [`UNMATCHED_ROUTE`].
pub fn route_label(req: &ServiceRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

pub fn observe_http_request(method: &str, route: &str, status: u16, elapsed: Duration) {
    let status = status.to_string();
    let labels = [method, route, status.as_str()];
    HTTP_REQUESTS_TOTAL.with_label_values(&labels).inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&labels)
        .observe(elapsed.as_secs_f64());
}

/// Outcomes: found, empty, title_not_found, isbn_not_in_ratings,
/// insufficient_data, index_error, unavailable
pub fn record_lookup(outcome: &str) {
    LOOKUPS_TOTAL.with_label_values(&[outcome]).inc();
}

/// [`record_lookup`] plus the time the lookup took.
pub fn observe_lookup(outcome: &str, elapsed: Duration) {
    record_lookup(outcome);
    LOOKUP_DURATION_SECONDS
        .with_label_values(&[outcome])
        .observe(elapsed.as_secs_f64());
}

pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&prometheus::gather(), &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::dev::Service;
    use actix_web::http::header::{HeaderName, HeaderValue};
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn test_route_label_uses_pattern_or_unmatched() {
        let app = test::init_service(
            App::new()
                .wrap_fn(|req, srv| {
                    let route = route_label(&req);
                    let fut = srv.call(req);
                    async move {
                        let mut res = fut.await?;
                        res.headers_mut().insert(
                            HeaderName::from_static("x-route"),
                            HeaderValue::from_str(&route).unwrap(),
                        );
                        Ok::<_, actix_web::Error>(res)
                    }
                })
                .route(
                    "/books/{index}",
                    web::get().to(|| async { HttpResponse::Ok().finish() }),
                ),
        )
        .await;

        let req = test::TestRequest::get().uri("/books/3").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.headers().get("x-route").unwrap(), "/books/{index}");

        let req = test::TestRequest::get().uri("/wp-login.php").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 404);
        assert_eq!(res.headers().get("x-route").unwrap(), UNMATCHED_ROUTE);
    }

    #[actix_web::test]
    async fn test_lookup_metrics_are_exported() {
        observe_lookup("found", Duration::from_micros(250));
        record_lookup("unavailable");

        let body = to_bytes(serve_metrics().await.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains(r#"book_recommender_lookups_total{outcome="found"}"#));
        assert!(text.contains(r#"book_recommender_lookups_total{outcome="unavailable"}"#));
        assert!(text.contains(
            r#"book_recommender_lookup_duration_seconds_count{outcome="found"}"#
        ));
        // offline lookups never reach the index, so they carry no latency
        assert!(!text.contains(
            r#"book_recommender_lookup_duration_seconds_count{outcome="unavailable"}"#
        ));
    }
}
