//! Integration tests for the OpenWeather provider and the full search cycle
//! against a mock HTTP server.

use chrono::FixedOffset;
use weatherapp_core::{
    AppContext, CityQuery, HtmlBuffer, OpenWeatherProvider, Presenter, SearchController,
    SearchError, SearchOutcome, SearchPhase, UiState, WeatherProvider,
    presenter::DEFAULT_ICON_BASE_URL, provider::ProviderError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const API_KEY: &str = "test-key";

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.3488, "lat": 48.8534 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 18.6, "feels_like": 17.9, "humidity": 52 },
        "dt": 1714564800,
        "name": "Paris",
        "cod": 200
    })
}

/// Forty 3-hourly entries from 2024-05-01 00:00, five of them at noon.
fn forecast_body() -> serde_json::Value {
    let base = 1_714_521_600_i64;
    let list: Vec<_> = (0..40)
        .map(|i| {
            let hours = i * 3;
            let temp = 10.0 + i as f64 * 0.25;
            let dt_txt = format!("2024-05-{:02} {:02}:00:00", 1 + hours / 24, hours % 24);
            serde_json::json!({
                "dt": base + hours * 3600,
                "main": { "temp": temp },
                "weather": [{ "description": "scattered clouds", "icon": "03d" }],
                "dt_txt": dt_txt,
            })
        })
        .collect();

    serde_json::json!({ "cod": "200", "cnt": 40, "list": list })
}

fn not_found_body() -> serde_json::Value {
    serde_json::json!({ "cod": "404", "message": "city not found" })
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new(API_KEY.to_string()).with_endpoints(
        format!("{}/data/2.5/weather", server.uri()),
        format!("{}/data/2.5/forecast", server.uri()),
    )
}

fn controller_with(provider: OpenWeatherProvider) -> SearchController {
    let presenter =
        Presenter::new(DEFAULT_ICON_BASE_URL, FixedOffset::east_opt(0).unwrap()).unwrap();
    SearchController::new(Box::new(provider), presenter)
}

/// Address of a local port nothing is listening on.
fn closed_port() -> std::net::SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn mount_current(server: &MockServer, city: &str) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", city))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, city: &str) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", city))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(server)
        .await;
}

mod provider_tests {
    use super::*;

    #[tokio::test]
    async fn current_sends_city_key_and_metric_units() {
        let server = MockServer::start().await;
        mount_current(&server, "Paris").await;

        let city = CityQuery::parse("Paris").unwrap();
        let current = provider_for(&server).current(&city).await.unwrap();

        assert_eq!(current.city_name, "Paris");
        assert_eq!(current.temperature_c, 18.6);
        assert_eq!(current.description, "clear sky");
        assert_eq!(current.icon_id, "01d");
    }

    #[tokio::test]
    async fn forecast_returns_full_series() {
        let server = MockServer::start().await;
        mount_forecast(&server, "Paris").await;

        let city = CityQuery::parse("Paris").unwrap();
        let series = provider_for(&server).forecast(&city).await.unwrap();

        assert_eq!(series.len(), 40);
        assert_eq!(series[4].local_date_time_text, "2024-05-01 12:00:00");
    }

    #[tokio::test]
    async fn city_with_spaces_is_sent_verbatim() {
        let server = MockServer::start().await;
        mount_current(&server, "New York").await;

        let city = CityQuery::parse(" New York ").unwrap();
        assert!(provider_for(&server).current(&city).await.is_ok());
    }

    #[tokio::test]
    async fn status_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
            .mount(&server)
            .await;

        let city = CityQuery::parse("Zzzonk").unwrap();
        let err = provider_for(&server).current(&city).await.unwrap_err();

        assert!(matches!(err, ProviderError::NotFound));
    }

    #[tokio::test]
    async fn server_error_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let city = CityQuery::parse("Paris").unwrap();
        let err = provider_for(&server).forecast(&city).await.unwrap_err();

        match err {
            ProviderError::Status { status, body } => {
                assert_eq!(status.as_u16(), 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_error_does_not_expose_api_key() {
        let addr = closed_port();
        let provider = OpenWeatherProvider::new("SECRET-KEY-123".to_string()).with_endpoints(
            format!("http://{addr}/data/2.5/weather"),
            format!("http://{addr}/data/2.5/forecast"),
        );

        let city = CityQuery::parse("Paris").unwrap();
        let err = provider.current(&city).await.unwrap_err();

        assert!(matches!(err, ProviderError::Transport(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"), "{err}");
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));

        let controller = controller_with(provider);
        let mut ctx = AppContext::new(HtmlBuffer::new());
        match controller.submit_search(&mut ctx, "Paris").await {
            SearchOutcome::Failure(SearchError::Transport(detail)) => {
                assert!(!detail.contains("SECRET-KEY-123"), "{detail}");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(!ctx.surface.content().contains("SECRET-KEY-123"));
    }

    #[tokio::test]
    async fn unexpected_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let city = CityQuery::parse("Paris").unwrap();
        let err = provider_for(&server).current(&city).await.unwrap_err();

        assert!(matches!(err, ProviderError::Decode(_)));
    }
}

mod search_cycle_tests {
    use super::*;

    #[tokio::test]
    async fn paris_end_to_end() {
        let server = MockServer::start().await;
        mount_current(&server, "Paris").await;
        mount_forecast(&server, "Paris").await;

        let controller = controller_with(provider_for(&server));
        let mut ctx = AppContext::new(HtmlBuffer::new());

        let outcome = controller.submit_search(&mut ctx, "Paris").await;

        assert_eq!(outcome, SearchOutcome::Success);
        let html = ctx.surface.content();
        assert!(html.contains(r#"<div class="temperature">19°C</div>"#));
        assert_eq!(html.matches(r#"class="forecast-card""#).count(), 5);
        assert!(html.contains(r#"src="https://openweathermap.org/img/wn/03d@2x.png""#));
        // 2024-05-01 was a Wednesday.
        assert!(html.contains(r#"<div class="forecast-day">Wed</div>"#));
        assert_eq!(ctx.phase, SearchPhase::Idle);
        assert!(ctx.trigger.enabled);
    }

    #[tokio::test]
    async fn unknown_city_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
            .mount(&server)
            .await;

        let controller = controller_with(provider_for(&server));
        let mut ctx = AppContext::new(HtmlBuffer::new());

        let outcome = controller.submit_search(&mut ctx, "Zzzonk").await;

        let expected = SearchError::NotFound {
            city: "Zzzonk".into(),
        };
        assert_eq!(outcome, SearchOutcome::Failure(expected.clone()));
        assert_eq!(ctx.view, UiState::Error(expected));
        assert!(ctx.surface.content().contains("<strong>Zzzonk</strong>"));
        assert!(ctx.surface.content().contains("not found"));
        assert!(ctx.trigger.enabled);
    }

    #[tokio::test]
    async fn forecast_404_alone_is_not_found() {
        let server = MockServer::start().await;
        // No call-count expectation here: the forecast failure may cancel
        // this request before it is sent.
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
            .expect(1)
            .mount(&server)
            .await;

        let controller = controller_with(provider_for(&server));
        let mut ctx = AppContext::new(HtmlBuffer::new());

        let outcome = controller.submit_search(&mut ctx, "Atlantis").await;

        let expected = SearchError::NotFound {
            city: "Atlantis".into(),
        };
        assert_eq!(outcome, SearchOutcome::Failure(expected.clone()));
        assert_eq!(ctx.view, UiState::Error(expected));
        assert!(ctx.surface.content().contains("<strong>Atlantis</strong>"));
        assert!(!ctx.surface.content().contains("weather-info"));
        assert!(ctx.trigger.enabled);
        assert_eq!(ctx.phase, SearchPhase::Idle);
    }

    #[tokio::test]
    async fn unreachable_host_end_to_end() {
        let addr = closed_port();
        let provider = OpenWeatherProvider::new(API_KEY.to_string()).with_endpoints(
            format!("http://{addr}/data/2.5/weather"),
            format!("http://{addr}/data/2.5/forecast"),
        );

        let controller = controller_with(provider);
        let mut ctx = AppContext::new(HtmlBuffer::new());

        let outcome = controller.submit_search(&mut ctx, "Paris").await;

        assert!(matches!(
            outcome,
            SearchOutcome::Failure(SearchError::Transport(_))
        ));
        assert!(
            ctx.surface
                .content()
                .contains("Something went wrong. Please try again later.")
        );
        assert!(ctx.trigger.enabled);
        assert_eq!(ctx.trigger.label, "Search");
    }

    #[tokio::test]
    async fn validation_failure_sends_no_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let controller = controller_with(provider_for(&server));
        let mut ctx = AppContext::new(HtmlBuffer::new());

        for raw in ["", "   ", "a"] {
            let outcome = controller.submit_search(&mut ctx, raw).await;
            assert!(matches!(
                outcome,
                SearchOutcome::Failure(SearchError::Validation(_))
            ));
        }
    }
}
