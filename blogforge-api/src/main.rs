use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use blogforge_app::domain::{BlockDescriptor, GenerationRequest, GenerationResult, BLOCK_CATALOG};
use blogforge_app::AppContext;
use blogforge_errors::AppError;
use blogforge_ui::pages::GenerateBlogFn;
use blogforge_ui::App;
use leptos::prelude::*;
use leptos_axum::{generate_route_list, handle_server_fns_with_context, LeptosRoutes};
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let conf = get_configuration(Some("Cargo.toml")).expect("Failed to load Leptos config");
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;

    let app_context = match AppContext::from_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let routes = generate_route_list(App);

    server_fn::axum::register_explicit::<GenerateBlogFn>();
    tracing::info!("Registered server function: GenerateBlogFn");

    let app = Router::new()
        .merge(api_router(app_context.clone()))
        .route("/api/{*fn_name}", post({
            let ctx = app_context.clone();
            move |req| {
                let ctx = ctx.clone();
                async move {
                    handle_server_fns_with_context(
                        move || provide_context(ctx.clone()),
                        req
                    ).await
                }
            }
        }))
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let ctx = app_context.clone();
                move || provide_context(ctx.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .layer(CompressionLayer::new())
        .with_state(leptos_options);

    let limits = app_context.rate_limiter.limits();
    tracing::info!("Listening on http://{}", addr);
    tracing::info!(
        "Backend: {}. Rate limit {}/min, {}/hour (X-Forwarded-For trusted: {}). Daily budget: {} requests",
        app_context.generate_blog.backend_name(),
        limits.per_minute,
        limits.per_hour,
        limits.trust_forwarded_for,
        app_context.cost_tracker.get_remaining_requests()
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("Server error");
}

/// JSON endpoints, usable under any outer router state.
fn api_router<S>(ctx: AppContext) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/blocks", get(blocks))
        .route("/health", get(health))
        .with_state(ctx)
}

async fn generate(
    State(ctx): State<AppContext>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, AppError> {
    let Json(request) = payload.map_err(|e| {
        tracing::info!("Rejected malformed generation request: {}", e);
        AppError::Validation(e.body_text())
    })?;

    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok());

    let client_ip = ctx.rate_limiter.client_ip(peer.ip(), forwarded_for);

    ctx.generate(client_ip, request).await.map(Json)
}

async fn blocks() -> Json<&'static [BlockDescriptor]> {
    Json(BLOCK_CATALOG)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn shell(_options: LeptosOptions) -> impl IntoView {
    use leptos::prelude::*;
    use leptos_meta::*;

    let css = r#"
        :root {
            --base: #faf4ed;
            --surface: #fffaf3;
            --overlay: #f2e9e1;
            --muted: #9893a5;
            --subtle: #797593;
            --text: #575279;
            --love: #b4637a;
            --gold: #ea9d34;
            --pine: #286983;
            --foam: #56949f;
            --iris: #907aa9;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: 'Inter', -apple-system, sans-serif;
            background: var(--base);
            color: var(--text);
            min-height: 100vh;
        }
        button { font: inherit; cursor: pointer; }
        button:disabled { opacity: 0.5; cursor: not-allowed; }
        .container { max-width: 1200px; margin: 0 auto; padding: 1.5rem; }
        .hero { text-align: center; padding: 2rem 0 1.5rem; }
        .hero__title { font-size: clamp(2rem, 5vw, 2.75rem); color: var(--pine); font-weight: 800; margin-bottom: 0.5rem; }
        .hero__subtitle { color: var(--subtle); font-size: 1.05rem; max-width: 560px; margin: 0 auto; }
        .home-layout { display: grid; gap: 1.5rem; }
        @media (min-width: 900px) { .home-layout { grid-template-columns: 2fr 3fr; } }
        .home-layout__left, .home-layout__right {
            background: var(--surface); border: 2px solid var(--overlay); border-radius: 12px; padding: 1.25rem;
        }
        .chat__messages { list-style: none; display: flex; flex-direction: column; gap: 0.75rem; margin-bottom: 1rem; max-height: 50vh; overflow-y: auto; }
        .chat__message { padding: 0.75rem 1rem; border-radius: 10px; white-space: pre-wrap; line-height: 1.5; }
        .chat__message--user { background: var(--pine); color: var(--base); align-self: flex-end; }
        .chat__message--assistant { background: var(--overlay); align-self: flex-start; }
        .chat__hint { color: var(--subtle); margin-bottom: 0.75rem; }
        .chat__continue, .chat__generate, .topic-form__button, .links__add, .preview__save, .preview__edit {
            padding: 0.6rem 1.25rem; background: var(--pine); color: var(--base); border: none; border-radius: 8px; font-weight: 600;
        }
        .topic-form { display: flex; flex-direction: column; gap: 0.75rem; }
        .topic-form__input, .links__input, .preview__textarea, .preview__image-url, .preview__title {
            width: 100%; padding: 0.75rem 1rem; border: 2px solid var(--overlay); border-radius: 8px;
            background: var(--base); color: var(--text); font-size: 1rem;
        }
        .topic-form__input { min-height: 6rem; resize: vertical; }
        .topic-form__input:focus, .links__input:focus, .preview__textarea:focus { outline: none; border-color: var(--pine); }
        .blog-types { display: flex; flex-wrap: wrap; gap: 0.5rem; }
        .blog-types__option { padding: 0.5rem 1rem; border: 2px solid var(--overlay); border-radius: 999px; background: var(--base); color: var(--text); }
        .blog-types__option--selected { border-color: var(--pine); color: var(--pine); font-weight: 600; }
        .links { display: flex; flex-direction: column; gap: 0.75rem; margin-bottom: 0.75rem; }
        .links__form { display: flex; gap: 0.5rem; }
        .links__list { list-style: none; }
        .links__item { display: flex; justify-content: space-between; padding: 0.4rem 0; word-break: break-all; }
        .links__remove, .structure__remove, .structure__move { background: none; border: none; color: var(--love); padding: 0 0.4rem; }
        .structure__move { color: var(--subtle); }
        .tabs { display: flex; gap: 0.5rem; margin-bottom: 1rem; border-bottom: 2px solid var(--overlay); }
        .tabs__tab { padding: 0.5rem 1rem; background: none; border: none; color: var(--subtle); border-bottom: 3px solid transparent; }
        .tabs__tab--active { color: var(--pine); border-bottom-color: var(--pine); font-weight: 600; }
        .palette__title { font-size: 1rem; margin-bottom: 0.5rem; color: var(--subtle); }
        .palette__grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(150px, 1fr)); gap: 0.5rem; margin-bottom: 1.25rem; }
        .palette__block { display: flex; gap: 0.5rem; align-items: center; padding: 0.5rem 0.75rem; border: 2px solid var(--overlay); border-radius: 8px; background: var(--base); color: var(--text); text-align: left; }
        .palette__block--amber, .structure__item--amber, .preview__block--amber { border-left: 4px solid var(--gold); }
        .palette__block--sky, .structure__item--sky, .preview__block--sky { border-left: 4px solid var(--foam); }
        .palette__block--fuchsia, .structure__item--fuchsia, .preview__block--fuchsia { border-left: 4px solid var(--iris); }
        .palette__block--orange, .structure__item--orange, .preview__block--orange { border-left: 4px solid var(--love); }
        .structure { list-style: none; display: flex; flex-direction: column; gap: 0.5rem; }
        .structure__item { display: flex; align-items: center; gap: 0.5rem; padding: 0.5rem 0.75rem; background: var(--base); border-radius: 8px; }
        .structure__name { flex: 1; }
        .structure__empty, .preview__empty { color: var(--muted); font-style: italic; }
        .preview__slug, .preview__meta { color: var(--muted); font-size: 0.9rem; margin: 0.5rem 0; }
        .preview__title { font-size: 1.5rem; font-weight: 700; color: var(--pine); }
        .preview__description { margin-bottom: 1rem; }
        .preview__block { padding: 0.75rem 1rem; margin-bottom: 1rem; background: var(--base); border-radius: 8px; }
        .preview__block-header { display: flex; gap: 0.5rem; align-items: center; margin-bottom: 0.5rem; color: var(--subtle); font-size: 0.85rem; }
        .preview__block-type { flex: 1; text-transform: uppercase; letter-spacing: 0.05em; }
        .preview__content { line-height: 1.8; }
        .preview__content p, .preview__content ul, .preview__content blockquote { margin-bottom: 0.75rem; }
        .preview__content li { margin-left: 1.5rem; list-style: disc; }
        .preview__content blockquote { border-left: 3px solid var(--iris); padding-left: 1rem; font-style: italic; }
        .preview__content a { color: var(--pine); }
        .preview__image { max-width: 100%; border-radius: 8px; margin-bottom: 0.5rem; }
        .preview__editor { display: flex; flex-direction: column; gap: 0.5rem; }
        .preview__textarea { min-height: 10rem; font-family: monospace; }
        .loading { display: flex; flex-direction: column; align-items: center; padding: 2rem; }
        .loading__spinner {
            width: 50px; height: 50px; border: 4px solid var(--overlay);
            border-top-color: var(--gold); border-radius: 50%; animation: spin 1s linear infinite;
        }
        @keyframes spin { to { transform: rotate(360deg); } }
        .loading__text { margin-top: 1rem; color: var(--subtle); font-style: italic; }
        .error { background: #fce8ec; border: 2px solid var(--love); border-radius: 8px; padding: 1rem; margin: 1rem 0; }
        .error__title { color: var(--love); font-weight: 700; margin-bottom: 0.5rem; }
        .error__message { color: #8b3d4d; }
        .error__retry { margin-top: 0.75rem; padding: 0.5rem 1rem; background: var(--love); color: var(--base); border: none; border-radius: 4px; }
        .reset-button { margin-top: 1rem; background: none; border: none; color: var(--muted); text-decoration: underline; }
    "#;

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>"Blogforge"</title>
                <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>✍</text></svg>"/>
                <style>{css}</style>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{Request, StatusCode};
    use blogforge_app::config::{Config, RateLimits};
    use tower::ServiceExt;

    const HOOK: &str = r#"{"userMessage":"remote work","selectedBlocks":[{"id":"hook","name":"Hook","prompt":"p"}]}"#;

    fn app_with(config: Config, peer: [u8; 4]) -> Router {
        api_router(AppContext::new(config)).layer(MockConnectInfo(SocketAddr::from((peer, 4000))))
    }

    fn app() -> Router {
        app_with(Config::default(), [192, 0, 2, 10])
    }

    fn generate_request(body: impl Into<Body>, forwarded_for: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header("content-type", "application/json");
        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }
        builder.body(body.into()).unwrap()
    }

    async fn post_generate(body: impl Into<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(generate_request(body, None)).await.unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_topic() {
        let (status, body) = post_generate(
            r#"{"userMessage":"","blogType":"Blog Post","internalLinks":[],"selectedBlocks":[{"id":"hook","name":"Hook","prompt":"p","reusable":false}]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Topic"));
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_structure() {
        let (status, body) = post_generate(
            r#"{"userMessage":"remote work","blogType":"Blog Post","internalLinks":[],"selectedBlocks":[]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_json() {
        let (status, body) = post_generate("{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_generate_offline_returns_draft() {
        let (status, body) = post_generate(
            r#"{"userMessage":"remote work","blogType":"","internalLinks":[],"selectedBlocks":[
                {"id":"hook","name":"Hook","prompt":"Open strong","reusable":false},
                {"id":"image","name":"Image","prompt":"Describe an image","reusable":true},
                {"id":"conclusion","name":"Conclusion","prompt":"Wrap up","reusable":false}
            ]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "How to remote work");
        assert_eq!(body["slug"], "how-to-remote-work");
        let blocks = body["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1]["type"], "image");
        assert!(blocks[1]["imageUrl"].is_string());
        assert!(body["metadata"]["readingTime"].is_number());
    }

    #[tokio::test]
    async fn test_rotating_forwarded_for_does_not_reset_limit() {
        let config = Config {
            rate_limits: RateLimits {
                per_minute: 1,
                ..RateLimits::default()
            },
            ..Config::default()
        };
        let app = app_with(config, [192, 0, 2, 20]);

        let first = app
            .clone()
            .oneshot(generate_request(HOOK, Some("198.51.100.1")))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(generate_request(HOOK, Some("198.51.100.2")))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_distinct_peers_have_separate_limits() {
        let ctx = AppContext::new(Config {
            rate_limits: RateLimits {
                per_minute: 1,
                ..RateLimits::default()
            },
            ..Config::default()
        });

        for peer in [[192, 0, 2, 30], [192, 0, 2, 31]] {
            let response = api_router::<()>(ctx.clone())
                .layer(MockConnectInfo(SocketAddr::from((peer, 4000))))
                .oneshot(generate_request(HOOK, None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_blocks_lists_catalog() {
        let response = app()
            .oneshot(Request::get("/api/blocks").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let blocks: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(blocks.len(), BLOCK_CATALOG.len());
        assert_eq!(blocks[0]["id"], "hook");
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
