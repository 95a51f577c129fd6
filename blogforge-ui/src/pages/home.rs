use crate::components::{
    BlockPalette, BlogPreview, ChatPanel, ErrorDisplay, StructureList,
};
use crate::storage::{self, BrowserStore};
use blogforge_app::domain::{
    reduce, GenerationRequest, GenerationResult, SessionAction, SessionContainer, SessionState,
    Step,
};
use blogforge_errors::AppError;
use leptos::prelude::*;
use server_fn::codec::Json;
use server_fn::ServerFnError;

#[server(GenerateBlogFn, "/api", endpoint = "generate_blog", input = Json)]
pub async fn generate_blog(request: GenerationRequest) -> Result<GenerationResult, ServerFnError> {
    use axum::extract::ConnectInfo;
    use axum::http::HeaderMap;
    use blogforge_app::AppContext;
    use std::net::SocketAddr;

    tracing::debug!(
        "generate_blog: {} blocks, {} links",
        request.selected_structure.len(),
        request.internal_links.len()
    );

    let ctx = expect_context::<AppContext>();
    let ConnectInfo(peer): ConnectInfo<SocketAddr> = leptos_axum::extract().await?;
    let headers: HeaderMap = leptos_axum::extract().await?;
    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok());
    let client_ip = ctx.rate_limiter.client_ip(peer.ip(), forwarded_for);

    ctx.generate(client_ip, request)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

/// User-facing text for a failed server call.
fn describe(error: &ServerFnError) -> String {
    match error {
        ServerFnError::ServerError(raw) => match raw.parse::<AppError>() {
            Ok(app_error) => app_error.user_message().to_string(),
            Err(never) => match never {},
        },
        other => {
            leptos::logging::warn!("generate_blog transport error: {}", other);
            "Could not reach the server. Check your connection and try again.".to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Structure,
    Preview,
}

#[component]
pub fn HomePage() -> impl IntoView {
    let session = RwSignal::new(SessionState::default());
    let notice = RwSignal::new(None::<String>);
    let pane = RwSignal::new(Pane::Structure);

    // Filled in once hydrated; the store is browser-only.
    let container = StoredValue::new_local(None::<SessionContainer<BrowserStore>>);

    let dispatch = Callback::new(move |action: SessionAction| {
        let outcome = container.try_update_value(|slot| match slot {
            Some(container) => {
                let error = container.dispatch(action).err();
                (container.state().clone(), error)
            }
            None => match session.with_untracked(|state| reduce(state, action)) {
                Ok(next) => (next, None),
                Err(e) => (session.get_untracked(), Some(e)),
            },
        });
        let Some((next, error)) = outcome else {
            return;
        };
        notice.set(error.map(|e| e.to_string()));
        if session.with_untracked(|current| current != &next) {
            session.set(next);
        }
    });

    Effect::new(move |_| {
        let resumed = storage::resume(BrowserStore::open());
        let state = resumed.state().clone();
        container.set_value(Some(resumed));
        if state.current_step == Step::Preview {
            pane.set(Pane::Preview);
        }
        session.set(state);
    });

    let generate = ServerAction::<GenerateBlogFn>::new();
    let pending = generate.pending();

    Effect::new(move |_| {
        let Some(outcome) = generate.value().get() else {
            return;
        };
        if !session.with_untracked(SessionState::is_generating) {
            return;
        }
        match outcome {
            Ok(result) => {
                dispatch.run(SessionAction::GenerationSucceeded(result));
                pane.set(Pane::Preview);
            }
            Err(e) => dispatch.run(SessionAction::GenerationFailed(describe(&e))),
        }
    });

    let on_generate = Callback::new(move |_: ()| {
        if pending.get_untracked() {
            return;
        }
        dispatch.run(SessionAction::StartGeneration);
        if let Some(request) =
            session.with_untracked(|s| s.is_generating().then(|| s.generation_request()))
        {
            generate.dispatch(GenerateBlogFn { request });
        }
    });

    let on_reset = move |_: leptos::ev::MouseEvent| {
        container.update_value(|slot| {
            if let Some(container) = slot {
                if let Err(e) = container.clear() {
                    leptos::logging::warn!("Could not clear session: {}", e);
                }
            }
        });
        notice.set(None);
        session.set(SessionState::default());
        pane.set(Pane::Structure);
    };

    view! {
        <div class="hero">
            <h1 class="hero__title">"Blogforge"</h1>
            <p class="hero__subtitle">
                "Describe a topic, pick the building blocks, and get a structured draft to edit."
            </p>
        </div>

        <div class="home-layout">
            <div class="home-layout__left">
                <ChatPanel
                    session=session
                    dispatch=dispatch
                    on_generate=on_generate
                    busy=pending
                />
                {move || notice.get().map(|message| view! { <ErrorDisplay message=message/> })}
                {move || {
                    session
                        .with(|s| s.last_error.clone())
                        .map(|message| view! { <ErrorDisplay message=message on_retry=on_generate/> })
                }}
                <button type="button" class="reset-button" on:click=on_reset>
                    "Start over"
                </button>
            </div>

            <div class="home-layout__right">
                <nav class="tabs">
                    <button
                        type="button"
                        class="tabs__tab"
                        class:tabs__tab--active=move || pane.get() == Pane::Structure
                        on:click=move |_| pane.set(Pane::Structure)
                    >
                        "Structure"
                    </button>
                    <button
                        type="button"
                        class="tabs__tab"
                        class:tabs__tab--active=move || pane.get() == Pane::Preview
                        on:click=move |_| pane.set(Pane::Preview)
                    >
                        "Preview"
                    </button>
                </nav>
                {move || match pane.get() {
                    Pane::Structure => view! {
                        <BlockPalette session=session dispatch=dispatch/>
                        <StructureList session=session dispatch=dispatch/>
                    }
                        .into_any(),
                    Pane::Preview => view! { <BlogPreview session=session dispatch=dispatch/> }.into_any(),
                }}
            </div>
        </div>
    }
}
