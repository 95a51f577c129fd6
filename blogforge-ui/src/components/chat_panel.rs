use super::{BlogTypeSelector, LinkInput, LoadingSpinner};
use blogforge_app::domain::{ChatMessage, Role, SessionAction, SessionState, Step};
use leptos::prelude::*;

/// Conversation history plus the input for the current step.
#[component]
pub fn ChatPanel(
    session: RwSignal<SessionState>,
    dispatch: Callback<SessionAction>,
    on_generate: Callback<()>,
    #[prop(into)] busy: Signal<bool>,
) -> impl IntoView {
    let step = move || session.with(|s| s.current_step);

    view! {
        <div class="chat">
            <ul class="chat__messages">
                {move || {
                    session
                        .with(|s| s.messages.clone())
                        .into_iter()
                        .map(|message| view! { <ChatBubble message=message/> })
                        .collect_view()
                }}
            </ul>
            <div class="chat__input">
                {move || match step() {
                    Step::Initial => view! { <TopicInput dispatch=dispatch/> }.into_any(),
                    Step::BlogType => {
                        view! { <BlogTypeSelector session=session dispatch=dispatch/> }.into_any()
                    }
                    Step::InternalLinks => view! {
                        <LinkInput session=session dispatch=dispatch/>
                        <button
                            type="button"
                            class="chat__continue"
                            on:click=move |_| dispatch.run(SessionAction::ConfirmLinks)
                        >
                            {move || {
                                if session.with(|s| s.internal_links.is_empty()) {
                                    "Skip"
                                } else {
                                    "Continue"
                                }
                            }}
                        </button>
                    }
                        .into_any(),
                    Step::Structure => view! {
                        <p class="chat__hint">
                            "Arrange your blocks on the right, then generate."
                        </p>
                        <button
                            type="button"
                            class="chat__generate"
                            prop:disabled=move || {
                                busy.get() || session.with(|s| s.structure.is_empty())
                            }
                            on:click=move |_| on_generate.run(())
                        >
                            "Generate"
                        </button>
                    }
                        .into_any(),
                    Step::Generating => view! { <LoadingSpinner/> }.into_any(),
                    Step::Preview => view! {
                        <p class="chat__hint">
                            "Edit the draft on the right. Changes are saved automatically."
                        </p>
                    }
                        .into_any(),
                }}
            </div>
        </div>
    }
}

#[component]
fn ChatBubble(message: ChatMessage) -> impl IntoView {
    let class = match message.role {
        Role::User => "chat__message chat__message--user",
        Role::Assistant => "chat__message chat__message--assistant",
    };

    view! { <li class=class>{message.content}</li> }
}

#[component]
fn TopicInput(dispatch: Callback<SessionAction>) -> impl IntoView {
    let topic = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let text = topic.get_untracked();
        if !text.trim().is_empty() {
            dispatch.run(SessionAction::SubmitTopic(text));
            topic.set(String::new());
        }
    };

    view! {
        <form class="topic-form" on:submit=on_submit>
            <textarea
                class="topic-form__input"
                placeholder="What should the post be about? Topic, keywords, audience..."
                prop:value=move || topic.get()
                on:input=move |ev| topic.set(event_target_value(&ev))
                required
            ></textarea>
            <button type="submit" class="topic-form__button">
                "Start"
            </button>
        </form>
    }
}
