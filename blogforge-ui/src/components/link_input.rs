use blogforge_app::domain::{SessionAction, SessionState};
use leptos::prelude::*;

#[component]
pub fn LinkInput(
    session: RwSignal<SessionState>,
    dispatch: Callback<SessionAction>,
) -> impl IntoView {
    let value = RwSignal::new(String::new());

    // The input is cleared only once the reducer accepted the link.
    let add_link = move || {
        let link = value.get_untracked();
        if link.trim().is_empty() {
            return;
        }
        dispatch.run(SessionAction::AddLink(link.clone()));
        let accepted = session.with_untracked(|s| s.internal_links.iter().any(|l| l == link.trim()));
        if accepted {
            value.set(String::new());
        }
    };

    view! {
        <div class="links">
            <div class="links__form">
                <input
                    type="url"
                    class="links__input"
                    placeholder="Add a link... (e.g. https://example.com/guide)"
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            add_link();
                        }
                    }
                />
                <button
                    type="button"
                    class="links__add"
                    prop:disabled=move || value.with(|v| v.trim().is_empty())
                    on:click=move |_| add_link()
                >
                    "Add"
                </button>
            </div>
            <ul class="links__list">
                {move || {
                    session
                        .with(|s| s.internal_links.clone())
                        .into_iter()
                        .enumerate()
                        .map(|(index, link)| {
                            let href = link.clone();
                            view! {
                                <li class="links__item">
                                    <a href=href target="_blank" rel="noopener noreferrer">
                                        {link}
                                    </a>
                                    <button
                                        type="button"
                                        class="links__remove"
                                        on:click=move |_| dispatch.run(SessionAction::RemoveLink(index))
                                    >
                                        "×"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </div>
    }
}
