use crate::markdown::markdown_to_html;
use crate::presentation::block_style;
use blogforge_app::domain::{DraftBlock, SessionAction, SessionState};
use leptos::prelude::*;

#[component]
pub fn BlogPreview(
    session: RwSignal<SessionState>,
    dispatch: Callback<SessionAction>,
) -> impl IntoView {
    move || match session.with(|s| s.draft.clone()) {
        None => view! {
            <p class="preview__empty">"Generate a post to see the preview here."</p>
        }
            .into_any(),
        Some(draft) => view! {
            <article class="preview">
                <input
                    class="preview__title"
                    prop:value=draft.title.clone()
                    on:change=move |ev| dispatch.run(SessionAction::EditTitle(event_target_value(&ev)))
                />
                <p class="preview__slug">{format!("/{}", draft.slug)}</p>
                {draft
                    .metadata
                    .clone()
                    .map(|metadata| {
                        view! {
                            <p class="preview__meta">
                                {format!(
                                    "{} min read · {}",
                                    metadata.reading_time,
                                    metadata.keywords.join(", "),
                                )}
                            </p>
                            <p class="preview__description">{metadata.description}</p>
                        }
                    })}
                {draft
                    .blocks
                    .into_iter()
                    .map(|block| view! { <PreviewBlock block=block dispatch=dispatch/> })
                    .collect_view()}
            </article>
        }
            .into_any(),
    }
}

/// Unsaved editor contents for one block.
#[derive(Debug, Clone, PartialEq)]
struct EditBuffer {
    content: String,
    image_url: Option<String>,
}

impl EditBuffer {
    fn from_block(block: &DraftBlock) -> Self {
        Self {
            content: block.content.clone(),
            image_url: block.image_url.clone(),
        }
    }

    fn set_image_url(&mut self, raw: &str) {
        let raw = raw.trim();
        self.image_url = (!raw.is_empty()).then(|| raw.to_string());
    }
}

/// One generated block, rendered as markdown with an inline editor. The
/// rendered view always shows the saved block; edits only land through
/// `EditBlock`.
#[component]
fn PreviewBlock(block: DraftBlock, dispatch: Callback<SessionAction>) -> impl IntoView {
    let editing = RwSignal::new(false);
    let buffer = RwSignal::new(EditBuffer::from_block(&block));
    let style = block_style(&block.kind);
    let id = block.id;
    let saved = StoredValue::new(block.clone());

    let save = move |_: leptos::ev::MouseEvent| {
        let EditBuffer { content, image_url } = buffer.get_untracked();
        dispatch.run(SessionAction::EditBlock {
            id,
            content,
            image_url,
        });
        editing.set(false);
    };

    let toggle = move |_: leptos::ev::MouseEvent| {
        if editing.get_untracked() {
            buffer.set(saved.with_value(EditBuffer::from_block));
        }
        editing.update(|e| *e = !*e);
    };

    view! {
        <section class=format!("preview__block preview__block--{}", style.color)>
            <header class="preview__block-header">
                <span class="preview__block-icon">{style.icon}</span>
                <span class="preview__block-type">{block.kind.clone()}</span>
                <button type="button" class="preview__edit" on:click=toggle>
                    {move || if editing.get() { "Cancel" } else { "Edit" }}
                </button>
            </header>
            {move || {
                if editing.get() {
                    view! {
                        <div class="preview__editor">
                            <textarea
                                class="preview__textarea"
                                prop:value=move || buffer.with(|b| b.content.clone())
                                on:input=move |ev| {
                                    buffer.update(|b| b.content = event_target_value(&ev))
                                }
                            ></textarea>
                            <input
                                type="url"
                                class="preview__image-url"
                                placeholder="Image URL (optional)"
                                prop:value=move || {
                                    buffer.with(|b| b.image_url.clone().unwrap_or_default())
                                }
                                on:input=move |ev| {
                                    buffer.update(|b| b.set_image_url(&event_target_value(&ev)))
                                }
                            />
                            <button type="button" class="preview__save" on:click=save>
                                "Save"
                            </button>
                        </div>
                    }
                        .into_any()
                } else {
                    let DraftBlock { content, image_url, .. } = saved.get_value();
                    view! {
                        <div>
                            {image_url
                                .map(|src| view! { <img class="preview__image" src=src alt=""/> })}
                            <div class="preview__content" inner_html=markdown_to_html(&content)></div>
                        </div>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}
