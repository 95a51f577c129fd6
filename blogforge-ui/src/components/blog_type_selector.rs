use blogforge_app::domain::{SessionAction, SessionState, BLOG_TYPES};
use leptos::prelude::*;

#[component]
pub fn BlogTypeSelector(
    session: RwSignal<SessionState>,
    dispatch: Callback<SessionAction>,
) -> impl IntoView {
    view! {
        <div class="blog-types">
            {BLOG_TYPES
                .iter()
                .map(|&blog_type| {
                    let class = move || {
                        let selected = session
                            .with(|s| s.selected_blog_type.as_deref() == Some(blog_type));
                        if selected {
                            "blog-types__option blog-types__option--selected"
                        } else {
                            "blog-types__option"
                        }
                    };
                    view! {
                        <button
                            type="button"
                            class=class
                            on:click=move |_| {
                                dispatch.run(SessionAction::SelectBlogType(blog_type.to_string()))
                            }
                        >
                            {blog_type}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
