use crate::presentation::block_style;
use blogforge_app::domain::{SessionAction, SessionState, Step, BLOCK_CATALOG};
use leptos::prelude::*;

/// Catalog of blocks that can be appended to the structure.
#[component]
pub fn BlockPalette(
    session: RwSignal<SessionState>,
    dispatch: Callback<SessionAction>,
) -> impl IntoView {
    view! {
        <div class="palette">
            <h3 class="palette__title">"Add blocks"</h3>
            <div class="palette__grid">
                {BLOCK_CATALOG
                    .iter()
                    .map(|block| {
                        let style = block_style(&block.id);
                        let id = block.id.to_string();
                        let available = move || session.with(|s| s.structure.is_available(block));
                        let editable = move || session.with(|s| s.current_step == Step::Structure);
                        view! {
                            <button
                                type="button"
                                class=format!("palette__block palette__block--{}", style.color)
                                prop:disabled=move || !available() || !editable()
                                on:click=move |_| dispatch.run(SessionAction::AddBlock(id.clone()))
                            >
                                <span class="palette__icon">{style.icon}</span>
                                {block.name.to_string()}
                                {move || (!available()).then_some(" ✓")}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
