use crate::presentation::block_style;
use blogforge_app::domain::{SessionAction, SessionState, Step};
use leptos::prelude::*;

/// The selected structure, reorderable with up/down controls.
#[component]
pub fn StructureList(
    session: RwSignal<SessionState>,
    dispatch: Callback<SessionAction>,
) -> impl IntoView {
    view! {
        <ol class="structure">
            {move || {
                let (blocks, editable) = session
                    .with(|s| (s.structure.blocks().to_vec(), s.current_step == Step::Structure));
                if blocks.is_empty() {
                    return view! {
                        <li class="structure__empty">"No blocks yet. Pick some below."</li>
                    }
                        .into_any();
                }
                let last = blocks.len() - 1;
                blocks
                    .into_iter()
                    .enumerate()
                    .map(|(index, block)| {
                        let style = block_style(&block.id);
                        view! {
                            <li class=format!("structure__item structure__item--{}", style.color)>
                                <span class="structure__icon">{style.icon}</span>
                                <span class="structure__name">{block.name.to_string()}</span>
                                <button
                                    type="button"
                                    class="structure__move"
                                    prop:disabled={!editable || index == 0}
                                    on:click=move |_| {
                                        dispatch
                                            .run(SessionAction::MoveBlock {
                                                from: index,
                                                to: index.saturating_sub(1),
                                            })
                                    }
                                >
                                    "↑"
                                </button>
                                <button
                                    type="button"
                                    class="structure__move"
                                    prop:disabled={!editable || index == last}
                                    on:click=move |_| {
                                        dispatch
                                            .run(SessionAction::MoveBlock {
                                                from: index,
                                                to: (index + 1).min(last),
                                            })
                                    }
                                >
                                    "↓"
                                </button>
                                <button
                                    type="button"
                                    class="structure__remove"
                                    prop:disabled={!editable}
                                    on:click=move |_| dispatch.run(SessionAction::RemoveBlock(index))
                                >
                                    "✕"
                                </button>
                            </li>
                        }
                    })
                    .collect_view()
                    .into_any()
            }}
        </ol>
    }
}
