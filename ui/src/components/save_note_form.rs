use std::cell::RefCell;
use std::rc::Rc;

use action_runner::{ActionOptions, Settled};
use gloo_timers::future::TimeoutFuture;
use yew::prelude::*;

use crate::hooks::use_server_action_with_options;
use crate::utils::demo_latency_ms;

pub const MAX_NOTE_LEN: usize = 280;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SaveNoteError {
    #[error("Note cannot be empty")]
    Empty,
    #[error("Note is longer than {0} characters")]
    TooLong(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedNote {
    pub revision: u32,
    pub text: String,
}

pub fn validate_note(text: &str) -> Result<(), SaveNoteError> {
    if text.trim().is_empty() {
        return Err(SaveNoteError::Empty);
    }
    if text.chars().count() > MAX_NOTE_LEN {
        return Err(SaveNoteError::TooLong(MAX_NOTE_LEN));
    }
    Ok(())
}

/// Stand-in for a remote save: waits for the configured latency, then
/// validates and bumps the revision.
async fn save_note(
    text: String,
    latency_ms: u32,
    revision: Rc<RefCell<u32>>,
) -> Result<SavedNote, SaveNoteError> {
    TimeoutFuture::new(latency_ms).await;
    validate_note(&text)?;

    let mut revision = revision.borrow_mut();
    *revision += 1;
    Ok(SavedNote {
        revision: *revision,
        text,
    })
}

#[function_component]
pub fn SaveNoteForm() -> Html {
    let draft = use_state(String::new);
    let revision = use_mut_ref(|| 0u32);

    let (save, status, clear_error) = use_server_action_with_options(
        move |text: String| {
            save_note(text, demo_latency_ms(), revision.clone())
        },
        ActionOptions::new("save_note"),
    );

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
            draft.set(input.value());
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let save = save.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let draft = draft.clone();
            let save = save.clone();
            let text = (*draft).clone();

            yew::platform::spawn_local(async move {
                if let Settled::Data(note) = save.run(text).await {
                    tracing::info!("Saved note revision {}", note.revision);
                    draft.set(String::new());
                }
            });
        })
    };

    let on_dismiss = clear_error.reform(|_: MouseEvent| ());

    html! {
        <form onsubmit={on_submit} class="max-w-md space-y-4">
            <textarea
                value={(*draft).clone()}
                oninput={on_input}
                rows="4"
                placeholder="Write a note"
                class="w-full p-2 border border-neutral-300 \
                       dark:border-neutral-600 rounded bg-white \
                       dark:bg-neutral-800"
            />

            <button
                type="submit"
                disabled={status.is_loading}
                class="px-4 py-2 bg-neutral-900 dark:bg-neutral-100 \
                       text-white dark:text-neutral-900 rounded \
                       disabled:opacity-50 disabled:cursor-not-allowed"
            >
                {if status.is_loading { "Saving..." } else { "Save" }}
            </button>

            {if let Some(error) = &status.error {
                html! {
                    <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 \
                                border border-red-200 dark:border-red-800 \
                                flex justify-between">
                        <p class="text-sm text-red-700 dark:text-red-400">
                            {error.to_string()}
                        </p>
                        <button
                            type="button"
                            onclick={on_dismiss}
                            class="text-sm text-red-700 dark:text-red-400"
                        >
                            {"Dismiss"}
                        </button>
                    </div>
                }
            } else {
                html! {}
            }}

            {if let Some(note) = &status.data {
                // previous save stays visible while the next one is pending
                let class = if status.is_loading {
                    "text-sm text-neutral-600 dark:text-neutral-400 opacity-50"
                } else {
                    "text-sm text-neutral-600 dark:text-neutral-400"
                };
                html! {
                    <p class={class}>
                        {format!(
                            "Saved revision {}: {}",
                            note.revision, note.text
                        )}
                    </p>
                }
            } else {
                html! {}
            }}
        </form>
    }
}
