pub mod save_note_form;

pub use save_note_form::SaveNoteForm;
