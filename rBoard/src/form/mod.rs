//! Post create/edit form: state, validation and drafts.

mod draft;
mod state;
mod validate;

pub use draft::{draft_key, Draft, DraftStore, DRAFT_KEY_PREFIX};
pub use state::{PostForm, PostFormAction, UploadFile};
pub use validate::{check, check_comment, FormError, CONTENT_MAX_LEN, TITLE_MAX_LEN};
