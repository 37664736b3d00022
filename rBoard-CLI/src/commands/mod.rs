//! CLI subcommands.

pub mod auth;
pub mod comment;
pub mod draft;
pub mod post;

use anyhow::{Context, Result};
use dialoguer::Confirm;
use rboard::FormError;
use rust_i18n::t;

/// Ask a yes/no question unless `yes` was given on the command line.
pub fn confirm(prompt: impl Into<String>, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

/// Localised message for a validation failure.
pub fn form_error_message(error: &FormError) -> String {
    match error {
        FormError::TitleRequired => t!("form.title_required").to_string(),
        FormError::ContentRequired => t!("form.content_required").to_string(),
        FormError::TitleTooLong(max) => t!("form.title_too_long", max = max).to_string(),
        FormError::ContentTooLong(max) => t!("form.content_too_long", max = max).to_string(),
        FormError::InvalidVideoUrl(url) => t!("form.invalid_video_url", url = url).to_string(),
        FormError::InvalidImageUrl(url) => t!("form.invalid_image_url", url = url).to_string(),
        FormError::FileTooLarge { name, limit, .. } => t!(
            "form.file_too_large",
            name = name,
            limit = rboard::format_file_size(*limit)
        )
        .to_string(),
        FormError::FileTypeNotAllowed(name) => {
            t!("form.file_type_not_allowed", name = name).to_string()
        }
        FormError::CommentEmpty => t!("form.comment_empty").to_string(),
        FormError::CommentTooLong(max) => t!("form.comment_too_long", max = max).to_string(),
    }
}

/// Replace a library validation error with its localised message.
pub fn localize(error: anyhow::Error) -> anyhow::Error {
    match error.downcast_ref::<rboard::Error>() {
        Some(rboard::Error::Form(form)) => anyhow::anyhow!(form_error_message(form)),
        _ => error,
    }
}
