//! Draft commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use rboard::form::Draft;
use rboard::parser::html_to_text;
use rboard::{format_timestamp, PostId};
use rust_i18n::t;
use serde::Serialize;

use super::confirm;
use crate::config::build_client;
use crate::output::{print_indented, print_json, print_table, OutputFormat, PlainPrint, TableRow};

#[derive(Subcommand)]
pub enum DraftAction {
    /// Show the saved draft of a post (new post when omitted)
    Show {
        /// Post ID
        post: Option<PostId>,
    },
    /// Discard the saved draft of a post (new post when omitted)
    Clear {
        /// Post ID
        post: Option<PostId>,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// List all saved drafts
    #[command(alias = "ls")]
    List,
}

/// Draft information.
#[derive(Debug, Clone, Serialize)]
pub struct DraftInfo {
    pub key: String,
    pub title: String,
    pub video_url: String,
    pub content: String,
    pub saved_at: String,
}

impl DraftInfo {
    fn new(key: String, draft: &Draft) -> Self {
        Self {
            key,
            title: draft.title.clone(),
            video_url: draft.video_url.clone(),
            content: html_to_text(&draft.content),
            saved_at: format_timestamp(&draft.last_saved),
        }
    }
}

impl TableRow for DraftInfo {
    fn headers() -> Vec<&'static str> {
        vec!["Key", "Title", "Saved"]
    }
    fn row(&self) -> Vec<String> {
        vec![self.key.clone(), self.title.clone(), self.saved_at.clone()]
    }
}

impl PlainPrint for DraftInfo {
    fn plain_print(&self) {
        println!(
            "{} {} {}",
            format!("[{}]", self.key).cyan(),
            self.title.bold(),
            self.saved_at.dimmed()
        );
    }
}

pub async fn handle(action: DraftAction, format: OutputFormat, _verbose: bool) -> Result<()> {
    let client = build_client()?;
    let drafts = client.drafts();

    match action {
        DraftAction::Show { post } => {
            let Some(draft) = drafts.load(post).await else {
                println!("{}", t!("no_draft"));
                return Ok(());
            };
            let info = DraftInfo::new(rboard::form::draft_key(post), &draft);
            if matches!(format, OutputFormat::Json) {
                print_json(&info);
                return Ok(());
            }
            info.plain_print();
            if !info.video_url.is_empty() {
                println!("{} {}", t!("video_label").to_string().magenta(), info.video_url);
            }
            print_indented(&info.content, 3);
            Ok(())
        }
        DraftAction::Clear { post, yes } => {
            if drafts.load(post).await.is_none() {
                println!("{}", t!("no_draft"));
                return Ok(());
            }
            if !confirm(t!("confirm_clear_draft"), yes)? {
                println!("{}", t!("cancelled"));
                return Ok(());
            }
            drafts.discard(post).await;
            println!("{}", t!("draft_cleared"));
            Ok(())
        }
        DraftAction::List => {
            let items: Vec<DraftInfo> = drafts
                .list()
                .await
                .into_iter()
                .map(|(key, draft)| DraftInfo::new(key, &draft))
                .collect();
            print_table(items, format);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::post::text_to_html;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_draft_info() {
        let draft = Draft {
            title: "Hello".into(),
            content: text_to_html("line one\nline two"),
            video_url: String::new(),
            last_saved: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };
        let info = DraftInfo::new("post_draft_new".into(), &draft);
        assert_eq!(info.saved_at, "2024. 01. 02. 12:04:05");
        assert_eq!(info.row(), vec!["post_draft_new", "Hello", "2024. 01. 02. 12:04:05"]);
        assert!(info.content.contains("line one"));
        assert!(info.content.contains("line two"));
    }
}
