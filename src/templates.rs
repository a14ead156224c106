//! Post list rendering.
//!
//! [`render_post_list`] turns API records into [`PostBlock`]s, a plain
//! description of what each post shows. The HTML and terminal renderings are
//! built from blocks so both front ends gate controls the same way.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::like_counter_id;
use crate::models::models::{Post, PostId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostBlock {
    pub post_id: PostId,
    pub title: String,
    pub content: String,
    pub meta_line: String,
    pub updated_line: Option<String>,
    pub likes: u64,
    /// Element id of the like counter, `like-count-<id>`.
    pub like_counter_id: String,
    /// Edit and delete controls are shown only on owned posts.
    pub owned: bool,
}

impl PostBlock {
    pub fn from_post(post: &Post, viewer: Option<&str>) -> Self {
        let owned = match (post.author.as_deref(), viewer) {
            (Some(author), Some(viewer)) => author == viewer,
            _ => false,
        };
        PostBlock {
            post_id: post.id.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            meta_line: format!(
                "{} · by {}",
                post.date.as_deref().filter(|d| !d.is_empty()).unwrap_or("No date"),
                post.author.as_deref().filter(|a| !a.is_empty()).unwrap_or("Unknown"),
            ),
            updated_line: post
                .updated
                .as_deref()
                .filter(|u| !u.is_empty())
                .map(|u| format!("Updated: {}", u)),
            likes: post.likes,
            like_counter_id: like_counter_id(post.id.as_str()),
            owned,
        }
    }

    pub fn shows_edit_controls(&self) -> bool {
        self.owned
    }
}

/// One block per post, in the order the API returned them.
pub fn render_post_list(posts: &[Post], viewer: Option<&str>) -> Vec<PostBlock> {
    posts.iter().map(|p| PostBlock::from_post(p, viewer)).collect()
}

/// Set the like count of the block for `id`. Other blocks are untouched.
/// Returns false when no block shows that post.
pub fn apply_like(blocks: &mut [PostBlock], id: &PostId, likes: u64) -> bool {
    match blocks.iter_mut().find(|b| &b.post_id == id) {
        Some(block) => {
            block.likes = likes;
            true
        }
        None => false,
    }
}

pub fn render_html(blocks: &[PostBlock]) -> String {
    let mut html = String::new();
    for block in blocks {
        let id = encode_double_quoted_attribute(block.post_id.as_str());
        html.push_str(&format!(r#"<div class="post" data-post-id="{}">"#, id));
        html.push_str(&format!("<h2>{}</h2>", encode_text(&block.title)));
        html.push_str(&format!("<p>{}</p>", encode_text(&block.content)));
        html.push_str(&format!(
            r#"<p class="post-meta">{}</p>"#,
            encode_text(&block.meta_line)
        ));
        if let Some(updated) = &block.updated_line {
            html.push_str(&format!(r#"<p class="post-updated">{}</p>"#, encode_text(updated)));
        }
        html.push_str(r#"<div class="post-actions">"#);
        html.push_str(&format!(
            r#"<button class="like" data-post-id="{}">❤️ <span id="{}">{}</span></button>"#,
            id,
            encode_double_quoted_attribute(&block.like_counter_id),
            block.likes
        ));
        if block.owned {
            html.push_str(&format!(
                r#"<button class="edit" data-post-id="{}">✏️ Edit</button>"#,
                id
            ));
            html.push_str(&format!(
                r#"<button class="delete" data-post-id="{}">🗑️ Delete</button>"#,
                id
            ));
        }
        html.push_str("</div></div>\n");
    }
    html
}

pub fn render_text(blocks: &[PostBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        out.push_str(&format!("[{}] {}\n", block.post_id, block.title));
        if !block.content.is_empty() {
            out.push_str(&format!("    {}\n", block.content));
        }
        out.push_str(&format!("    {}\n", block.meta_line));
        if let Some(updated) = &block.updated_line {
            out.push_str(&format!("    {}\n", updated));
        }
        let controls = if block.owned { "  [edit] [delete]" } else { "" };
        out.push_str(&format!("    ❤️ {}{}\n\n", block.likes, controls));
    }
    out
}
