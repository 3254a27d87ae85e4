//! Paragraph comment affordances and the comment selection.
//!
//! Rich-text paragraphs may carry an internal (staff-only) and an external
//! comment. The selection is plain state owned by whoever composes the page
//! and handed to consumers through [`CommentSelector`]; there is no global.

use serde::{Deserialize, Serialize};

use sitenav_shared::{Result, SitenavError};

pub const INTERNAL_TITLE: &str = "Intern kommentar";
pub const EXTERNAL_TITLE: &str = "Extern kommentar";
pub const DEFAULT_PANEL_TITLE: &str = "Avtalskommentar";
pub const DEFAULT_PANEL_TEXT: &str = "Välj en kommentar genom att klicka på kommentarikonen bredvid en paragraf i texten.\n\nRöda ikoner indikerar interna kommentarer och orange ikoner indikerar externa kommentarer.";

/// Which audience a comment is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    Internal,
    External,
}

impl CommentKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Internal => INTERNAL_TITLE,
            Self::External => EXTERNAL_TITLE,
        }
    }
}

/// A CMS rich-text field as delivered: structured JSON, rendered HTML, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichTextField {
    #[serde(default)]
    pub json: Option<serde_json::Value>,
    #[serde(default)]
    pub html: Option<String>,
}

impl RichTextField {
    /// Non-empty HTML or any non-null JSON.
    pub fn is_present(&self) -> bool {
        self.html.as_deref().is_some_and(|h| !h.is_empty())
            || self.json.as_ref().is_some_and(|j| !j.is_null())
    }
}

// ---------------------------------------------------------------------------
// Paragraph affordances
// ---------------------------------------------------------------------------

/// Comment fields attached to one paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphComments {
    #[serde(default, rename = "internal_comment")]
    pub internal: Option<RichTextField>,
    #[serde(default, rename = "external_comment")]
    pub external: Option<RichTextField>,
}

/// A clickable comment marker next to a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentAffordance {
    pub kind: CommentKind,
    pub title: &'static str,
}

impl ParagraphComments {
    fn field(&self, kind: CommentKind) -> Option<&RichTextField> {
        let field = match kind {
            CommentKind::Internal => self.internal.as_ref(),
            CommentKind::External => self.external.as_ref(),
        };
        field.filter(|f| f.is_present())
    }

    pub fn has_comments(&self) -> bool {
        self.field(CommentKind::Internal).is_some() || self.field(CommentKind::External).is_some()
    }

    /// Markers to show, external first.
    pub fn affordances(&self) -> Vec<CommentAffordance> {
        [CommentKind::External, CommentKind::Internal]
            .into_iter()
            .filter(|kind| self.field(*kind).is_some())
            .map(|kind| CommentAffordance {
                kind,
                title: kind.title(),
            })
            .collect()
    }

    /// The comment a click on `kind`'s marker selects, if that field is present.
    pub fn comment(&self, kind: CommentKind) -> Option<Comment> {
        self.field(kind).map(|field| Comment::from_field(kind, field))
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A selected comment, ready for the comment panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "type")]
    pub kind: CommentKind,
    /// Structured body, serialized as JSON text.
    pub content: Option<String>,
    pub html: Option<String>,
}

impl Comment {
    pub fn from_field(kind: CommentKind, field: &RichTextField) -> Self {
        Self {
            kind,
            content: field.json.as_ref().map(|json| json.to_string()),
            html: field.html.clone().filter(|h| !h.is_empty()),
        }
    }

    pub fn has_body(&self) -> bool {
        self.html.is_some() || self.content.is_some()
    }
}

/// Capability to read and change the selected comment.
pub trait CommentSelector {
    fn selected(&self) -> Option<&Comment>;
    fn select(&mut self, comment: Option<Comment>);

    /// The selection, or a precondition error naming the caller.
    fn require_selected(&self, caller: &str) -> Result<&Comment> {
        self.selected().ok_or_else(|| {
            SitenavError::precondition(format!("{caller} requires a selected comment"))
        })
    }
}

/// Selected-comment state owned by the page composition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentSelection {
    selected: Option<Comment>,
}

impl CommentSelection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommentSelector for CommentSelection {
    fn selected(&self) -> Option<&Comment> {
        self.selected.as_ref()
    }

    fn select(&mut self, comment: Option<Comment>) {
        self.selected = comment;
    }
}

/// Select the comment behind a clicked marker. A marker with no backing
/// field leaves the selection unchanged.
pub fn click_affordance(
    selector: &mut dyn CommentSelector,
    paragraph: &ParagraphComments,
    kind: CommentKind,
) -> bool {
    match paragraph.comment(kind) {
        Some(comment) => {
            selector.select(Some(comment));
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// What the comment panel shows for the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentPanel {
    pub title: String,
    /// Comment HTML, when a comment with a body is selected.
    pub html: Option<String>,
    /// Help paragraphs shown when nothing is selected.
    pub help: Vec<String>,
    /// Whether a close action is offered.
    pub closable: bool,
}

impl CommentPanel {
    pub fn from_selection(selected: Option<&Comment>) -> Self {
        match selected.filter(|c| c.has_body()) {
            Some(comment) => Self {
                title: comment.kind.title().to_string(),
                html: Some(comment.html.clone().unwrap_or_default()),
                help: Vec::new(),
                closable: true,
            },
            None => Self {
                title: DEFAULT_PANEL_TITLE.to_string(),
                html: None,
                help: DEFAULT_PANEL_TEXT.split("\n\n").map(String::from).collect(),
                closable: false,
            },
        }
    }
}
