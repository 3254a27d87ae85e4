//! Sidebar navigation model.
//!
//! Turns a sibling listing into what the secondary sidebar shows (title,
//! searchable entries, active marker, empty states) and keeps a fast
//! navigation from being overwritten by a slow, stale sibling response.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use sitenav_graph::ContentGraph;
use sitenav_shared::{AppConfig, FailSoft, OrFallback, SectionEntry, SiblingConfig, SiblingPage, SiblingPages};

use crate::path::HierarchicalPath;
use crate::siblings::{SiblingQuery, resolve_siblings};

/// Shown when the parent has no listable children.
pub const NO_PAGES_MESSAGE: &str = "Inga sidor hittades";

// ---------------------------------------------------------------------------
// NavItem
// ---------------------------------------------------------------------------

/// A sidebar link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub key: String,
    pub label: String,
    pub href: String,
}

/// Map sibling pages to links, first occurrence per href.
pub fn nav_items(pages: &[SiblingPage]) -> Vec<NavItem> {
    let mut seen = HashSet::new();
    pages
        .iter()
        .filter(|page| seen.insert(page.url.as_str()))
        .map(|page| NavItem {
            key: page.key.clone(),
            label: page.display_name.clone(),
            href: page.url.clone(),
        })
        .collect()
}

/// Case-insensitive label search. A blank query matches everything.
pub fn filter_items<'a>(items: &'a [NavItem], query: &str) -> Vec<&'a NavItem> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.label.to_lowercase().contains(&needle))
        .collect()
}

/// Sidebar heading derived from the parent path's last segment.
///
/// `/kollektivavtal/apoteks-avtalet` → `Apoteks Avtalet`. Falls back when the
/// parent is unknown (empty after a failed resolution) or the root.
pub fn section_title(parent_path: &str, fallback: &str) -> String {
    static WORD_START_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b\w").expect("valid regex"));

    let path = HierarchicalPath::parse(parent_path);
    match path.last() {
        Some(segment) => {
            let spaced = segment.replace('-', " ");
            WORD_START_RE
                .replace_all(&spaced, |caps: &regex::Captures<'_>| caps[0].to_uppercase())
                .into_owned()
        }
        None => fallback.to_string(),
    }
}

// ---------------------------------------------------------------------------
// SidebarView
// ---------------------------------------------------------------------------

/// One rendered sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarEntry {
    #[serde(flatten)]
    pub item: NavItem,
    /// The entry links to the page being viewed.
    pub active: bool,
}

/// Everything the secondary sidebar displays for one path and search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarView {
    pub title: String,
    pub entries: Vec<SidebarEntry>,
    /// Set when `entries` is empty.
    pub empty_message: Option<String>,
}

impl SidebarView {
    pub fn build(pathname: &str, items: &[NavItem], title: &str, search: &str) -> Self {
        let entries: Vec<SidebarEntry> = filter_items(items, search)
            .into_iter()
            .map(|item| SidebarEntry {
                item: item.clone(),
                active: item.href == pathname,
            })
            .collect();

        let empty_message = if items.is_empty() {
            Some(NO_PAGES_MESSAGE.to_string())
        } else if entries.is_empty() {
            Some(format!("Inga resultat för \"{}\"", search.trim()))
        } else {
            None
        };

        Self {
            title: title.to_string(),
            entries,
            empty_message,
        }
    }
}

// ---------------------------------------------------------------------------
// SidebarLoader
// ---------------------------------------------------------------------------

/// Settings for sidebar sibling loads.
#[derive(Debug, Clone)]
pub struct SidebarOptions {
    pub locale: Option<String>,
    pub depth: usize,
    pub siblings: SiblingConfig,
    pub fallback_title: String,
}

impl Default for SidebarOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SidebarOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            locale: Some(config.navigation.default_locale.clone()),
            depth: config.navigation.sibling_depth,
            siblings: SiblingConfig::from(config),
            fallback_title: config.navigation.fallback_title.clone(),
        }
    }
}

/// Current sidebar contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarState {
    /// Path the contents belong to (or are loading for).
    pub pathname: String,
    pub loading: bool,
    pub title: String,
    pub items: Vec<NavItem>,
}

/// Proof that a load was started; only the newest ticket may apply results.
#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
    pathname: String,
}

#[derive(Debug)]
struct LoaderInner {
    generation: u64,
    state: SidebarState,
}

/// Owns sidebar state across path changes.
///
/// A load that finishes after a newer one has started is discarded rather
/// than aborted: the network call runs to completion, its result is ignored.
#[derive(Debug)]
pub struct SidebarLoader {
    options: SidebarOptions,
    inner: Mutex<LoaderInner>,
}

impl SidebarLoader {
    pub fn new(options: SidebarOptions) -> Self {
        let state = SidebarState {
            pathname: String::new(),
            loading: false,
            title: options.fallback_title.clone(),
            items: Vec::new(),
        };
        Self {
            options,
            inner: Mutex::new(LoaderInner {
                generation: 0,
                state,
            }),
        }
    }

    /// Mark a load for `pathname` as in flight, superseding any earlier one.
    pub async fn begin(&self, pathname: &str) -> LoadTicket {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.state.pathname = pathname.to_string();
        inner.state.loading = true;
        LoadTicket {
            generation: inner.generation,
            pathname: pathname.to_string(),
        }
    }

    /// Apply a finished load. Returns `false` if the ticket was stale and the
    /// outcome was dropped.
    ///
    /// A degraded outcome clears the list; the title is only replaced when
    /// the outcome names a parent.
    pub async fn complete(&self, ticket: LoadTicket, outcome: FailSoft<SiblingPages>) -> bool {
        let mut inner = self.inner.lock().await;
        if ticket.generation != inner.generation {
            debug!(
                stale = %ticket.pathname,
                current = %inner.state.pathname,
                "discarding stale sibling result"
            );
            return false;
        }

        let result = outcome.or_fallback();
        inner.state.items = nav_items(&result.pages);
        if !result.parent_path.is_empty() {
            let title = section_title(&result.parent_path, &self.options.fallback_title);
            inner.state.title = title;
        }
        inner.state.loading = false;
        true
    }

    /// Resolve siblings for `pathname` and apply them unless superseded.
    #[instrument(skip(self, graph))]
    pub async fn load<G: ContentGraph + ?Sized>(&self, pathname: &str, graph: &G) -> bool {
        let ticket = self.begin(pathname).await;

        let mut query = SiblingQuery::new(pathname).with_depth(self.options.depth);
        query.locale = self.options.locale.clone();

        let outcome = resolve_siblings(&query, graph, &self.options.siblings).await;
        self.complete(ticket, outcome).await
    }

    pub async fn snapshot(&self) -> SidebarState {
        self.inner.lock().await.state.clone()
    }

    /// Render the current contents with a search filter applied.
    pub async fn view(&self, search: &str) -> SidebarView {
        let inner = self.inner.lock().await;
        SidebarView::build(
            &inner.state.pathname,
            &inner.state.items,
            &inner.state.title,
            search,
        )
    }
}

// ---------------------------------------------------------------------------
// SectionNav
// ---------------------------------------------------------------------------

/// The primary (icon) section navigation.
#[derive(Debug, Clone)]
pub struct SectionNav {
    sections: Vec<SectionEntry>,
}

impl SectionNav {
    pub fn new(sections: Vec<SectionEntry>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[SectionEntry] {
        &self.sections
    }

    /// Id of the section containing `pathname`.
    ///
    /// The root section (`href == "/"`) wins for `/` and for paths no other
    /// section claims. Other sections match on whole segments, so
    /// `/kurser-arkiv` is not inside `/kurser`.
    pub fn active_section(&self, pathname: &str) -> &str {
        let path = HierarchicalPath::parse(pathname);
        let home = self
            .sections
            .iter()
            .find(|s| s.href == "/")
            .map(|s| s.id.as_str())
            .unwrap_or("home");

        if path.is_empty() {
            return home;
        }

        self.sections
            .iter()
            .filter(|s| s.href != "/")
            .find(|s| {
                let root = HierarchicalPath::parse(&s.href);
                !root.is_empty() && path.prefix(root.depth()) == root
            })
            .map(|s| s.id.as_str())
            .unwrap_or(home)
    }
}
