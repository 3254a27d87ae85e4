//! Breadcrumb trail for the current path.

use serde::Serialize;

use crate::path::HierarchicalPath;

/// One crumb. `current` marks the page being viewed, which is not a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub href: String,
    pub current: bool,
}

/// Build the trail for `pathname`: the home crumb, then one crumb per segment.
///
/// Segment labels get an upper-cased first letter and hyphens become spaces
/// (`kollektiv-avtal` → `Kollektiv avtal`).
pub fn breadcrumbs(pathname: &str, home_label: &str) -> Vec<Breadcrumb> {
    let path = HierarchicalPath::parse(pathname);
    let mut trail = Vec::with_capacity(path.depth() + 1);

    trail.push(Breadcrumb {
        label: home_label.to_string(),
        href: "/".to_string(),
        current: path.is_empty(),
    });

    for (index, segment) in path.segments().iter().enumerate() {
        trail.push(Breadcrumb {
            label: crumb_label(segment),
            href: path.prefix(index + 1).to_path_string(),
            current: index + 1 == path.depth(),
        });
    }

    trail
}

fn crumb_label(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => {
            let upper: String = first.to_uppercase().collect();
            format!("{upper}{}", chars.as_str().replace('-', " "))
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_cumulative_trail() {
        let trail = breadcrumbs("/kollektivavtal/apoteksavtalet/standard-22", "Hem");

        let labels: Vec<&str> = trail.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Hem", "Kollektivavtal", "Apoteksavtalet", "Standard 22"]);

        assert_eq!(trail[2].href, "/kollektivavtal/apoteksavtalet");
        assert!(!trail[2].current);
        assert!(trail[3].current);
    }

    #[test]
    fn root_is_current_on_home() {
        let trail = breadcrumbs("/", "Hem");
        assert_eq!(trail.len(), 1);
        assert!(trail[0].current);
    }

    #[test]
    fn label_capitalizes_non_ascii() {
        assert_eq!(crumb_label("övertid"), "Övertid");
        assert_eq!(crumb_label("a-b-c"), "A b c");
    }
}
