// src/site/lists.rs

//! Package list pages
//!
//! The site has one list page per initial letter and one per category
//! group, each in an "all packages" and an "apps only" flavour. This module
//! computes what goes on every page; the templates only render it.

use crate::error::Result;
use crate::packages::{Package, PackageCategory};
use serde::{Serialize, Serializer};
use std::fs;
use std::path::Path;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Bucket for titles that do not start with a letter
const OTHER_BUCKET: char = '?';

/// Which packages a list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    Packages,
    Apps,
}

impl ListFilter {
    /// Directory below `www` the list pages live in
    pub fn dir(self) -> &'static str {
        match self {
            Self::Packages => "pkgs",
            Self::Apps => "apps",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Packages => "packages",
            Self::Apps => "apps",
        }
    }

    fn accepts(self, package: &Package) -> bool {
        match self {
            Self::Packages => true,
            Self::Apps => package.is_app(),
        }
    }
}

/// A category page shows packages in any of `categories`
#[derive(Debug, Clone, Copy)]
pub struct CategoryPage {
    pub name: &'static str,
    pub categories: &'static [PackageCategory],
}

impl CategoryPage {
    fn contains(&self, package: &Package) -> bool {
        self.categories
            .iter()
            .any(|category| package.categories.contains(category))
    }

    fn slug(&self) -> String {
        self.name.replace(' ', "-").to_lowercase()
    }
}

pub const CATEGORY_PAGES: [CategoryPage; 12] = [
    CategoryPage {
        name: "Accessibility",
        categories: &[PackageCategory::Accessibility],
    },
    CategoryPage {
        name: "Development",
        categories: &[PackageCategory::Development],
    },
    CategoryPage {
        name: "Education",
        categories: &[PackageCategory::Education],
    },
    CategoryPage {
        name: "Games",
        categories: &[PackageCategory::Game],
    },
    CategoryPage {
        name: "Graphics",
        categories: &[PackageCategory::Graphics],
    },
    CategoryPage {
        name: "Libraries",
        categories: &[PackageCategory::Library],
    },
    CategoryPage {
        name: "Location and Navigation",
        categories: &[PackageCategory::Maps],
    },
    CategoryPage {
        name: "Multimedia",
        categories: &[
            PackageCategory::Audio,
            PackageCategory::Video,
            PackageCategory::AudioVideo,
        ],
    },
    CategoryPage {
        name: "Office",
        categories: &[PackageCategory::Office],
    },
    CategoryPage {
        name: "Science",
        categories: &[PackageCategory::Science],
    },
    CategoryPage {
        name: "Utilities",
        categories: &[PackageCategory::System, PackageCategory::Utility],
    },
    CategoryPage {
        name: "Other",
        categories: &[PackageCategory::Other],
    },
];

fn package_names<S: Serializer>(packages: &[&Package], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(packages.iter().map(|package| package.name.as_str()))
}

/// One list page
#[derive(Debug, Clone, Serialize)]
pub struct PackageIndex<'a> {
    pub id: String,
    /// Label in the page navigation
    pub display: String,
    pub page_title: String,
    /// Page path relative to `www`
    pub file: String,
    #[serde(rename = "pkgs", serialize_with = "package_names")]
    pub packages: Vec<&'a Package>,
}

/// First letter bucket of a title, `?` unless it is an ASCII letter
fn letter_of(title: &str) -> char {
    match title.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some(c) if c.is_ascii_lowercase() => c,
        _ => OTHER_BUCKET,
    }
}

/// Pages `a` to `z`, `?` and finally the page listing everything
///
/// `sorted` must already be in title order; every page keeps that order.
pub fn letter_indexes<'a>(sorted: &[&'a Package], filter: ListFilter) -> Vec<PackageIndex<'a>> {
    let shown: Vec<&'a Package> = sorted.iter().copied().filter(|p| filter.accepts(p)).collect();
    let noun = filter.noun();

    let mut indexes: Vec<PackageIndex<'a>> = ALPHABET
        .chars()
        .chain([OTHER_BUCKET])
        .map(|letter| {
            let (title_part, file_part) = if letter == OTHER_BUCKET {
                ("other characters".to_string(), "other".to_string())
            } else {
                (format!("'{}'", letter.to_ascii_uppercase()), letter.to_string())
            };
            PackageIndex {
                id: letter.to_string(),
                display: letter.to_ascii_uppercase().to_string(),
                page_title: format!("All {noun} starting with {title_part}"),
                file: format!("{}/index-{file_part}.html", filter.dir()),
                packages: shown
                    .iter()
                    .copied()
                    .filter(|p| letter_of(&p.title) == letter)
                    .collect(),
            }
        })
        .collect();

    let all_title = match filter {
        ListFilter::Packages => "All packages",
        ListFilter::Apps => "All apps",
    };
    indexes.push(PackageIndex {
        id: "*".to_string(),
        display: "ALL".to_string(),
        page_title: all_title.to_string(),
        file: format!("{}/index.html", filter.dir()),
        packages: shown,
    });
    indexes
}

/// One page per entry of [`CATEGORY_PAGES`]
///
/// Apps get no `Libraries` page.
pub fn category_indexes<'a>(sorted: &[&'a Package], filter: ListFilter) -> Vec<PackageIndex<'a>> {
    CATEGORY_PAGES
        .iter()
        .filter(|page| !(filter == ListFilter::Apps && page.name == "Libraries"))
        .map(|page| PackageIndex {
            id: page.name.to_lowercase(),
            display: page.name.to_string(),
            page_title: format!("All {} {}", page.name.to_lowercase(), filter.noun()),
            file: format!("{}/index-category-{}.html", filter.dir(), page.slug()),
            packages: sorted
                .iter()
                .copied()
                .filter(|p| filter.accepts(p) && page.contains(p))
                .collect(),
        })
        .collect()
}

/// Letter and category pages of one filter
#[derive(Debug, Clone, Serialize)]
pub struct ListGroup<'a> {
    pub letters: Vec<PackageIndex<'a>>,
    pub categories: Vec<PackageIndex<'a>>,
}

impl<'a> ListGroup<'a> {
    pub fn new(sorted: &[&'a Package], filter: ListFilter) -> Self {
        Self {
            letters: letter_indexes(sorted, filter),
            categories: category_indexes(sorted, filter),
        }
    }
}

/// Every list page of the site
#[derive(Debug, Clone, Serialize)]
pub struct PackageLists<'a> {
    pub pkgs: ListGroup<'a>,
    pub apps: ListGroup<'a>,
}

impl<'a> PackageLists<'a> {
    pub fn new(sorted: &[&'a Package]) -> Self {
        Self {
            pkgs: ListGroup::new(sorted, ListFilter::Packages),
            apps: ListGroup::new(sorted, ListFilter::Apps),
        }
    }
}

/// Write `lists` as JSON to `path`
pub fn write_package_lists(path: &Path, lists: &PackageLists<'_>) -> Result<()> {
    let json = serde_json::to_string(lists)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::PackageType;

    fn package(name: &str, title: &str, categories: &[PackageCategory], app: bool) -> Package {
        let mut package = Package::new(name);
        package.title = title.to_string();
        package.categories = categories.iter().copied().collect();
        if app {
            package.package_type = PackageType::DesktopApplication;
        }
        package
    }

    fn names<'a>(index: &PackageIndex<'a>) -> Vec<&'a str> {
        index.packages.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_letter_of() {
        assert_eq!(letter_of("Foo"), 'f');
        assert_eq!(letter_of("bar"), 'b');
        assert_eq!(letter_of("2048"), '?');
        assert_eq!(letter_of("Ärger"), '?');
        assert_eq!(letter_of(""), '?');
    }

    #[test]
    fn test_letter_indexes() {
        let game = package("harbour-alpha", "Alpha", &[PackageCategory::Game], true);
        let lib = package("libapple", "Apple (library)", &[PackageCategory::Library], false);
        let numeric = package("harbour-2048", "2048", &[PackageCategory::Game], true);
        let sorted = vec![&numeric, &game, &lib];

        let pkgs = letter_indexes(&sorted, ListFilter::Packages);
        assert_eq!(pkgs.len(), 28);
        assert_eq!(pkgs[0].id, "a");
        assert_eq!(pkgs[0].display, "A");
        assert_eq!(pkgs[0].page_title, "All packages starting with 'A'");
        assert_eq!(pkgs[0].file, "pkgs/index-a.html");
        assert_eq!(names(&pkgs[0]), vec!["harbour-alpha", "libapple"]);
        assert!(pkgs[1].packages.is_empty());

        let other = &pkgs[26];
        assert_eq!(other.id, "?");
        assert_eq!(other.page_title, "All packages starting with other characters");
        assert_eq!(other.file, "pkgs/index-other.html");
        assert_eq!(names(other), vec!["harbour-2048"]);

        let all = &pkgs[27];
        assert_eq!((all.id.as_str(), all.display.as_str()), ("*", "ALL"));
        assert_eq!(all.file, "pkgs/index.html");
        assert_eq!(names(all), vec!["harbour-2048", "harbour-alpha", "libapple"]);

        let apps = letter_indexes(&sorted, ListFilter::Apps);
        assert_eq!(apps[0].page_title, "All apps starting with 'A'");
        assert_eq!(apps[0].file, "apps/index-a.html");
        assert_eq!(names(&apps[0]), vec!["harbour-alpha"]);
        assert_eq!(apps[27].page_title, "All apps");
        assert_eq!(names(&apps[27]), vec!["harbour-2048", "harbour-alpha"]);
    }

    fn find(indexes: &[PackageIndex<'_>], display: &str) -> Option<usize> {
        indexes.iter().position(|index| index.display == display)
    }

    #[test]
    fn test_category_indexes() {
        let player = package("harbour-player", "Player", &[PackageCategory::Audio], true);
        let tool = package("systool", "Tool", &[PackageCategory::System], false);
        let lib = package("libx", "X (library)", &[PackageCategory::Library], false);
        let sorted = vec![&player, &tool, &lib];

        let pkgs = category_indexes(&sorted, ListFilter::Packages);
        assert_eq!(pkgs.len(), 12);

        let multimedia = &pkgs[find(&pkgs, "Multimedia").unwrap()];
        assert_eq!(multimedia.id, "multimedia");
        assert_eq!(multimedia.page_title, "All multimedia packages");
        assert_eq!(multimedia.file, "pkgs/index-category-multimedia.html");
        assert_eq!(names(multimedia), vec!["harbour-player"]);

        let utilities = &pkgs[find(&pkgs, "Utilities").unwrap()];
        assert_eq!(names(utilities), vec!["systool"]);

        let navigation = &pkgs[find(&pkgs, "Location and Navigation").unwrap()];
        assert_eq!(navigation.file, "pkgs/index-category-location-and-navigation.html");

        let libraries = &pkgs[find(&pkgs, "Libraries").unwrap()];
        assert_eq!(names(libraries), vec!["libx"]);

        let apps = category_indexes(&sorted, ListFilter::Apps);
        assert_eq!(apps.len(), 11);
        assert_eq!(find(&apps, "Libraries"), None);
        let utilities = &apps[find(&apps, "Utilities").unwrap()];
        assert!(utilities.packages.is_empty());
        assert_eq!(utilities.page_title, "All utilities apps");
    }

    #[test]
    fn test_package_lists_json() {
        let game = package("harbour-alpha", "Alpha", &[PackageCategory::Game], true);
        let sorted = vec![&game];

        let json = serde_json::to_value(PackageLists::new(&sorted)).unwrap();
        assert_eq!(json["apps"]["letters"][0]["pkgs"], serde_json::json!(["harbour-alpha"]));
        assert_eq!(json["pkgs"]["categories"][3]["display"], "Games");
        assert_eq!(json["pkgs"]["categories"][3]["pkgs"], serde_json::json!(["harbour-alpha"]));
    }
}
