//! Static catalog of Screaming Frog export names
//!
//! `--export-tabs`, `--bulk-export` and `--save-report` take free-form,
//! comma-separated names. Every requested name is looked up here first so an
//! unknown value fails before a subprocess is spawned, and only canonical
//! catalog strings ever reach the command line.

use serde::Serialize;

use crate::error::{SpiderError, SpiderResult};
use crate::utils::RECOMMENDED_EXPORT_TABS;

/// One crawl tab and the filters it accepts after `Tab:`
#[derive(Debug, Clone, Copy)]
pub struct TabCatalogEntry {
    pub tab: &'static str,
    pub filters: &'static [&'static str],
}

const CONTENT_TYPE_FILTERS: &[&str] = &[
    "All",
    "HTML",
    "JavaScript",
    "CSS",
    "Images",
    "PDF",
    "Flash",
    "Other",
    "Unknown",
];

/// Tabs accepted by `--export-tabs`
pub const EXPORT_TABS: &[TabCatalogEntry] = &[
    TabCatalogEntry {
        tab: "Internal",
        filters: CONTENT_TYPE_FILTERS,
    },
    TabCatalogEntry {
        tab: "External",
        filters: CONTENT_TYPE_FILTERS,
    },
    TabCatalogEntry {
        tab: "Protocol",
        filters: &["All", "HTTP URLs", "HTTPS URLs", "HTTP Images", "HTTPS Images"],
    },
    TabCatalogEntry {
        tab: "Response Codes",
        filters: &[
            "All",
            "Blocked by Robots.txt",
            "Blocked by User",
            "No Response",
            "1xx",
            "2xx",
            "3xx",
            "4xx",
            "5xx",
        ],
    },
    TabCatalogEntry {
        tab: "URL",
        filters: &[
            "All",
            "Non ASCII Characters",
            "Underscores",
            "Uppercase",
            "Parameters",
            "Duplicate URLs",
            "Over 115 Characters",
        ],
    },
    TabCatalogEntry {
        tab: "Page Titles",
        filters: &[
            "All",
            "Missing",
            "Duplicate",
            "Over 60 Characters",
            "Below 30 Characters",
            "Over 560 Pixels",
            "Below 200 Pixels",
            "Same as H1",
            "Multiple",
        ],
    },
    TabCatalogEntry {
        tab: "Meta Description",
        filters: &[
            "All",
            "Missing",
            "Duplicate",
            "Over 155 Characters",
            "Below 70 Characters",
            "Over 990 Pixels",
            "Below 400 Pixels",
            "Multiple",
        ],
    },
    TabCatalogEntry {
        tab: "Meta Keywords",
        filters: &["All", "Missing", "Duplicate"],
    },
    TabCatalogEntry {
        tab: "H1",
        filters: &["All", "Missing", "Duplicate", "Over 70 Characters", "Multiple"],
    },
    TabCatalogEntry {
        tab: "H2",
        filters: &["All", "Missing", "Duplicate", "Over 70 Characters", "Multiple"],
    },
    TabCatalogEntry {
        tab: "Images",
        filters: &[
            "All",
            "Over 100 KB",
            "Missing Alt Text",
            "Missing Alt Attribute",
            "Alt Text Over 100 Characters",
        ],
    },
    TabCatalogEntry {
        tab: "Canonicals",
        filters: &[
            "All",
            "Contains Canonical",
            "Self Referencing",
            "Canonicalised",
            "Missing",
            "Multiple",
        ],
    },
    TabCatalogEntry {
        tab: "Pagination",
        filters: &[
            "All",
            "Contains Pagination",
            "First Page",
            "Paginated 2+",
            "Paginated with rel=noindex",
        ],
    },
    TabCatalogEntry {
        tab: "Directives",
        filters: &[
            "All",
            "Index",
            "Noindex",
            "Follow",
            "Nofollow",
            "None",
            "NoArchive",
            "NoSnippet",
            "Max-Snippet",
            "Max-Image-Preview",
            "Max-Video-Preview",
            "NoODP",
            "NoYDir",
            "NoTranslate",
            "Unavailable After",
            "Refresh",
        ],
    },
    TabCatalogEntry {
        tab: "Hreflang",
        filters: &[
            "All",
            "Contains Hreflang",
            "Non 200 Hreflang URLs",
            "Unlinked Hreflang URLs",
            "Missing Return Links",
            "Inconsistent Language & Region",
            "Non Canonical",
            "Noindex",
        ],
    },
    TabCatalogEntry {
        tab: "JavaScript",
        filters: &[
            "All",
            "Frameworks & Libraries",
            "JavaScript Files",
            "Missing",
            "Async",
            "Defer",
            "Async & Defer",
        ],
    },
    TabCatalogEntry {
        tab: "Structured Data",
        filters: &[
            "All",
            "Contains Structured Data",
            "Missing",
            "Validation Errors",
            "Validation Warnings",
            "Schema.org",
            "JSON-LD",
            "Microdata",
            "RDFa",
        ],
    },
    TabCatalogEntry {
        tab: "Sitemaps",
        filters: &["All", "URLs in Sitemap", "URLs Not in Sitemap", "Orphan URLs"],
    },
    TabCatalogEntry {
        tab: "AMP",
        filters: &["All", "AMP", "Non AMP", "Missing Non AMP"],
    },
    TabCatalogEntry {
        tab: "Content",
        filters: &["All", "Near Duplicates", "Exact Duplicates"],
    },
    TabCatalogEntry {
        tab: "Security",
        filters: &[
            "All",
            "HTTP URLs",
            "Mixed Content",
            "Form URL Insecure",
            "Form on HTTP URL",
        ],
    },
    TabCatalogEntry {
        tab: "Spelling & Grammar",
        filters: &["All", "Spelling Errors", "Grammar Errors"],
    },
];

/// Names accepted by `--bulk-export`
pub const BULK_EXPORTS: &[&str] = &[
    "All Links",
    "All Inlinks",
    "All Outlinks",
    "All Anchor Text",
    "Response Times",
    "Cookies",
    "Unique Content",
    "Near Duplicates",
    "Exact Duplicates",
    "Contains",
    "Does Not Contain",
    "Canonicals",
    "Hreflang",
    "All Image Inlinks",
    "All Image Outlinks",
    "Missing Alt Tags",
    "Alt Text Over 100",
    "JavaScript Links",
    "JavaScript Rendering",
    "All Redirect Chains",
    "HTTP Headers",
    "All Sitemap URLs",
    "All Structured Data",
    "Validation Errors",
    "Validation Warnings",
    "Accessibility Issues",
    "External Links",
];

/// Names accepted by `--save-report`
pub const REPORTS: &[&str] = &[
    "Crawl Overview",
    "Redirect Chains",
    "Redirect & Canonical Chains",
    "Insecure Content",
    "SERP Summary",
    "PageSpeed Summary",
];

/// URI of the MCP resource rendering this catalog
pub const EXPORT_REFERENCE_URI: &str = "screaming-frog://export-reference";

/// Validated export request, holding canonical catalog names only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSpec {
    pub tabs: Vec<String>,
    pub bulk_exports: Vec<&'static str>,
    pub reports: Vec<&'static str>,
}

impl ExportSpec {
    /// Parse the three comma-separated request parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SpiderError::NoExportSpecified`] when all three are empty and
    /// [`SpiderError::UnknownExportName`] naming the first unknown value.
    pub fn parse(
        export_tabs: Option<&str>,
        bulk_export: Option<&str>,
        save_report: Option<&str>,
    ) -> SpiderResult<Self> {
        let tab_names = split_list(export_tabs);
        let bulk_names = split_list(bulk_export);
        let report_names = split_list(save_report);

        if tab_names.is_empty() && bulk_names.is_empty() && report_names.is_empty() {
            return Err(SpiderError::NoExportSpecified);
        }

        Ok(Self {
            tabs: tab_names
                .into_iter()
                .map(lookup_tab)
                .collect::<SpiderResult<_>>()?,
            bulk_exports: bulk_names
                .into_iter()
                .map(lookup_bulk_export)
                .collect::<SpiderResult<_>>()?,
            reports: report_names
                .into_iter()
                .map(lookup_report)
                .collect::<SpiderResult<_>>()?,
        })
    }

    /// Value for `--export-tabs`, if any tabs were requested
    #[must_use]
    pub fn tabs_arg(&self) -> Option<String> {
        (!self.tabs.is_empty()).then(|| self.tabs.join(","))
    }

    /// Value for `--bulk-export`, if any bulk exports were requested
    #[must_use]
    pub fn bulk_export_arg(&self) -> Option<String> {
        (!self.bulk_exports.is_empty()).then(|| self.bulk_exports.join(","))
    }

    /// Value for `--save-report`, if any reports were requested
    #[must_use]
    pub fn save_report_arg(&self) -> Option<String> {
        (!self.reports.is_empty()).then(|| self.reports.join(","))
    }
}

fn split_list(value: Option<&str>) -> Vec<&str> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Canonical `Tab:Filter` for a case-insensitive `Tab:Filter` request
///
/// # Errors
///
/// Returns [`SpiderError::UnknownExportName`] naming `spec` verbatim.
pub fn lookup_tab(spec: &str) -> SpiderResult<String> {
    let unknown = || SpiderError::UnknownExportName {
        category: "export tab",
        name: spec.to_string(),
    };

    let (tab, filter) = spec.split_once(':').ok_or_else(unknown)?;
    let entry = EXPORT_TABS
        .iter()
        .find(|entry| entry.tab.eq_ignore_ascii_case(tab.trim()))
        .ok_or_else(unknown)?;
    let filter = entry
        .filters
        .iter()
        .find(|known| known.eq_ignore_ascii_case(filter.trim()))
        .ok_or_else(unknown)?;

    Ok(format!("{}:{}", entry.tab, filter))
}

/// Canonical bulk export name
///
/// # Errors
///
/// Returns [`SpiderError::UnknownExportName`] naming `name`.
pub fn lookup_bulk_export(name: &str) -> SpiderResult<&'static str> {
    lookup_name(BULK_EXPORTS, "bulk export", name)
}

/// Canonical report name
///
/// # Errors
///
/// Returns [`SpiderError::UnknownExportName`] naming `name`.
pub fn lookup_report(name: &str) -> SpiderResult<&'static str> {
    lookup_name(REPORTS, "report", name)
}

fn lookup_name(
    table: &'static [&'static str],
    category: &'static str,
    name: &str,
) -> SpiderResult<&'static str> {
    table
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(name))
        .ok_or_else(|| SpiderError::UnknownExportName {
            category,
            name: name.to_string(),
        })
}

/// Markdown reference of every supported export name
#[must_use]
pub fn render_reference() -> String {
    let mut out = String::from("# Screaming Frog Export Reference\n\n");

    out.push_str("## export_tabs (`--export-tabs`)\n\n");
    out.push_str(
        "Comma-separated `Tab:Filter` pairs, e.g. `Internal:All,Page Titles:Missing`.\n\n",
    );
    out.push_str(&format!(
        "A good first audit: `{RECOMMENDED_EXPORT_TABS}`.\n\n"
    ));
    for entry in EXPORT_TABS {
        out.push_str(&format!("- {}: {}\n", entry.tab, entry.filters.join(", ")));
    }

    out.push_str("\n## bulk_export (`--bulk-export`)\n\n");
    out.push_str("Comma-separated names without a `Category:` prefix, e.g. `All Inlinks,All Outlinks`.\n\n");
    for name in BULK_EXPORTS {
        out.push_str(&format!("- {name}\n"));
    }

    out.push_str("\n## save_report (`--save-report`)\n\n");
    out.push_str("Comma-separated report names, e.g. `Crawl Overview`.\n\n");
    for name in REPORTS {
        out.push_str(&format!("- {name}\n"));
    }

    out
}
