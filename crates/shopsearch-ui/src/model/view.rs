//! Render model for a suggestion surface.

use std::fmt;

use shopsearch_core::SuggestionEntry;

/// What the embedding UI should draw.
///
/// `NoResults` and `Hidden` are different on purpose: a finished search that
/// matched nothing shows an explicit message, an untouched surface shows no
/// results box at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceView<'a> {
    /// Closed, or open with no query dispatched yet.
    Hidden,
    /// First search for this opening is in flight.
    Loading,
    /// A search finished with an empty list.
    NoResults,
    /// Suggestions to list, with the highlighted row if any.
    Suggestions {
        entries: &'a [SuggestionEntry],
        highlighted: Option<usize>,
        /// A newer query is in flight; these rows may be replaced soon.
        refreshing: bool,
    },
}

impl SurfaceView<'_> {
    pub fn is_visible(&self) -> bool {
        !matches!(self, SurfaceView::Hidden)
    }

    /// Entry drawn as highlighted.
    pub fn highlighted_entry(&self) -> Option<&SuggestionEntry> {
        match self {
            SurfaceView::Suggestions {
                entries,
                highlighted: Some(i),
                ..
            } => entries.get(*i),
            _ => None,
        }
    }
}

/// Plain-text rendering, one row per line, `>` marking the highlight.
impl fmt::Display for SurfaceView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceView::Hidden => Ok(()),
            SurfaceView::Loading => f.write_str("Searching..."),
            SurfaceView::NoResults => f.write_str("No results found"),
            SurfaceView::Suggestions {
                entries,
                highlighted,
                ..
            } => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    let marker = if *highlighted == Some(i) { '>' } else { '-' };
                    write!(f, "{} {}", marker, entry.label)?;
                    match (entry.price, entry.sale_price) {
                        (Some(price), Some(sale)) => write!(f, " ({sale:.2}, was {price:.2})")?,
                        (Some(price), None) => write!(f, " ({price:.2})")?,
                        _ => {}
                    }
                }
                Ok(())
            }
        }
    }
}
