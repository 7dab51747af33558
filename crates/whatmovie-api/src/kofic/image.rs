//! Poster image path extraction from the KOBIS movie detail page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::error::{KoficError, Result};

/// First anchor of the poster gallery.
#[allow(clippy::expect_used)]
static GALLERY_ANCHOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".rollList1 a").expect("failed to compile gallery anchor selector")
});

/// Image path embedded in the anchor's `onclick` handler.
#[allow(clippy::expect_used)]
static IMAGE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/.*jpg").expect("failed to compile image path regex"));

/// Extracts the poster image path from a KOBIS movie detail page.
///
/// Reads the `onclick` attribute of the first `.rollList1 a` element and
/// returns the span from its first `/` to its last `jpg`.
///
/// # Example
///
/// ```text
/// <div class="rollList1">
///   <a href="#" onclick="fn_imagePopup('/common/mast/movie/2012/08/a.jpg');return false;">
/// ```
///
/// yields `/common/mast/movie/2012/08/a.jpg`.
///
/// # Errors
///
/// Returns `KoficError::NotFound` if there is no gallery anchor, the anchor
/// has no `onclick`, or the handler contains no `.jpg` path.
pub fn extract_image_path(html: &str) -> Result<String> {
    let document = Html::parse_document(html);

    let anchor = document
        .select(&GALLERY_ANCHOR)
        .next()
        .ok_or_else(|| KoficError::NotFound(String::from("no `.rollList1 a` element")))?;

    let onclick = anchor.value().attr("onclick").ok_or_else(|| {
        KoficError::NotFound(String::from("gallery anchor has no `onclick` attribute"))
    })?;

    IMAGE_PATH_RE
        .find(onclick)
        .map(|m| String::from(m.as_str()))
        .ok_or_else(|| KoficError::NotFound(format!("no .jpg path in onclick: {onclick}")))
}
