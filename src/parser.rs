//! Brand and price extraction from post titles.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::brands::BrandCatalog;

/// `$1234` or `USD 1234`.
static PRICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([0-9]+)|USD\s([0-9]+)").unwrap());

/// Fields derived from a post title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub brand: Option<String>,
    pub price: Option<i64>,
}

/// Extracts brand and price from titles using a brand catalog.
#[derive(Debug, Clone, Default)]
pub struct TitleParser {
    catalog: BrandCatalog,
}

impl TitleParser {
    #[must_use]
    pub fn new(catalog: BrandCatalog) -> Self {
        Self { catalog }
    }

    /// Find the brand and price mentioned in `title`.
    ///
    /// Never fails: a title without a known brand or a price pattern simply
    /// yields `None` for that field.
    #[must_use]
    pub fn extract(&self, title: &str) -> Extraction {
        Extraction {
            brand: self.find_brand(title).map(ToString::to_string),
            price: find_price(title),
        }
    }

    /// First catalog brand contained in `title`, ignoring case.
    #[must_use]
    pub fn find_brand(&self, title: &str) -> Option<&str> {
        self.catalog.first_match(&title.to_lowercase())
    }
}

/// Extract brand and price with the built-in catalog.
#[must_use]
pub fn extract(title: &str) -> Extraction {
    static DEFAULT: Lazy<TitleParser> = Lazy::new(TitleParser::default);
    DEFAULT.extract(title)
}

/// Price from the leftmost `$N` or `USD N` in `title`.
///
/// A digit run too large for `i64` counts as no price.
#[must_use]
pub fn find_price(title: &str) -> Option<i64> {
    let caps = PRICE_PATTERN.captures(title)?;
    let digits = caps.get(1).or_else(|| caps.get(2))?;
    digits.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(e: Extraction) -> (Option<String>, Option<i64>) {
        (e.brand, e.price)
    }

    #[test]
    fn test_brand_and_dollar_price() {
        assert_eq!(
            pair(extract("Omega Speedmaster $3200 great condition")),
            (Some("Omega".to_string()), Some(3200))
        );
    }

    #[test]
    fn test_brand_and_usd_price() {
        assert_eq!(
            pair(extract("Rolex Submariner USD 9500")),
            (Some("Rolex".to_string()), Some(9500))
        );
    }

    #[test]
    fn test_price_without_brand() {
        assert_eq!(
            pair(extract("Selling my watch, no brand mentioned, $500")),
            (None, Some(500))
        );
    }

    #[test]
    fn test_neither() {
        assert_eq!(pair(extract("Just chatting, no price here")), (None, None));
        assert_eq!(pair(extract("")), (None, None));
    }

    #[test]
    fn test_brand_is_case_insensitive() {
        assert_eq!(extract("[WTS] ROLEX explorer").brand.as_deref(), Some("Rolex"));
        assert_eq!(extract("[wts] tudor pelagos").brand.as_deref(), Some("Tudor"));
        assert_eq!(extract("nomos tangente 38").brand.as_deref(), Some("Nomos"));
    }

    #[test]
    fn test_brand_substring_inside_word() {
        assert_eq!(extract("[WTS] Omegaaaa").brand.as_deref(), Some("Omega"));
    }

    #[test]
    fn test_catalog_order_beats_title_position() {
        // Longines appears first in the title, Tudor first in the catalog.
        assert_eq!(
            extract("[WTT] Longines Legend Diver for Tudor BB58").brand.as_deref(),
            Some("Tudor")
        );
    }

    #[test]
    fn test_catalog_order_beats_specificity() {
        let parser = TitleParser::new(BrandCatalog::new(["Seiko", "Grand Seiko"]));
        assert_eq!(parser.find_brand("[WTS] Grand Seiko SBGA211 $4000"), Some("Seiko"));

        let parser = TitleParser::new(BrandCatalog::new(["Grand Seiko", "Seiko"]));
        assert_eq!(
            parser.find_brand("[WTS] Grand Seiko SBGA211 $4000"),
            Some("Grand Seiko")
        );
    }

    #[test]
    fn test_first_price_wins() {
        assert_eq!(find_price("$1200 or USD 1100 with strap, $50 extra"), Some(1200));
        assert_eq!(find_price("USD 1100 or $1200"), Some(1100));
        assert_eq!(find_price("Was $900 now $850"), Some(900));
    }

    #[test]
    fn test_price_patterns_are_strict() {
        // Whitespace after `$` is not allowed, `USD` needs whitespace and is case sensitive.
        assert_eq!(find_price("$ 500"), None);
        assert_eq!(find_price("USD500"), None);
        assert_eq!(find_price("usd 500"), None);
        assert_eq!(find_price("500 USD"), None);
        assert_eq!(find_price("USD\t750"), Some(750));
    }

    #[test]
    fn test_price_stops_at_separator() {
        assert_eq!(find_price("$3,200 shipped"), Some(3));
        assert_eq!(find_price("$1.5k"), Some(1));
    }

    #[test]
    fn test_price_leading_zeros_and_overflow() {
        assert_eq!(find_price("$0"), Some(0));
        assert_eq!(find_price("$00450"), Some(450));
        assert_eq!(find_price("$99999999999999999999999"), None);
    }

    #[test]
    fn test_price_digits_are_ascii_only() {
        assert_eq!(find_price("$٣٢٠٠"), None);
        assert_eq!(find_price("USD ３２００"), None);
        assert_eq!(find_price("$٣٢ or $3200"), Some(3200));
    }

    #[test]
    fn test_extract_is_deterministic() {
        let title = "Cartier Tank Must USD 2100 / $2000 shipped";
        let first = extract(title);
        for _ in 0..3 {
            assert_eq!(extract(title), first);
        }
        assert_eq!(first.brand.as_deref(), Some("Cartier"));
        assert_eq!(first.price, Some(2100));
    }

    #[test]
    fn test_unicode_titles() {
        assert_eq!(
            extract("A. LANGE & SÖHNE Saxonia – $18000").brand.as_deref(),
            Some("A. Lange & Söhne")
        );
        assert_eq!(pair(extract("🕰️⌚ ¿precio?")), (None, None));
    }
}
