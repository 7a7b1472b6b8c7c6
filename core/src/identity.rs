use lazy_static::lazy_static;
use regex::Regex;

use crate::ProductId;

lazy_static! {
    static ref PRODUCT_URL: Regex =
        Regex::new(r"/product/(\d+)(?:\?variant=([\w-]+))?").expect("valid regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    pub product_id: ProductId,
    pub variant: Option<String>,
}

/// Outcome of resolving a record URL to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(ProductRef),
    NoMatch,
}

impl Extraction {
    pub fn product_id(&self) -> Option<&str> {
        match self {
            Extraction::Found(product) => Some(&product.product_id),
            Extraction::NoMatch => None,
        }
    }

    pub fn into_product(self) -> Option<ProductRef> {
        match self {
            Extraction::Found(product) => Some(product),
            Extraction::NoMatch => None,
        }
    }
}

/// Resolve `.../product/<digits>[?variant=<name>]` anywhere in `url`.
pub fn extract_product_info(url: &str) -> Extraction {
    if url.is_empty() {
        return Extraction::NoMatch;
    }
    match PRODUCT_URL.captures(url) {
        Some(caps) => Extraction::Found(ProductRef {
            product_id: caps[1].to_string(),
            variant: caps.get(2).map(|m| m.as_str().to_string()),
        }),
        None => {
            tracing::debug!(url, "no product id in url");
            Extraction::NoMatch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_and_variant() {
        let got = extract_product_info("https://shop.example/product/42?variant=blue-xl");
        assert_eq!(
            got,
            Extraction::Found(ProductRef { product_id: "42".into(), variant: Some("blue-xl".into()) })
        );
    }

    #[test]
    fn variant_is_optional() {
        let got = extract_product_info("https://shop.example/product/7");
        assert_eq!(got.product_id(), Some("7"));
        assert_eq!(got.into_product().and_then(|p| p.variant), None);
    }

    #[test]
    fn other_query_params_are_not_variants() {
        let got = extract_product_info("https://shop.example/product/7?ref=home");
        assert_eq!(
            got,
            Extraction::Found(ProductRef { product_id: "7".into(), variant: None })
        );
    }

    #[test]
    fn no_match_cases() {
        assert_eq!(extract_product_info(""), Extraction::NoMatch);
        assert_eq!(extract_product_info("https://shop.example/category/7"), Extraction::NoMatch);
        assert_eq!(extract_product_info("https://shop.example/product/abc"), Extraction::NoMatch);
    }
}
