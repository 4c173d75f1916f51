//! GROQ queries against the content store.
//!
//! Projections flatten the stored documents into the shapes
//! `boutique_core` deserializes: image assets become URLs, the slug object
//! becomes its `current` string, and legacy field names (`basePrice`,
//! `overridePrice`, `image`) are coalesced with the current ones.

/// Shared product projection.
macro_rules! product_projection {
    () => {
        r#"{
  _id,
  title,
  "price": coalesce(price, basePrice),
  description,
  "image": coalesce(defaultImage.asset->url, image.asset->url),
  "colors": colorImages[]{ "name": color, "image": image.asset->url },
  "variants": variants[]{
    color,
    size,
    "quantity": coalesce(quantity, 0),
    "priceOverride": coalesce(priceOverride, overridePrice),
    sku
  },
  "slug": slug.current
}"#
    };
}

/// All published products with a slug, ordered by title.
pub const PRODUCTS: &str = concat!(
    r#"*[_type == "product" && defined(slug.current)] | order(title asc) "#,
    product_projection!()
);

/// One product by slug. Parameter: `$slug`.
pub const PRODUCT_BY_SLUG: &str = concat!(
    r#"*[_type == "product" && slug.current == $slug][0] "#,
    product_projection!()
);

/// Navigation collections.
pub const COLLECTIONS: &str = r#"*[_type == "collection"] | order(name asc) { _id, name, linkTarget }"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_queries_share_projection() {
        assert!(PRODUCTS.contains(r#""slug": slug.current"#));
        assert!(PRODUCT_BY_SLUG.contains("slug.current == $slug"));
        assert!(PRODUCT_BY_SLUG.contains(r#""priceOverride""#));
    }
}
