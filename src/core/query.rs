//! Catalog query semantics shared by every product store.
//!
//! Filtering, sorting and pagination live here once. Stores may narrow their
//! results early, but the catalog always runs the full [`ProductFilter`] and
//! [`SortOrder`] from this module so that the static snapshot and the live table
//! answer the same query the same way.

use crate::{
    entities::product,
    errors::{Error, Result},
};
use serde::Serialize;
use std::{cmp::Ordering, fmt, str::FromStr};

/// Ordering applied to a filtered product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Featured products first, otherwise source order
    #[default]
    Featured,
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
    /// Highest id first; ids stand in for listing age
    Newest,
}

impl SortOrder {
    /// The wire name of this sort order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Newest => "newest",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "featured" => Ok(Self::Featured),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "newest" => Ok(Self::Newest),
            other => Err(Error::InvalidSort {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filters plus an optional free-text search over titles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Exact sub-category match
    pub sub_category: Option<String>,
    /// Exact brand match
    pub brand: Option<String>,
    /// Whitespace-separated terms that must all appear in the title
    pub search: Option<String>,
}

impl ProductFilter {
    /// Lowercased search terms; empty when there is no search or it is blank.
    #[must_use]
    pub fn search_tokens(&self) -> Vec<String> {
        self.search
            .as_deref()
            .map(|query| query.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default()
    }

    /// Whether `product` passes every filter that is set.
    #[must_use]
    pub fn matches(&self, product: &product::Model) -> bool {
        if self
            .category
            .as_ref()
            .is_some_and(|category| product.category != *category)
        {
            return false;
        }
        if self
            .sub_category
            .as_deref()
            .is_some_and(|sub| product.sub_category.as_deref() != Some(sub))
        {
            return false;
        }
        if self
            .brand
            .as_deref()
            .is_some_and(|brand| product.brand.as_deref() != Some(brand))
        {
            return false;
        }

        let tokens = self.search_tokens();
        if tokens.is_empty() {
            return true;
        }
        let title = product.title.to_lowercase();
        tokens.iter().all(|token| title.contains(token.as_str()))
    }
}

/// A validated, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Builds a page request. Page `0` is read as the first page.
    ///
    /// # Errors
    /// Returns `Error::InvalidPagination` when `limit` is zero.
    pub fn new(page: u64, limit: u64) -> Result<Self> {
        if limit == 0 {
            return Err(Error::InvalidPagination {
                message: "limit must be at least 1".to_string(),
            });
        }
        Ok(Self {
            page: page.max(1),
            limit,
        })
    }

    /// 1-indexed page number
    #[must_use]
    pub const fn page(self) -> u64 {
        self.page
    }

    /// Page size
    #[must_use]
    pub const fn limit(self) -> u64 {
        self.limit
    }

    const fn offset(self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Page position and totals reported alongside every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-indexed page number
    pub page: u64,
    /// Page size
    pub limit: u64,
    /// Number of items across all pages
    pub total_items: u64,
    /// Number of pages, never less than one
    pub total_pages: u64,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Position and totals
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Converts every item while keeping the pagination.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Total page count for `total_items`, floored at one so an empty result still
/// reports a single page.
#[must_use]
pub const fn total_pages(total_items: u64, limit: u64) -> u64 {
    let pages = total_items.div_ceil(limit);
    if pages == 0 { 1 } else { pages }
}

/// Sorts products in place. Ties keep their incoming order.
pub fn sort_products(products: &mut [product::Model], order: SortOrder) {
    match order {
        SortOrder::Featured => products.sort_by_key(|p| !p.featured),
        SortOrder::PriceAsc => products.sort_by(|a, b| compare_price(a.price, b.price)),
        SortOrder::PriceDesc => products.sort_by(|a, b| compare_price(b.price, a.price)),
        SortOrder::Newest => products.sort_by(|a, b| b.id.cmp(&a.id)),
    }
}

fn compare_price(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Cuts `[(page-1)*limit, page*limit)` out of `items`.
#[must_use]
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_items = items.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);

    let items: Vec<T> = items.into_iter().skip(offset).take(limit).collect();

    Page {
        items,
        pagination: Pagination {
            page: request.page(),
            limit: request.limit(),
            total_items,
            total_pages: total_pages(total_items, request.limit()),
        },
    }
}

/// Filter, sort, then paginate.
#[must_use]
pub fn run_query(
    products: Vec<product::Model>,
    filter: &ProductFilter,
    order: SortOrder,
    request: PageRequest,
) -> Page<product::Model> {
    let mut matched: Vec<product::Model> =
        products.into_iter().filter(|p| filter.matches(p)).collect();
    sort_products(&mut matched, order);
    paginate(matched, request)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::sample_product;

    fn catalog_of_ten() -> Vec<product::Model> {
        (1..=10)
            .map(|id| {
                let mut p = sample_product(id, &format!("Item {id}"), f64::from(id as i32) * 10.0);
                p.featured = matches!(id, 3 | 6 | 9);
                p
            })
            .collect()
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("featured".parse::<SortOrder>().unwrap(), SortOrder::Featured);
        assert_eq!("price-asc".parse::<SortOrder>().unwrap(), SortOrder::PriceAsc);
        assert_eq!("price-desc".parse::<SortOrder>().unwrap(), SortOrder::PriceDesc);
        assert_eq!("newest".parse::<SortOrder>().unwrap(), SortOrder::Newest);
        assert!(matches!(
            "cheapest".parse::<SortOrder>(),
            Err(Error::InvalidSort { .. })
        ));
        assert_eq!(SortOrder::PriceDesc.to_string(), "price-desc");
    }

    #[test]
    fn test_featured_first_page() {
        let page = run_query(
            catalog_of_ten(),
            &ProductFilter::default(),
            SortOrder::Featured,
            PageRequest::new(1, 4).unwrap(),
        );

        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 6, 9, 1]);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.total_items, 10);
    }

    #[test]
    fn test_pages_reconstruct_filtered_set() {
        let products = catalog_of_ten();
        let filter = ProductFilter::default();
        let mut seen = Vec::new();
        for page in 1..=3 {
            let result = run_query(
                products.clone(),
                &filter,
                SortOrder::Newest,
                PageRequest::new(page, 4).unwrap(),
            );
            seen.extend(result.items.into_iter().map(|p| p.id));
        }

        assert_eq!(seen, vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_page_past_end_is_empty_with_totals() {
        let page = paginate(catalog_of_ten(), PageRequest::new(7, 4).unwrap());
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn test_empty_result_reports_one_page() {
        let page = paginate(Vec::<u8>::new(), PageRequest::new(1, 12).unwrap());
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(total_pages(0, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
    }

    #[test]
    fn test_page_zero_reads_as_first_and_zero_limit_rejected() {
        assert_eq!(PageRequest::new(0, 5).unwrap().page(), 1);
        assert!(matches!(
            PageRequest::new(1, 0),
            Err(Error::InvalidPagination { .. })
        ));
    }

    #[test]
    fn test_price_sorts_are_reverses_without_ties() {
        let mut asc = catalog_of_ten();
        let mut desc = catalog_of_ten();
        sort_products(&mut asc, SortOrder::PriceAsc);
        sort_products(&mut desc, SortOrder::PriceDesc);

        desc.reverse();
        assert_eq!(asc, desc);
        assert_eq!(asc[0].id, 1);
    }

    #[test]
    fn test_price_sort_keeps_ties_in_source_order() {
        let mut products = vec![
            sample_product(1, "A", 20.0),
            sample_product(2, "B", 10.0),
            sample_product(3, "C", 20.0),
        ];
        sort_products(&mut products, SortOrder::PriceDesc);
        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn test_equality_filters() {
        let mut products = catalog_of_ten();
        products[0].category = "Bags".to_string();
        products[0].brand = Some("Acme".to_string());
        products[1].category = "Bags".to_string();
        products[1].sub_category = Some("Totes".to_string());

        let bags = ProductFilter {
            category: Some("Bags".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(products.iter().filter(|p| bags.matches(p)).count(), 2);

        let totes = ProductFilter {
            category: Some("Bags".to_string()),
            sub_category: Some("Totes".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(products.iter().filter(|p| totes.matches(p)).count(), 1);

        let acme = ProductFilter {
            brand: Some("Acme".to_string()),
            ..ProductFilter::default()
        };
        let matched: Vec<i64> = products
            .iter()
            .filter(|p| acme.matches(p))
            .map(|p| p.id)
            .collect();
        assert_eq!(matched, vec![1]);
    }

    #[test]
    fn test_search_requires_every_token() {
        let products = vec![
            sample_product(1, "Black Leather Tote Bag", 10.0),
            sample_product(2, "Black Canvas Sneaker", 10.0),
            sample_product(3, "Leather Belt", 10.0),
        ];
        let filter = ProductFilter {
            search: Some("  leather   BLACK ".to_string()),
            ..ProductFilter::default()
        };

        let matched: Vec<i64> = products
            .iter()
            .filter(|p| filter.matches(p))
            .map(|p| p.id)
            .collect();
        assert_eq!(matched, vec![1]);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let filter = ProductFilter {
            search: Some("   ".to_string()),
            ..ProductFilter::default()
        };
        assert!(filter.search_tokens().is_empty());
        assert!(filter.matches(&sample_product(1, "Anything", 1.0)));
    }
}
