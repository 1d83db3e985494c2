//! HTTP naming of the catalog resources

use aisle_core::model::{Product, Resource, StaffMember, Stock, Supermarket};

use crate::hateoas::{LinkBuilder, LinkDto};

/// A [`Resource`] exposed under `/api/{ROUTE}`
pub trait RestResource: Resource {
    /// Path segment of the resource, e.g. `staffmembers`
    const ROUTE: &'static str;

    /// Suffix of the `delete_*`, `update_*` and `patch_*` link rels
    const LINK_NAME: &'static str;

    /// Path segment of the bulk endpoint, e.g. `productcollections`
    fn collection_route() -> String {
        format!("{}collections", Self::NAME)
    }

    /// Links to records nested under this one
    fn related_links(_links: &LinkBuilder, _id: i64) -> Vec<LinkDto> {
        Vec::new()
    }
}

impl RestResource for Supermarket {
    const ROUTE: &'static str = "supermarkets";
    const LINK_NAME: &'static str = "supermarket";

    fn related_links(links: &LinkBuilder, id: i64) -> Vec<LinkDto> {
        vec![
            LinkDto::new(
                links.href(&format!("/supermarkets/{id}/products")),
                "products",
                "GET",
            ),
            LinkDto::new(
                links.href(&format!("/supermarkets/{id}/staffmembers")),
                "staff",
                "GET",
            ),
        ]
    }
}

impl RestResource for Product {
    const ROUTE: &'static str = "products";
    const LINK_NAME: &'static str = "product";
}

impl RestResource for StaffMember {
    const ROUTE: &'static str = "staffmembers";
    const LINK_NAME: &'static str = "staff_member";
}

impl RestResource for Stock {
    const ROUTE: &'static str = "stock";
    const LINK_NAME: &'static str = "stock";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_routes() {
        assert_eq!(Supermarket::collection_route(), "supermarketcollections");
        assert_eq!(StaffMember::collection_route(), "staffmembercollections");
        assert_eq!(Stock::collection_route(), "stockcollections");
    }

    #[test]
    fn supermarket_links_include_nested_lists() {
        let rels: Vec<String> = LinkBuilder::default()
            .item_links::<Supermarket>(4, Some("location"))
            .into_iter()
            .map(|link| link.rel)
            .collect();
        assert_eq!(
            rels,
            vec![
                "self",
                "delete_supermarket",
                "products",
                "staff",
                "update_supermarket",
                "patch_supermarket"
            ]
        );
    }

    #[test]
    fn self_link_keeps_fields() {
        let links = LinkBuilder::default().item_links::<StaffMember>(9, Some("name,id"));
        assert_eq!(links[0].href, "/api/staffmembers/9?fields=name%2Cid");
        assert_eq!(links[1].rel, "delete_staff_member");
        assert_eq!(links[1].method, "DELETE");
    }
}
