//! Table descriptors binding each resource to its SQL shape

use sqlx::Postgres;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs};

use crate::model::{
    Product, Resource, StaffFilter, StaffMember, Stock, StockFilter, Supermarket,
};

pub type RowQuery<'q, R> = QueryAs<'q, Postgres, R, PgArguments>;
pub type WriteQuery<'q> = Query<'q, Postgres, PgArguments>;

/// SQL layout of a resource table.
///
/// `WRITE_COLUMNS` lists the non-id columns in the order `bind_creation` and
/// `bind_update` bind them.
pub trait PostgresTable: Resource + for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    const WRITE_COLUMNS: &'static [&'static str];

    fn bind_creation<'q>(query: RowQuery<'q, Self>, draft: Self::ForCreation) -> RowQuery<'q, Self>;

    fn bind_update<'q>(query: WriteQuery<'q>, entity: &Self) -> WriteQuery<'q>;

    /// Column equality pairs for the list filter
    fn filter_columns(_filter: &Self::Filter) -> Vec<(&'static str, i64)> {
        Vec::new()
    }
}

impl PostgresTable for Supermarket {
    const TABLE: &'static str = "supermarkets";
    const WRITE_COLUMNS: &'static [&'static str] = &["location", "number_of_staff"];

    fn bind_creation<'q>(query: RowQuery<'q, Self>, draft: Self::ForCreation) -> RowQuery<'q, Self> {
        query.bind(draft.location).bind(draft.number_of_staff)
    }

    fn bind_update<'q>(query: WriteQuery<'q>, entity: &Self) -> WriteQuery<'q> {
        query
            .bind(entity.location.clone())
            .bind(entity.number_of_staff)
    }
}

impl PostgresTable for Product {
    const TABLE: &'static str = "products";
    const WRITE_COLUMNS: &'static [&'static str] = &["name", "price"];

    fn bind_creation<'q>(query: RowQuery<'q, Self>, draft: Self::ForCreation) -> RowQuery<'q, Self> {
        query.bind(draft.name).bind(draft.price)
    }

    fn bind_update<'q>(query: WriteQuery<'q>, entity: &Self) -> WriteQuery<'q> {
        query.bind(entity.name.clone()).bind(entity.price)
    }
}

impl PostgresTable for StaffMember {
    const TABLE: &'static str = "staff_members";
    const WRITE_COLUMNS: &'static [&'static str] =
        &["name", "phone_number", "address", "supermarket_id"];

    fn bind_creation<'q>(query: RowQuery<'q, Self>, draft: Self::ForCreation) -> RowQuery<'q, Self> {
        query
            .bind(draft.name)
            .bind(draft.phone_number)
            .bind(draft.address)
            .bind(draft.supermarket_id)
    }

    fn bind_update<'q>(query: WriteQuery<'q>, entity: &Self) -> WriteQuery<'q> {
        query
            .bind(entity.name.clone())
            .bind(entity.phone_number.clone())
            .bind(entity.address.clone())
            .bind(entity.supermarket_id)
    }

    fn filter_columns(filter: &StaffFilter) -> Vec<(&'static str, i64)> {
        filter
            .supermarket_id
            .map(|id| ("supermarket_id", id))
            .into_iter()
            .collect()
    }
}

impl PostgresTable for Stock {
    const TABLE: &'static str = "supermarket_stock";
    const WRITE_COLUMNS: &'static [&'static str] =
        &["supermarket_id", "product_id", "number_in_stock"];

    fn bind_creation<'q>(query: RowQuery<'q, Self>, draft: Self::ForCreation) -> RowQuery<'q, Self> {
        query
            .bind(draft.supermarket_id)
            .bind(draft.product_id)
            .bind(draft.number_in_stock)
    }

    fn bind_update<'q>(query: WriteQuery<'q>, entity: &Self) -> WriteQuery<'q> {
        query
            .bind(entity.supermarket_id)
            .bind(entity.product_id)
            .bind(entity.number_in_stock)
    }

    fn filter_columns(filter: &StockFilter) -> Vec<(&'static str, i64)> {
        [
            filter.supermarket_id.map(|id| ("supermarket_id", id)),
            filter.product_id.map(|id| ("product_id", id)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
