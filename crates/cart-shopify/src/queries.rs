//! GraphQL operations for the Shopify Storefront API.

use graphql_client::GraphQLQuery;

// Custom scalars must be in scope where the derive expands
#[allow(clippy::upper_case_acronyms)]
type URL = String;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/cart.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CartCreate;
