pub mod fixture_transport;
pub mod graphql_transport;
