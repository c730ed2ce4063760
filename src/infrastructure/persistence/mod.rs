mod graphql;

pub use graphql::*;
