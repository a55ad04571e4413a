pub mod aggregate;
pub mod config;
pub mod dates;
pub mod datesearch;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod migrate;
pub mod normalize;
pub mod output;
pub mod stops;
pub mod timestamp;
