pub mod config;
pub mod error;
pub mod filter;
pub mod scroll;
pub mod store;
pub mod timeline;
pub mod measure {
    pub mod breakpoints;
    pub mod fit;
    pub mod grid;
    pub mod units;
}
pub mod tasks {
    pub mod collection;
    pub mod readiness;
}

pub use artwork_model as model;
