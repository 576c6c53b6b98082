//---------------------------------------
pub mod web_api {
    pub mod routes;
    pub mod controllers;
}

pub use web_api::routes::map_routes;
pub use web_api::controllers::*;
//---------------------------------------

//---------------------------------------
pub mod shared {
    pub mod models;
    pub mod dto;
    pub mod error;
    pub mod validation;
}

pub use shared::models::*;
pub use shared::dto::*;
pub use shared::error::{EngineError, EngineResult, StoreError};
//---------------------------------------

//---------------------------------------
pub mod engine {
    pub mod association;
    pub mod locks;
    pub mod query;
}
//---------------------------------------

//---------------------------------------
pub mod data_access {
    pub mod data_context;
    pub mod memory_context;
    pub mod repository;
}
//---------------------------------------
