use std::sync::Arc;

use crate::data_access::data_context::DataContext;
use crate::engine::association::AssociationEngine;
use crate::engine::query::QueryEngine;

pub struct AppState {
    pub data_context: DataContext,
    pub association: AssociationEngine<DataContext>,
    pub query: QueryEngine<DataContext>,
}

impl AppState {
    pub fn new(data_context: DataContext) -> Self {
        Self {
            association: AssociationEngine::new(data_context.clone()),
            query: QueryEngine::new(data_context.clone()),
            data_context,
        }
    }
}

pub type SharedState = Arc<AppState>;
