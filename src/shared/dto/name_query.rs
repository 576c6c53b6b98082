use serde::Deserialize;

/// `?name=` query string used by the project filter and task search routes.
#[derive(Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}
