use serde::{Deserialize, Serialize};

/// GET /api/menu response data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuResponse {
    pub beverages: Vec<String>,
}
