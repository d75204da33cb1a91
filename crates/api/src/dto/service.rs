use dashlet_domain::ServicePatch;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceRequest {
    pub url: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl From<CreateServiceRequest> for ServicePatch {
    fn from(req: CreateServiceRequest) -> Self {
        ServicePatch {
            url: Some(req.url),
            name: req.name,
            icon: req.icon,
            description: req.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderServicesRequest {
    pub ids: Vec<String>,
}
