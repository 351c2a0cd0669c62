pub mod ports {
    pub mod repo;
}

pub mod services {
    pub mod export_service;
    pub mod import_service;
    pub mod query_service;
}
