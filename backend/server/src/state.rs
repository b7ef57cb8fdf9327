use std::sync::Arc;

use parking_lot::RwLock;

use super::{config::Config, database::Catalog};

pub struct State {
    pub config: Config,
    pub catalog: RwLock<Catalog>,
}

impl State {
    pub fn new(config: Config) -> Arc<Self> {
        let catalog = if config.seed_catalog {
            Catalog::seeded()
        } else {
            Catalog::new()
        };

        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(config: Config, catalog: Catalog) -> Arc<Self> {
        Arc::new(Self {
            config,
            catalog: RwLock::new(catalog),
        })
    }
}
