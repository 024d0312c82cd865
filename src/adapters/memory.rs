use crate::core::cargo::Cargo;
use crate::domain::model::TrackingId;
use crate::domain::ports::CargoRepository;
use crate::utils::error::{Result, TrackingError};
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local cargo store, used by the CLI and tests.
#[derive(Debug, Default)]
pub struct InMemoryCargoRepository {
    cargos: RwLock<HashMap<TrackingId, Cargo>>,
}

impl InMemoryCargoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> TrackingError {
    TrackingError::RepositoryError {
        message: "cargo store lock poisoned".to_string(),
    }
}

impl CargoRepository for InMemoryCargoRepository {
    fn find(&self, tracking_id: &TrackingId) -> Result<Option<Cargo>> {
        let cargos = self.cargos.read().map_err(|_| poisoned())?;
        Ok(cargos.get(tracking_id).cloned())
    }

    fn store(&self, cargo: Cargo) -> Result<()> {
        let mut cargos = self.cargos.write().map_err(|_| poisoned())?;
        cargos.insert(cargo.tracking_id().clone(), cargo);
        Ok(())
    }

    fn find_all(&self) -> Result<Vec<Cargo>> {
        let cargos = self.cargos.read().map_err(|_| poisoned())?;
        let mut all: Vec<Cargo> = cargos.values().cloned().collect();
        all.sort_by(|a, b| a.tracking_id().cmp(b.tracking_id()));
        Ok(all)
    }

    fn update<T, F>(&self, tracking_id: &TrackingId, change: F) -> Result<T>
    where
        F: FnOnce(&mut Cargo) -> Result<T>,
    {
        let mut cargos = self.cargos.write().map_err(|_| poisoned())?;
        let mut cargo = cargos
            .get(tracking_id)
            .cloned()
            .ok_or_else(|| TrackingError::CargoNotFound {
                tracking_id: tracking_id.to_string(),
            })?;

        let value = change(&mut cargo)?;
        cargos.insert(cargo.tracking_id().clone(), cargo);
        Ok(value)
    }

    fn update_all<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut [Cargo]) -> Result<T>,
    {
        let mut cargos = self.cargos.write().map_err(|_| poisoned())?;
        let mut working: Vec<Cargo> = cargos.values().cloned().collect();
        working.sort_by(|a, b| a.tracking_id().cmp(b.tracking_id()));

        let value = change(&mut working)?;
        for cargo in working {
            cargos.insert(cargo.tracking_id().clone(), cargo);
        }
        Ok(value)
    }
}
