use crate::core::cargo::Cargo;
use crate::domain::model::TrackingId;
use crate::utils::error::Result;

/// Loads and stores cargo aggregates by tracking id.
///
/// Implementations must make `store` replace any earlier version of the cargo, so
/// a find-modify-store sequence never leaves two copies behind.
pub trait CargoRepository: Send + Sync {
    fn find(&self, tracking_id: &TrackingId) -> Result<Option<Cargo>>;
    fn store(&self, cargo: Cargo) -> Result<()>;
    fn find_all(&self) -> Result<Vec<Cargo>>;

    /// Runs `change` on one cargo as a single critical section. The modified cargo
    /// is stored only when `change` returns `Ok`.
    fn update<T, F>(&self, tracking_id: &TrackingId, change: F) -> Result<T>
    where
        F: FnOnce(&mut Cargo) -> Result<T>;

    /// Runs `change` over every stored cargo, ordered by tracking id, as a single
    /// critical section. Either all modifications are stored or none are.
    fn update_all<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut [Cargo]) -> Result<T>;
}
