pub mod adoptions;
pub mod mocks;
pub mod pets;
pub mod users;

use adoptme_db::Stores;
use adoptme_kernel::{settings::Settings, ModuleRegistry};

use adoptions::workflow::AdoptionWorkflow;
use mocks::service::MockService;
use pets::service::PetService;
use users::service::UserService;

use crate::utils::gate::WriteGate;

/// Register every domain module with the registry. The user, pet and
/// adoption modules share one [`WriteGate`].
pub fn register_all(registry: &mut ModuleRegistry, stores: &Stores, settings: &Settings) {
    let gate = WriteGate::new();

    registry.register_core(users::create_module(UserService::new(
        stores.users.clone(),
        gate.clone(),
    )));
    registry.register_core(pets::create_module(PetService::new(
        stores.pets.clone(),
        gate.clone(),
    )));
    registry.register_core(adoptions::create_module(AdoptionWorkflow::from_stores(
        stores, gate,
    )));

    if settings.mocks.enabled {
        registry.register_custom(mocks::create_module(MockService::from_stores(
            stores,
            settings.mocks.clone(),
        )));
    } else {
        tracing::info!("mocks module disabled by configuration");
    }
}
