//! Adoption workflow: checks a user and an unadopted pet, then records the
//! adoption across the users, pets and adoptions collections.
//!
//! The three writes are sequential. A failing write rolls back the earlier
//! ones by restoring the snapshots taken before the first write. The whole
//! check-then-write section runs under the [`WriteGate`] shared with the
//! user and pet services, so two requests for the same pet cannot both pass
//! the "not yet adopted" check and no edit can overwrite an adoption.

use std::sync::Arc;

use adoptme_db::{
    Adoption, AdoptionFilter, AdoptionId, AdoptionStore, Pet, PetFilter, PetId, PetStore, Stores,
    User, UserId, UserStore,
};

use crate::error::{ServiceError, ServiceResult};
use crate::utils::gate::WriteGate;

pub const USER_NOT_FOUND: &str = "user Not found";
pub const PET_NOT_FOUND: &str = "Pet not found";
pub const PET_ALREADY_ADOPTED: &str = "Pet is already adopted";
pub const ADOPTION_NOT_FOUND: &str = "Adoption not found";

pub struct AdoptionWorkflow {
    users: Arc<dyn UserStore>,
    pets: Arc<dyn PetStore>,
    adoptions: Arc<dyn AdoptionStore>,
    gate: WriteGate,
}

impl AdoptionWorkflow {
    pub fn new(
        users: Arc<dyn UserStore>,
        pets: Arc<dyn PetStore>,
        adoptions: Arc<dyn AdoptionStore>,
        gate: WriteGate,
    ) -> Self {
        Self {
            users,
            pets,
            adoptions,
            gate,
        }
    }

    pub fn from_stores(stores: &Stores, gate: WriteGate) -> Self {
        Self::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.pets),
            Arc::clone(&stores.adoptions),
            gate,
        )
    }

    /// Every adoption record; empty when none exist.
    pub async fn list_all(&self) -> ServiceResult<Vec<Adoption>> {
        Ok(self.adoptions.get_all().await?)
    }

    pub async fn get_by_id(&self, id: &AdoptionId) -> ServiceResult<Adoption> {
        self.adoptions
            .get_by(&AdoptionFilter::by_id(id.clone()))
            .await?
            .ok_or_else(|| ServiceError::not_found(ADOPTION_NOT_FOUND))
    }

    /// Adopt `pet_id` on behalf of `user_id`.
    pub async fn create(&self, user_id: &UserId, pet_id: &PetId) -> ServiceResult<Adoption> {
        if user_id.is_blank() {
            return Err(ServiceError::validation("Missing user id"));
        }
        if pet_id.is_blank() {
            return Err(ServiceError::validation("Missing pet id"));
        }

        let _gate = self.gate.enter().await;

        let mut user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))?;

        let mut pet = self
            .pets
            .get_by(&PetFilter::by_id(pet_id.clone()))
            .await?
            .ok_or_else(|| ServiceError::not_found(PET_NOT_FOUND))?;

        if pet.adopted {
            return Err(ServiceError::conflict(PET_ALREADY_ADOPTED));
        }

        let adoption = Adoption::new(user.id.clone(), pet.id.clone());
        let user_before = user.clone();
        let pet_before = pet.clone();

        user.add_pet(pet.id.clone(), adoption.id.clone());
        self.users.update(&user).await?;

        pet.mark_adopted(user.id.clone());
        if let Err(err) = self.pets.update(&pet).await {
            self.restore_user(&user_before).await;
            return Err(err.into());
        }

        let adoption = match self.adoptions.create(adoption).await {
            Ok(adoption) => adoption,
            Err(err) => {
                self.restore_pet(&pet_before).await;
                self.restore_user(&user_before).await;
                return Err(err.into());
            }
        };

        tracing::info!(
            adoption_id = %adoption.id,
            user_id = %adoption.owner,
            pet_id = %adoption.pet,
            "pet adopted"
        );
        Ok(adoption)
    }

    async fn restore_user(&self, snapshot: &User) {
        match self.users.update(snapshot).await {
            Ok(()) => tracing::warn!(user_id = %snapshot.id, "adoption rolled back user"),
            Err(err) => tracing::error!(
                user_id = %snapshot.id,
                error = %err,
                "failed to roll back user after adoption failure"
            ),
        }
    }

    async fn restore_pet(&self, snapshot: &Pet) {
        match self.pets.update(snapshot).await {
            Ok(()) => tracing::warn!(pet_id = %snapshot.id, "adoption rolled back pet"),
            Err(err) => tracing::error!(
                pet_id = %snapshot.id,
                error = %err,
                "failed to roll back pet after adoption failure"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    use adoptme_db::stores::{MockAdoptionStore, MockPetStore, MockUserStore};
    use adoptme_db::{Database, Role, StoreError};
    use chrono::NaiveDate;

    fn user() -> User {
        let mut user = User::new("Juan", "Perez", "juan@example.com", "hash", Role::User);
        user.id = UserId::new("507f1f77bcf86cd799439012");
        user
    }

    fn pet(adopted: bool) -> Pet {
        let mut pet = Pet::new("Max", "Dog", NaiveDate::from_ymd_opt(2020, 5, 17).unwrap());
        pet.id = PetId::new("507f1f77bcf86cd799439013");
        pet.adopted = adopted;
        pet
    }

    fn disk_full() -> StoreError {
        StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
    }

    fn workflow(
        users: MockUserStore,
        pets: MockPetStore,
        adoptions: MockAdoptionStore,
    ) -> AdoptionWorkflow {
        AdoptionWorkflow::new(
            Arc::new(users),
            Arc::new(pets),
            Arc::new(adoptions),
            WriteGate::new(),
        )
    }

    fn found_user(users: &mut MockUserStore) {
        let user = user();
        users
            .expect_get_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
    }

    fn found_pet(pets: &mut MockPetStore, adopted: bool) {
        let pet = pet(adopted);
        pets.expect_get_by()
            .withf(|filter: &PetFilter| {
                filter.id.as_ref().map(PetId::as_str) == Some("507f1f77bcf86cd799439013")
            })
            .times(1)
            .returning(move |_| Ok(Some(pet.clone())));
    }

    #[tokio::test]
    async fn create_writes_user_then_pet_then_adoption() {
        let mut users = MockUserStore::new();
        let mut pets = MockPetStore::new();
        let mut adoptions = MockAdoptionStore::new();

        found_user(&mut users);
        found_pet(&mut pets, false);
        users
            .expect_update()
            .withf(|user: &User| {
                user.pets.len() == 1 && user.pets[0].pet.as_str() == "507f1f77bcf86cd799439013"
            })
            .times(1)
            .returning(|_| Ok(()));
        pets.expect_update()
            .withf(|pet: &Pet| {
                pet.adopted
                    && pet.owner.as_ref().map(UserId::as_str) == Some("507f1f77bcf86cd799439012")
            })
            .times(1)
            .returning(|_| Ok(()));
        adoptions
            .expect_create()
            .times(1)
            .returning(|adoption| Ok(adoption));

        let adoption = workflow(users, pets, adoptions)
            .create(&user().id, &pet(false).id)
            .await
            .unwrap();

        assert_eq!(adoption.owner, user().id);
        assert_eq!(adoption.pet, pet(false).id);
    }

    #[tokio::test]
    async fn missing_user_stops_before_reading_the_pet() {
        let mut users = MockUserStore::new();
        let mut pets = MockPetStore::new();
        let mut adoptions = MockAdoptionStore::new();

        users
            .expect_get_by_id()
            .times(1)
            .returning(|_| Ok(None));
        users.expect_update().never();
        pets.expect_get_by().never();
        pets.expect_update().never();
        adoptions.expect_create().never();

        let err = workflow(users, pets, adoptions)
            .create(&user().id, &pet(false).id)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "user Not found"));
    }

    #[tokio::test]
    async fn missing_pet_leaves_the_user_untouched() {
        let mut users = MockUserStore::new();
        let mut pets = MockPetStore::new();
        let mut adoptions = MockAdoptionStore::new();

        found_user(&mut users);
        pets.expect_get_by().times(1).returning(|_| Ok(None));
        users.expect_update().never();
        adoptions.expect_create().never();

        let err = workflow(users, pets, adoptions)
            .create(&user().id, &pet(false).id)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Pet not found"));
    }

    #[tokio::test]
    async fn adopted_pet_conflicts_without_writes() {
        let mut users = MockUserStore::new();
        let mut pets = MockPetStore::new();
        let mut adoptions = MockAdoptionStore::new();

        found_user(&mut users);
        found_pet(&mut pets, true);
        users.expect_update().never();
        pets.expect_update().never();
        adoptions.expect_create().never();

        let err = workflow(users, pets, adoptions)
            .create(&user().id, &pet(true).id)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "Pet is already adopted"));
    }

    #[tokio::test]
    async fn blank_ids_fail_validation_without_store_access() {
        let wf = workflow(
            MockUserStore::new(),
            MockPetStore::new(),
            MockAdoptionStore::new(),
        );

        let err = wf.create(&UserId::new(" "), &pet(false).id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = wf.create(&user().id, &PetId::new("")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn failed_pet_write_restores_the_user() {
        let mut users = MockUserStore::new();
        let mut pets = MockPetStore::new();
        let mut adoptions = MockAdoptionStore::new();
        let written = Arc::new(StdMutex::new(Vec::new()));

        found_user(&mut users);
        found_pet(&mut pets, false);
        let log = Arc::clone(&written);
        users.expect_update().times(2).returning(move |user| {
            log.lock().unwrap().push(user.clone());
            Ok(())
        });
        pets.expect_update().times(1).returning(|_| Err(disk_full()));
        adoptions.expect_create().never();

        let err = workflow(users, pets, adoptions)
            .create(&user().id, &pet(false).id)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Internal(StoreError::Io(_))));
        let written = written.lock().unwrap();
        assert_eq!(written[0].pets.len(), 1);
        assert_eq!(written[1], user());
    }

    #[tokio::test]
    async fn failed_adoption_write_restores_pet_and_user() {
        let mut users = MockUserStore::new();
        let mut pets = MockPetStore::new();
        let mut adoptions = MockAdoptionStore::new();
        let pet_writes = Arc::new(StdMutex::new(Vec::new()));
        let user_writes = Arc::new(StdMutex::new(Vec::new()));

        found_user(&mut users);
        found_pet(&mut pets, false);
        let log = Arc::clone(&user_writes);
        users.expect_update().times(2).returning(move |user| {
            log.lock().unwrap().push(user.clone());
            Ok(())
        });
        let log = Arc::clone(&pet_writes);
        pets.expect_update().times(2).returning(move |pet| {
            log.lock().unwrap().push(pet.clone());
            Ok(())
        });
        adoptions
            .expect_create()
            .times(1)
            .returning(|_| Err(disk_full()));

        let err = workflow(users, pets, adoptions)
            .create(&user().id, &pet(false).id)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Internal(_)));
        assert_eq!(pet_writes.lock().unwrap().last(), Some(&pet(false)));
        assert_eq!(user_writes.lock().unwrap().last(), Some(&user()));
    }

    #[tokio::test]
    async fn storage_failures_surface_as_internal() {
        let mut users = MockUserStore::new();
        users
            .expect_get_by_id()
            .returning(|_| Err(StoreError::unknown_collection("users")));

        let err = workflow(users, MockPetStore::new(), MockAdoptionStore::new())
            .create(&user().id, &pet(false).id)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn get_by_id_reports_missing_adoptions() {
        let mut adoptions = MockAdoptionStore::new();
        adoptions.expect_get_by().returning(|_| Ok(None));

        let err = workflow(MockUserStore::new(), MockPetStore::new(), adoptions)
            .get_by_id(&AdoptionId::new("507f1f77bcf86cd799439011"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Adoption not found"));
    }

    async fn seeded() -> (Stores, User, Pet) {
        let db = Database::in_memory();
        for name in Stores::COLLECTIONS {
            db.ensure_collection(name).await;
        }
        let stores = Stores::document(&db);
        let user = stores.users.create(user()).await.unwrap();
        let pet = stores.pets.create(pet(false)).await.unwrap();
        (stores, user, pet)
    }

    #[tokio::test]
    async fn create_links_user_pet_and_adoption() {
        let (stores, user, pet) = seeded().await;
        let wf = AdoptionWorkflow::from_stores(&stores, WriteGate::new());

        let adoption = wf.create(&user.id, &pet.id).await.unwrap();

        let stored_pet = stores
            .pets
            .get_by(&PetFilter::by_id(pet.id.clone()))
            .await
            .unwrap()
            .unwrap();
        assert!(stored_pet.adopted);
        assert_eq!(stored_pet.owner, Some(user.id.clone()));

        let stored_user = stores.users.get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored_user.pets.len(), 1);
        assert_eq!(stored_user.pets[0].pet, pet.id);
        assert_eq!(stored_user.pets[0].adoption, adoption.id);

        assert_eq!(wf.get_by_id(&adoption.id).await.unwrap(), adoption);
        assert_eq!(wf.list_all().await.unwrap(), vec![adoption]);
    }

    #[tokio::test]
    async fn second_adoption_of_a_pet_conflicts() {
        let (stores, user, pet) = seeded().await;
        let wf = AdoptionWorkflow::from_stores(&stores, WriteGate::new());

        wf.create(&user.id, &pet.id).await.unwrap();
        let err = wf.create(&user.id, &pet.id).await.unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(wf.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adoptions_of_one_pet_yield_one_success() {
        let (stores, first, pet) = seeded().await;
        let second = stores
            .users
            .create(User::new("Ana", "Gomez", "ana@example.com", "hash", Role::User))
            .await
            .unwrap();
        let wf = Arc::new(AdoptionWorkflow::from_stores(&stores, WriteGate::new()));

        let tasks: Vec<_> = [first.id.clone(), second.id.clone()]
            .into_iter()
            .map(|user_id| {
                let wf = Arc::clone(&wf);
                let pet_id = pet.id.clone();
                tokio::spawn(async move { wf.create(&user_id, &pet_id).await })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => successes += 1,
                Err(ServiceError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!((successes, conflicts), (1, 1));
        assert_eq!(wf.list_all().await.unwrap().len(), 1);

        let owners = [first.id, second.id];
        let mut owning = 0;
        for id in &owners {
            let user = stores.users.get_by_id(id).await.unwrap().unwrap();
            if user.owns(&pet.id) {
                owning += 1;
            }
        }
        assert_eq!(owning, 1);
    }

    #[tokio::test]
    async fn list_all_is_empty_without_adoptions() {
        let (stores, _, _) = seeded().await;
        let wf = AdoptionWorkflow::from_stores(&stores, WriteGate::new());
        assert!(wf.list_all().await.unwrap().is_empty());
    }
}
