//! Mock users and pets for seeding and demo endpoints.

use adoptme_db::{Pet, Role, User};
use chrono::NaiveDate;
use rand::seq::SliceRandom;

const ROLES: [Role; 2] = [Role::User, Role::Admin];
const SPECIES: [&str; 5] = ["Dog", "Cat", "Rabbit", "Hamster", "Bird"];
const NAMES: [&str; 10] = [
    "Max", "Luna", "Bella", "Charlie", "Lucy", "Cooper", "Daisy", "Milo", "Lola", "Rocky",
];

/// Generate `quantity` users sharing `password_hash`, with random roles.
pub fn generate_mock_users(quantity: usize, password_hash: &str) -> Vec<User> {
    let mut rng = rand::thread_rng();
    (1..=quantity)
        .map(|n| {
            let role = ROLES.choose(&mut rng).copied().unwrap_or_default();
            User::new(
                format!("User{n}"),
                format!("Lastname{n}"),
                format!("user{n}@mock.com"),
                password_hash,
                role,
            )
        })
        .collect()
}

/// Generate `quantity` unadopted pets cycling through names and species.
pub fn generate_mock_pets(quantity: usize) -> Vec<Pet> {
    (0..quantity)
        .map(|i| {
            Pet::new(
                format!("{}{}", NAMES[i % NAMES.len()], i + 1),
                SPECIES[i % SPECIES.len()],
                mock_birth_date(i),
            )
        })
        .collect()
}

fn mock_birth_date(i: usize) -> NaiveDate {
    let year = 2020 + (i % 4) as i32;
    let month = (i % 12) as u32 + 1;
    let day = (i % 28) as u32 + 1;
    // Day never exceeds 28, so every month accepts it.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
