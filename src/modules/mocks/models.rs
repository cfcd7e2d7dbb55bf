use serde::{Deserialize, Serialize};

/// Body of `POST /generateData`. Zero counts are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateData {
    pub users: Option<usize>,
    pub pets: Option<usize>,
}

impl GenerateData {
    pub fn users(&self) -> Option<usize> {
        self.users.filter(|&n| n > 0)
    }

    pub fn pets(&self) -> Option<usize> {
        self.pets.filter(|&n| n > 0)
    }
}

/// One inserted batch and its records.
#[derive(Debug, Serialize)]
pub struct Batch<T> {
    pub quantity: usize,
    pub data: Vec<T>,
}

impl<T> Batch<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            quantity: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GeneratedData<U, P> {
    pub users: Option<Batch<U>>,
    pub pets: Option<Batch<P>>,
}
