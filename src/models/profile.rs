use serde::{Deserialize, Serialize};

/// Profile record stored in redb, keyed by the owning account id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileRecord {
    pub name: String,
    pub bio: String,
    /// Opaque image reference (URL or storage path)
    pub image: Option<String>,
}

/// Profile model for API responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: u64,
    pub name: String,
    pub bio: String,
    pub image: Option<String>,
}

impl ProfileRecord {
    pub fn into_profile(self, id: u64) -> Profile {
        Profile {
            id,
            name: self.name,
            bio: self.bio,
            image: self.image,
        }
    }
}

/// Partial profile update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub bio: Option<String>,
    /// `Some(None)` clears the image
    pub image: Option<Option<String>>,
}

impl ProfileChanges {
    pub fn apply(self, record: &mut ProfileRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(bio) = self.bio {
            record.bio = bio;
        }
        if let Some(image) = self.image {
            record.image = image;
        }
    }
}
