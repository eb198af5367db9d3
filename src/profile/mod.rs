//! User profile management

use crate::traits::*;
use crate::types::*;

/// Profile manager for the fields kept alongside the identity provider's
/// user record
pub struct ProfileManager<S: ProfileStore, H: ImageHost> {
    storage: S,
    images: H,
}

impl<S: ProfileStore, H: ImageHost> ProfileManager<S, H> {
    /// Create a new profile manager
    pub fn new(storage: S, images: H) -> Self {
        Self { storage, images }
    }

    /// Get a profile by user ID
    pub async fn get_profile(&self, uid: &str) -> LedgerResult<Option<UserProfile>> {
        self.storage.get_profile(uid).await
    }

    /// Merge profile changes for a user, creating the record on first write.
    ///
    /// A `Set` avatar is uploaded to the image host before the merge.
    pub async fn update_profile(
        &mut self,
        uid: &str,
        draft: ProfileDraft,
    ) -> LedgerResult<UserProfile> {
        if let Some(ref name) = draft.name {
            if name.trim().is_empty() {
                return Err(LedgerError::Validation(
                    "Profile name cannot be empty".to_string(),
                ));
            }
        }

        let mut profile = match self.storage.get_profile(uid).await? {
            Some(existing) => existing,
            None => {
                let name = draft.name.clone().ok_or_else(|| {
                    LedgerError::Validation("A new profile requires a name".to_string())
                })?;
                UserProfile::new(uid.to_string(), name)
            }
        };

        if let Some(name) = draft.name {
            profile.name = name;
        }

        profile.avatar = match draft.avatar {
            FieldUpdate::Unchanged => profile.avatar,
            FieldUpdate::Cleared => None,
            FieldUpdate::Set(image) => {
                let url = self.images.upload(&image, PROFILE_IMAGE_FOLDER).await?;
                Some(url)
            }
        };
        profile.updated_at = chrono::Utc::now().naive_utc();

        self.storage.save_profile(&profile).await?;
        tracing::debug!(uid = %uid, "updated profile");
        Ok(profile)
    }
}
