//! Repository tuning loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// What a repository does with `delete` on an entity type that has no soft
/// deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UntrackedDelete {
    /// Remove the row physically.
    #[default]
    HardDelete,
    /// Refuse the delete as an invalid argument.
    Reject,
}

/// Configuration values for repositories and the CRUD service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CRUD")]
pub struct RepositorySettings {
    /// Largest page size list requests may ask for.
    pub max_page_size: Option<u32>,
    /// Refuse deletes of entity types without soft deletion.
    #[ortho_config(default = false)]
    pub reject_untracked_delete: bool,
}

impl RepositorySettings {
    /// Delete policy for entity types without soft deletion.
    pub fn untracked_delete(&self) -> UntrackedDelete {
        if self.reject_untracked_delete {
            UntrackedDelete::Reject
        } else {
            UntrackedDelete::HardDelete
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for repository configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> RepositorySettings {
        RepositorySettings::load_from_iter([OsString::from("crud-kit")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_hard_delete_without_a_page_ceiling() {
        let _guard = lock_env([
            ("CRUD_MAX_PAGE_SIZE", None::<String>),
            ("CRUD_REJECT_UNTRACKED_DELETE", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.max_page_size, None);
        assert!(!settings.reject_untracked_delete);
        assert_eq!(settings.untracked_delete(), UntrackedDelete::HardDelete);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CRUD_MAX_PAGE_SIZE", Some("100".to_owned())),
            ("CRUD_REJECT_UNTRACKED_DELETE", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.max_page_size, Some(100));
        assert_eq!(settings.untracked_delete(), UntrackedDelete::Reject);
    }
}
