//! Integration tests for types

#[cfg(test)]
mod tests {
    use fdr_types::*;

    #[test]
    fn test_state_display_matches_serde_name() {
        let state = AddRepoState::ExistsUpgradableToSigned;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, format!("\"{state}\""));
    }

    #[test]
    fn test_mismatch_disables_action() {
        let p = AddRepoState::ExistsFingerprintMismatch.presentation();
        assert_eq!(p.message, Some("repo_delete_to_overwrite"));
        assert!(p.warning);
        assert!(!p.action_enabled);
    }

    #[test]
    fn test_only_mutating_states_update_existing() {
        assert!(AddRepoState::ExistsAddMirror.updates_existing());
        assert!(AddRepoState::ExistsDisabled.updates_existing());
        assert!(!AddRepoState::ExistsEnabled.updates_existing());
        assert!(!AddRepoState::ExistsFingerprintMismatch.updates_existing());
        assert!(!AddRepoState::DoesntExist.is_existing());
    }

    #[test]
    fn test_repo_update_default_is_empty() {
        assert!(RepoUpdate::default().is_empty());
        let update = RepoUpdate {
            inuse: Some(true),
            ..RepoUpdate::default()
        };
        assert!(!update.is_empty());
    }

    mod props {
        use fdr_types::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn mirror_list_survives_storage(list in proptest::collection::vec("[a-z0-9:/.]{1,20}", 0..5)) {
                let stored = serialize_mirror_list(&list);
                prop_assert_eq!(parse_mirror_list(stored.as_deref()), list);
            }
        }
    }
}
