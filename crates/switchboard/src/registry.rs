//! The feature set: registry, dispatcher, and command lifecycle.
//!
//! [`FeatureSet`] is the central object of the crate. It owns the ordered
//! list of registered [`Feature`]s, routes inbound interactions to the
//! first feature that matches, and drives the command registration
//! lifecycle against the platform through the [`Session`] seam:
//!
//! 1. [`sync_commands`](FeatureSet::sync_commands) bulk-replaces the
//!    platform's command set with the specs of every command and
//!    autocomplete feature, and records the created ids per application
//!    identity.
//! 2. [`clear_commands`](FeatureSet::clear_commands) deletes the recorded
//!    commands and forgets them, after which a new sync is allowed.
//!
//! The one invariant the bookkeeping enforces: an application identity
//! cannot sync twice without clearing in between.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{Instrument, Level, debug, span};

use switchboard_core::{
    BoxedSession, CommandSpec, CreatedCommand, Interaction, RegistryError, RegistryResult, Session,
};

use crate::context::InteractionContext;
use crate::feature::Feature;

/// The feature registry and interaction dispatcher.
///
/// # Thread Safety
///
/// `FeatureSet` is `Send + Sync`. Clones share the command bookkeeping, so
/// a clone handed to a gateway callback sees syncs performed elsewhere.
#[derive(Default, Clone)]
pub struct FeatureSet {
    /// Registered features, scanned in registration order.
    features: Vec<Feature>,
    /// Created command ids, keyed by application identity.
    synced: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl FeatureSet {
    /// Creates a new, empty feature set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a feature.
    ///
    /// Features are matched in the order they are added; the first match
    /// wins.
    pub fn add(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Adds a feature (builder pattern).
    pub fn with(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Adds every feature from an iterator.
    pub fn extend(&mut self, features: impl IntoIterator<Item = Feature>) {
        self.features.extend(features);
    }

    /// Returns the number of registered features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if no features are registered.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Removes all registered features.
    ///
    /// Command bookkeeping is untouched; use
    /// [`clear_commands`](Self::clear_commands) to undo a sync.
    pub fn clear(&mut self) {
        self.features.clear();
    }

    /// Returns the command ids recorded for an application identity, if it
    /// has synced.
    pub fn synced_command_ids(&self, application_id: &str) -> Option<Vec<String>> {
        self.synced.lock().get(application_id).cloned()
    }

    /// Collects the command specs to register, deduplicated by name.
    ///
    /// First occurrence wins, so an autocomplete feature sharing a
    /// command's spec contributes nothing new.
    fn command_specs(&self) -> Vec<CommandSpec> {
        let mut seen = HashSet::new();
        self.features
            .iter()
            .filter_map(|f| f.command_spec())
            .filter(|spec| seen.insert(spec.name.clone()))
            .cloned()
            .collect()
    }

    /// Registers the command and autocomplete features with the platform.
    ///
    /// Performs one bulk-overwrite call, replacing whatever command set was
    /// registered remotely, and records the created ids under the session's
    /// application identity. `guild_id` scopes the commands to one guild;
    /// `None` registers them globally.
    ///
    /// The identity is reserved under the lock before the REST call, so a
    /// concurrent sync for the same identity observes `AlreadySynced`
    /// rather than registering a second time.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadySynced`] if this identity already
    /// has recorded commands, and forwards any REST failure. The session
    /// must already be connected.
    pub async fn sync_commands(
        &self,
        session: &dyn Session,
        guild_id: Option<&str>,
    ) -> RegistryResult<Vec<CreatedCommand>> {
        let application_id = session.application_id().to_string();

        // Reserve the entry in the same lock acquisition as the guard
        // check; the REST call below awaits.
        {
            let mut synced = self.synced.lock();
            if synced.contains_key(&application_id) {
                return Err(RegistryError::AlreadySynced { application_id });
            }
            synced.insert(application_id.clone(), Vec::new());
        }

        let specs = self.command_specs();
        debug!(
            application_id = %application_id,
            guild_id = guild_id.unwrap_or("global"),
            command_count = specs.len(),
            "syncing application commands"
        );

        let created = match session.bulk_set_commands(guild_id, &specs).await {
            Ok(created) => created,
            Err(err) => {
                self.synced.lock().remove(&application_id);
                return Err(err.into());
            }
        };

        let ids = created.iter().map(|c| c.id.clone()).collect();
        self.synced.lock().insert(application_id, ids);

        Ok(created)
    }

    /// Deletes every command recorded by a previous
    /// [`sync_commands`](Self::sync_commands) for this session's identity.
    ///
    /// Each id is forgotten as its deletion succeeds, so a failed clear
    /// forwards the error and can be retried with only the remaining ids;
    /// a retry never re-deletes a command the platform no longer has. On
    /// full success the entry is removed, allowing a later re-sync. No-op
    /// if nothing is recorded.
    pub async fn clear_commands(
        &self,
        session: &dyn Session,
        guild_id: Option<&str>,
    ) -> RegistryResult<()> {
        let application_id = session.application_id().to_string();

        let Some(ids) = self.synced.lock().get(&application_id).cloned() else {
            return Ok(());
        };

        debug!(
            application_id = %application_id,
            command_count = ids.len(),
            "clearing application commands"
        );

        for id in &ids {
            session.delete_command(guild_id, id).await?;

            let mut synced = self.synced.lock();
            if let Some(remaining) = synced.get_mut(&application_id) {
                remaining.retain(|recorded| recorded != id);
            }
        }

        self.synced.lock().remove(&application_id);
        Ok(())
    }

    /// Dispatches an interaction to the first matching feature.
    ///
    /// Features are scanned in registration order; unmatched interactions
    /// (including unknown kinds) are logged at debug level and dropped.
    ///
    /// Returns `true` if a feature handled the interaction.
    pub async fn dispatch(&self, session: BoxedSession, interaction: Interaction) -> bool {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            kind = interaction.kind.code(),
            interaction_id = %interaction.id
        );

        let ctx = Arc::new(InteractionContext::new(interaction, session));

        // Instrument instead of entering the span: the guard would make
        // this future !Send and leak across yields.
        async move {
            for feature in &self.features {
                if feature.run(Arc::clone(&ctx)).await {
                    return true;
                }
            }

            debug!(
                kind = ctx.interaction().kind.code(),
                "no feature matched interaction"
            );
            false
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureSet")
            .field("feature_count", &self.features.len())
            .field("synced_applications", &self.synced.lock().len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::assert_ok;

    use switchboard_core::{
        ApiError, ApiResult, CommandData, ComponentData, InteractionData, InteractionKind,
        InteractionResponse, ModalData,
    };

    use crate::pattern::IdPattern;

    // ------------------------------------------------------------------
    // Shared fixtures (also used by the feature and handler test modules)
    // ------------------------------------------------------------------

    pub(crate) fn command_interaction(name: &str) -> Interaction {
        Interaction {
            id: "interaction-1".into(),
            application_id: "app-1".into(),
            kind: InteractionKind::ApplicationCommand,
            token: "tok".into(),
            guild_id: None,
            channel_id: None,
            data: Some(InteractionData::Command(CommandData {
                id: "cmd-1".into(),
                name: name.into(),
                options: Vec::new(),
            })),
        }
    }

    pub(crate) fn component_interaction(custom_id: &str) -> Interaction {
        Interaction {
            id: "interaction-2".into(),
            application_id: "app-1".into(),
            kind: InteractionKind::MessageComponent,
            token: "tok".into(),
            guild_id: None,
            channel_id: None,
            data: Some(InteractionData::Component(ComponentData {
                custom_id: custom_id.into(),
                component_type: 2,
                values: Vec::new(),
            })),
        }
    }

    pub(crate) fn modal_interaction(custom_id: &str) -> Interaction {
        Interaction {
            id: "interaction-3".into(),
            application_id: "app-1".into(),
            kind: InteractionKind::ModalSubmit,
            token: "tok".into(),
            guild_id: None,
            channel_id: None,
            data: Some(InteractionData::Modal(ModalData {
                custom_id: custom_id.into(),
                components: serde_json::Value::Null,
            })),
        }
    }

    pub(crate) fn ping_interaction() -> Interaction {
        Interaction {
            id: "interaction-4".into(),
            application_id: "app-1".into(),
            kind: InteractionKind::Ping,
            token: "tok".into(),
            guild_id: None,
            channel_id: None,
            data: None,
        }
    }

    /// An in-memory session. Deleting an id the platform does not know
    /// fails with the platform's unknown-command code, like the real API.
    pub(crate) struct MockSession {
        bulk_calls: AtomicUsize,
        last_specs: Mutex<Vec<CommandSpec>>,
        deleted: Mutex<Vec<String>>,
        alive: Mutex<HashSet<String>>,
        fail_bulk: bool,
        fail_deletes: bool,
        fail_delete_once: Mutex<HashSet<String>>,
        yield_in_bulk: bool,
    }

    impl MockSession {
        pub(crate) fn new() -> Self {
            Self {
                bulk_calls: AtomicUsize::new(0),
                last_specs: Mutex::new(Vec::new()),
                deleted: Mutex::new(Vec::new()),
                alive: Mutex::new(HashSet::new()),
                fail_bulk: false,
                fail_deletes: false,
                fail_delete_once: Mutex::new(HashSet::new()),
                yield_in_bulk: false,
            }
        }

        fn failing_bulk() -> Self {
            Self {
                fail_bulk: true,
                ..Self::new()
            }
        }

        fn failing_deletes() -> Self {
            Self {
                fail_deletes: true,
                ..Self::new()
            }
        }

        /// Fails the first deletion of each given id, then recovers.
        fn flaky_deletes(ids: &[&str]) -> Self {
            Self {
                fail_delete_once: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
                ..Self::new()
            }
        }

        /// Yields inside the bulk call, giving a concurrent sync a chance
        /// to interleave.
        fn yielding() -> Self {
            Self {
                yield_in_bulk: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl Session for MockSession {
        fn application_id(&self) -> &str {
            "app-1"
        }

        async fn bulk_set_commands(
            &self,
            _guild_id: Option<&str>,
            specs: &[CommandSpec],
        ) -> ApiResult<Vec<CreatedCommand>> {
            self.bulk_calls.fetch_add(1, Ordering::SeqCst);
            if self.yield_in_bulk {
                tokio::task::yield_now().await;
            }
            if self.fail_bulk {
                return Err(ApiError::other("bulk overwrite failed"));
            }
            *self.last_specs.lock() = specs.to_vec();
            let created: Vec<CreatedCommand> = specs
                .iter()
                .enumerate()
                .map(|(i, spec)| CreatedCommand {
                    id: format!("id-{i}"),
                    name: spec.name.clone(),
                })
                .collect();
            *self.alive.lock() = created.iter().map(|c| c.id.clone()).collect();
            Ok(created)
        }

        async fn delete_command(
            &self,
            _guild_id: Option<&str>,
            command_id: &str,
        ) -> ApiResult<()> {
            if self.fail_deletes {
                return Err(ApiError::Platform {
                    code: 10063,
                    message: "unknown command".into(),
                });
            }
            if self.fail_delete_once.lock().remove(command_id) {
                return Err(ApiError::other("transient delete failure"));
            }
            if !self.alive.lock().remove(command_id) {
                return Err(ApiError::Platform {
                    code: 10063,
                    message: "unknown command".into(),
                });
            }
            self.deleted.lock().push(command_id.to_string());
            Ok(())
        }

        async fn respond(
            &self,
            _interaction: &Interaction,
            _response: InteractionResponse,
        ) -> ApiResult<()> {
            Ok(())
        }

        fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    pub(crate) fn mock_session() -> BoxedSession {
        Arc::new(MockSession::new())
    }

    fn counting_feature(feature: Feature, counter: Arc<AtomicUsize>, amount: usize) -> Feature {
        feature.handler(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(amount, Ordering::SeqCst);
            }
        })
    }

    // ------------------------------------------------------------------
    // Command lifecycle
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn sync_registers_specs_and_records_ids() {
        let features = FeatureSet::new()
            .with(Feature::command(CommandSpec::new("ping", "d")))
            .with(Feature::command(CommandSpec::new("roll", "d")))
            .with(Feature::component("confirm:*"));

        let session = MockSession::new();
        let created = assert_ok!(features.sync_commands(&session, None).await);

        assert_eq!(created.len(), 2);
        assert_eq!(session.bulk_calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.last_specs.lock().len(), 2);
        assert_eq!(
            features.synced_command_ids("app-1"),
            Some(vec!["id-0".to_string(), "id-1".to_string()])
        );
    }

    #[tokio::test]
    async fn autocomplete_spec_is_not_registered_twice() {
        let spec = CommandSpec::new("search", "d");
        let features = FeatureSet::new()
            .with(Feature::command(spec.clone()))
            .with(Feature::autocomplete(spec));

        let session = MockSession::new();
        let created = features.sync_commands(&session, None).await.unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(session.last_specs.lock()[0].name, "search");
    }

    #[tokio::test]
    async fn second_sync_for_same_identity_is_rejected() {
        let features = FeatureSet::new().with(Feature::command(CommandSpec::new("ping", "d")));
        let session = MockSession::new();

        features.sync_commands(&session, None).await.unwrap();
        let err = features.sync_commands(&session, None).await.unwrap_err();

        assert!(matches!(
            err,
            RegistryError::AlreadySynced { application_id } if application_id == "app-1"
        ));
        // The guard fires before any REST call.
        assert_eq!(session.bulk_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_deletes_recorded_ids_and_allows_resync() {
        let features = FeatureSet::new().with(Feature::command(CommandSpec::new("ping", "d")));
        let session = MockSession::new();

        features.sync_commands(&session, None).await.unwrap();
        features.clear_commands(&session, None).await.unwrap();

        assert_eq!(*session.deleted.lock(), vec!["id-0".to_string()]);
        assert_eq!(features.synced_command_ids("app-1"), None);

        // Cleared identity may sync again.
        features.sync_commands(&session, None).await.unwrap();
        assert_eq!(session.bulk_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_without_sync_is_a_noop() {
        let features = FeatureSet::new();
        let session = MockSession::new();

        features.clear_commands(&session, None).await.unwrap();
        assert!(session.deleted.lock().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_keeps_bookkeeping() {
        let features = FeatureSet::new().with(Feature::command(CommandSpec::new("ping", "d")));
        let session = MockSession::failing_deletes();

        features.sync_commands(&session, None).await.unwrap();
        let err = features.clear_commands(&session, None).await.unwrap_err();

        assert!(matches!(err, RegistryError::Api(ApiError::Platform { .. })));
        assert!(features.synced_command_ids("app-1").is_some());
    }

    #[tokio::test]
    async fn concurrent_syncs_register_once() {
        let features = FeatureSet::new().with(Feature::command(CommandSpec::new("ping", "d")));
        let session = MockSession::yielding();

        let (first, second) = tokio::join!(
            features.sync_commands(&session, None),
            features.sync_commands(&session, None)
        );

        // Exactly one sync wins; the loser is turned away by the
        // reservation without reaching the REST call.
        assert!(first.is_ok() != second.is_ok());
        assert_eq!(session.bulk_calls.load(Ordering::SeqCst), 1);

        let err = first.err().or(second.err()).unwrap();
        assert!(matches!(err, RegistryError::AlreadySynced { .. }));
        assert_eq!(
            features.synced_command_ids("app-1"),
            Some(vec!["id-0".to_string()])
        );
    }

    #[tokio::test]
    async fn failed_bulk_call_releases_reservation() {
        let features = FeatureSet::new().with(Feature::command(CommandSpec::new("ping", "d")));

        let err = features
            .sync_commands(&MockSession::failing_bulk(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Api(_)));
        assert_eq!(features.synced_command_ids("app-1"), None);

        // The identity is free to sync again after the failure.
        features
            .sync_commands(&MockSession::new(), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn clear_retries_after_partial_failure() {
        let features = FeatureSet::new()
            .with(Feature::command(CommandSpec::new("ping", "d")))
            .with(Feature::command(CommandSpec::new("roll", "d")));
        let session = MockSession::flaky_deletes(&["id-1"]);

        features.sync_commands(&session, None).await.unwrap();
        let err = features.clear_commands(&session, None).await.unwrap_err();
        assert!(matches!(err, RegistryError::Api(_)));

        // The id deleted before the failure is already forgotten.
        assert_eq!(
            features.synced_command_ids("app-1"),
            Some(vec!["id-1".to_string()])
        );

        // The retry only touches the remaining id and fully clears.
        features.clear_commands(&session, None).await.unwrap();
        assert_eq!(features.synced_command_ids("app-1"), None);
        assert_eq!(
            *session.deleted.lock(),
            vec!["id-0".to_string(), "id-1".to_string()]
        );

        features.sync_commands(&session, None).await.unwrap();
        assert_eq!(session.bulk_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn sync_with_no_command_features_registers_empty_set() {
        let features = FeatureSet::new().with(Feature::component("x"));
        let session = MockSession::new();

        let created = features.sync_commands(&session, None).await.unwrap();
        assert!(created.is_empty());
        // The bulk call still runs, clearing any stale remote commands.
        assert_eq!(session.bulk_calls.load(Ordering::SeqCst), 1);
        assert_eq!(features.synced_command_ids("app-1"), Some(Vec::new()));
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn dispatch_with_no_features_matches_nothing() {
        let features = FeatureSet::new();
        let matched = features
            .dispatch(mock_session(), command_interaction("ping"))
            .await;
        assert!(!matched);
    }

    #[tokio::test]
    async fn dispatch_routes_by_kind_and_name() {
        let counter = Arc::new(AtomicUsize::new(0));

        let features = FeatureSet::new()
            .with(counting_feature(
                Feature::command(CommandSpec::new("ping", "d")),
                Arc::clone(&counter),
                1,
            ))
            .with(counting_feature(
                Feature::component("confirm:*"),
                Arc::clone(&counter),
                10,
            ));

        assert!(
            features
                .dispatch(mock_session(), command_interaction("ping"))
                .await
        );
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(
            features
                .dispatch(mock_session(), component_interaction("confirm:yes"))
                .await
        );
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[tokio::test]
    async fn first_matching_feature_wins() {
        let counter = Arc::new(AtomicUsize::new(0));

        // Both patterns match the interaction; only the first should run.
        let features = FeatureSet::new()
            .with(counting_feature(
                Feature::component("confirm:*"),
                Arc::clone(&counter),
                1,
            ))
            .with(counting_feature(
                Feature::component(IdPattern::any()),
                Arc::clone(&counter),
                10,
            ));

        features
            .dispatch(mock_session(), component_interaction("confirm:yes"))
            .await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unmatched_command_name_falls_through() {
        let counter = Arc::new(AtomicUsize::new(0));
        let features = FeatureSet::new().with(counting_feature(
            Feature::command(CommandSpec::new("ping", "d")),
            Arc::clone(&counter),
            1,
        ));

        let matched = features
            .dispatch(mock_session(), command_interaction("other"))
            .await;
        assert!(!matched);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_kind_never_matches() {
        let counter = Arc::new(AtomicUsize::new(0));
        let features = FeatureSet::new()
            .with(counting_feature(Feature::ping(), Arc::clone(&counter), 1));

        let mut interaction = ping_interaction();
        interaction.kind = InteractionKind::Unknown(42);

        let matched = features.dispatch(mock_session(), interaction).await;
        assert!(!matched);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn all_handlers_of_matched_feature_run_in_order() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c1 = Arc::clone(&counter);
        let c2 = Arc::clone(&counter);

        let feature = Feature::ping()
            .handler(move || {
                let c = Arc::clone(&c1);
                async move {
                    // First handler sees the initial value.
                    assert_eq!(c.fetch_add(1, Ordering::SeqCst), 0);
                }
            })
            .handler(move || {
                let c = Arc::clone(&c2);
                async move {
                    assert_eq!(c.fetch_add(1, Ordering::SeqCst), 1);
                }
            });

        let features = FeatureSet::new().with(feature);
        features.dispatch(mock_session(), ping_interaction()).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dispatch_future_can_be_spawned() {
        let counter = Arc::new(AtomicUsize::new(0));
        let features = FeatureSet::new()
            .with(counting_feature(Feature::ping(), Arc::clone(&counter), 1));

        // Requires the dispatch future to be Send.
        let handle = tokio::spawn({
            let features = features.clone();
            async move { features.dispatch(mock_session(), ping_interaction()).await }
        });

        assert!(handle.await.unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clones_share_sync_bookkeeping() {
        let features = FeatureSet::new().with(Feature::command(CommandSpec::new("ping", "d")));
        let clone = features.clone();
        let session = MockSession::new();

        features.sync_commands(&session, None).await.unwrap();
        let err = clone.sync_commands(&session, None).await.unwrap_err();
        assert!(matches!(err, RegistryError::AlreadySynced { .. }));
    }
}
