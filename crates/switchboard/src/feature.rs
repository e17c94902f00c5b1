//! The feature record.
//!
//! A [`Feature`] binds one routing rule — an interaction kind plus either a
//! command name or a custom-id pattern — to the handlers that should run
//! when an interaction matches it. Features are assembled with a builder
//! API and registered in a [`FeatureSet`](crate::registry::FeatureSet).
//!
//! # Cheap Cloning
//!
//! `Feature` keeps its data behind an `Arc` with copy-on-write builder
//! methods, so clones held by a dispatcher and by Tower middleware share
//! storage.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::Service;
use tracing::{debug, trace};

use switchboard_core::{CommandSpec, Interaction, InteractionKind};

use crate::context::InteractionContext;
use crate::handler::{BoxedHandler, Handler, into_handler};
use crate::pattern::IdPattern;

/// The matching rule of a feature.
#[derive(Clone)]
enum Rule {
    /// Match a slash-command invocation by name.
    Command(CommandSpec),
    /// Match an autocomplete request for the named command.
    Autocomplete(CommandSpec),
    /// Match a component action whose custom id fits the pattern.
    Component(IdPattern),
    /// Match a modal submission whose custom id fits the pattern.
    Modal(IdPattern),
    /// Match platform pings.
    Ping,
}

impl Rule {
    fn kind(&self) -> InteractionKind {
        match self {
            Rule::Command(_) => InteractionKind::ApplicationCommand,
            Rule::Autocomplete(_) => InteractionKind::Autocomplete,
            Rule::Component(_) => InteractionKind::MessageComponent,
            Rule::Modal(_) => InteractionKind::ModalSubmit,
            Rule::Ping => InteractionKind::Ping,
        }
    }
}

#[derive(Clone)]
struct FeatureInner {
    rule: Rule,
    handlers: Vec<BoxedHandler>,
    /// Optional name for diagnostics.
    name: Option<String>,
}

/// A registered handler bound to an interaction matching rule.
///
/// # Example
///
/// ```rust,ignore
/// let feature = Feature::command(CommandSpec::new("ping", "Check latency"))
///     .name("ping")
///     .handler(ping_handler)
///     .handler(audit_handler);
/// ```
#[derive(Clone)]
pub struct Feature {
    inner: Arc<FeatureInner>,
}

impl Feature {
    fn from_rule(rule: Rule) -> Self {
        Self {
            inner: Arc::new(FeatureInner {
                rule,
                handlers: Vec::new(),
                name: None,
            }),
        }
    }

    /// Creates a feature matching invocations of the given command.
    ///
    /// The spec is also what
    /// [`FeatureSet::sync_commands`](crate::registry::FeatureSet::sync_commands)
    /// registers with the platform.
    pub fn command(spec: CommandSpec) -> Self {
        Self::from_rule(Rule::Command(spec))
    }

    /// Creates a feature matching autocomplete requests for the given
    /// command.
    ///
    /// Shares the command's definition; registration deduplicates by name,
    /// so pairing this with [`Feature::command`] for the same spec does not
    /// register the command twice.
    pub fn autocomplete(spec: CommandSpec) -> Self {
        Self::from_rule(Rule::Autocomplete(spec))
    }

    /// Creates a feature matching component actions whose custom id fits
    /// `pattern`.
    pub fn component(pattern: impl Into<IdPattern>) -> Self {
        Self::from_rule(Rule::Component(pattern.into()))
    }

    /// Creates a feature matching modal submissions whose custom id fits
    /// `pattern`.
    pub fn modal(pattern: impl Into<IdPattern>) -> Self {
        Self::from_rule(Rule::Modal(pattern.into()))
    }

    /// Creates a feature matching platform pings.
    pub fn ping() -> Self {
        Self::from_rule(Rule::Ping)
    }

    /// Internal helper to get mutable access to inner.
    /// Creates a new Arc if there are other references.
    fn inner_mut(&mut self) -> &mut FeatureInner {
        Arc::make_mut(&mut self.inner)
    }

    /// Sets a name for this feature (useful for diagnostics).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner_mut().name = Some(name.into());
        self
    }

    /// Adds a handler to this feature.
    ///
    /// Handlers are executed in the order they are added.
    pub fn handler<F, T>(mut self, f: F) -> Self
    where
        F: Handler<T> + Send + Sync + 'static,
        T: 'static,
    {
        self.inner_mut().handlers.push(into_handler(f));
        self
    }

    /// Adds a pre-built boxed handler.
    pub fn handler_boxed(mut self, handler: BoxedHandler) -> Self {
        self.inner_mut().handlers.push(handler);
        self
    }

    /// Returns the interaction kind this feature matches.
    pub fn kind(&self) -> InteractionKind {
        self.inner.rule.kind()
    }

    /// Returns the command definition, for command and autocomplete
    /// features.
    pub fn command_spec(&self) -> Option<&CommandSpec> {
        match &self.inner.rule {
            Rule::Command(spec) | Rule::Autocomplete(spec) => Some(spec),
            _ => None,
        }
    }

    /// Returns the name of this feature, if set.
    pub fn get_name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Returns the number of handlers in this feature.
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.len()
    }

    /// Checks whether this feature should handle the given interaction.
    pub fn matches(&self, interaction: &Interaction) -> bool {
        if interaction.kind != self.kind() {
            return false;
        }

        match &self.inner.rule {
            Rule::Command(spec) | Rule::Autocomplete(spec) => {
                interaction.command_name() == Some(spec.name.as_str())
            }
            Rule::Component(pattern) | Rule::Modal(pattern) => interaction
                .custom_id()
                .is_some_and(|id| pattern.matches(id)),
            Rule::Ping => true,
        }
    }

    /// Executes all handlers in this feature.
    ///
    /// Returns `true` if the interaction matched, `false` otherwise.
    pub async fn run(&self, ctx: Arc<InteractionContext>) -> bool {
        if !self.matches(ctx.interaction()) {
            trace!(
                feature = self.inner.name.as_deref().unwrap_or("unnamed"),
                "feature did not match, skipping"
            );
            return false;
        }

        debug!(
            feature = self.inner.name.as_deref().unwrap_or("unnamed"),
            handler_count = self.inner.handlers.len(),
            "feature matched, executing handlers"
        );

        for (i, handler) in self.inner.handlers.iter().enumerate() {
            trace!(
                feature = self.inner.name.as_deref().unwrap_or("unnamed"),
                handler_index = i,
                "executing handler"
            );
            handler.call(Arc::clone(&ctx)).await;
        }

        true
    }
}

impl std::fmt::Debug for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feature")
            .field("kind", &self.kind())
            .field("name", &self.inner.name)
            .field("handler_count", &self.inner.handlers.len())
            .finish()
    }
}

// ============================================================================
// Tower Service Implementation
// ============================================================================

/// The response type for [`Feature`] as a Tower `Service`.
#[derive(Debug, Clone, Copy)]
pub struct FeatureResponse {
    /// Whether the feature matched and its handlers were executed.
    pub matched: bool,
}

/// Tower `Service` implementation for [`Feature`].
///
/// Lets middleware (timeouts, concurrency limits, ...) wrap a feature
/// before registration:
///
/// ```rust,ignore
/// use tower::ServiceBuilder;
/// use tower::timeout::TimeoutLayer;
///
/// let service = ServiceBuilder::new()
///     .layer(TimeoutLayer::new(Duration::from_secs(3)))
///     .service(feature);
/// ```
impl Service<Arc<InteractionContext>> for Feature {
    type Response = FeatureResponse;
    type Error = Infallible;
    type Future =
        Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, ctx: Arc<InteractionContext>) -> Self::Future {
        let feature = self.clone();

        Box::pin(async move {
            let matched = feature.run(ctx).await;
            Ok(FeatureResponse { matched })
        })
    }
}
