//! Endpoint documentation collector.
//!
//! Walks the route table and produces, for every documented route, the OpenAPI
//! path template and one operation per surviving verb. For each verb (HEAD and
//! OPTIONS are never documented) the collector:
//!
//! 1. looks up the descriptor registered on the route (empty if none);
//! 2. drops the verb if that descriptor is [`hidden`](crate::operation::hidden);
//! 3. uses an override registered for (rule, verb) or (endpoint, verb) as-is,
//!    skipping steps 4 to 6;
//! 4. drops the verb if the exclusion predicate says so;
//! 5. names the operation `{verb}_{endpoint}` when it has no id;
//! 6. merges the route's [`Fragment`](crate::fragment::Fragment) on top, rendering
//!    its description through the template engine;
//! 7. makes the operation id unique through the [`OperationIdLedger`];
//! 8. translates the path template to OpenAPI syntax.
//!
//! Routes left without any verb are omitted.

use crate::error::{Error, Result};
use crate::fragment::{merge_fragment, DescriptionRenderer, Fragment};
use crate::model::{HttpMethod, Operation};
use crate::operation::HIDDEN_OPERATION_ID;
use crate::routes::{Route, RouteTable};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

static PATH_CONVERTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:[A-Za-z_][A-Za-z0-9_]*(?:\([^)]*\))?:)?([A-Za-z_][A-Za-z0-9_]*)>")
        .expect("Failed to compile path converter regex")
});

/// Decides whether (rule, verb) is left out of the document.
pub type ExclusionPredicate = Box<dyn Fn(&str, HttpMethod) -> bool + Send + Sync>;

/// Operations replacing whatever the collector would generate.
///
/// Keyed by the literal route rule or the route's endpoint name.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    operations: HashMap<(String, HttpMethod), Operation>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, method: HttpMethod, operation: Operation) {
        self.operations.insert((key.into(), method), operation);
    }

    /// The override for a route, looked up by rule first, then by endpoint.
    pub fn find(&self, route: &Route, method: HttpMethod) -> Option<&Operation> {
        self.operations
            .get(&(route.rule().to_string(), method))
            .or_else(|| self.operations.get(&(route.endpoint().to_string(), method)))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Every operation id handed out so far.
///
/// Lives as long as its collector; running a second collection over the same
/// routes without [`reset`](Self::reset) yields suffixed ids.
#[derive(Debug, Clone, Default)]
pub struct OperationIdLedger {
    seen: HashSet<String>,
}

impl OperationIdLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `id`, or `id_{n}` when `id` was already claimed, where n counts the
    /// claimed ids made of `id` followed only by underscores and digits.
    pub fn claim(&mut self, id: &str) -> String {
        let claimed = if self.seen.contains(id) {
            let mut n = self
                .seen
                .iter()
                .filter(|seen| is_suffixed_form(seen, id))
                .count();
            let mut candidate = format!("{}_{}", id, n);
            while self.seen.contains(&candidate) {
                n += 1;
                candidate = format!("{}_{}", id, n);
            }
            debug!("Operation id {} already used, renamed to {}", id, candidate);
            candidate
        } else {
            id.to_string()
        };

        self.seen.insert(claimed.clone());
        claimed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }
}

fn is_suffixed_form(candidate: &str, id: &str) -> bool {
    candidate
        .strip_prefix(id)
        .is_some_and(|rest| rest.chars().all(|c| c == '_' || c.is_ascii_digit()))
}

/// Converts `<converter:name>`, `<name>` and `:name` placeholders to `{name}`.
pub fn translate_path(rule: &str) -> String {
    let converted = PATH_CONVERTER.replace_all(rule, "{$1}");

    converted
        .split('/')
        .map(|part| match part.strip_prefix(':') {
            Some(name) if !name.is_empty() => format!("{{{}}}", name),
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Routes whose endpoint names mark them as plumbing rather than API.
pub fn is_documentable(endpoint: &str) -> bool {
    !endpoint.contains("_relationships_")
        && !endpoint.contains(".docs.")
        && !endpoint.contains("static")
}

/// Documentation of one path: translated template and operations per verb.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedPath {
    pub path: String,
    pub operations: BTreeMap<HttpMethod, Operation>,
}

/// Collects the documentation of a route table.
pub struct Collector {
    ledger: OperationIdLedger,
    overrides: Overrides,
    exclude: Option<ExclusionPredicate>,
    renderer: DescriptionRenderer,
}

impl Collector {
    pub fn new(renderer: DescriptionRenderer) -> Self {
        debug!("Initializing Collector");
        Self {
            ledger: OperationIdLedger::new(),
            overrides: Overrides::new(),
            exclude: None,
            renderer,
        }
    }

    pub fn overrides_mut(&mut self) -> &mut Overrides {
        &mut self.overrides
    }

    pub fn set_exclusion<F>(&mut self, exclude: F)
    where
        F: Fn(&str, HttpMethod) -> bool + Send + Sync + 'static,
    {
        self.exclude = Some(Box::new(exclude));
    }

    pub fn ledger(&self) -> &OperationIdLedger {
        &self.ledger
    }

    /// Forgets every operation id handed out so far.
    pub fn reset(&mut self) {
        debug!("Resetting operation id ledger ({} ids)", self.ledger.len());
        self.ledger.reset();
    }

    pub fn collect(&mut self, routes: &RouteTable) -> Result<Vec<CollectedPath>> {
        info!("Collecting documentation of {} routes", routes.len());

        let mut collected = Vec::new();
        for route in routes.iter() {
            if !is_documentable(route.endpoint()) {
                debug!("Skipping endpoint {}", route.endpoint());
                continue;
            }

            let operations = self.operations_for_route(route)?;
            if operations.is_empty() {
                debug!("No documented verbs left on {}", route.rule());
                continue;
            }

            collected.push(CollectedPath {
                path: translate_path(route.rule()),
                operations,
            });
        }

        info!("Collected {} documented paths", collected.len());
        Ok(collected)
    }

    fn operations_for_route(&mut self, route: &Route) -> Result<BTreeMap<HttpMethod, Operation>> {
        let mut operations = BTreeMap::new();

        for &method in route.methods().iter().filter(|m| !m.is_implicit()) {
            let registered = route.operation(method).cloned().unwrap_or_default();
            if is_hidden(&registered) {
                debug!("{} {} is hidden", method, route.rule());
                continue;
            }

            // Overrides win over the exclusion predicate.
            let mut operation = match self.overrides.find(route, method) {
                Some(overridden) => {
                    debug!("Using override for {} {}", method, route.rule());
                    overridden.clone()
                }
                None => {
                    if self.exclude.as_ref().is_some_and(|exclude| exclude(route.rule(), method)) {
                        debug!("{} {} is excluded", method, route.rule());
                        continue;
                    }

                    let mut operation = registered;
                    if operation.operation_id.is_none() {
                        operation.operation_id =
                            Some(format!("{}_{}", method.as_str(), route.endpoint()));
                    }
                    if let Some(fragment) = route.fragment_for(method) {
                        operation = self.overlay(route, method, operation, fragment)?;
                    }
                    if is_hidden(&operation) {
                        debug!("{} {} is hidden by its fragment", method, route.rule());
                        continue;
                    }
                    operation
                }
            };

            if let Some(id) = operation.operation_id.take() {
                operation.operation_id = Some(self.ledger.claim(&id));
            }
            operations.insert(method, operation);
        }

        Ok(operations)
    }

    fn overlay(
        &self,
        route: &Route,
        method: HttpMethod,
        operation: Operation,
        fragment: &Fragment,
    ) -> Result<Operation> {
        let invalid = |message: String| Error::InvalidFragment {
            endpoint: route.endpoint().to_string(),
            message,
        };

        let mut fields = fragment.fields_for(method).map_err(invalid)?;
        if let Some(Value::String(description)) = fields.get("description") {
            let rendered = self.renderer.render(description)?;
            fields.insert("description".to_string(), Value::String(rendered));
        }

        merge_fragment(operation, fields).map_err(|e| invalid(e.to_string()))
    }
}

fn is_hidden(operation: &Operation) -> bool {
    operation.operation_id.as_deref() == Some(HIDDEN_OPERATION_ID)
}
