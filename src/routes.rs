//! The application's route table, as handed to the collector.
//!
//! Each [`Route`] carries the framework's path template (`/books/<int:book_id>`),
//! its route identifier (endpoint name), the verbs it answers to and the
//! documentation registered for those verbs.

use crate::fragment::Fragment;
use crate::model::{HttpMethod, Operation};
use std::collections::BTreeMap;

/// One route of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    rule: String,
    endpoint: String,
    methods: Vec<HttpMethod>,
    operations: BTreeMap<HttpMethod, Operation>,
    fragment: Option<Fragment>,
    method_fragments: BTreeMap<HttpMethod, Fragment>,
}

impl Route {
    pub fn new(rule: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            endpoint: endpoint.into(),
            methods: Vec::new(),
            operations: BTreeMap::new(),
            fragment: None,
            method_fragments: BTreeMap::new(),
        }
    }

    /// Declares a verb without documentation.
    pub fn method(mut self, method: HttpMethod) -> Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self
    }

    /// Declares a verb together with its documentation.
    pub fn document(mut self, method: HttpMethod, operation: Operation) -> Self {
        self.operations.insert(method, operation);
        self.method(method)
    }

    pub fn get(self, operation: Operation) -> Self {
        self.document(HttpMethod::Get, operation)
    }

    pub fn post(self, operation: Operation) -> Self {
        self.document(HttpMethod::Post, operation)
    }

    pub fn put(self, operation: Operation) -> Self {
        self.document(HttpMethod::Put, operation)
    }

    pub fn patch(self, operation: Operation) -> Self {
        self.document(HttpMethod::Patch, operation)
    }

    pub fn delete(self, operation: Operation) -> Self {
        self.document(HttpMethod::Delete, operation)
    }

    /// Fragment applying to every verb of the route
    pub fn fragment(mut self, fragment: Fragment) -> Self {
        self.fragment = Some(fragment);
        self
    }

    /// Fragment applying to one verb, used instead of the route fragment
    pub fn method_fragment(mut self, method: HttpMethod, fragment: Fragment) -> Self {
        self.method_fragments.insert(method, fragment);
        self
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Verbs in declaration order
    pub fn methods(&self) -> &[HttpMethod] {
        &self.methods
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations.get(&method)
    }

    pub fn fragment_for(&self, method: HttpMethod) -> Option<&Fragment> {
        self.method_fragments.get(&method).or(self.fragment.as_ref())
    }
}

/// All routes, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, route: Route) -> &mut Self {
        self.routes.push(route);
        self
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
