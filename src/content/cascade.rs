//! First-match-wins resolution over an ordered list of lazy suppliers
//!
//! Used wherever a value can come from several signals of decreasing
//! reliability (brand name, main content region, ...). Suppliers after the
//! first accepted one are never evaluated.

/// A value resolved by a [`Cascade`], with the label of the step that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: &'static str,
}

type Supplier<'a, T> = Box<dyn FnOnce() -> Option<T> + 'a>;

/// Ordered, labelled lazy suppliers
pub struct Cascade<'a, T> {
    steps: Vec<(&'static str, Supplier<'a, T>)>,
}

impl<'a, T> Cascade<'a, T> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a supplier; earlier steps take priority
    pub fn then(mut self, source: &'static str, supplier: impl FnOnce() -> Option<T> + 'a) -> Self {
        self.steps.push((source, Box::new(supplier)));
        self
    }

    /// Number of registered steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Evaluate steps in order and return the first value `accept` approves
    pub fn resolve(self, accept: impl Fn(&T) -> bool) -> Option<Resolved<T>> {
        for (source, supplier) in self.steps {
            if let Some(value) = supplier() {
                if accept(&value) {
                    return Some(Resolved { value, source });
                }
            }
        }
        None
    }
}

impl<T> Default for Cascade<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}
