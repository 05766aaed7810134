//! Which registration scopes a test can see.

/// Scopes visible from one test.
///
/// A test sees definitions registered in its own module, in every ancestor
/// module, and in any scope imported explicitly. Sibling and child modules
/// stay invisible unless imported.
///
/// # Examples
/// ```
/// use stepwise::Reach;
///
/// let reach = Reach::from_module("app::tests::login").with_scope("shared::steps");
/// assert!(reach.contains("app::tests::login"));
/// assert!(reach.contains("app"));
/// assert!(reach.contains("shared::steps"));
/// assert!(!reach.contains("app::tests::signup"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reach {
    scopes: Vec<String>,
    everything: bool,
}

impl Reach {
    /// `module` and its ancestors.
    #[must_use]
    pub fn from_module(module: &str) -> Self {
        let mut scopes = Vec::new();
        let mut current = Some(module);
        while let Some(scope) = current {
            scopes.push(scope.to_owned());
            current = scope.rsplit_once("::").map(|(parent, _)| parent);
        }
        Self {
            scopes,
            everything: false,
        }
    }

    /// Every scope. Useful for tooling that inspects the whole registry.
    #[must_use]
    pub fn everything() -> Self {
        Self {
            scopes: Vec::new(),
            everything: true,
        }
    }

    /// Additionally see definitions registered in `scope`.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    /// Whether definitions registered in `scope` are visible.
    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.everything || self.scopes.iter().any(|visible| visible == scope)
    }

    /// Visible scopes, own module first. Empty for [`Reach::everything`].
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }
}
