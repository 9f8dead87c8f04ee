//! Finding the target module among the modules loaded by a host process.

use std::sync::{Arc, OnceLock};

use crate::{module::ModuleIndex, Error, Result};

/// Something that can enumerate the modules currently loaded in a process.
///
/// Implementations hand out snapshots, the locator never asks twice once it found its module.
pub trait ModuleHost: Send + Sync {
    /// All modules currently loaded, in load order
    fn loaded_modules(&self) -> Vec<Arc<ModuleIndex>>;
}

/// A [`ModuleHost`] over a fixed set of modules.
#[derive(Default, Debug)]
pub struct InMemoryHost {
    modules: Vec<Arc<ModuleIndex>>,
}

impl InMemoryHost {
    /// Creates a host without modules
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a loaded module
    #[must_use]
    pub fn with_module(mut self, module: impl Into<Arc<ModuleIndex>>) -> Self {
        self.modules.push(module.into());
        self
    }
}

impl ModuleHost for InMemoryHost {
    fn loaded_modules(&self) -> Vec<Arc<ModuleIndex>> {
        self.modules.clone()
    }
}

/// Resolves the module with an expected name exactly once.
///
/// The first [`ModuleLocator::module`] call settles the outcome for the lifetime of the
/// locator. A found module is handed out again, a missing or ambiguous module is reported
/// again, and the host is never asked a second time.
///
/// # Examples
///
/// ```rust
/// use opscope::module::{InMemoryHost, ModuleIndex, ModuleLocator};
///
/// let host = InMemoryHost::new()
///     .with_module(ModuleIndex::builder("mscorlib").build())
///     .with_module(ModuleIndex::builder("osu!").build());
///
/// let locator = ModuleLocator::new("osu!");
/// let module = locator.module(&host)?;
/// assert_eq!(module.name(), "osu!");
/// # Ok::<(), opscope::Error>(())
/// ```
#[derive(Debug)]
pub struct ModuleLocator {
    name: String,
    /// The module, or the number of modules carrying the name if that was not exactly one
    outcome: OnceLock<std::result::Result<Arc<ModuleIndex>, usize>>,
}

impl ModuleLocator {
    /// Creates a locator for the module named `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ModuleLocator {
            name: name.into(),
            outcome: OnceLock::new(),
        }
    }

    /// The module name this locator looks for
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` once the module has been found
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome.get(), Some(Ok(_)))
    }

    /// `true` once the host has been asked, whatever the outcome
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// Returns the target module, asking `host` only on the first call.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotFound`] if no loaded module had the expected name and
    /// [`Error::ModuleAmbiguous`] if several had, on the first call and every call after it.
    pub fn module<H: ModuleHost + ?Sized>(&self, host: &H) -> Result<Arc<ModuleIndex>> {
        match self.outcome.get_or_init(|| self.lookup(host)) {
            Ok(module) => Ok(Arc::clone(module)),
            Err(0) => Err(Error::ModuleNotFound {
                name: self.name.clone(),
            }),
            Err(count) => Err(Error::ModuleAmbiguous {
                name: self.name.clone(),
                count: *count,
            }),
        }
    }

    fn lookup<H: ModuleHost + ?Sized>(
        &self,
        host: &H,
    ) -> std::result::Result<Arc<ModuleIndex>, usize> {
        let mut matching: Vec<Arc<ModuleIndex>> = host
            .loaded_modules()
            .into_iter()
            .filter(|module| module.name() == self.name)
            .collect();

        if matching.len() != 1 {
            log::debug!(
                "Module '{}' not resolved, {} loaded modules carry the name",
                self.name,
                matching.len()
            );
            return Err(matching.len());
        }

        let found = matching.swap_remove(0);
        log::debug!(
            "Resolved module '{}' ({} types, {} members)",
            found.name(),
            found.types().len(),
            found.member_count()
        );
        Ok(found)
    }
}
