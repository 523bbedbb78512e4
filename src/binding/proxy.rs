use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use log::debug;

use crate::binding::mapper_method::MapperMethod;
use crate::core::{Arg, BindingError, Result};
use crate::metadata::{DefaultBody, MapperCall, MapperInterface, MethodDecl};
use crate::session::{CallResult, SqlSession};

/// Identity of a method in the dispatch table: the interface that declares
/// it plus the method name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub interface: String,
    pub method: String,
}

impl MethodKey {
    pub fn new(interface: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            method: method.into(),
        }
    }
}

/// A compiled dispatch-table entry for one method.
pub enum MethodInvoker {
    /// Routes through a [`MapperMethod`] to the engine.
    Plain(MapperMethod),
    /// Calls the method's own declared body with the proxy as receiver.
    DefaultBody(DefaultBody),
}

impl MethodInvoker {
    fn invoke(&self, mapper: &Mapper, args: Vec<Arg>) -> Result<CallResult> {
        match self {
            Self::Plain(method) => method.execute(mapper.session.as_ref(), args),
            Self::DefaultBody(body) => body(mapper, args),
        }
    }
}

/// Shared dispatch table: method identity -> compiled invoker.
///
/// Entries are compiled lazily on first call and live for the cache's
/// lifetime. Compilation happens at most once per method even when several
/// threads race on first use; failed compilations are not cached, so the
/// error surfaces again on the next attempt.
#[derive(Default)]
pub struct InvokerCache {
    entries: RwLock<HashMap<MethodKey, Arc<MethodInvoker>>>,
}

impl InvokerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_or_compile<F>(&self, key: MethodKey, compile: F) -> Result<Arc<MethodInvoker>>
    where
        F: FnOnce() -> Result<MethodInvoker>,
    {
        if let Some(hit) = self.entries.read()?.get(&key) {
            return Ok(Arc::clone(hit));
        }
        let mut entries = self.entries.write()?;
        if let Some(hit) = entries.get(&key) {
            return Ok(Arc::clone(hit));
        }
        debug!("compiling invoker for {}.{}", key.interface, key.method);
        let invoker = Arc::new(compile()?);
        entries.insert(key, Arc::clone(&invoker));
        Ok(invoker)
    }
}

/// The synthesized implementation of a mapper interface: every call is
/// routed through the shared invoker cache to the engine session.
///
/// Identity, equality and string form are native trait impls on this type
/// and never touch a command.
pub struct Mapper {
    session: Arc<dyn SqlSession>,
    interface: Arc<MapperInterface>,
    cache: Arc<InvokerCache>,
}

impl Mapper {
    pub fn new(
        session: Arc<dyn SqlSession>,
        interface: Arc<MapperInterface>,
        cache: Arc<InvokerCache>,
    ) -> Self {
        Self {
            session,
            interface,
            cache,
        }
    }

    pub fn interface(&self) -> &Arc<MapperInterface> {
        &self.interface
    }

    pub fn session(&self) -> &Arc<dyn SqlSession> {
        &self.session
    }

    /// Dispatch a call to the named method with the given arguments.
    pub fn call(&self, method: &str, args: Vec<Arg>) -> Result<CallResult> {
        let (declaring, decl) = self.interface.find_method(method).ok_or_else(|| {
            BindingError::UnknownMethod(method.to_string(), self.interface.name().to_string())
        })?;
        let key = MethodKey::new(declaring.name(), decl.name.clone());
        let invoker = self
            .cache
            .get_or_compile(key, || self.compile(declaring, decl))?;
        invoker.invoke(self, args)
    }

    fn compile(&self, declaring: &MapperInterface, decl: &MethodDecl) -> Result<MethodInvoker> {
        if let Some(body) = &decl.default_body {
            return Ok(MethodInvoker::DefaultBody(Arc::clone(body)));
        }
        let config = self.session.configuration();
        let method = MapperMethod::new(&config, &self.interface, declaring, decl)?;
        Ok(MethodInvoker::Plain(method))
    }
}

impl MapperCall for Mapper {
    fn call(&self, method: &str, args: Vec<Arg>) -> Result<CallResult> {
        Mapper::call(self, method, args)
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("interface", &self.interface.name())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mapper proxy for {}", self.interface.name())
    }
}

/// Proxy identity: same interface bound to the same session.
impl PartialEq for Mapper {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.interface, &other.interface) && Arc::ptr_eq(&self.session, &other.session)
    }
}

impl Eq for Mapper {}

/// Creates [`Mapper`] proxies for one interface, all sharing a single
/// invoker cache (typically for the lifetime of the interface /
/// session-factory pairing).
pub struct MapperFactory {
    interface: Arc<MapperInterface>,
    cache: Arc<InvokerCache>,
}

impl MapperFactory {
    pub fn new(interface: Arc<MapperInterface>) -> Self {
        Self {
            interface,
            cache: Arc::new(InvokerCache::new()),
        }
    }

    pub fn create(&self, session: Arc<dyn SqlSession>) -> Mapper {
        Mapper::new(session, Arc::clone(&self.interface), Arc::clone(&self.cache))
    }

    pub fn interface(&self) -> &Arc<MapperInterface> {
        &self.interface
    }

    pub fn cache(&self) -> &Arc<InvokerCache> {
        &self.cache
    }
}
