//! Session storage split into two named stores.
//!
//! The persistent namespace holds the bearer token and the signed-in
//! identity; it survives page reloads. The page namespace holds the
//! freshness flag and lives only as long as one page instance.
//!
//! Every store implements [`SessionStore::take`] as a single atomic
//! read-and-remove, which is what the freshness gate relies on.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{DashboardError, Result};

pub const TOKEN_KEY: &str = "token";
pub const IDENTITY_KEY: &str = "usuario";
pub const FRESH_KEY: &str = "session_active";

const FRESH_VALUE: &str = "true";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Survives reloads.
    Persistent,
    /// Scoped to a single page instance.
    Page,
}

/// The signed-in user as returned by the authentication flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "codigo_acceso", default)]
    pub access_code: Option<String>,
}

impl Identity {
    /// First word of the display name, used in the header greeting.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

/// get/set/clear over the two session namespaces.
pub trait SessionStore: Send + Sync {
    fn get(&self, ns: Namespace, key: &str) -> Result<Option<String>>;

    fn set(&self, ns: Namespace, key: &str, value: &str) -> Result<()>;

    fn clear(&self, ns: Namespace, key: &str) -> Result<()>;

    /// Remove `key` and return what it held, as one uninterruptible step.
    fn take(&self, ns: Namespace, key: &str) -> Result<Option<String>>;
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| DashboardError::InvalidArgument("Session store lock poisoned".into()))
}

// ---------------------------------------------------------------------------
// MemorySessionStore
// ---------------------------------------------------------------------------

/// Both namespaces held in memory behind one lock.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<(Namespace, String), String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything in the page namespace, as a browser reload would.
    pub fn reload_page(&self) -> Result<()> {
        lock(&self.entries)?.retain(|(ns, _), _| *ns != Namespace::Page);
        Ok(())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, ns: Namespace, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.entries)?.get(&(ns, key.to_string())).cloned())
    }

    fn set(&self, ns: Namespace, key: &str, value: &str) -> Result<()> {
        lock(&self.entries)?.insert((ns, key.to_string()), value.to_string());
        Ok(())
    }

    fn clear(&self, ns: Namespace, key: &str) -> Result<()> {
        lock(&self.entries)?.remove(&(ns, key.to_string()));
        Ok(())
    }

    fn take(&self, ns: Namespace, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.entries)?.remove(&(ns, key.to_string())))
    }
}

// ---------------------------------------------------------------------------
// FileSessionStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct FileState {
    persistent: HashMap<String, String>,
    page: HashMap<String, String>,
}

/// Persistent namespace saved as JSON on disk; page namespace in memory.
///
/// A fresh `FileSessionStore` over the same directory behaves like a new
/// page instance: the token is still there, the freshness flag is not.
#[derive(Debug)]
pub struct FileSessionStore {
    /// Directory holding the session file.
    pub dir: PathBuf,
    state: Mutex<FileState>,
}

impl FileSessionStore {
    /// Open (or create) a store under `dir`.
    ///
    /// If `dir` is `None`, the platform data directory is used.
    pub fn open(dir: Option<PathBuf>) -> Result<Self> {
        let dir = dir.unwrap_or_else(config::default_session_dir);
        fs::create_dir_all(&dir)?;
        let persistent = Self::load(&dir.join(config::SESSION_FILE))?;
        debug!("Session store opened at {}", dir.display());
        Ok(Self {
            dir,
            state: Mutex::new(FileState {
                persistent,
                page: HashMap::new(),
            }),
        })
    }

    fn load(path: &Path) -> Result<HashMap<String, String>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let contents = fs::read_to_string(path)?;
        match serde_json::from_str(&contents) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!("Corrupt session file {}: {} -- starting empty", path.display(), e);
                let _ = fs::remove_file(path);
                Ok(HashMap::new())
            }
        }
    }

    /// Temp file plus rename; readers never see a partial file.
    fn save(&self, persistent: &HashMap<String, String>) -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(serde_json::to_string_pretty(persistent)?.as_bytes())?;
        tmp.persist(self.dir.join(config::SESSION_FILE))
            .map_err(|e| DashboardError::Io(e.error))?;
        Ok(())
    }

    fn with_map<T>(
        &self,
        ns: Namespace,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T> {
        let mut state = lock(&self.state)?;
        match ns {
            Namespace::Page => Ok(f(&mut state.page)),
            Namespace::Persistent => {
                let before = state.persistent.clone();
                let out = f(&mut state.persistent);
                if state.persistent != before {
                    // Memory only changes if the disk write went through.
                    if let Err(e) = self.save(&state.persistent) {
                        state.persistent = before;
                        return Err(e);
                    }
                }
                Ok(out)
            }
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, ns: Namespace, key: &str) -> Result<Option<String>> {
        let state = lock(&self.state)?;
        let map = match ns {
            Namespace::Persistent => &state.persistent,
            Namespace::Page => &state.page,
        };
        Ok(map.get(key).cloned())
    }

    fn set(&self, ns: Namespace, key: &str, value: &str) -> Result<()> {
        self.with_map(ns, |m| {
            m.insert(key.to_string(), value.to_string());
        })?;
        Ok(())
    }

    fn clear(&self, ns: Namespace, key: &str) -> Result<()> {
        self.with_map(ns, |m| {
            m.remove(key);
        })?;
        Ok(())
    }

    fn take(&self, ns: Namespace, key: &str) -> Result<Option<String>> {
        self.with_map(ns, |m| m.remove(key))
    }
}

// ---------------------------------------------------------------------------
// Login bookkeeping
// ---------------------------------------------------------------------------

/// Record a successful login: store the token and identity, arm the flag.
pub fn establish(store: &dyn SessionStore, token: &str, identity: &Identity) -> Result<()> {
    store.set(Namespace::Persistent, TOKEN_KEY, token)?;
    store.set(
        Namespace::Persistent,
        IDENTITY_KEY,
        &serde_json::to_string(identity)?,
    )?;
    store.set(Namespace::Page, FRESH_KEY, FRESH_VALUE)?;
    debug!("Session established for user {}", identity.id);
    Ok(())
}

/// Soft re-entry with the saved token. Re-arms the flag only if a token exists.
pub fn resume(store: &dyn SessionStore) -> Result<()> {
    if store.get(Namespace::Persistent, TOKEN_KEY)?.is_none() {
        return Err(DashboardError::Unauthenticated);
    }
    store.set(Namespace::Page, FRESH_KEY, FRESH_VALUE)?;
    debug!("Session resumed with saved token");
    Ok(())
}

/// Log out: forget the token, the identity and any pending flag.
pub fn end(store: &dyn SessionStore) -> Result<()> {
    store.clear(Namespace::Persistent, TOKEN_KEY)?;
    store.clear(Namespace::Persistent, IDENTITY_KEY)?;
    store.clear(Namespace::Page, FRESH_KEY)?;
    debug!("Session ended");
    Ok(())
}

/// The stored token, if any.
pub fn token(store: &dyn SessionStore) -> Result<Option<String>> {
    store.get(Namespace::Persistent, TOKEN_KEY)
}

/// The stored identity, if any. An unreadable entry counts as absent.
pub fn identity(store: &dyn SessionStore) -> Result<Option<Identity>> {
    Ok(store
        .get(Namespace::Persistent, IDENTITY_KEY)?
        .and_then(|raw| serde_json::from_str(&raw).ok()))
}

pub(crate) fn is_fresh(value: &str) -> bool {
    value == FRESH_VALUE
}
