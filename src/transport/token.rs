use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::RwLock;

/// Where the admin bearer token and the signed-in admin (as JSON) live
/// between sessions.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn save(&self, token: &str) -> io::Result<()>;
    fn admin_user(&self) -> Option<String>;
    fn save_admin_user(&self, user_json: &str) -> io::Result<()>;
    /// Forgets both the token and the admin user.
    fn clear(&self) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
    admin_user: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
            ..Self::default()
        }
    }
}

fn replace(slot: &RwLock<Option<String>>, value: Option<String>) {
    *slot.write().unwrap_or_else(|e| e.into_inner()) = value;
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn save(&self, token: &str) -> io::Result<()> {
        replace(&self.token, Some(token.to_string()));
        Ok(())
    }

    fn admin_user(&self) -> Option<String> {
        self.admin_user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn save_admin_user(&self, user_json: &str) -> io::Result<()> {
        replace(&self.admin_user, Some(user_json.to_string()));
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        replace(&self.token, None);
        replace(&self.admin_user, None);
        Ok(())
    }
}

/// Token kept in a plain file, one line. The admin user goes next to it in
/// `<path>.user.json`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn user_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".user.json");
        PathBuf::from(name)
    }
}

fn read_trimmed(path: &PathBuf) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn remove_if_present(path: &PathBuf) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        read_trimmed(&self.path)
    }

    fn save(&self, token: &str) -> io::Result<()> {
        fs::write(&self.path, token)
    }

    fn admin_user(&self) -> Option<String> {
        read_trimmed(&self.user_path())
    }

    fn save_admin_user(&self, user_json: &str) -> io::Result<()> {
        fs::write(self.user_path(), user_json)
    }

    fn clear(&self) -> io::Result<()> {
        remove_if_present(&self.path)?;
        remove_if_present(&self.user_path())
    }
}
