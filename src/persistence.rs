use crate::model::{EntryId, WorkoutEntry};
use serde::Deserialize;
use serde_json::Value;

/// Which backend call failed, for picking the alert text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Save,
    Delete,
}

impl Operation {
    /// Shown when the call did not produce a usable error message.
    fn fallback_alert(self) -> &'static str {
        match self {
            Operation::Save => "An error occurred while saving",
            Operation::Delete => "An error occurred while deleting",
        }
    }
}

#[derive(Debug)]
pub enum ClientError {
    /// The request never completed.
    Network(Box<ureq::Transport>),
    /// The backend answered with a non-success status.
    Status { code: u16, message: String },
    /// The response body could not be read or decoded.
    Decode(std::io::Error),
}

impl ClientError {
    /// Text for the blocking alert shown to the user.
    pub fn alert(&self, op: Operation) -> String {
        match self {
            ClientError::Status { message, .. } => message.clone(),
            ClientError::Network(_) | ClientError::Decode(_) => op.fallback_alert().to_string(),
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Network(e) => write!(f, "Network error: {e}"),
            ClientError::Status { code, message } => write!(f, "HTTP {code}: {message}"),
            ClientError::Decode(e) => write!(f, "Invalid response: {e}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Network(e) => Some(&**e),
            ClientError::Status { .. } => None,
            ClientError::Decode(e) => Some(e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

fn error_field(body: &str) -> Result<Option<String>, serde_json::Error> {
    serde_json::from_str::<ErrorBody>(body).map(|b| b.error)
}

/// Split a ureq failure into the two tiers. A status failure hands back the
/// status code, status text and body for the caller to interpret.
fn split(err: ureq::Error) -> Result<(u16, String, String), ClientError> {
    match err {
        ureq::Error::Status(code, resp) => {
            let text = resp.status_text().to_string();
            let body = resp.into_string().unwrap_or_default();
            Ok((code, text, body))
        }
        ureq::Error::Transport(t) => Err(ClientError::Network(Box::new(t))),
    }
}

/// REST client for the `/data` workout collection.
pub struct PersistenceClient {
    base_url: String,
    agent: ureq::Agent,
}

impl PersistenceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::Agent::new(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/data", self.base_url)
    }

    fn item_url(&self, id: &EntryId) -> String {
        format!("{}/data/{}", self.base_url, id)
    }

    /// Fetch every stored workout.
    pub fn list(&self) -> Result<Vec<WorkoutEntry>, ClientError> {
        let url = self.collection_url();
        log::debug!("GET {url}");
        match self.agent.get(&url).set("Accept", "application/json").call() {
            Ok(resp) => {
                let data: Value = resp.into_json().map_err(ClientError::Decode)?;
                // Anything other than an array is treated as an empty log.
                match data {
                    Value::Array(items) => serde_json::from_value(Value::Array(items))
                        .map_err(|e| ClientError::Decode(e.into())),
                    _ => Ok(Vec::new()),
                }
            }
            Err(e) => {
                let (code, text, _) = split(e)?;
                Err(ClientError::Status {
                    code,
                    message: text,
                })
            }
        }
    }

    /// Create or update depending on whether the entry already has an id.
    pub fn save(&self, entry: &WorkoutEntry) -> Result<WorkoutEntry, ClientError> {
        match &entry.id {
            Some(id) => self.update(id, entry),
            None => self.create(entry),
        }
    }

    pub fn create(&self, entry: &WorkoutEntry) -> Result<WorkoutEntry, ClientError> {
        let url = self.collection_url();
        log::debug!("POST {url}");
        self.send("POST", &url, entry)
    }

    pub fn update(&self, id: &EntryId, entry: &WorkoutEntry) -> Result<WorkoutEntry, ClientError> {
        let url = self.item_url(id);
        log::debug!("PUT {url}");
        self.send("PUT", &url, entry)
    }

    fn send(&self, method: &str, url: &str, entry: &WorkoutEntry) -> Result<WorkoutEntry, ClientError> {
        let response = self
            .agent
            .request(method, url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json")
            .send_json(entry);
        match response {
            Ok(resp) => resp.into_json().map_err(ClientError::Decode),
            Err(e) => {
                let (code, text, body) = split(e)?;
                let message = match error_field(&body) {
                    Ok(Some(msg)) => msg,
                    Ok(None) => text,
                    Err(_) => format!("Failed to save: {text}"),
                };
                Err(ClientError::Status { code, message })
            }
        }
    }

    /// Delete one workout. Callers confirm with the user before calling.
    pub fn remove(&self, id: &EntryId) -> Result<Value, ClientError> {
        let url = self.item_url(id);
        log::debug!("DELETE {url}");
        match self.agent.delete(&url).set("Accept", "application/json").call() {
            Ok(resp) => resp.into_json().map_err(ClientError::Decode),
            Err(e) => {
                let (code, _, body) = split(e)?;
                match error_field(&body) {
                    Ok(message) => Err(ClientError::Status {
                        code,
                        message: message.unwrap_or_else(|| "Failed to delete item".to_string()),
                    }),
                    Err(e) => Err(ClientError::Decode(e.into())),
                }
            }
        }
    }
}
