use crate::model::ExerciseResult;
use phf::phf_map;

pub const DEFAULT_API_URL: &str = "https://exercises-by-api-ninjas.p.rapidapi.com/v1/exercises";
pub const DEFAULT_API_HOST: &str = "exercises-by-api-ninjas.p.rapidapi.com";

/// Most results shown for one search.
pub const MAX_RESULTS: usize = 10;

pub const PROMPT_MESSAGE: &str = "Type an exercise name first.";
pub const SEARCHING_MESSAGE: &str = "Searching...";
pub const NO_RESULTS_MESSAGE: &str = "No exercises found for that search.";
pub const NETWORK_MESSAGE: &str = "An error occurred while searching exercises (network error).";

/// User facing text for API failures, by HTTP status.
static STATUS_MESSAGES: phf::Map<u16, &'static str> = phf_map! {
    400u16 => "Bad request: the API did not like one of the parameters. Check the log for details.",
    401u16 => "Unauthorized/forbidden: check your RapidAPI key and host.",
    403u16 => "Unauthorized/forbidden: check your RapidAPI key and host.",
    429u16 => "Rate limit reached on RapidAPI. Try again later or check your quota.",
};

pub fn status_message(code: u16) -> String {
    STATUS_MESSAGES
        .get(&code)
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("Error fetching exercises (status {code})."))
}

pub fn found_message(count: usize) -> String {
    format!("Found {count} exercise(s). Select one to view details.")
}

/// Determine the API key to use for exercise lookups.
///
/// If the `EXERCISE_API_KEY` environment variable is set, its value takes
/// precedence over any key provided in the application settings.
pub fn resolve_api_key(settings_key: Option<&str>) -> Option<String> {
    std::env::var("EXERCISE_API_KEY")
        .ok()
        .or_else(|| settings_key.map(|s| s.to_string()))
        .filter(|k| !k.trim().is_empty())
}

#[derive(Debug)]
pub enum SearchError {
    /// Blank query; no request was made.
    EmptyQuery,
    Status { code: u16, body: String },
    Network(Box<ureq::Transport>),
    Decode(std::io::Error),
}

impl SearchError {
    /// Text for the search status line.
    pub fn status_text(&self) -> String {
        match self {
            SearchError::EmptyQuery => PROMPT_MESSAGE.to_string(),
            SearchError::Status { code, .. } => status_message(*code),
            SearchError::Network(_) | SearchError::Decode(_) => NETWORK_MESSAGE.to_string(),
        }
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::EmptyQuery => write!(f, "Empty search query"),
            SearchError::Status { code, body } => write!(f, "HTTP {code}: {body}"),
            SearchError::Network(e) => write!(f, "{e}"),
            SearchError::Decode(e) => write!(f, "Invalid response: {e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Network(e) => Some(&**e),
            SearchError::Decode(e) => Some(e),
            SearchError::EmptyQuery | SearchError::Status { .. } => None,
        }
    }
}

/// Client for the third-party exercise lookup API.
pub struct ExerciseSearchClient {
    url: String,
    host: String,
    api_key: String,
    agent: ureq::Agent,
}

impl ExerciseSearchClient {
    pub fn new(url: &str, host: &str, api_key: Option<String>) -> Self {
        if api_key.is_none() {
            log::warn!("No exercise API key configured");
        }
        Self {
            url: url.to_string(),
            host: host.to_string(),
            api_key: api_key.unwrap_or_default(),
            agent: ureq::Agent::new(),
        }
    }

    /// Look up exercises by name. The full decoded result is returned; use
    /// [`display_results`] to cap it for display.
    pub fn search(&self, query: &str) -> Result<Vec<ExerciseResult>, SearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let name = trimmed.to_lowercase();
        log::info!("Exercise API request: {}?name={name}&offset=0", self.url);
        let response = self
            .agent
            .get(&self.url)
            .query("name", &name)
            .query("offset", "0")
            .set("X-RapidAPI-Key", &self.api_key)
            .set("X-RapidAPI-Host", &self.host)
            .call();
        match response {
            Ok(resp) => {
                let data: serde_json::Value = resp.into_json().map_err(SearchError::Decode)?;
                // A body that is not a list means nothing matched.
                match data {
                    serde_json::Value::Array(items) => {
                        serde_json::from_value(serde_json::Value::Array(items))
                            .map_err(|e| SearchError::Decode(e.into()))
                    }
                    _ => Ok(Vec::new()),
                }
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                log::error!("Exercise API error {code}: {body}");
                Err(SearchError::Status { code, body })
            }
            Err(ureq::Error::Transport(t)) => {
                log::error!("Exercise search error: {t}");
                Err(SearchError::Network(Box::new(t)))
            }
        }
    }
}

/// The first [`MAX_RESULTS`] results.
pub fn display_results(mut results: Vec<ExerciseResult>) -> Vec<ExerciseResult> {
    results.truncate(MAX_RESULTS);
    results
}
